//! ERC721 request and response types

#![allow(missing_docs)]

use serde::{Deserialize, Serialize};

use crate::validator::SecretString;

// ==================== Views ====================

/// Number of tokens held by `owner_address`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GetBalanceRequest {
    pub contract_address: String,
    pub owner_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetBalanceResponse {
    pub balance: String,
    pub contract_address: String,
    pub owner_address: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GetTokenInfoRequest {
    pub contract_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetTokenInfoResponse {
    pub name: String,
    pub symbol: String,
    pub contract_address: String,
}

/// Request naming one token of a collection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenRequest {
    pub contract_address: String,
    pub token_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetTokenUriResponse {
    pub token_uri: String,
    pub contract_address: String,
    pub token_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetOwnerOfResponse {
    pub owner_address: String,
    pub contract_address: String,
    pub token_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetApprovedResponse {
    pub approved_address: String,
    pub contract_address: String,
    pub token_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IsApprovedForAllRequest {
    pub contract_address: String,
    pub owner_address: String,
    pub operator_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsApprovedForAllResponse {
    pub approved: bool,
    pub contract_address: String,
    pub owner_address: String,
    pub operator_address: String,
}

// ==================== Mutations ====================

/// Move `token_id` from `from_address`, which must be the signer
///
/// `data` is only sent by [`safe_transfer_with_data`]; it is hex and may be
/// empty.
///
/// [`safe_transfer_with_data`]: super::Erc721Service::safe_transfer_with_data
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferRequest {
    pub contract_address: String,
    pub from_address: String,
    pub to_address: String,
    pub token_id: String,
    pub data: String,
    pub private_key: SecretString,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferResponse {
    pub tx_hash: String,
    pub contract_address: String,
    pub from_address: String,
    pub to_address: String,
    pub token_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApproveRequest {
    pub contract_address: String,
    pub approved_address: String,
    pub token_id: String,
    pub private_key: SecretString,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproveResponse {
    pub tx_hash: String,
    pub contract_address: String,
    pub owner_address: String,
    pub approved_address: String,
    pub token_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SetApprovalForAllRequest {
    pub contract_address: String,
    pub operator_address: String,
    pub approved: bool,
    pub private_key: SecretString,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetApprovalForAllResponse {
    pub tx_hash: String,
    pub contract_address: String,
    pub owner_address: String,
    pub operator_address: String,
    pub approved: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SafeMintRequest {
    pub contract_address: String,
    pub to_address: String,
    pub token_id: String,
    pub private_key: SecretString,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafeMintResponse {
    pub tx_hash: String,
    pub contract_address: String,
    pub to_address: String,
    pub token_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BurnRequest {
    pub contract_address: String,
    pub token_id: String,
    pub private_key: SecretString,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurnResponse {
    pub tx_hash: String,
    pub contract_address: String,
    pub from_address: String,
    pub token_id: String,
}

// ==================== Deploy ====================

/// Create a new collection
///
/// The owner is `initial_owner` if set, else the admin address with
/// `use_admin`, else the signer. Setting both is rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployRequest {
    pub name: String,
    pub symbol: String,
    pub initial_owner: String,
    pub private_key: SecretString,
    pub use_admin: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployResponse {
    pub tx_hash: String,
    pub contract_address: String,
    pub deployer_address: String,
    pub owner_address: String,
    pub name: String,
    pub symbol: String,
}
