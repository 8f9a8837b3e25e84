//! ERC1155 request and response types
//!
//! Batch requests carry parallel arrays that must be non-empty and of equal
//! length. `data` fields are hex and may be empty.

#![allow(missing_docs)]

use serde::{Deserialize, Serialize};

use crate::validator::SecretString;

// ==================== Views ====================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GetBalanceRequest {
    pub contract_address: String,
    pub account_address: String,
    pub token_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetBalanceResponse {
    pub balance: String,
    pub contract_address: String,
    pub account_address: String,
    pub token_id: String,
}

/// Balance of `accounts[i]` in `token_ids[i]` for every `i`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GetBalancesBatchRequest {
    pub contract_address: String,
    pub accounts: Vec<String>,
    pub token_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetBalancesBatchResponse {
    pub balances: Vec<String>,
    pub contract_address: String,
    pub accounts: Vec<String>,
    pub token_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GetTokenUriRequest {
    pub contract_address: String,
    pub token_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetTokenUriResponse {
    pub uri: String,
    pub contract_address: String,
    pub token_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IsApprovedForAllRequest {
    pub contract_address: String,
    pub account_address: String,
    pub operator_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsApprovedForAllResponse {
    pub approved: bool,
    pub contract_address: String,
    pub account_address: String,
    pub operator_address: String,
}

// ==================== Mutations ====================

/// Move `amount` of `token_id` from `from_address`, which must be the signer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SafeTransferRequest {
    pub contract_address: String,
    pub from_address: String,
    pub to_address: String,
    pub token_id: String,
    pub amount: String,
    pub data: String,
    pub private_key: SecretString,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafeTransferResponse {
    pub tx_hash: String,
    pub contract_address: String,
    pub from_address: String,
    pub to_address: String,
    pub token_id: String,
    pub amount: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SafeBatchTransferRequest {
    pub contract_address: String,
    pub from_address: String,
    pub to_address: String,
    pub token_ids: Vec<String>,
    pub amounts: Vec<String>,
    pub data: String,
    pub private_key: SecretString,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafeBatchTransferResponse {
    pub tx_hash: String,
    pub contract_address: String,
    pub from_address: String,
    pub to_address: String,
    pub token_ids: Vec<String>,
    pub amounts: Vec<String>,
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
    pub account_address: String,
    pub operator_address: String,
    pub approved: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MintRequest {
    pub contract_address: String,
    pub to_address: String,
    pub token_id: String,
    pub amount: String,
    pub data: String,
    pub private_key: SecretString,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintResponse {
    pub tx_hash: String,
    pub contract_address: String,
    pub to_address: String,
    pub token_id: String,
    pub amount: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MintBatchRequest {
    pub contract_address: String,
    pub to_address: String,
    pub token_ids: Vec<String>,
    pub amounts: Vec<String>,
    pub data: String,
    pub private_key: SecretString,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintBatchResponse {
    pub tx_hash: String,
    pub contract_address: String,
    pub to_address: String,
    pub token_ids: Vec<String>,
    pub amounts: Vec<String>,
}

/// Burn from `account_address`, which must be the signer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BurnRequest {
    pub contract_address: String,
    pub account_address: String,
    pub token_id: String,
    pub amount: String,
    pub private_key: SecretString,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurnResponse {
    pub tx_hash: String,
    pub contract_address: String,
    pub account_address: String,
    pub token_id: String,
    pub amount: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BurnBatchRequest {
    pub contract_address: String,
    pub account_address: String,
    pub token_ids: Vec<String>,
    pub amounts: Vec<String>,
    pub private_key: SecretString,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurnBatchResponse {
    pub tx_hash: String,
    pub contract_address: String,
    pub account_address: String,
    pub token_ids: Vec<String>,
    pub amounts: Vec<String>,
}

// ==================== Deploy ====================

/// Create a multi-token contract with metadata URI template `uri`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployRequest {
    pub uri: String,
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
    pub uri: String,
}
