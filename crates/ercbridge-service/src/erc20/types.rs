//! ERC20 request and response types
//!
//! Quantities are decimal strings; addresses and hashes are lowercase hex.

#![allow(missing_docs)]

use serde::{Deserialize, Serialize};

use crate::validator::SecretString;

// ==================== Views ====================

/// Balance of one holder
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GetBalanceRequest {
    pub contract_address: String,
    pub owner_address: String,
    pub contract_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetBalanceResponse {
    pub balance: String,
    pub decimals: u32,
    pub contract_address: String,
    pub owner_address: String,
}

/// Token metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GetTokenInfoRequest {
    pub contract_address: String,
    pub contract_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetTokenInfoResponse {
    pub name: String,
    pub symbol: String,
    pub decimals: u32,
    pub total_supply: String,
    pub contract_address: String,
}

/// Remaining allowance of `spender_address` over `owner_address`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GetAllowanceRequest {
    pub contract_address: String,
    pub owner_address: String,
    pub spender_address: String,
    pub contract_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetAllowanceResponse {
    pub allowance: String,
    pub contract_address: String,
    pub owner_address: String,
    pub spender_address: String,
}

/// Current owner of an ownable token
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GetOwnerRequest {
    pub contract_address: String,
    pub contract_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetOwnerResponse {
    pub owner_address: String,
    pub contract_address: String,
}

// ==================== Mutations ====================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferRequest {
    pub contract_address: String,
    pub to_address: String,
    pub amount: String,
    pub private_key: SecretString,
    pub contract_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferResponse {
    pub tx_hash: String,
    pub contract_address: String,
    pub from_address: String,
    pub to_address: String,
    pub amount: String,
}

/// Move `amount` from `from_address` using the signer's allowance
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferFromRequest {
    pub contract_address: String,
    pub from_address: String,
    pub to_address: String,
    pub amount: String,
    pub private_key: SecretString,
    pub contract_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferFromResponse {
    pub tx_hash: String,
    pub contract_address: String,
    pub from_address: String,
    pub to_address: String,
    pub spender_address: String,
    pub amount: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApproveRequest {
    pub contract_address: String,
    pub spender_address: String,
    pub amount: String,
    pub private_key: SecretString,
    pub contract_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproveResponse {
    pub tx_hash: String,
    pub contract_address: String,
    pub owner_address: String,
    pub spender_address: String,
    pub amount: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MintRequest {
    pub contract_address: String,
    pub to_address: String,
    pub amount: String,
    pub private_key: SecretString,
    pub contract_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintResponse {
    pub tx_hash: String,
    pub contract_address: String,
    pub to_address: String,
    pub amount: String,
}

/// Burn from the signer's own balance
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BurnRequest {
    pub contract_address: String,
    pub amount: String,
    pub private_key: SecretString,
    pub contract_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurnResponse {
    pub tx_hash: String,
    pub contract_address: String,
    pub from_address: String,
    pub amount: String,
}

/// Burn from `from_address` using the signer's allowance
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BurnFromRequest {
    pub contract_address: String,
    pub from_address: String,
    pub amount: String,
    pub private_key: SecretString,
    pub contract_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurnFromResponse {
    pub tx_hash: String,
    pub contract_address: String,
    pub from_address: String,
    pub amount: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferOwnershipRequest {
    pub contract_address: String,
    pub new_owner_address: String,
    pub private_key: SecretString,
    pub contract_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferOwnershipResponse {
    pub tx_hash: String,
    pub contract_address: String,
    pub previous_owner_address: String,
    pub new_owner_address: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RenounceOwnershipRequest {
    pub contract_address: String,
    pub private_key: SecretString,
    pub contract_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenounceOwnershipResponse {
    pub tx_hash: String,
    pub contract_address: String,
    pub previous_owner_address: String,
}

// ==================== Deploy ====================

/// Create a new ERC20 token
///
/// `initial_supply` may be empty, meaning zero. With `use_admin` on the
/// ownable variant the configured admin address owns the token while the
/// key still signs; the standard variant ignores it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployRequest {
    pub name: String,
    pub symbol: String,
    pub decimals: u32,
    pub initial_supply: String,
    pub private_key: SecretString,
    pub contract_type: String,
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
    pub decimals: u32,
    pub initial_supply: String,
}
