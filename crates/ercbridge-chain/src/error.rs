//! Chain client error types

use thiserror::Error;

/// Error raised by the chain client, ABI codec or transaction builder
#[derive(Debug, Error)]
pub enum ChainError {
    /// Transport/network error
    #[error("transport error: {0}")]
    Transport(String),

    /// JSON-RPC error object returned by the node
    #[error("rpc error {code}: {message}")]
    Rpc {
        /// Error code
        code: i64,
        /// Error message
        message: String,
    },

    /// Node returned a result we could not interpret
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Signing failed
    #[error("signing failed: {0}")]
    Signing(#[from] ercbridge_crypto::CryptoError),

    /// ABI encoding error
    #[error("abi encoding error: {0}")]
    AbiEncode(String),

    /// ABI decoding error
    #[error("abi decoding error: {0}")]
    AbiDecode(String),

    /// Function is not part of the contract ABI
    #[error("unknown function: {0}")]
    UnknownFunction(String),

    /// Transaction build error
    #[error("transaction build error: {0}")]
    TxBuild(String),

    /// Invalid hex string
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<hex::FromHexError> for ChainError {
    fn from(e: hex::FromHexError) -> Self {
        ChainError::InvalidHex(e.to_string())
    }
}

impl From<serde_json::Error> for ChainError {
    fn from(e: serde_json::Error) -> Self {
        ChainError::Serialization(e.to_string())
    }
}

impl From<ercbridge_primitives::PrimitiveError> for ChainError {
    fn from(e: ercbridge_primitives::PrimitiveError) -> Self {
        ChainError::UnexpectedResponse(e.to_string())
    }
}
