//! Parse failures for any primitive

use thiserror::Error;

use crate::address::AddressError;
use crate::hash::HashError;

/// Failure to parse an [`Address`](crate::Address) or [`H256`](crate::H256)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrimitiveError {
    /// Not a 20-byte address
    #[error("malformed address: {0}")]
    Address(#[from] AddressError),

    /// Not a 32-byte hash
    #[error("malformed hash: {0}")]
    Hash(#[from] HashError),
}
