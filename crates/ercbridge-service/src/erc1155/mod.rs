//! Multi-token operations
//!
//! Batch operations validate their parallel arrays before the signing key is
//! touched, so a malformed batch never reaches the chain.

mod service;
mod types;

pub use service::Erc1155Service;
pub use types::*;
