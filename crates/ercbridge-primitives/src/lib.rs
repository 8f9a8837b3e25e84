//! # ercbridge-primitives
//!
//! Primitive chain types shared by every ercbridge crate: the 20-byte
//! [`Address`], the 32-byte [`H256`] and the arbitrary-width [`U256`] used for
//! token amounts and ids.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod address;
mod hash;
mod error;

pub use address::{Address, AddressError};
pub use hash::{H256, HashError};
pub use error::PrimitiveError;

// Re-export primitive-types for U256
pub use primitive_types::U256;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u256_exceeds_u128() {
        let big = U256::from_dec_str("123456789012345678901234567890123456789012").unwrap();
        assert!(big > U256::from(u128::MAX));
        assert_eq!(big.to_string(), "123456789012345678901234567890123456789012");
    }

    #[test]
    fn test_primitive_error_from() {
        let err: PrimitiveError = AddressError::InvalidHex.into();
        assert_eq!(err.to_string(), "malformed address: invalid hex string");
    }
}
