//! # ercbridge-crypto
//!
//! Cryptographic primitives for ercbridge.
//!
//! - Keccak-256 hashing
//! - ECDSA signing and public key recovery (secp256k1, low-s)
//! - Address derivation
//! - Web3 V3 keystore encryption/decryption

#![warn(missing_docs)]
#![warn(clippy::all)]

mod hash;
mod signature;
mod error;
pub mod keystore;

pub use hash::{keccak256, keccak256_concat};
pub use signature::{
    private_key_from_bytes, public_key_to_address, recover_address, recover_public_key, sign,
    PrivateKey, PublicKey, Signature,
};
pub use error::{CryptoError, KeystoreError};
