//! Cryptographic errors

use thiserror::Error;

/// Cryptographic operation error
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Signing failed
    #[error("signing failed: {0}")]
    SigningFailed(String),

    /// Invalid signature
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// Invalid recovery ID
    #[error("invalid recovery id: {0}")]
    InvalidRecoveryId(u8),

    /// Recovery failed
    #[error("public key recovery failed: {0}")]
    RecoveryFailed(String),

    /// Invalid private key
    #[error("invalid private key")]
    InvalidPrivateKey,
}

/// Keystore file error
///
/// None of the variants carry key material or the passphrase.
#[derive(Debug, Error)]
pub enum KeystoreError {
    /// Reading the keystore file failed
    #[error("failed to read keystore: {0}")]
    Io(#[from] std::io::Error),

    /// Keystore JSON is malformed
    #[error("malformed keystore: {0}")]
    Format(#[from] serde_json::Error),

    /// A hex field in the keystore is malformed
    #[error("malformed keystore field: {0}")]
    InvalidField(&'static str),

    /// Cipher or KDF not supported
    #[error("unsupported keystore {kind}: {name}")]
    Unsupported {
        /// "cipher" or "kdf"
        kind: &'static str,
        /// Name found in the file
        name: String,
    },

    /// KDF parameters rejected
    #[error("invalid kdf parameters: {0}")]
    InvalidKdfParams(String),

    /// MAC check failed, usually a wrong passphrase
    #[error("keystore MAC mismatch (wrong password?)")]
    MacMismatch,

    /// Decrypted secret is not a valid key
    #[error("decrypted key is invalid")]
    InvalidKey,
}
