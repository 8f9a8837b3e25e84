//! secp256k1 signing, recovery and address derivation

use ercbridge_primitives::{Address, H256};
use k256::ecdsa::{RecoveryId, Signature as K256Signature, SigningKey, VerifyingKey};
use crate::{keccak256, CryptoError};

/// Public key (65 bytes uncompressed, or 33 bytes compressed)
pub type PublicKey = VerifyingKey;

/// Private key (32 bytes)
pub type PrivateKey = SigningKey;

/// Recoverable ECDSA signature
///
/// `s` is always in the lower half of the curve order (EIP-2), and
/// `recovery_id` is the raw 0/1 parity bit. Transaction encodings derive
/// their own `v` from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    /// r component (32 bytes)
    pub r: [u8; 32],
    /// s component (32 bytes)
    pub s: [u8; 32],
    /// recovery id (0 or 1)
    pub recovery_id: u8,
}

impl Signature {
    /// Ethereum `v` for personal/legacy pre-EIP-155 use (27 or 28)
    pub fn v(&self) -> u8 {
        self.recovery_id + 27
    }

    /// `v` for an EIP-155 replay-protected legacy transaction
    pub fn eip155_v(&self, chain_id: u64) -> u64 {
        u64::from(self.recovery_id) + chain_id * 2 + 35
    }

    fn to_k256(&self) -> Result<K256Signature, CryptoError> {
        K256Signature::from_scalars(self.r, self.s)
            .map_err(|e| CryptoError::InvalidSignature(e.to_string()))
    }
}

/// Parse a 32-byte secret into a signing key
pub fn private_key_from_bytes(bytes: &[u8; 32]) -> Result<PrivateKey, CryptoError> {
    SigningKey::from_slice(bytes).map_err(|_| CryptoError::InvalidPrivateKey)
}

/// Sign a 32-byte prehash, normalizing to low-s
pub fn sign(message_hash: &H256, private_key: &PrivateKey) -> Result<Signature, CryptoError> {
    let (mut signature, mut recovery_id) = private_key
        .sign_prehash_recoverable(message_hash.as_bytes())
        .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;

    if let Some(normalized) = signature.normalize_s() {
        signature = normalized;
        recovery_id = RecoveryId::new(!recovery_id.is_y_odd(), recovery_id.is_x_reduced());
    }

    Ok(Signature {
        r: signature.r().to_bytes().into(),
        s: signature.s().to_bytes().into(),
        recovery_id: recovery_id.to_byte(),
    })
}

/// Recover the signer's public key from a signature over `message_hash`
pub fn recover_public_key(
    message_hash: &H256,
    signature: &Signature,
) -> Result<PublicKey, CryptoError> {
    let recovery_id = RecoveryId::from_byte(signature.recovery_id)
        .ok_or(CryptoError::InvalidRecoveryId(signature.recovery_id))?;

    VerifyingKey::recover_from_prehash(message_hash.as_bytes(), &signature.to_k256()?, recovery_id)
        .map_err(|e| CryptoError::RecoveryFailed(e.to_string()))
}

/// Recover the signer's address from a signature over `message_hash`
pub fn recover_address(message_hash: &H256, signature: &Signature) -> Result<Address, CryptoError> {
    recover_public_key(message_hash, signature).map(|key| public_key_to_address(&key))
}

/// Derive Ethereum address from public key
pub fn public_key_to_address(public_key: &PublicKey) -> Address {
    // Uncompressed point is 0x04 || x || y; the address hashes x || y.
    let encoded = public_key.to_encoded_point(false);
    let hash = keccak256(&encoded.as_bytes()[1..]);

    let mut addr_bytes = [0u8; 20];
    addr_bytes.copy_from_slice(&hash.as_bytes()[12..]);
    Address::from_bytes(addr_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    /// Half of the secp256k1 order
    const N_DIV_2: [u8; 32] = [
        0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
        0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
        0x5D, 0x57, 0x6E, 0x73, 0x57, 0xA4, 0x50, 0x1D,
        0xDF, 0xE9, 0x2F, 0x46, 0x68, 0x1B, 0x20, 0xA0,
    ];

    #[test]
    fn test_known_key_address() {
        let key = hex::decode("ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80")
            .unwrap();
        let key: [u8; 32] = key.try_into().unwrap();
        let signing_key = private_key_from_bytes(&key).unwrap();
        assert_eq!(
            public_key_to_address(signing_key.verifying_key()).to_hex(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn test_zero_key_rejected() {
        assert!(matches!(
            private_key_from_bytes(&[0u8; 32]),
            Err(CryptoError::InvalidPrivateKey)
        ));
    }

    #[test]
    fn test_key_above_order_rejected() {
        assert!(private_key_from_bytes(&[0xff; 32]).is_err());
    }

    #[test]
    fn test_sign_and_recover() {
        let private_key = SigningKey::random(&mut OsRng);
        let expected = public_key_to_address(private_key.verifying_key());
        let hash = keccak256(b"ercbridge");

        let signature = sign(&hash, &private_key).unwrap();
        assert!(signature.recovery_id <= 1);
        assert_eq!(recover_address(&hash, &signature).unwrap(), expected);
    }

    #[test]
    fn test_signatures_are_low_s() {
        for _ in 0..10 {
            let private_key = SigningKey::random(&mut OsRng);
            let signature = sign(&keccak256(b"test"), &private_key).unwrap();
            assert!(signature.s <= N_DIV_2, "s must be in the lower half order");
        }
    }

    #[test]
    fn test_eip155_v() {
        let sig = Signature { r: [1; 32], s: [1; 32], recovery_id: 1 };
        assert_eq!(sig.eip155_v(1), 38);
        assert_eq!(sig.eip155_v(1337), 2710);
        assert_eq!(sig.v(), 28);
    }

    #[test]
    fn test_invalid_recovery_id() {
        let sig = Signature { r: [1; 32], s: [1; 32], recovery_id: 7 };
        assert!(matches!(
            recover_public_key(&H256::ZERO, &sig),
            Err(CryptoError::InvalidRecoveryId(7))
        ));
    }
}
