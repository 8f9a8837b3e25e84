//! Signing wallet

use ercbridge_crypto::{private_key_from_bytes, public_key_to_address, sign, PrivateKey, Signature};
use ercbridge_primitives::{Address, H256};
use rand::rngs::OsRng;

use crate::ChainError;

/// Holds one secp256k1 key and the address derived from it
///
/// Clone is intentionally not implemented to prevent accidental key duplication.
/// The underlying `SigningKey` zeroizes itself on drop.
pub struct Wallet {
    private_key: PrivateKey,
    address: Address,
}

impl Wallet {
    /// Create a new random wallet
    pub fn new_random() -> Self {
        let private_key = PrivateKey::random(&mut OsRng);
        let address = public_key_to_address(private_key.verifying_key());
        Self { private_key, address }
    }

    /// Create a wallet from a 32-byte private key
    ///
    /// Fails if the bytes are zero or not below the curve order.
    pub fn from_private_key(key: &[u8; 32]) -> Result<Self, ChainError> {
        let private_key = private_key_from_bytes(key)?;
        let address = public_key_to_address(private_key.verifying_key());
        Ok(Self { private_key, address })
    }

    /// Get the wallet's address
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Sign a 32-byte prehash
    pub fn sign_hash(&self, hash: &H256) -> Result<Signature, ChainError> {
        Ok(sign(hash, &self.private_key)?)
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ercbridge_crypto::recover_address;

    const TEST_KEY: [u8; 32] = [
        0xac, 0x09, 0x74, 0xbe, 0xc3, 0x9a, 0x17, 0xe3, 0x6b, 0xa4, 0xa6, 0xb4, 0xd2, 0x38, 0xff, 0x94,
        0x4b, 0xac, 0xb4, 0x78, 0xcb, 0xed, 0x5e, 0xfc, 0xae, 0x78, 0x4d, 0x7b, 0xf4, 0xf2, 0xff, 0x80,
    ];

    #[test]
    fn test_wallet_random() {
        let wallet = Wallet::new_random();
        assert!(!wallet.address().is_zero());
    }

    #[test]
    fn test_wallet_known_address() {
        let wallet = Wallet::from_private_key(&TEST_KEY).unwrap();
        assert_eq!(wallet.address().to_hex(), "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266");
    }

    #[test]
    fn test_wallet_rejects_zero_key() {
        assert!(matches!(Wallet::from_private_key(&[0u8; 32]), Err(ChainError::Signing(_))));
    }

    #[test]
    fn test_wallet_sign_hash_recovers() {
        let wallet = Wallet::new_random();
        let hash = H256::from_bytes([0x42; 32]);
        let signature = wallet.sign_hash(&hash).unwrap();

        assert_eq!(&recover_address(&hash, &signature).unwrap(), wallet.address());
    }

    #[test]
    fn test_wallet_debug_hides_key() {
        let wallet = Wallet::from_private_key(&TEST_KEY).unwrap();
        let debug = format!("{:?}", wallet);
        assert!(debug.contains("Wallet"));
        assert!(debug.contains("address"));
        assert!(!debug.contains("private_key"));
        assert!(!debug.contains("ac0974"));
    }
}
