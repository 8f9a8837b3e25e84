//! Web3 Secret Storage (V3) keystore files
//!
//! Only the `scrypt` KDF with the `aes-128-ctr` cipher is supported, which is
//! what geth, ethers and most wallets emit by default.

use std::path::Path;

use aes::cipher::{KeyIvInit, StreamCipher};
use ercbridge_primitives::Address;
use rand::{rngs::OsRng, RngCore};
use scrypt::{scrypt, Params as ScryptParams};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::{Zeroize, Zeroizing};

use crate::{keccak256_concat, public_key_to_address, private_key_from_bytes, KeystoreError};

type Aes128Ctr = ctr::Ctr128BE<aes::Aes128>;

/// Web3 Keystore format (V3)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeystoreV3 {
    /// Keystore version
    pub version: u32,

    /// Unique identifier
    pub id: String,

    /// Ethereum address (without 0x prefix); some writers omit it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Crypto parameters
    #[serde(alias = "Crypto")]
    pub crypto: KeystoreCrypto,
}

/// Encrypted payload and its parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeystoreCrypto {
    /// Cipher algorithm (aes-128-ctr)
    pub cipher: String,

    /// Ciphertext (hex)
    pub ciphertext: String,

    /// Cipher parameters
    pub cipherparams: CipherParams,

    /// Key derivation function
    pub kdf: String,

    /// KDF parameters
    pub kdfparams: KdfParams,

    /// keccak256(derived_key[16..32] || ciphertext), hex
    pub mac: String,
}

/// AES-CTR parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CipherParams {
    /// Initialization vector (hex)
    pub iv: String,
}

/// scrypt parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KdfParams {
    /// Derived key length
    pub dklen: u32,
    /// CPU/memory cost, a power of two
    pub n: u32,
    /// Block size
    pub r: u32,
    /// Parallelization
    pub p: u32,
    /// Salt (hex)
    pub salt: String,
}

/// scrypt cost used when writing a new keystore
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KdfCost {
    /// N = 2^18, the geth default
    Standard,
    /// N = 2^13, for tests and throwaway keys
    Light,
}

impl KdfCost {
    fn log_n(self) -> u8 {
        match self {
            KdfCost::Standard => 18,
            KdfCost::Light => 13,
        }
    }
}

impl KeystoreV3 {
    /// Parse the declared address, if the file carries one
    pub fn declared_address(&self) -> Option<Address> {
        self.address.as_deref().and_then(|a| Address::from_hex(a).ok())
    }
}

/// Read and parse a keystore file
pub fn read_keystore(path: impl AsRef<Path>) -> Result<KeystoreV3, KeystoreError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Encrypt a private key into a new keystore
pub fn encrypt_key(
    private_key: &[u8; 32],
    password: &str,
    cost: KdfCost,
) -> Result<KeystoreV3, KeystoreError> {
    let signing_key = private_key_from_bytes(private_key).map_err(|_| KeystoreError::InvalidKey)?;
    let address = public_key_to_address(signing_key.verifying_key());

    let mut salt = [0u8; 32];
    let mut iv = [0u8; 16];
    OsRng.fill_bytes(&mut salt);
    OsRng.fill_bytes(&mut iv);

    let (r, p, dklen) = (8u32, 1u32, 32u32);
    let derived_key = derive_key(password, &salt, cost.log_n(), r, p)?;

    let aes_key: &[u8] = &derived_key[..16];
    let mut ciphertext = private_key.to_vec();
    let mut cipher = Aes128Ctr::new(aes_key.into(), iv.as_slice().into());
    cipher.apply_keystream(&mut ciphertext);

    let mac = keccak256_concat(&[&derived_key[16..32], ciphertext.as_slice()]);

    Ok(KeystoreV3 {
        version: 3,
        id: Uuid::new_v4().to_string(),
        address: Some(hex::encode(address.as_bytes())),
        crypto: KeystoreCrypto {
            cipher: "aes-128-ctr".to_string(),
            ciphertext: hex::encode(&ciphertext),
            cipherparams: CipherParams { iv: hex::encode(iv) },
            kdf: "scrypt".to_string(),
            kdfparams: KdfParams {
                dklen,
                n: 1u32 << cost.log_n(),
                r,
                p,
                salt: hex::encode(salt),
            },
            mac: hex::encode(mac.as_bytes()),
        },
    })
}

/// Decrypt a keystore with its passphrase
pub fn decrypt_key(
    keystore: &KeystoreV3,
    password: &str,
) -> Result<Zeroizing<[u8; 32]>, KeystoreError> {
    let crypto = &keystore.crypto;
    if crypto.cipher != "aes-128-ctr" {
        return Err(KeystoreError::Unsupported { kind: "cipher", name: crypto.cipher.clone() });
    }
    if crypto.kdf != "scrypt" {
        return Err(KeystoreError::Unsupported { kind: "kdf", name: crypto.kdf.clone() });
    }

    let params = &crypto.kdfparams;
    if params.dklen != 32 {
        return Err(KeystoreError::InvalidKdfParams(format!("dklen {}", params.dklen)));
    }
    if !params.n.is_power_of_two() || params.n < 2 {
        return Err(KeystoreError::InvalidKdfParams(format!("n {}", params.n)));
    }

    let salt = hex::decode(&params.salt).map_err(|_| KeystoreError::InvalidField("salt"))?;
    let iv = hex::decode(&crypto.cipherparams.iv).map_err(|_| KeystoreError::InvalidField("iv"))?;
    if iv.len() != 16 {
        return Err(KeystoreError::InvalidField("iv"));
    }
    let ciphertext =
        hex::decode(&crypto.ciphertext).map_err(|_| KeystoreError::InvalidField("ciphertext"))?;
    let expected_mac = hex::decode(&crypto.mac).map_err(|_| KeystoreError::InvalidField("mac"))?;

    let log_n = params.n.trailing_zeros() as u8;
    let derived_key = derive_key(password, &salt, log_n, params.r, params.p)?;

    let computed_mac = keccak256_concat(&[&derived_key[16..32], ciphertext.as_slice()]);
    if computed_mac.as_bytes().as_slice() != expected_mac.as_slice() {
        return Err(KeystoreError::MacMismatch);
    }

    let aes_key: &[u8] = &derived_key[..16];
    let mut plaintext = ciphertext;
    let mut cipher = Aes128Ctr::new(aes_key.into(), iv.as_slice().into());
    cipher.apply_keystream(&mut plaintext);

    if plaintext.len() != 32 {
        plaintext.zeroize();
        return Err(KeystoreError::InvalidKey);
    }
    let mut key = Zeroizing::new([0u8; 32]);
    key.copy_from_slice(&plaintext);
    plaintext.zeroize();

    private_key_from_bytes(&key).map_err(|_| KeystoreError::InvalidKey)?;
    Ok(key)
}

fn derive_key(
    password: &str,
    salt: &[u8],
    log_n: u8,
    r: u32,
    p: u32,
) -> Result<Zeroizing<[u8; 32]>, KeystoreError> {
    let params = ScryptParams::new(log_n, r, p, 32)
        .map_err(|e| KeystoreError::InvalidKdfParams(e.to_string()))?;
    let mut derived = Zeroizing::new([0u8; 32]);
    scrypt(password.as_bytes(), salt, &params, derived.as_mut_slice())
        .map_err(|e| KeystoreError::InvalidKdfParams(e.to_string()))?;
    Ok(derived)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const TEST_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn test_key() -> [u8; 32] {
        hex::decode(TEST_KEY).unwrap().try_into().unwrap()
    }

    #[test]
    fn test_ctr_counter_carries_into_high_half() {
        let aes_key = [7u8; 16];
        let mut iv = [0u8; 16];
        iv[8..].fill(0xff);

        let mut keystream = [0u8; 32];
        let mut cipher = Aes128Ctr::new(aes_key.as_slice().into(), iv.as_slice().into());
        cipher.apply_keystream(&mut keystream);

        let mut next = [0u8; 16];
        next[7] = 1;
        let mut block = aes::Block::from(next);
        let aes = <aes::Aes128 as aes::cipher::KeyInit>::new(&aes_key.into());
        aes::cipher::BlockEncrypt::encrypt_block(&aes, &mut block);
        assert_eq!(&keystream[16..], block.as_slice());
    }

    #[test]
    fn test_keystore_roundtrip() {
        let keystore = encrypt_key(&test_key(), "correct horse", KdfCost::Light).unwrap();
        assert_eq!(keystore.version, 3);
        assert_eq!(
            keystore.declared_address().unwrap().to_hex(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );

        let decrypted = decrypt_key(&keystore, "correct horse").unwrap();
        assert_eq!(*decrypted, test_key());
    }

    #[test]
    fn test_keystore_wrong_password() {
        let keystore = encrypt_key(&test_key(), "correct horse", KdfCost::Light).unwrap();
        assert!(matches!(
            decrypt_key(&keystore, "battery staple"),
            Err(KeystoreError::MacMismatch)
        ));
    }

    #[test]
    fn test_keystore_unsupported_kdf() {
        let mut keystore = encrypt_key(&test_key(), "pw", KdfCost::Light).unwrap();
        keystore.crypto.kdf = "pbkdf2".to_string();
        assert!(matches!(
            decrypt_key(&keystore, "pw"),
            Err(KeystoreError::Unsupported { kind: "kdf", .. })
        ));
    }

    #[test]
    fn test_keystore_file_roundtrip() {
        let keystore = encrypt_key(&test_key(), "pw", KdfCost::Light).unwrap();
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(&keystore).unwrap().as_bytes()).unwrap();

        let loaded = read_keystore(file.path()).unwrap();
        assert_eq!(*decrypt_key(&loaded, "pw").unwrap(), test_key());
    }

    #[test]
    fn test_keystore_accepts_capitalized_crypto() {
        let keystore = encrypt_key(&test_key(), "pw", KdfCost::Light).unwrap();
        let json = serde_json::to_string(&keystore).unwrap().replace("\"crypto\"", "\"Crypto\"");
        let parsed: KeystoreV3 = serde_json::from_str(&json).unwrap();
        assert_eq!(*decrypt_key(&parsed, "pw").unwrap(), test_key());
    }

    #[test]
    fn test_error_does_not_leak_password() {
        let keystore = encrypt_key(&test_key(), "hunter2", KdfCost::Light).unwrap();
        let err = decrypt_key(&keystore, "hunter3").unwrap_err();
        assert!(!err.to_string().contains("hunter"));
    }
}
