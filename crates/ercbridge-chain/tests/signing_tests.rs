//! Transaction signing tests for ercbridge-chain

use ercbridge_chain::{contract_address, TxBuilder, Wallet, Address, U256};
use ercbridge_crypto::{recover_address, Signature};

fn test_wallet() -> Wallet {
    let key: [u8; 32] =
        hex::decode("ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80")
            .unwrap()
            .try_into()
            .unwrap();
    Wallet::from_private_key(&key).unwrap()
}

fn builder(chain_id: u64) -> TxBuilder {
    TxBuilder::new(chain_id)
        .nonce(3)
        .gas_price(U256::from(1_000_000_000u64))
        .gas_limit(300_000)
        .to(Address::from_bytes([0x11; 20]))
        .data(vec![0xa9, 0x05, 0x9c, 0xbb])
}

/// Pull (v, r, s) out of a raw legacy transaction
fn vrs(raw: &[u8]) -> (u64, [u8; 32], [u8; 32]) {
    let rlp = rlp::Rlp::new(raw);
    let v: u64 = rlp.val_at(6).unwrap();
    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    let r_data = rlp.at(7).unwrap().data().unwrap().to_vec();
    let s_data = rlp.at(8).unwrap().data().unwrap().to_vec();
    r[32 - r_data.len()..].copy_from_slice(&r_data);
    s[32 - s_data.len()..].copy_from_slice(&s_data);
    (v, r, s)
}

// ==================== EIP-155 ====================

#[test]
fn test_signed_tx_recovers_sender() {
    let wallet = test_wallet();
    let chain_id = 1337;
    let tx = builder(chain_id).build().unwrap();
    let signed = tx.sign(chain_id, &wallet).unwrap();

    let (v, r, s) = vrs(&signed.raw);
    let recovery_id = (v - 35 - 2 * chain_id) as u8;
    assert!(recovery_id <= 1);

    let signature = Signature { r, s, recovery_id };
    let sender = recover_address(&tx.signing_hash(chain_id), &signature).unwrap();
    assert_eq!(&sender, wallet.address());
}

#[test]
fn test_cross_chain_replay_protection() {
    let wallet = test_wallet();
    let mainnet = builder(1).sign(&wallet).unwrap();
    let other = builder(5).sign(&wallet).unwrap();

    assert_ne!(mainnet.hash, other.hash);
    let (v1, _, _) = vrs(&mainnet.raw);
    let (v5, _, _) = vrs(&other.raw);
    assert!(v1 == 37 || v1 == 38);
    assert!(v5 == 45 || v5 == 46);
}

#[test]
fn test_signing_is_deterministic() {
    let wallet = test_wallet();
    let a = builder(1).sign(&wallet).unwrap();
    let b = builder(1).sign(&wallet).unwrap();
    assert_eq!(a.raw, b.raw);
    assert_eq!(a.hash, b.hash);
}

// ==================== Contract Creation ====================

#[test]
fn test_deployment_address_follows_nonce() {
    let wallet = test_wallet();
    let first = contract_address(wallet.address(), 0);
    let second = contract_address(wallet.address(), 1);

    assert_ne!(first, second);
    // First contract deployed by the well-known dev account
    assert_eq!(first.to_hex(), "0x5fbdb2315678afecb367f032d93f642f64180aa3");
}
