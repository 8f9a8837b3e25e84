//! Legacy transaction building and EIP-155 signing

use ercbridge_crypto::keccak256;
use ercbridge_primitives::{Address, H256, U256};
use bytes::Bytes;
use rlp::RlpStream;

use crate::{ChainError, Wallet};

/// Unsigned legacy (type 0) transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyTransaction {
    /// Sender nonce
    pub nonce: u64,
    /// Gas price in wei
    pub gas_price: U256,
    /// Gas limit
    pub gas_limit: u64,
    /// Recipient, `None` for contract creation
    pub to: Option<Address>,
    /// Value in wei
    pub value: U256,
    /// Calldata or creation code
    pub data: Bytes,
}

impl LegacyTransaction {
    fn append_body(&self, s: &mut RlpStream) {
        s.append(&self.nonce);
        s.append(&self.gas_price);
        s.append(&self.gas_limit);
        match &self.to {
            Some(to) => s.append(to),
            None => s.append_empty_data(),
        };
        s.append(&self.value);
        s.append(&self.data.to_vec());
    }

    /// EIP-155 signing hash: keccak256(rlp([nonce, gasPrice, gas, to, value, data, chainId, 0, 0]))
    pub fn signing_hash(&self, chain_id: u64) -> H256 {
        let mut s = RlpStream::new_list(9);
        self.append_body(&mut s);
        s.append(&chain_id);
        s.append_empty_data();
        s.append_empty_data();
        keccak256(&s.out())
    }

    /// Sign with EIP-155 replay protection and return the raw encoding
    pub fn sign(&self, chain_id: u64, wallet: &Wallet) -> Result<SignedTransaction, ChainError> {
        let signature = wallet.sign_hash(&self.signing_hash(chain_id))?;

        let mut s = RlpStream::new_list(9);
        self.append_body(&mut s);
        s.append(&signature.eip155_v(chain_id));
        // r and s are integers on the wire, so leading zeros are dropped
        s.append(&U256::from_big_endian(&signature.r));
        s.append(&U256::from_big_endian(&signature.s));

        let raw = Bytes::from(s.out().to_vec());
        Ok(SignedTransaction {
            hash: keccak256(&raw),
            from: *wallet.address(),
            raw,
        })
    }
}

/// Signed, RLP-encoded transaction ready for `eth_sendRawTransaction`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    /// Transaction hash, keccak256 of the raw encoding
    pub hash: H256,
    /// Sender address
    pub from: Address,
    /// Raw RLP encoding
    pub raw: Bytes,
}

/// Transaction builder with fluent API
#[derive(Debug, Clone, Default)]
pub struct TxBuilder {
    chain_id: u64,
    nonce: Option<u64>,
    gas_limit: Option<u64>,
    gas_price: Option<U256>,
    to: Option<Address>,
    value: U256,
    data: Bytes,
}

impl TxBuilder {
    /// Create a new transaction builder
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            ..Default::default()
        }
    }

    /// Set the nonce
    pub fn nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    /// Set the gas limit
    pub fn gas_limit(mut self, limit: u64) -> Self {
        self.gas_limit = Some(limit);
        self
    }

    /// Set the gas price
    pub fn gas_price(mut self, price: U256) -> Self {
        self.gas_price = Some(price);
        self
    }

    /// Set the recipient address; leave unset for contract creation
    pub fn to(mut self, address: Address) -> Self {
        self.to = Some(address);
        self
    }

    /// Set the value to transfer (in wei)
    pub fn value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    /// Set the input data
    pub fn data(mut self, data: impl Into<Bytes>) -> Self {
        self.data = data.into();
        self
    }

    /// Build the unsigned transaction
    pub fn build(&self) -> Result<LegacyTransaction, ChainError> {
        let nonce = self.nonce.ok_or_else(|| ChainError::TxBuild("nonce is required".to_string()))?;
        let gas_limit = self
            .gas_limit
            .ok_or_else(|| ChainError::TxBuild("gas_limit is required".to_string()))?;
        let gas_price = self
            .gas_price
            .ok_or_else(|| ChainError::TxBuild("gas_price is required".to_string()))?;

        Ok(LegacyTransaction {
            nonce,
            gas_price,
            gas_limit,
            to: self.to,
            value: self.value,
            data: self.data.clone(),
        })
    }

    /// Build and sign
    ///
    /// # Errors
    ///
    /// Returns an error if a required field is missing or the chain ID is 0
    /// (EIP-155 replay protection needs a real chain ID).
    pub fn sign(&self, wallet: &Wallet) -> Result<SignedTransaction, ChainError> {
        if self.chain_id == 0 {
            return Err(ChainError::TxBuild("chain ID cannot be 0".to_string()));
        }
        self.build()?.sign(self.chain_id, wallet)
    }
}

/// Address of a contract created by `sender` at `nonce`: keccak256(rlp([sender, nonce]))[12..]
pub fn contract_address(sender: &Address, nonce: u64) -> Address {
    let mut s = RlpStream::new_list(2);
    s.append(sender);
    s.append(&nonce);
    let hash = keccak256(&s.out());

    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&hash.as_bytes()[12..]);
    Address::from_bytes(bytes)
}
