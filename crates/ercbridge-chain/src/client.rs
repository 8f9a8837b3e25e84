//! ChainClient - JSON-RPC client for an Ethereum-compatible node

use ercbridge_primitives::{Address, H256, PrimitiveError, U256};
use bytes::Bytes;
use serde_json::Value;

use crate::transport::{deserialize_response, Transport};
use crate::tx_builder::SignedTransaction;
use crate::types::{BlockId, CallRequest, PendingTransaction, RawReceipt, TransactionReceipt};
use crate::ChainError;

#[cfg(feature = "http")]
use crate::transport::HttpTransport;

/// Client for the subset of `eth_*` methods the token services need
pub struct ChainClient {
    transport: Box<dyn Transport>,
}

impl ChainClient {
    /// Create a client with HTTP transport
    #[cfg(feature = "http")]
    pub fn connect(url: &str) -> Self {
        Self::with_transport(HttpTransport::new(url))
    }

    /// Create a client with a custom transport
    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Box::new(transport),
        }
    }

    async fn request<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<T, ChainError> {
        let value = self.transport.request_json(method, params).await?;
        deserialize_response(value)
    }

    // ==================== Chain Info ====================

    /// Chain ID reported by the node
    pub async fn chain_id(&self) -> Result<u64, ChainError> {
        let result: String = self.request("eth_chainId", vec![]).await?;
        parse_hex_u64(&result)
    }

    /// Current gas price in wei
    pub async fn gas_price(&self) -> Result<U256, ChainError> {
        let result: String = self.request("eth_gasPrice", vec![]).await?;
        parse_hex_u256(&result)
    }

    /// Current block number
    pub async fn block_number(&self) -> Result<u64, ChainError> {
        let result: String = self.request("eth_blockNumber", vec![]).await?;
        parse_hex_u64(&result)
    }

    // ==================== Account Queries ====================

    /// Transaction count of `address` at `block`
    pub async fn get_nonce(&self, address: &Address, block: BlockId) -> Result<u64, ChainError> {
        let result: String = self
            .request(
                "eth_getTransactionCount",
                vec![Value::String(address.to_hex()), serde_json::to_value(block)?],
            )
            .await?;
        parse_hex_u64(&result)
    }

    // ==================== Call & Estimation ====================

    /// Execute a read-only call
    pub async fn call(&self, request: &CallRequest, block: BlockId) -> Result<Bytes, ChainError> {
        let result: String = self
            .request(
                "eth_call",
                vec![serde_json::to_value(request)?, serde_json::to_value(block)?],
            )
            .await?;
        parse_hex_bytes(&result)
    }

    /// Estimate gas for a transaction
    pub async fn estimate_gas(&self, request: &CallRequest) -> Result<u64, ChainError> {
        let result: String = self
            .request("eth_estimateGas", vec![serde_json::to_value(request)?])
            .await?;
        parse_hex_u64(&result)
    }

    // ==================== Transactions ====================

    /// Send a raw RLP-encoded transaction
    pub async fn send_raw_transaction(&self, tx: &[u8]) -> Result<PendingTransaction, ChainError> {
        let encoded = format!("0x{}", hex::encode(tx));
        let result: String = self
            .request("eth_sendRawTransaction", vec![Value::String(encoded)])
            .await?;

        let hash = H256::from_hex(&result).map_err(PrimitiveError::from)?;
        Ok(PendingTransaction::new(hash))
    }

    /// Send a signed transaction
    pub async fn send_transaction(
        &self,
        tx: &SignedTransaction,
    ) -> Result<PendingTransaction, ChainError> {
        let pending = self.send_raw_transaction(&tx.raw).await?;
        if pending.hash != tx.hash {
            tracing::warn!(
                local = %tx.hash,
                node = %pending.hash,
                "node reported a different transaction hash"
            );
        }
        Ok(pending)
    }

    /// Receipt for `hash`, or `None` while the transaction is pending
    pub async fn get_receipt(&self, hash: &H256) -> Result<Option<TransactionReceipt>, ChainError> {
        let result: Option<RawReceipt> = self
            .request("eth_getTransactionReceipt", vec![Value::String(hash.to_hex())])
            .await?;
        result.map(parse_receipt).transpose()
    }
}

impl std::fmt::Debug for ChainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainClient").finish_non_exhaustive()
    }
}

// ==================== Helper Functions ====================

fn parse_receipt(raw: RawReceipt) -> Result<TransactionReceipt, ChainError> {
    let transaction_hash = H256::from_hex(&raw.transaction_hash).map_err(PrimitiveError::from)?;
    // Pre-Byzantium receipts carry a state root instead of status; treat as success.
    let success = match raw.status.as_deref() {
        Some(status) => parse_hex_u64(status)? == 1,
        None => true,
    };
    let block_number = raw.block_number.as_deref().map(parse_hex_u64).transpose()?.unwrap_or(0);
    let gas_used = raw.gas_used.as_deref().map(parse_hex_u64).transpose()?.unwrap_or(0);
    let contract_address = raw
        .contract_address
        .as_deref()
        .map(Address::from_hex)
        .transpose()
        .map_err(PrimitiveError::from)?;

    Ok(TransactionReceipt {
        transaction_hash,
        success,
        block_number,
        gas_used,
        contract_address,
    })
}

fn parse_hex_u64(s: &str) -> Result<u64, ChainError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    u64::from_str_radix(digits, 16)
        .map_err(|e| ChainError::UnexpectedResponse(format!("{}: {}", s, e)))
}

fn parse_hex_u256(s: &str) -> Result<U256, ChainError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    U256::from_str_radix(digits, 16)
        .map_err(|e| ChainError::UnexpectedResponse(format!("{}: {}", s, e)))
}

fn parse_hex_bytes(s: &str) -> Result<Bytes, ChainError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    if digits.is_empty() {
        return Ok(Bytes::new());
    }
    Ok(Bytes::from(hex::decode(digits)?))
}
