//! Contract backend
//!
//! The narrow seam between the operation pipeline and the chain. Everything
//! the services do reduces to a read-only call, a signed contract call, a
//! contract creation or a receipt lookup.

use async_trait::async_trait;
use bytes::Bytes;
use ercbridge_chain::types::{BlockId, CallRequest, TransactionReceipt};
use ercbridge_chain::{contract_address, ChainClient, ChainError, TxBuilder, Wallet};
use ercbridge_primitives::{Address, H256};

/// Chain operations used by the services
#[async_trait]
pub trait ContractBackend: Send + Sync {
    /// Read-only call against the latest block
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ChainError>;

    /// Sign and send a contract call, returning its hash
    async fn transact(
        &self,
        wallet: &Wallet,
        chain_id: u64,
        to: Address,
        data: Bytes,
    ) -> Result<H256, ChainError>;

    /// Sign and send a contract creation, returning the new address and the hash
    async fn deploy(
        &self,
        wallet: &Wallet,
        chain_id: u64,
        code: Bytes,
    ) -> Result<(Address, H256), ChainError>;

    /// Receipt for `hash`, or `None` while pending
    async fn receipt(&self, hash: H256) -> Result<Option<TransactionReceipt>, ChainError>;
}

/// Backend over a JSON-RPC [`ChainClient`]
#[derive(Debug)]
pub struct RpcBackend {
    client: ChainClient,
    gas_limit: u64,
}

impl RpcBackend {
    /// Wrap `client`; contract calls are sent with `gas_limit`
    pub fn new(client: ChainClient, gas_limit: u64) -> Self {
        Self { client, gas_limit }
    }

    /// Underlying client
    pub fn client(&self) -> &ChainClient {
        &self.client
    }
}

#[async_trait]
impl ContractBackend for RpcBackend {
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ChainError> {
        let request = CallRequest {
            to: Some(to),
            data: Some(data),
            ..Default::default()
        };
        self.client.call(&request, BlockId::Latest).await
    }

    async fn transact(
        &self,
        wallet: &Wallet,
        chain_id: u64,
        to: Address,
        data: Bytes,
    ) -> Result<H256, ChainError> {
        let from = *wallet.address();
        let nonce = self.client.get_nonce(&from, BlockId::Pending).await?;
        let gas_price = self.client.gas_price().await?;

        let signed = TxBuilder::new(chain_id)
            .nonce(nonce)
            .gas_price(gas_price)
            .gas_limit(self.gas_limit)
            .to(to)
            .data(data)
            .sign(wallet)?;

        tracing::debug!(from = %from, to = %to, nonce, tx = %signed.hash, "sending transaction");
        let pending = self.client.send_transaction(&signed).await?;
        Ok(*pending.hash())
    }

    async fn deploy(
        &self,
        wallet: &Wallet,
        chain_id: u64,
        code: Bytes,
    ) -> Result<(Address, H256), ChainError> {
        let from = *wallet.address();
        let nonce = self.client.get_nonce(&from, BlockId::Pending).await?;
        let gas_price = self.client.gas_price().await?;
        let gas_limit = self
            .client
            .estimate_gas(&CallRequest {
                from: Some(from),
                data: Some(code.clone()),
                ..Default::default()
            })
            .await?;

        let signed = TxBuilder::new(chain_id)
            .nonce(nonce)
            .gas_price(gas_price)
            .gas_limit(gas_limit)
            .data(code)
            .sign(wallet)?;

        let address = contract_address(&from, nonce);
        tracing::debug!(from = %from, nonce, contract = %address, tx = %signed.hash, "sending contract creation");
        let pending = self.client.send_transaction(&signed).await?;
        Ok((address, *pending.hash()))
    }

    async fn receipt(&self, hash: H256) -> Result<Option<TransactionReceipt>, ChainError> {
        self.client.get_receipt(&hash).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ercbridge_chain::MockTransport;
    use serde_json::json;

    fn backend() -> (RpcBackend, MockTransport) {
        let transport = MockTransport::new();
        let client = ChainClient::with_transport(transport.clone());
        (RpcBackend::new(client, 300_000), transport)
    }

    #[tokio::test]
    async fn test_transact_uses_pending_nonce_and_gas_limit() {
        let (backend, transport) = backend();
        let wallet = Wallet::new_random();

        backend
            .transact(&wallet, 1337, Address::ZERO, Bytes::from_static(&[0xa9, 0x05, 0x9c, 0xbb]))
            .await
            .unwrap();

        let nonce_requests = transport.requests_for("eth_getTransactionCount");
        assert_eq!(nonce_requests[0].params[1], json!("pending"));
        assert_eq!(transport.requests_for("eth_sendRawTransaction").len(), 1);
        assert!(transport.requests_for("eth_estimateGas").is_empty());
    }

    #[tokio::test]
    async fn test_deploy_derives_address_from_nonce() {
        let (backend, transport) = backend();
        transport.set_response("eth_getTransactionCount", json!("0x2"));
        let wallet = Wallet::new_random();

        let (address, _) = backend
            .deploy(&wallet, 1337, Bytes::from_static(&[0x60, 0x80]))
            .await
            .unwrap();

        assert_eq!(address, contract_address(wallet.address(), 2));
        assert_eq!(transport.requests_for("eth_estimateGas").len(), 1);
    }

    #[tokio::test]
    async fn test_send_failure_propagates() {
        let (backend, transport) = backend();
        transport.fail_method("eth_sendRawTransaction");

        let result = backend
            .transact(&Wallet::new_random(), 1, Address::ZERO, Bytes::new())
            .await;
        assert!(matches!(result, Err(ChainError::Rpc { .. })));
    }
}
