//! Transaction confirmation
//!
//! Mutations return as soon as the transaction is accepted by the node.
//! Callers that need the outcome poll for the receipt here.

use std::sync::Arc;

use ercbridge_chain::types::TransactionReceipt;
use ercbridge_chain::ChainError;
use serde::{Deserialize, Serialize};

use crate::context::RequestContext;
use crate::error::{ErrorKind, ServiceError, ServiceResult};
use crate::runtime::ServiceRuntime;
use crate::validator::parse_tx_hash;

/// Wait for `tx_hash` to be mined
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitForTransactionRequest {
    /// Transaction hash, `0x`-prefixed or bare hex
    pub tx_hash: String,
}

/// Outcome of a mined transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitForTransactionResponse {
    /// Transaction hash
    pub tx_hash: String,
    /// Always `true`; reverted transactions are reported as errors
    pub status: bool,
    /// Including block
    pub block_number: u64,
    /// Gas consumed
    pub gas_used: u64,
    /// Created contract, for deployments
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<String>,
}

/// Receipt polling
#[derive(Debug, Clone)]
pub struct ConfirmationService {
    runtime: Arc<ServiceRuntime>,
}

impl ConfirmationService {
    /// Service over `runtime`
    pub fn new(runtime: Arc<ServiceRuntime>) -> Self {
        Self { runtime }
    }

    /// Poll until the receipt for `tx_hash` appears
    ///
    /// Bounded by the request deadline, or by the per-call timeout when the
    /// request has none. A reverted transaction fails with `Internal`.
    pub async fn wait_for_transaction(
        &self,
        ctx: &RequestContext,
        req: WaitForTransactionRequest,
    ) -> ServiceResult<WaitForTransactionResponse> {
        let hash = parse_tx_hash(&req.tx_hash)?;
        let backend = self.runtime.backend()?;
        let settings = self.runtime.settings();

        let poll = async {
            loop {
                if let Some(receipt) = backend.receipt(hash).await? {
                    return Ok::<TransactionReceipt, ChainError>(receipt);
                }
                tokio::time::sleep(settings.poll_interval).await;
            }
        };

        let receipt = ctx
            .run(settings.timeout, poll)
            .await
            .inspect_err(|_| tracing::warn!(tx = %hash, "gave up waiting for receipt"))?
            .map_err(|e| {
                tracing::error!(tx = %hash, error = %e, "failed to get receipt");
                ServiceError::internal("failed to get transaction receipt", e)
            })?;

        if !receipt.success {
            tracing::error!(tx = %hash, block = receipt.block_number, gas_used = receipt.gas_used, "transaction reverted");
            return Err(ServiceError::new(ErrorKind::Internal, "transaction reverted"));
        }

        tracing::info!(tx = %hash, block = receipt.block_number, gas_used = receipt.gas_used, "transaction confirmed");

        Ok(WaitForTransactionResponse {
            tx_hash: hash.to_hex(),
            status: receipt.success,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
            contract_address: receipt.contract_address.map(|a| a.to_hex()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::ChainSettings;
    use ercbridge_chain::{ChainClient, MockTransport};
    use serde_json::json;
    use std::time::Duration;

    const HASH: &str = "0x5c504ed432cb51138bcf09aa5e8a410dd4a1e204ef84bfed1be16dfba1b22060";

    fn service() -> (ConfirmationService, MockTransport) {
        let transport = MockTransport::new();
        let mut settings = ChainSettings::new(1);
        settings.poll_interval = Duration::from_millis(10);
        let runtime = ServiceRuntime::builder()
            .settings(settings)
            .chain_client(ChainClient::with_transport(transport.clone()))
            .build();
        (ConfirmationService::new(Arc::new(runtime)), transport)
    }

    fn receipt(status: &str) -> serde_json::Value {
        json!({
            "transactionHash": HASH,
            "status": status,
            "blockNumber": "0x10",
            "gasUsed": "0x5208",
            "contractAddress": null
        })
    }

    fn request() -> WaitForTransactionRequest {
        WaitForTransactionRequest {
            tx_hash: HASH.to_string(),
        }
    }

    #[tokio::test]
    async fn test_wait_polls_until_mined() {
        let (service, transport) = service();
        transport.push_response("eth_getTransactionReceipt", json!(null));
        transport.push_response("eth_getTransactionReceipt", receipt("0x1"));

        let response = service
            .wait_for_transaction(&RequestContext::new(), request())
            .await
            .unwrap();

        assert!(response.status);
        assert_eq!(response.block_number, 16);
        assert_eq!(response.gas_used, 21_000);
        assert_eq!(response.contract_address, None);
        assert_eq!(transport.requests_for("eth_getTransactionReceipt").len(), 2);
    }

    #[tokio::test]
    async fn test_wait_reverted() {
        let (service, transport) = service();
        transport.set_response("eth_getTransactionReceipt", receipt("0x0"));

        let err = service
            .wait_for_transaction(&RequestContext::new(), request())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.message(), "transaction reverted");
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_deadline_exceeded() {
        let (service, _transport) = service();

        let err = service
            .wait_for_transaction(&RequestContext::with_timeout(Duration::from_millis(50)), request())
            .await
            .unwrap_err();
        assert_eq!(err.message(), "deadline exceeded");
    }

    #[tokio::test]
    async fn test_wait_rejects_bad_hash() {
        let (service, transport) = service();

        let err = service
            .wait_for_transaction(
                &RequestContext::new(),
                WaitForTransactionRequest {
                    tx_hash: "0x1234".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(transport.request_count(), 0);
    }
}
