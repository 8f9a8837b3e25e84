//! Shared harness for the service integration tests

#![allow(dead_code)]

use std::sync::Arc;

use ercbridge_chain::abi::{encode, Token};
use ercbridge_chain::{ChainClient, MockTransport};
use ercbridge_service::runtime::ServiceRuntimeBuilder;
use ercbridge_service::{ChainSettings, ServiceRuntime};

/// Well-known development key
pub const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
/// Address of [`DEV_KEY`]
pub const DEV_ADDRESS: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";
/// Unrelated account
pub const OTHER_ADDRESS: &str = "0x70997970c51812dc3a010c7d01b50e0d17dc79c8";
/// Token contract
pub const TOKEN: &str = "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48";

pub const BALANCE_OF: [u8; 4] = [0x70, 0xa0, 0x82, 0x31];
pub const DECIMALS: [u8; 4] = [0x31, 0x3c, 0xe5, 0x67];

/// Runtime on chain 1 over a fresh mock transport
pub fn harness() -> (Arc<ServiceRuntime>, MockTransport) {
    harness_with(|builder| builder)
}

/// Like [`harness`], with extra builder steps applied before the client is bound
pub fn harness_with(
    configure: impl FnOnce(ServiceRuntimeBuilder) -> ServiceRuntimeBuilder,
) -> (Arc<ServiceRuntime>, MockTransport) {
    let transport = MockTransport::new();
    let builder = configure(ServiceRuntime::builder().settings(ChainSettings::new(1)));
    let runtime = builder
        .chain_client(ChainClient::with_transport(transport.clone()))
        .build();
    (Arc::new(runtime), transport)
}

/// One ABI word holding `value`
pub fn word(value: u128) -> String {
    format!("0x{:064x}", value)
}

/// ABI return data for `tokens`
pub fn returns(tokens: &[Token]) -> String {
    format!("0x{}", hex::encode(encode(tokens)))
}

/// Raw transactions submitted so far, as hex without prefix
pub fn raw_transactions(transport: &MockTransport) -> Vec<String> {
    transport
        .requests_for("eth_sendRawTransaction")
        .into_iter()
        .filter_map(|r| r.params.first().and_then(|p| p.as_str()).map(|s| s.trim_start_matches("0x").to_string()))
        .collect()
}

