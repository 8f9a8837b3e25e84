//! Transport layer for JSON-RPC communication

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use crate::ChainError;

/// Transport trait for RPC communication (object-safe)
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send an RPC request and get the JSON `result`
    async fn request_json(&self, method: &str, params: Vec<Value>) -> Result<Value, ChainError>;
}

/// Helper to deserialize response
pub fn deserialize_response<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, ChainError> {
    serde_json::from_value(value).map_err(|e| ChainError::Serialization(e.to_string()))
}

/// A request seen by [`MockTransport`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    /// JSON-RPC method
    pub method: String,
    /// Positional params
    pub params: Vec<Value>,
}

#[derive(Default)]
struct MockState {
    responses: HashMap<String, Value>,
    queued: HashMap<String, VecDeque<Value>>,
    call_responses: HashMap<[u8; 4], Value>,
    failing_calls: HashSet<[u8; 4]>,
    failing_methods: HashSet<String>,
    log: Vec<RecordedRequest>,
}

/// Mock transport for testing
///
/// Clones share state, so a test can keep one handle while the client owns
/// another and inspect the request log afterwards.
#[derive(Clone)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
    default_responses: Arc<HashMap<String, Value>>,
}

impl MockTransport {
    /// Create a new mock transport
    pub fn new() -> Self {
        let mut defaults = HashMap::new();

        defaults.insert("eth_chainId".to_string(), Value::String("0x1".to_string()));
        defaults.insert("eth_gasPrice".to_string(), Value::String("0x3b9aca00".to_string())); // 1 gwei
        defaults.insert("eth_blockNumber".to_string(), Value::String("0x100".to_string()));
        defaults.insert("eth_getTransactionCount".to_string(), Value::String("0x0".to_string()));
        defaults.insert("eth_estimateGas".to_string(), Value::String("0x5208".to_string())); // 21000
        defaults.insert(
            "eth_sendRawTransaction".to_string(),
            Value::String(
                "0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b".to_string(),
            ),
        );
        defaults.insert("eth_call".to_string(), Value::String("0x".to_string()));
        defaults.insert("eth_getTransactionReceipt".to_string(), Value::Null);

        Self {
            state: Arc::new(Mutex::new(MockState::default())),
            default_responses: Arc::new(defaults),
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, MockState> {
        // Poisoning only follows a panic in another test thread.
        self.state.lock().expect("MockTransport mutex poisoned")
    }

    /// Set a mock response for a specific method
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn set_response(&self, method: &str, response: Value) {
        self.state().responses.insert(method.to_string(), response);
    }

    /// Queue a one-shot response, consumed before the fixed one
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn push_response(&self, method: &str, response: Value) {
        self.state()
            .queued
            .entry(method.to_string())
            .or_default()
            .push_back(response);
    }

    /// Answer `eth_call` with `hex_result` when calldata starts with `selector`
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn set_call_response(&self, selector: [u8; 4], hex_result: &str) {
        self.state()
            .call_responses
            .insert(selector, Value::String(hex_result.to_string()));
    }

    /// Make `eth_call` revert for `selector`
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn fail_call(&self, selector: [u8; 4]) {
        self.state().failing_calls.insert(selector);
    }

    /// Make every request to `method` fail with an RPC error
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn fail_method(&self, method: &str) {
        self.state().failing_methods.insert(method.to_string());
    }

    /// All requests seen so far, oldest first
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state().log.clone()
    }

    /// Number of requests seen so far
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn request_count(&self) -> usize {
        self.state().log.len()
    }

    /// Requests made with `method`
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn requests_for(&self, method: &str) -> Vec<RecordedRequest> {
        self.state()
            .log
            .iter()
            .filter(|r| r.method == method)
            .cloned()
            .collect()
    }

    /// Clear custom responses, failures and the request log
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn reset(&self) {
        *self.state() = MockState::default();
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract the 4-byte selector from `eth_call` params
fn call_selector(params: &[Value]) -> Option<[u8; 4]> {
    let data = params.first()?.get("data")?.as_str()?;
    let data = data.strip_prefix("0x").unwrap_or(data);
    let bytes = hex::decode(data.get(..8)?).ok()?;
    bytes.try_into().ok()
}

#[async_trait]
impl Transport for MockTransport {
    async fn request_json(&self, method: &str, params: Vec<Value>) -> Result<Value, ChainError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| ChainError::Transport("MockTransport mutex poisoned".to_string()))?;

        state.log.push(RecordedRequest {
            method: method.to_string(),
            params: params.clone(),
        });

        if state.failing_methods.contains(method) {
            return Err(ChainError::Rpc {
                code: -32000,
                message: format!("{} failed", method),
            });
        }

        if method == "eth_call" {
            if let Some(selector) = call_selector(&params) {
                if state.failing_calls.contains(&selector) {
                    return Err(ChainError::Rpc {
                        code: 3,
                        message: "execution reverted".to_string(),
                    });
                }
                if let Some(response) = state.call_responses.get(&selector) {
                    return Ok(response.clone());
                }
            }
        }

        if let Some(response) = state.queued.get_mut(method).and_then(VecDeque::pop_front) {
            return Ok(response);
        }

        if let Some(response) = state.responses.get(method) {
            return Ok(response.clone());
        }

        if let Some(response) = self.default_responses.get(method) {
            return Ok(response.clone());
        }

        Err(ChainError::Rpc {
            code: -32601,
            message: format!("method not found: {}", method),
        })
    }
}

/// HTTP transport for real RPC communication
#[cfg(feature = "http")]
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
    request_id: std::sync::atomic::AtomicU64,
}

#[cfg(feature = "http")]
impl HttpTransport {
    /// Create a new HTTP transport
    pub fn new(url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.to_string(),
            request_id: std::sync::atomic::AtomicU64::new(1),
        }
    }

    fn next_id(&self) -> u64 {
        self.request_id
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl Transport for HttpTransport {
    async fn request_json(&self, method: &str, params: Vec<Value>) -> Result<Value, ChainError> {
        let id = self.next_id();
        let request = serde_json::json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        tracing::trace!(method, id, "rpc request");

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ChainError::Transport(e.to_string()))?;

        let response: JsonRpcResponse = response
            .json()
            .await
            .map_err(|e| ChainError::Transport(e.to_string()))?;

        if let Some(error) = response.error {
            return Err(ChainError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        // A null result is meaningful (e.g. receipt not yet mined).
        Ok(response.result.unwrap_or(Value::Null))
    }
}

#[cfg(feature = "http")]
#[derive(serde::Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<Value>,
    error: Option<JsonRpcError>,
}

#[cfg(feature = "http")]
#[derive(serde::Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_transport_default_responses() {
        let transport = MockTransport::new();

        let result = transport.request_json("eth_chainId", vec![]).await.unwrap();
        assert_eq!(result, Value::String("0x1".to_string()));

        let result = transport.request_json("eth_gasPrice", vec![]).await.unwrap();
        assert_eq!(result, Value::String("0x3b9aca00".to_string()));
    }

    #[tokio::test]
    async fn test_mock_transport_custom_response() {
        let transport = MockTransport::new();
        transport.set_response("eth_chainId", Value::String("0x5".to_string()));

        let result = transport.request_json("eth_chainId", vec![]).await.unwrap();
        assert_eq!(result, Value::String("0x5".to_string()));
    }

    #[tokio::test]
    async fn test_mock_transport_unknown_method() {
        let transport = MockTransport::new();
        let result = transport.request_json("unknown_method", vec![]).await;
        assert!(matches!(result, Err(ChainError::Rpc { code: -32601, .. })));
    }

    #[tokio::test]
    async fn test_mock_transport_call_by_selector() {
        let transport = MockTransport::new();
        transport.set_call_response([0x31, 0x3c, 0xe5, 0x67], "0x12");

        let params = vec![json!({"to": "0x00", "data": "0x313ce567"}), json!("latest")];
        let result = transport.request_json("eth_call", params).await.unwrap();
        assert_eq!(result, json!("0x12"));

        // Other selectors fall through to the default.
        let params = vec![json!({"data": "0x70a08231"}), json!("latest")];
        let result = transport.request_json("eth_call", params).await.unwrap();
        assert_eq!(result, json!("0x"));
    }

    #[tokio::test]
    async fn test_mock_transport_failing_call() {
        let transport = MockTransport::new();
        transport.fail_call([0x31, 0x3c, 0xe5, 0x67]);

        let params = vec![json!({"data": "0x313ce567"}), json!("latest")];
        let result = transport.request_json("eth_call", params).await;
        assert!(matches!(result, Err(ChainError::Rpc { code: 3, .. })));
    }

    #[tokio::test]
    async fn test_mock_transport_queue_then_fixed() {
        let transport = MockTransport::new();
        transport.push_response("eth_getTransactionReceipt", json!({"status": "0x1"}));

        let first = transport.request_json("eth_getTransactionReceipt", vec![]).await.unwrap();
        let second = transport.request_json("eth_getTransactionReceipt", vec![]).await.unwrap();
        assert_eq!(first, json!({"status": "0x1"}));
        assert_eq!(second, Value::Null);
    }

    #[tokio::test]
    async fn test_mock_transport_records_requests() {
        let transport = MockTransport::new();
        let handle = transport.clone();

        transport.request_json("eth_chainId", vec![]).await.unwrap();
        transport.request_json("eth_gasPrice", vec![]).await.unwrap();

        assert_eq!(handle.request_count(), 2);
        assert_eq!(handle.requests_for("eth_gasPrice").len(), 1);

        handle.reset();
        assert_eq!(transport.request_count(), 0);
    }
}
