//! Service error taxonomy

use std::error::Error as StdError;
use std::fmt;

/// JSON-RPC error codes a transport can map each kind to
pub mod error_code {
    /// Invalid params
    pub const INVALID_PARAMS: i64 = -32602;
    /// Internal error
    pub const INTERNAL_ERROR: i64 = -32603;
    /// Resource not found
    pub const RESOURCE_NOT_FOUND: i64 = -32001;
    /// Caller is not authenticated
    pub const UNAUTHENTICATED: i64 = -32002;
    /// Service cannot reach or is not configured for the chain
    pub const UNAVAILABLE: i64 = -32003;
}

/// Closed set of failure classes exposed by every operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or inconsistent request input
    InvalidArgument,
    /// Requested resource does not exist
    NotFound,
    /// Caller identity rejected
    Unauthenticated,
    /// No live chain client
    ClientNotInitialized,
    /// Chain id or deploy artifacts missing from configuration
    ChainNotConfigured,
    /// Chain, backend or ABI failure, or a reverted transaction
    Internal,
}

impl ErrorKind {
    /// JSON-RPC error code for this kind
    pub fn rpc_code(self) -> i64 {
        match self {
            ErrorKind::InvalidArgument => error_code::INVALID_PARAMS,
            ErrorKind::NotFound => error_code::RESOURCE_NOT_FOUND,
            ErrorKind::Unauthenticated => error_code::UNAUTHENTICATED,
            ErrorKind::ClientNotInitialized | ErrorKind::ChainNotConfigured => {
                error_code::UNAVAILABLE
            }
            ErrorKind::Internal => error_code::INTERNAL_ERROR,
        }
    }

    /// Short lowercase label for logs
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidArgument => "invalid_argument",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Unauthenticated => "unauthenticated",
            ErrorKind::ClientNotInitialized => "client_not_initialized",
            ErrorKind::ChainNotConfigured => "chain_not_configured",
            ErrorKind::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Error returned by every service operation
#[derive(Debug)]
pub struct ServiceError {
    kind: ErrorKind,
    message: String,
    source: Option<BoxError>,
}

impl ServiceError {
    /// Create an error without a cause
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create an error wrapping `source`
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Invalid argument
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    /// Not found
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Unauthenticated
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthenticated, message)
    }

    /// No live chain client
    pub fn client_not_initialized() -> Self {
        Self::new(ErrorKind::ClientNotInitialized, "ethereum client not initialized")
    }

    /// No chain id configured
    pub fn chain_not_configured() -> Self {
        Self::new(ErrorKind::ChainNotConfigured, "chain ID not configured")
    }

    /// Internal failure caused by `cause`
    pub fn internal(message: impl Into<String>, cause: impl Into<BoxError>) -> Self {
        Self::with_source(ErrorKind::Internal, message, cause)
    }

    /// Request deadline elapsed before the chain answered
    pub fn deadline_exceeded() -> Self {
        Self::new(ErrorKind::Internal, "deadline exceeded")
    }

    /// Failure class
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Message without the cause
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether the caller sent something we will never accept
    pub fn is_caller_fault(&self) -> bool {
        self.kind == ErrorKind::InvalidArgument
    }

    /// Whether the service is missing a client or configuration
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::ClientNotInitialized | ErrorKind::ChainNotConfigured
        )
    }

    /// JSON-RPC error code for this error
    pub fn rpc_code(&self) -> i64 {
        self.kind.rpc_code()
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(cause) => write!(f, "{}: {}", self.message, cause),
            None => f.write_str(&self.message),
        }
    }
}

impl StdError for ServiceError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use ercbridge_chain::ChainError;

    // ===== Error Code Tests =====

    #[test]
    fn test_rpc_codes() {
        assert_eq!(ErrorKind::InvalidArgument.rpc_code(), -32602);
        assert_eq!(ErrorKind::NotFound.rpc_code(), -32001);
        assert_eq!(ErrorKind::Unauthenticated.rpc_code(), -32002);
        assert_eq!(ErrorKind::ClientNotInitialized.rpc_code(), -32003);
        assert_eq!(ErrorKind::ChainNotConfigured.rpc_code(), -32003);
        assert_eq!(ErrorKind::Internal.rpc_code(), -32603);
    }

    // ===== Construction Tests =====

    #[test]
    fn test_fixed_messages() {
        assert_eq!(
            ServiceError::client_not_initialized().to_string(),
            "ethereum client not initialized"
        );
        assert_eq!(
            ServiceError::chain_not_configured().to_string(),
            "chain ID not configured"
        );
        assert_eq!(ServiceError::deadline_exceeded().kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_display_with_cause() {
        let cause = ChainError::Rpc {
            code: 3,
            message: "execution reverted".to_string(),
        };
        let err = ServiceError::internal("failed to transfer tokens", cause);
        assert_eq!(
            err.to_string(),
            "failed to transfer tokens: rpc error 3: execution reverted"
        );
        assert_eq!(err.message(), "failed to transfer tokens");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_classification() {
        assert!(ServiceError::invalid_argument("x").is_caller_fault());
        assert!(!ServiceError::invalid_argument("x").is_unavailable());
        assert!(ServiceError::client_not_initialized().is_unavailable());
        assert!(ServiceError::chain_not_configured().is_unavailable());
        assert!(!ServiceError::not_found("x").is_caller_fault());
        assert_eq!(ServiceError::unauthenticated("x").rpc_code(), -32002);
    }
}
