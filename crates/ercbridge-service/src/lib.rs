//! # ercbridge-service
//!
//! Validated token operations for ERC20, ERC721 and ERC1155 contracts on an
//! Ethereum-compatible chain.
//!
//! Every operation takes string-typed request fields, validates them, binds
//! the signing key and the contract, checks that any asserted sender is the
//! signer, then performs one read-only call or submits one transaction.
//! Mutations return the transaction hash without waiting for it to be
//! mined; [`ConfirmationService`] polls for the receipt separately.
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use ercbridge_service::{Erc20Service, RequestContext, ServiceConfig, ServiceRuntime};
//! use ercbridge_service::erc20::GetBalanceRequest;
//!
//! let config = ServiceConfig::load("ercbridge.toml")?;
//! ercbridge_service::telemetry::init(&config.log);
//! let runtime = Arc::new(ServiceRuntime::from_config(&config).await?);
//!
//! let erc20 = Erc20Service::new(runtime);
//! let balance = erc20
//!     .get_balance(
//!         &RequestContext::new(),
//!         GetBalanceRequest {
//!             contract_address: "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48".into(),
//!             owner_address: "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266".into(),
//!             ..Default::default()
//!         },
//!     )
//!     .await?;
//! ```
//!
//! ## Errors
//!
//! | Kind | Code | Raised when |
//! |------|------|-------------|
//! | `InvalidArgument` | -32602 | a request field is malformed, or a sender does not match the key |
//! | `NotFound` | -32001 | a referenced entity does not exist |
//! | `Unauthenticated` | -32002 | the caller is not authenticated |
//! | `ClientNotInitialized` | -32003 | no chain client is connected |
//! | `ChainNotConfigured` | -32003 | the chain id or creation bytecode is missing |
//! | `Internal` | -32603 | the chain call failed, reverted or timed out |

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod config;
pub mod confirmation;
pub mod context;
pub mod erc1155;
pub mod erc20;
pub mod erc721;
pub mod error;
pub mod identity;
pub mod pipeline;
pub mod resolver;
pub mod runtime;
pub mod telemetry;
pub mod validator;

// Re-export main types
pub use backend::{ContractBackend, RpcBackend};
pub use config::{ConfigError, ServiceConfig};
pub use confirmation::ConfirmationService;
pub use context::RequestContext;
pub use erc1155::Erc1155Service;
pub use erc20::Erc20Service;
pub use erc721::Erc721Service;
pub use error::{ErrorKind, ServiceError, ServiceResult};
pub use pipeline::Pipeline;
pub use resolver::{ContractVariant, TokenStandard};
pub use runtime::{AdminIdentity, ChainSettings, DeployArtifacts, RuntimeCell, RuntimeError, ServiceRuntime};
