//! # ercbridge-chain
//!
//! Chain access for ercbridge.
//!
//! ## Features
//!
//! - **ChainClient**: JSON-RPC client for an Ethereum-compatible node
//! - **Transport**: pluggable RPC transport (HTTP, or a recording mock for tests)
//! - **Wallet**: key holder and prehash signer
//! - **TxBuilder**: legacy transactions with EIP-155 signing
//! - **contract**: ABI tables for ERC20, ERC20 + Ownable, ERC721 and ERC1155
//! - **abi**: Solidity ABI encoding and decoding
//!
//! ## Quick Start
//!
//! ```rust
//! use ercbridge_chain::{contract, ChainClient, MockTransport, Address, U256};
//! use ercbridge_chain::abi::Token;
//! use ercbridge_chain::types::{BlockId, CallRequest};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = MockTransport::new();
//! transport.set_call_response([0x70, 0xa0, 0x82, 0x31], &format!("0x{:064x}", 1000));
//! let client = ChainClient::with_transport(transport);
//!
//! let erc20 = contract::erc20();
//! let token = Address::from_hex("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48")?;
//! let data = erc20.encode_call("balanceOf", &[Token::Address(Address::ZERO)])?;
//!
//! let result = client
//!     .call(&CallRequest { to: Some(token), data: Some(data), ..Default::default() }, BlockId::Latest)
//!     .await?;
//! let balance = erc20.decode_output("balanceOf", &result)?;
//! assert_eq!(balance[0], Token::Uint(U256::from(1000)));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod abi;
mod client;
pub mod contract;
mod error;
mod transport;
mod tx_builder;
pub mod types;
mod wallet;

pub use client::ChainClient;
pub use error::ChainError;
pub use transport::{MockTransport, RecordedRequest};

/// Re-export Transport trait for custom implementations
pub use transport::Transport;
pub use tx_builder::{contract_address, LegacyTransaction, SignedTransaction, TxBuilder};
pub use wallet::Wallet;

#[cfg(feature = "http")]
pub use transport::HttpTransport;

// Re-export primitives for convenience
pub use ercbridge_primitives::{Address, H256, U256};
