//! Solidity ABI encoding and decoding
//!
//! Covers the subset of types the token standards use: addresses, unsigned
//! integers, booleans, bytes, strings and dynamic arrays of those.
//!
//! # Example
//!
//! ```rust
//! use ercbridge_chain::abi::{decode, encode_function_call, function_selector, ParamType, Token};
//! use ercbridge_chain::{Address, U256};
//!
//! let selector = function_selector("transfer(address,uint256)");
//! let data = encode_function_call(selector, &[Token::Address(Address::ZERO), Token::Uint(U256::from(1000))]);
//! assert_eq!(data.len(), 68);
//!
//! let return_data = [0u8; 32];
//! let balance = decode(&[ParamType::Uint(256)], &return_data).unwrap();
//! assert_eq!(balance[0], Token::Uint(U256::zero()));
//! ```

mod decode;
mod encode;
mod types;

pub use decode::decode;
pub use encode::{encode, encode_function_call, encode_typed, function_selector};
pub use types::{ParamType, Token};
