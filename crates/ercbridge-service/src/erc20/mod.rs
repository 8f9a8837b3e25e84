//! Fungible token operations
//!
//! Every request carries `contract_type`; `"ownable"` selects the ownable
//! contract surface and anything else the standard one. The ownership
//! operations are only available on the ownable surface.

mod service;
mod types;

pub use service::{Erc20Service, DEFAULT_DECIMALS};
pub use types::*;
