//! Non-fungible token operations

mod service;
mod types;

pub use service::Erc721Service;
pub use types::*;
