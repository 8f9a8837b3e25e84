//! Contract resolution
//!
//! Maps a `(TokenStandard, ContractVariant)` pair to the ABI surface of that
//! contract kind. Tables are built once per resolver and shared by every
//! handle it hands out.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use ercbridge_chain::abi::Token;
use ercbridge_chain::contract::{self, ContractAbi};
use ercbridge_primitives::Address;

use crate::error::{ServiceError, ServiceResult};

/// Token standard a contract implements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenStandard {
    /// ERC20
    Fungible,
    /// ERC721
    NonFungible,
    /// ERC1155
    MultiToken,
}

/// Contract flavour within a standard
///
/// Only ERC20 has more than one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContractVariant {
    /// Plain contract
    #[default]
    Standard,
    /// Contract with an `Ownable` owner
    Ownable,
}

impl ContractVariant {
    /// Parse a caller-supplied selector
    ///
    /// Only the exact string `"ownable"` selects `Ownable`; anything else,
    /// including the empty string, selects `Standard`.
    pub fn parse(s: &str) -> Self {
        if s == "ownable" {
            ContractVariant::Ownable
        } else {
            ContractVariant::Standard
        }
    }

    /// Lowercase name
    pub fn as_str(self) -> &'static str {
        match self {
            ContractVariant::Standard => "standard",
            ContractVariant::Ownable => "ownable",
        }
    }
}

impl fmt::Display for ContractVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key of one ABI table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AbiKey {
    standard: TokenStandard,
    variant: ContractVariant,
}

impl AbiKey {
    /// Plain ERC20
    pub const ERC20: AbiKey = AbiKey::new(TokenStandard::Fungible, ContractVariant::Standard);
    /// ERC20 with Ownable
    pub const ERC20_OWNABLE: AbiKey = AbiKey::new(TokenStandard::Fungible, ContractVariant::Ownable);
    /// ERC721
    pub const ERC721: AbiKey = AbiKey::new(TokenStandard::NonFungible, ContractVariant::Standard);
    /// ERC1155
    pub const ERC1155: AbiKey = AbiKey::new(TokenStandard::MultiToken, ContractVariant::Standard);

    /// Key for `standard` and `variant`
    ///
    /// Standards without variants ignore `variant`.
    pub const fn new(standard: TokenStandard, variant: ContractVariant) -> Self {
        let variant = match standard {
            TokenStandard::Fungible => variant,
            TokenStandard::NonFungible | TokenStandard::MultiToken => ContractVariant::Standard,
        };
        Self { standard, variant }
    }

    /// Token standard
    pub fn standard(&self) -> TokenStandard {
        self.standard
    }

    /// Contract variant
    pub fn variant(&self) -> ContractVariant {
        self.variant
    }

    /// Contract kind name, e.g. `ERC20Ownable`
    pub fn kind(&self) -> &'static str {
        match (self.standard, self.variant) {
            (TokenStandard::Fungible, ContractVariant::Standard) => "ERC20",
            (TokenStandard::Fungible, ContractVariant::Ownable) => "ERC20Ownable",
            (TokenStandard::NonFungible, _) => "ERC721",
            (TokenStandard::MultiToken, _) => "ERC1155",
        }
    }
}

impl fmt::Display for AbiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())
    }
}

/// Cached ABI tables, one per contract kind
#[derive(Debug, Clone)]
pub struct ContractResolver {
    erc20: Arc<ContractAbi>,
    erc20_ownable: Arc<ContractAbi>,
    erc721: Arc<ContractAbi>,
    erc1155: Arc<ContractAbi>,
}

impl ContractResolver {
    /// Build every table
    pub fn new() -> Self {
        Self {
            erc20: Arc::new(contract::erc20()),
            erc20_ownable: Arc::new(contract::erc20_ownable()),
            erc721: Arc::new(contract::erc721()),
            erc1155: Arc::new(contract::erc1155()),
        }
    }

    /// Shared table for `key`
    pub fn abi(&self, key: AbiKey) -> Arc<ContractAbi> {
        let table = match (key.standard, key.variant) {
            (TokenStandard::Fungible, ContractVariant::Standard) => &self.erc20,
            (TokenStandard::Fungible, ContractVariant::Ownable) => &self.erc20_ownable,
            (TokenStandard::NonFungible, _) => &self.erc721,
            (TokenStandard::MultiToken, _) => &self.erc1155,
        };
        Arc::clone(table)
    }

    /// Handle for the contract at `address`
    pub fn resolve(&self, address: Address, key: AbiKey) -> ContractHandle {
        ContractHandle {
            address,
            key,
            abi: self.abi(key),
        }
    }
}

impl Default for ContractResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// A deployed contract and the method surface of its kind
#[derive(Debug, Clone)]
pub struct ContractHandle {
    address: Address,
    key: AbiKey,
    abi: Arc<ContractAbi>,
}

impl ContractHandle {
    /// Contract address
    pub fn address(&self) -> Address {
        self.address
    }

    /// Contract kind
    pub fn key(&self) -> AbiKey {
        self.key
    }

    /// Calldata for `method`
    ///
    /// Methods outside this kind's surface are the caller's mistake and fail
    /// with `InvalidArgument`; argument mismatches are ours and fail with
    /// `Internal`.
    pub fn encode(&self, method: &str, args: &[Token]) -> ServiceResult<Bytes> {
        if !self.abi.has_function(method) {
            return Err(ServiceError::invalid_argument(format!(
                "method {} is not available on the {} contract variant",
                method, self.key
            )));
        }
        self.abi
            .encode_call(method, args)
            .map_err(|e| ServiceError::internal(format!("failed to encode {} call", method), e))
    }

    /// Decode the return data of `method`
    pub fn decode(&self, method: &str, data: &[u8]) -> ServiceResult<Vec<Token>> {
        self.abi
            .decode_output(method, data)
            .map_err(|e| ServiceError::internal(format!("failed to decode {} result", method), e))
    }
}
