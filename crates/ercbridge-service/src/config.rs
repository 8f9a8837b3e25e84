//! Service configuration
//!
//! Loaded from a TOML file with four sections:
//!
//! ```toml
//! [chain]
//! rpc_url = "http://localhost:8545"
//! chain_id = 31337
//! timeout_secs = 30
//! gas_limit = 300000
//! poll_interval_ms = 1000
//!
//! [chain.contracts]
//! usdc = "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"
//!
//! [admin]
//! keystore_path = "/etc/ercbridge/admin.json"
//! password = "..."
//!
//! [artifacts]
//! erc20 = "0x6080..."
//!
//! [log]
//! level = "info"
//! json = false
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use bytes::Bytes;
use ercbridge_primitives::Address;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::resolver::AbiKey;
use crate::runtime::{ChainSettings, DeployArtifacts};

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// TOML is malformed or has wrong types
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A `[chain.contracts]` entry is not an address
    #[error("contract {name} has an invalid address: {value}")]
    InvalidContractAddress {
        /// Logical contract name
        name: String,
        /// Configured value
        value: String,
    },

    /// `[admin].address` is not an address
    #[error("admin address is invalid: {0}")]
    InvalidAdminAddress(String),

    /// An `[artifacts]` entry is not hex
    #[error("creation bytecode for {0} is not valid hex")]
    InvalidBytecode(&'static str),
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Chain connection; absent means no client
    #[serde(default)]
    pub chain: Option<ChainConfig>,
    /// Administrative identity; absent means no admin
    #[serde(default)]
    pub admin: Option<AdminConfig>,
    /// Contract creation bytecode
    #[serde(default)]
    pub artifacts: ArtifactsConfig,
    /// Logging
    #[serde(default)]
    pub log: LogConfig,
}

impl ServiceConfig {
    /// Read and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ServiceConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every value that is parsed lazily elsewhere
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(chain) = &self.chain {
            chain.contract_addresses()?;
        }
        if let Some(admin) = &self.admin {
            admin.expected_address()?;
        }
        self.artifacts.to_artifacts()?;
        Ok(())
    }
}

/// `[chain]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    /// JSON-RPC endpoint
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    /// Expected chain id; 0 means not configured
    #[serde(default)]
    pub chain_id: u64,
    /// Per-call timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Gas limit for contract calls
    #[serde(default = "default_gas_limit")]
    pub gas_limit: u64,
    /// Receipt polling interval in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Logical name to contract address
    #[serde(default)]
    pub contracts: BTreeMap<String, String>,
}

fn default_rpc_url() -> String {
    "http://localhost:8545".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_gas_limit() -> u64 {
    300_000
}

fn default_poll_interval_ms() -> u64 {
    1000
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            chain_id: 0,
            timeout_secs: default_timeout_secs(),
            gas_limit: default_gas_limit(),
            poll_interval_ms: default_poll_interval_ms(),
            contracts: BTreeMap::new(),
        }
    }
}

impl ChainConfig {
    fn contract_addresses(&self) -> Result<BTreeMap<String, Address>, ConfigError> {
        self.contracts
            .iter()
            .map(|(name, value)| {
                Address::from_hex(value)
                    .map(|address| (name.clone(), address))
                    .map_err(|_| ConfigError::InvalidContractAddress {
                        name: name.clone(),
                        value: value.clone(),
                    })
            })
            .collect()
    }

    /// Runtime chain settings
    pub fn to_settings(&self) -> Result<ChainSettings, ConfigError> {
        Ok(ChainSettings {
            chain_id: (self.chain_id != 0).then_some(self.chain_id),
            timeout: Duration::from_secs(self.timeout_secs),
            gas_limit: self.gas_limit,
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            contracts: self.contract_addresses()?,
        })
    }
}

/// `[admin]` section
#[derive(Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Web3 V3 keystore file
    pub keystore_path: PathBuf,
    /// Keystore passphrase
    pub password: String,
    /// Address the keystore must decrypt to
    #[serde(default)]
    pub address: Option<String>,
}

impl AdminConfig {
    /// Parsed `address`, if set
    pub fn expected_address(&self) -> Result<Option<Address>, ConfigError> {
        self.address
            .as_deref()
            .map(|a| Address::from_hex(a).map_err(|_| ConfigError::InvalidAdminAddress(a.to_string())))
            .transpose()
    }
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("keystore_path", &self.keystore_path)
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// `[artifacts]` section: hex creation bytecode per contract kind
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArtifactsConfig {
    /// ERC20
    #[serde(default)]
    pub erc20: Option<String>,
    /// ERC20 with Ownable
    #[serde(default)]
    pub erc20_ownable: Option<String>,
    /// ERC721
    #[serde(default)]
    pub erc721: Option<String>,
    /// ERC1155
    #[serde(default)]
    pub erc1155: Option<String>,
}

impl ArtifactsConfig {
    /// Decode every configured bytecode
    pub fn to_artifacts(&self) -> Result<DeployArtifacts, ConfigError> {
        let mut artifacts = DeployArtifacts::default();
        let entries = [
            (AbiKey::ERC20, &self.erc20),
            (AbiKey::ERC20_OWNABLE, &self.erc20_ownable),
            (AbiKey::ERC721, &self.erc721),
            (AbiKey::ERC1155, &self.erc1155),
        ];
        for (key, value) in entries {
            if let Some(hex_code) = value {
                artifacts.insert(key, decode_bytecode(key, hex_code)?);
            }
        }
        Ok(artifacts)
    }
}

fn decode_bytecode(key: AbiKey, s: &str) -> Result<Bytes, ConfigError> {
    let digits = s.trim();
    let digits = digits.strip_prefix("0x").unwrap_or(digits);
    let code = hex::decode(digits).map_err(|_| ConfigError::InvalidBytecode(key.kind()))?;
    if code.is_empty() {
        return Err(ConfigError::InvalidBytecode(key.kind()));
    }
    Ok(Bytes::from(code))
}

/// `[log]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Filter directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON lines instead of text
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = ServiceConfig::default();
        assert!(config.chain.is_none());
        assert!(config.admin.is_none());
        assert_eq!(config.log.level, "info");
        assert!(!config.log.json);

        let chain = ChainConfig::default();
        assert_eq!(chain.timeout_secs, 30);
        assert_eq!(chain.gas_limit, 300_000);
        assert_eq!(chain.poll_interval_ms, 1000);
    }

    #[test]
    fn test_config_section_defaults() {
        let config = ServiceConfig::from_toml_str(
            r#"
            [chain]
            rpc_url = "http://node:8545"
            chain_id = 5
        "#,
        )
        .unwrap();
        let settings = config.chain.unwrap().to_settings().unwrap();
        assert_eq!(settings.chain_id, Some(5));
        assert_eq!(settings.timeout, Duration::from_secs(30));
        assert_eq!(settings.gas_limit, 300_000);
        assert_eq!(settings.poll_interval, Duration::from_millis(1000));
        assert!(settings.contracts.is_empty());
    }

    #[test]
    fn test_config_serialize() {
        let config = ServiceConfig {
            chain: Some(ChainConfig::default()),
            ..Default::default()
        };
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("rpc_url"));
        assert!(toml.contains("gas_limit"));
    }

    #[test]
    fn test_config_rejects_bad_contract_address() {
        let err = ServiceConfig::from_toml_str(
            r#"
            [chain]
            chain_id = 1
            [chain.contracts]
            usdc = "0x1234"
        "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidContractAddress { .. }));
    }

    #[test]
    fn test_config_rejects_bad_bytecode() {
        let err = ServiceConfig::from_toml_str(
            r#"
            [artifacts]
            erc721 = "0xnothex"
        "#,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "creation bytecode for ERC721 is not valid hex");
    }

    #[test]
    fn test_admin_debug_hides_password() {
        let admin = AdminConfig {
            keystore_path: PathBuf::from("/tmp/admin.json"),
            password: "hunter2".to_string(),
            address: None,
        };
        assert!(!format!("{:?}", admin).contains("hunter2"));
    }
}
