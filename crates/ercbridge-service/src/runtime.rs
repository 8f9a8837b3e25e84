//! Service runtime
//!
//! Holds everything the services share: the chain backend, chain settings,
//! the administrative identity, deploy artifacts and the ABI tables. All of
//! it is immutable once built.

use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use ercbridge_chain::{ChainClient, ChainError};
use ercbridge_crypto::keystore::{decrypt_key, read_keystore};
use ercbridge_crypto::{private_key_from_bytes, public_key_to_address, KeystoreError};
use ercbridge_primitives::Address;
use thiserror::Error;
use tokio::sync::OnceCell;

use crate::backend::{ContractBackend, RpcBackend};
use crate::config::{AdminConfig, ChainConfig, ConfigError, ServiceConfig};
use crate::error::{ErrorKind, ServiceError, ServiceResult};
use crate::resolver::{AbiKey, ContractHandle, ContractResolver, ContractVariant, TokenStandard};

/// Startup failures that leave a component unavailable
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Admin keystore could not be read or decrypted
    #[error(transparent)]
    Keystore(#[from] KeystoreError),

    /// Keystore decrypted to a different address than configured
    #[error("admin address mismatch: expected {expected}, keystore holds {actual}")]
    AdminAddressMismatch {
        /// Configured address
        expected: Address,
        /// Address of the decrypted key
        actual: Address,
    },

    /// Node could not be reached
    #[error("failed to connect to ethereum node: {0}")]
    Connect(#[from] ChainError),

    /// Node did not answer in time
    #[error("timed out connecting to ethereum node")]
    ConnectTimeout,

    /// Node serves a different chain
    #[error("chain ID mismatch: expected {expected}, got {actual}")]
    ChainIdMismatch {
        /// Configured chain id
        expected: u64,
        /// Chain id reported by the node
        actual: u64,
    },
}

/// Chain parameters shared by every operation
#[derive(Debug, Clone)]
pub struct ChainSettings {
    /// Chain id used for signing; `None` when not configured
    pub chain_id: Option<u64>,
    /// Per-call timeout when a request has no deadline
    pub timeout: Duration,
    /// Gas limit for contract calls
    pub gas_limit: u64,
    /// Receipt polling interval
    pub poll_interval: Duration,
    /// Logical name to contract address
    pub contracts: BTreeMap<String, Address>,
}

impl ChainSettings {
    /// Settings for `chain_id` with default timing and gas
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id: Some(chain_id),
            ..Default::default()
        }
    }

    /// Address registered under `name`
    pub fn contract_address(&self, name: &str) -> Option<Address> {
        self.contracts.get(name).copied()
    }
}

impl Default for ChainSettings {
    fn default() -> Self {
        Self {
            chain_id: None,
            timeout: Duration::from_secs(30),
            gas_limit: 300_000,
            poll_interval: Duration::from_millis(1000),
            contracts: BTreeMap::new(),
        }
    }
}

/// Contract creation bytecode per contract kind
#[derive(Debug, Clone, Default)]
pub struct DeployArtifacts {
    code: HashMap<AbiKey, Bytes>,
}

impl DeployArtifacts {
    /// Register creation bytecode for `key`
    pub fn insert(&mut self, key: AbiKey, code: impl Into<Bytes>) {
        self.code.insert(key, code.into());
    }

    /// Creation bytecode for `key`
    pub fn bytecode(&self, key: AbiKey) -> Option<&Bytes> {
        self.code.get(&key)
    }
}

/// Administrative identity that can be named as a contract owner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminIdentity {
    address: Address,
}

impl AdminIdentity {
    /// Identity for a known address
    pub fn new(address: Address) -> Self {
        Self { address }
    }

    /// Decrypt a keystore and keep the address it controls
    ///
    /// The decrypted key is dropped (and wiped) before returning.
    pub fn from_keystore(
        path: impl AsRef<Path>,
        password: &str,
        expected: Option<Address>,
    ) -> Result<Self, RuntimeError> {
        let keystore = read_keystore(path)?;
        let secret = decrypt_key(&keystore, password)?;
        let key = private_key_from_bytes(&secret).map_err(|_| KeystoreError::InvalidKey)?;
        let actual = public_key_to_address(key.verifying_key());

        if let Some(expected) = expected {
            if expected != actual {
                return Err(RuntimeError::AdminAddressMismatch { expected, actual });
            }
        }
        Ok(Self::new(actual))
    }

    /// Admin address
    pub fn address(&self) -> Address {
        self.address
    }
}

/// Shared state behind every service
pub struct ServiceRuntime {
    backend: Option<Arc<dyn ContractBackend>>,
    settings: ChainSettings,
    admin: Option<AdminIdentity>,
    artifacts: DeployArtifacts,
    resolver: ContractResolver,
}

impl ServiceRuntime {
    /// Start building a runtime by hand
    pub fn builder() -> ServiceRuntimeBuilder {
        ServiceRuntimeBuilder::default()
    }

    /// Build from configuration, connecting over HTTP
    ///
    /// Invalid configuration is an error. A node that cannot be reached or
    /// serves the wrong chain, and an admin keystore that cannot be opened,
    /// are logged and leave that component unavailable.
    pub async fn from_config(config: &ServiceConfig) -> Result<Self, ConfigError> {
        let client = config
            .chain
            .as_ref()
            .map(|chain| ChainClient::connect(&chain.rpc_url));
        Self::from_config_with_client(config, client).await
    }

    /// Build from configuration with a caller-supplied chain client
    pub async fn from_config_with_client(
        config: &ServiceConfig,
        client: Option<ChainClient>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut builder = Self::builder().artifacts(config.artifacts.to_artifacts()?);

        match (&config.chain, client) {
            (Some(chain), Some(client)) => {
                let settings = chain.to_settings()?;
                match connect(chain, &settings, client).await {
                    Ok(backend) => {
                        tracing::info!(rpc_url = %chain.rpc_url, chain_id = chain.chain_id, "ethereum client initialized");
                        builder = builder.backend(backend);
                    }
                    Err(e) => {
                        tracing::warn!(rpc_url = %chain.rpc_url, error = %e, "ethereum client initialization failed");
                    }
                }
                builder = builder.settings(settings);
            }
            (Some(chain), None) => {
                builder = builder.settings(chain.to_settings()?);
                tracing::warn!("no chain client supplied, skipping connection");
            }
            (None, _) => {
                tracing::warn!("ethereum configuration not found, skipping initialization");
            }
        }

        match &config.admin {
            Some(admin) => match load_admin(admin) {
                Ok(identity) => {
                    tracing::info!(address = %identity.address(), "admin keystore initialized");
                    builder = builder.admin(identity);
                }
                Err(e) => {
                    tracing::warn!(path = %admin.keystore_path.display(), error = %e, "admin keystore initialization failed");
                }
            },
            None => tracing::warn!("admin configuration not found, skipping keystore initialization"),
        }

        Ok(builder.build())
    }

    /// Live chain backend
    pub fn backend(&self) -> ServiceResult<Arc<dyn ContractBackend>> {
        self.backend
            .clone()
            .ok_or_else(ServiceError::client_not_initialized)
    }

    /// Whether a chain backend is bound
    pub fn is_connected(&self) -> bool {
        self.backend.is_some()
    }

    /// Chain settings
    pub fn settings(&self) -> &ChainSettings {
        &self.settings
    }

    /// Configured chain id
    pub fn chain_id(&self) -> ServiceResult<u64> {
        self.settings
            .chain_id
            .ok_or_else(ServiceError::chain_not_configured)
    }

    /// Administrative identity, if one was loaded
    pub fn admin(&self) -> Option<&AdminIdentity> {
        self.admin.as_ref()
    }

    /// Admin address, for deploys that name the admin as owner
    pub fn admin_address(&self) -> ServiceResult<Address> {
        self.admin.map(|admin| admin.address()).ok_or_else(|| {
            ServiceError::invalid_argument("admin keystore not initialized, cannot use admin address")
        })
    }

    /// Creation bytecode for `key`
    pub fn creation_code(&self, key: AbiKey) -> ServiceResult<Bytes> {
        self.artifacts.bytecode(key).cloned().ok_or_else(|| {
            ServiceError::new(
                ErrorKind::ChainNotConfigured,
                format!("no creation bytecode configured for {}", key),
            )
        })
    }

    /// ABI tables
    pub fn resolver(&self) -> &ContractResolver {
        &self.resolver
    }

    /// Handle for the contract at `address`
    pub fn resolve(
        &self,
        address: Address,
        standard: TokenStandard,
        variant: ContractVariant,
    ) -> ServiceResult<ContractHandle> {
        self.backend()?;
        Ok(self.resolver.resolve(address, AbiKey::new(standard, variant)))
    }
}

impl std::fmt::Debug for ServiceRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceRuntime")
            .field("connected", &self.is_connected())
            .field("settings", &self.settings)
            .field("admin", &self.admin)
            .finish_non_exhaustive()
    }
}

async fn connect(
    chain: &ChainConfig,
    settings: &ChainSettings,
    client: ChainClient,
) -> Result<RpcBackend, RuntimeError> {
    let actual = tokio::time::timeout(settings.timeout, client.chain_id())
        .await
        .map_err(|_| RuntimeError::ConnectTimeout)??;

    if let Some(expected) = settings.chain_id {
        if expected != actual {
            return Err(RuntimeError::ChainIdMismatch { expected, actual });
        }
    }
    Ok(RpcBackend::new(client, chain.gas_limit))
}

fn load_admin(admin: &AdminConfig) -> Result<AdminIdentity, RuntimeError> {
    // validate() already rejected a malformed address
    let expected = admin.expected_address().ok().flatten();
    AdminIdentity::from_keystore(&admin.keystore_path, &admin.password, expected)
}

/// Builder for [`ServiceRuntime`]
#[derive(Default)]
pub struct ServiceRuntimeBuilder {
    backend: Option<Arc<dyn ContractBackend>>,
    settings: ChainSettings,
    admin: Option<AdminIdentity>,
    artifacts: DeployArtifacts,
}

impl ServiceRuntimeBuilder {
    /// Bind a contract backend
    pub fn backend(mut self, backend: impl ContractBackend + 'static) -> Self {
        self.backend = Some(Arc::new(backend));
        self
    }

    /// Bind a chain client without checking its chain id
    pub fn chain_client(self, client: ChainClient) -> Self {
        let gas_limit = self.settings.gas_limit;
        self.backend(RpcBackend::new(client, gas_limit))
    }

    /// Chain settings
    pub fn settings(mut self, settings: ChainSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Administrative identity
    pub fn admin(mut self, admin: AdminIdentity) -> Self {
        self.admin = Some(admin);
        self
    }

    /// Deploy artifacts
    pub fn artifacts(mut self, artifacts: DeployArtifacts) -> Self {
        self.artifacts = artifacts;
        self
    }

    /// Finish
    pub fn build(self) -> ServiceRuntime {
        ServiceRuntime {
            backend: self.backend,
            settings: self.settings,
            admin: self.admin,
            artifacts: self.artifacts,
            resolver: ContractResolver::new(),
        }
    }
}

/// Lazily initialized, process-wide runtime slot
///
/// Concurrent first callers wait on a single initialization; everyone gets
/// the same `Arc`.
#[derive(Debug, Default)]
pub struct RuntimeCell {
    cell: OnceCell<Arc<ServiceRuntime>>,
}

impl RuntimeCell {
    /// Empty cell
    pub fn new() -> Self {
        Self::default()
    }

    /// Runtime, initializing it with `init` on first use
    pub async fn get_or_init<F, Fut>(&self, init: F) -> Arc<ServiceRuntime>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ServiceRuntime>,
    {
        self.cell
            .get_or_init(|| async { Arc::new(init().await) })
            .await
            .clone()
    }

    /// Runtime, initializing it with a fallible `init` on first use
    ///
    /// A failed initialization leaves the cell empty.
    pub async fn get_or_try_init<F, Fut, E>(&self, init: F) -> Result<Arc<ServiceRuntime>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<ServiceRuntime, E>>,
    {
        self.cell
            .get_or_try_init(|| async { init().await.map(Arc::new) })
            .await
            .cloned()
    }

    /// Runtime, if initialized
    pub fn get(&self) -> Option<Arc<ServiceRuntime>> {
        self.cell.get().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ercbridge_chain::MockTransport;
    use ercbridge_crypto::keystore::{encrypt_key, KdfCost};

    const DEV_KEY: [u8; 32] = [
        0xac, 0x09, 0x74, 0xbe, 0xc3, 0x9a, 0x17, 0xe3, 0x6b, 0xa4, 0xa6, 0xb4, 0xd2, 0x38, 0xff, 0x94,
        0x4b, 0xac, 0xb4, 0x78, 0xcb, 0xed, 0x5e, 0xfc, 0xae, 0x78, 0x4d, 0x7b, 0xf4, 0xf2, 0xff, 0x80,
    ];

    fn write_keystore(dir: &tempfile::TempDir, password: &str) -> std::path::PathBuf {
        let keystore = encrypt_key(&DEV_KEY, password, KdfCost::Light).unwrap();
        let path = dir.path().join("admin.json");
        std::fs::write(&path, serde_json::to_string(&keystore).unwrap()).unwrap();
        path
    }

    #[test]
    fn test_empty_runtime_is_unavailable() {
        let runtime = ServiceRuntime::builder().build();
        assert_eq!(runtime.backend().err().unwrap().kind(), ErrorKind::ClientNotInitialized);
        assert_eq!(runtime.chain_id().unwrap_err().kind(), ErrorKind::ChainNotConfigured);
        assert_eq!(
            runtime.admin_address().unwrap_err().to_string(),
            "admin keystore not initialized, cannot use admin address"
        );
        assert_eq!(
            runtime.creation_code(AbiKey::ERC721).unwrap_err().to_string(),
            "no creation bytecode configured for ERC721"
        );
    }

    #[test]
    fn test_contract_address_lookup() {
        let mut settings = ChainSettings::new(1);
        let usdc = Address::from_bytes([0xaa; 20]);
        settings.contracts.insert("usdc".to_string(), usdc);
        assert_eq!(settings.contract_address("usdc"), Some(usdc));
        assert_eq!(settings.contract_address("dai"), None);
    }

    #[test]
    fn test_admin_from_keystore() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_keystore(&dir, "secret");

        let admin = AdminIdentity::from_keystore(&path, "secret", None).unwrap();
        assert_eq!(admin.address().to_hex(), "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266");

        let wrong = AdminIdentity::from_keystore(&path, "nope", None);
        assert!(matches!(wrong, Err(RuntimeError::Keystore(KeystoreError::MacMismatch))));

        let mismatch = AdminIdentity::from_keystore(&path, "secret", Some(Address::ZERO));
        assert!(matches!(mismatch, Err(RuntimeError::AdminAddressMismatch { .. })));
    }

    #[tokio::test]
    async fn test_from_config_connects() {
        let config = ServiceConfig::from_toml_str(
            r#"
            [chain]
            chain_id = 1
        "#,
        )
        .unwrap();
        let client = ChainClient::with_transport(MockTransport::new());

        let runtime = ServiceRuntime::from_config_with_client(&config, Some(client)).await.unwrap();
        assert!(runtime.is_connected());
        assert_eq!(runtime.chain_id().unwrap(), 1);
        assert!(runtime.admin().is_none());
    }

    #[tokio::test]
    async fn test_from_config_chain_id_mismatch_leaves_client_uninitialized() {
        let config = ServiceConfig::from_toml_str(
            r#"
            [chain]
            chain_id = 5
        "#,
        )
        .unwrap();
        let client = ChainClient::with_transport(MockTransport::new());

        let runtime = ServiceRuntime::from_config_with_client(&config, Some(client)).await.unwrap();
        assert!(!runtime.is_connected());
        assert_eq!(runtime.chain_id().unwrap(), 5);
    }

    #[tokio::test]
    async fn test_from_config_admin_fails_closed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_keystore(&dir, "secret");
        let toml = format!(
            "[admin]\nkeystore_path = {:?}\npassword = \"wrong\"\n",
            path.display().to_string()
        );
        let config = ServiceConfig::from_toml_str(&toml).unwrap();

        let runtime = ServiceRuntime::from_config_with_client(&config, None).await.unwrap();
        assert!(runtime.admin().is_none());
    }

    #[tokio::test]
    async fn test_from_config_loads_admin() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_keystore(&dir, "secret");
        let toml = format!(
            "[admin]\nkeystore_path = {:?}\npassword = \"secret\"\naddress = \"0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266\"\n",
            path.display().to_string()
        );
        let config = ServiceConfig::from_toml_str(&toml).unwrap();

        let runtime = ServiceRuntime::from_config_with_client(&config, None).await.unwrap();
        assert_eq!(
            runtime.admin_address().unwrap().to_hex(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }
}
