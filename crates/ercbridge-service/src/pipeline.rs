//! Operation pipeline
//!
//! Every token operation runs the same stages in the same order:
//!
//! 1. validate request fields (done by the caller with [`crate::validator`])
//! 2. resolve the signing identity (mutations only)
//! 3. resolve the contract
//! 4. check the asserted sender against the signer (where the operation has one)
//! 5. invoke
//! 6. classify the outcome
//!
//! The stages are encoded as types so they cannot be reordered:
//!
//! ```text
//! Pipeline::view       -> BoundView -> call
//! Pipeline::submission -> Signer    -> bind -> Bound -> [expect_sender] -> invoke
//!                                   -> deploy
//! ```

use std::sync::Arc;

use bytes::Bytes;
use ercbridge_chain::abi::Token;
use ercbridge_chain::ChainError;
use ercbridge_primitives::{Address, H256, U256};

use crate::backend::ContractBackend;
use crate::context::RequestContext;
use crate::error::{ServiceError, ServiceResult};
use crate::identity::{build_signing_params, ensure_identity_matches, SigningParams};
use crate::resolver::{AbiKey, ContractHandle, ContractVariant, TokenStandard};
use crate::runtime::ServiceRuntime;
use crate::validator::PrivateKey;

/// Entry point shared by the token services
#[derive(Debug, Clone)]
pub struct Pipeline {
    runtime: Arc<ServiceRuntime>,
}

impl Pipeline {
    /// Pipeline over `runtime`
    pub fn new(runtime: Arc<ServiceRuntime>) -> Self {
        Self { runtime }
    }

    /// Shared runtime
    pub fn runtime(&self) -> &Arc<ServiceRuntime> {
        &self.runtime
    }

    /// Read-only path: resolve the contract at `address`
    pub fn view(
        &self,
        ctx: &RequestContext,
        address: Address,
        standard: TokenStandard,
        variant: ContractVariant,
    ) -> ServiceResult<BoundView<'_>> {
        let backend = self.runtime.backend()?;
        let contract = self.runtime.resolve(address, standard, variant)?;
        Ok(BoundView {
            runtime: &self.runtime,
            backend,
            ctx: *ctx,
            contract,
        })
    }

    /// Mutating path: bind `key` to the chain
    pub fn submission(&self, ctx: &RequestContext, key: &PrivateKey) -> ServiceResult<Signer<'_>> {
        let params = build_signing_params(&self.runtime, ctx, key)?;
        let backend = self.runtime.backend()?;
        Ok(Signer {
            runtime: &self.runtime,
            backend,
            params,
        })
    }
}

fn classify(op: &str, error: ChainError) -> ServiceError {
    ServiceError::internal(format!("failed to {}", op), error)
}

fn unexpected_output(method: &str) -> ChainError {
    ChainError::AbiDecode(format!("unexpected return data from {}", method))
}

// ==================== View Path ====================

/// Contract bound for read-only calls
pub struct BoundView<'a> {
    runtime: &'a ServiceRuntime,
    backend: Arc<dyn ContractBackend>,
    ctx: RequestContext,
    contract: ContractHandle,
}

impl<'a> BoundView<'a> {
    /// Resolved contract
    pub fn contract(&self) -> &ContractHandle {
        &self.contract
    }

    /// Call `method` and decode its outputs
    ///
    /// `op` names the operation in the error message, e.g. `"get balance"`.
    pub async fn call(&self, op: &str, method: &str, args: &[Token]) -> ServiceResult<Vec<Token>> {
        self.try_call(op, method, args).await.inspect_err(|e| {
            tracing::error!(contract = %self.contract.address(), method, args = ?args, error = %e, "contract call failed");
        })
    }

    /// Call `method`, logging and swallowing any failure
    pub async fn call_opportunistic(&self, method: &str, args: &[Token]) -> Option<Vec<Token>> {
        match self.try_call(method, method, args).await {
            Ok(tokens) => Some(tokens),
            Err(e) => {
                tracing::warn!(contract = %self.contract.address(), method, error = %e, "optional contract call failed");
                None
            }
        }
    }

    async fn try_call(&self, op: &str, method: &str, args: &[Token]) -> ServiceResult<Vec<Token>> {
        let data = self.contract.encode(method, args)?;
        let timeout = self.runtime.settings().timeout;

        let output = self
            .ctx
            .run(timeout, self.backend.call(self.contract.address(), data))
            .await?
            .map_err(|e| classify(op, e))?;

        self.contract.decode(method, &output)
    }

    async fn call_single<T>(
        &self,
        op: &str,
        method: &str,
        args: &[Token],
        extract: fn(Token) -> Option<T>,
    ) -> ServiceResult<T> {
        let tokens = self.call(op, method, args).await?;
        tokens
            .into_iter()
            .next()
            .and_then(extract)
            .ok_or_else(|| ServiceError::internal(format!("failed to {}", op), unexpected_output(method)))
    }

    /// Call a method returning one `uint`
    pub async fn call_uint(&self, op: &str, method: &str, args: &[Token]) -> ServiceResult<U256> {
        self.call_single(op, method, args, Token::into_uint).await
    }

    /// Call a method returning one `address`
    pub async fn call_address(&self, op: &str, method: &str, args: &[Token]) -> ServiceResult<Address> {
        self.call_single(op, method, args, Token::into_address).await
    }

    /// Call a method returning one `bool`
    pub async fn call_bool(&self, op: &str, method: &str, args: &[Token]) -> ServiceResult<bool> {
        self.call_single(op, method, args, Token::into_bool).await
    }

    /// Call a method returning one `string`
    pub async fn call_string(&self, op: &str, method: &str, args: &[Token]) -> ServiceResult<String> {
        self.call_single(op, method, args, Token::into_string).await
    }

    /// Call a method returning one `uint256[]`
    pub async fn call_uint_array(&self, op: &str, method: &str, args: &[Token]) -> ServiceResult<Vec<U256>> {
        let tokens = self.call_single(op, method, args, Token::into_array).await?;
        tokens
            .into_iter()
            .map(Token::into_uint)
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| ServiceError::internal(format!("failed to {}", op), unexpected_output(method)))
    }
}

// ==================== Mutating Path ====================

/// Signing identity bound to the chain, not yet to a contract
pub struct Signer<'a> {
    runtime: &'a ServiceRuntime,
    backend: Arc<dyn ContractBackend>,
    params: SigningParams,
}

/// Contract created by [`Signer::deploy`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deployment {
    /// Address the contract will live at
    pub address: Address,
    /// Creation transaction hash
    pub tx_hash: H256,
}

impl<'a> Signer<'a> {
    /// Address that signs
    pub fn sender(&self) -> Address {
        self.params.sender()
    }

    /// Owner constructor argument for a deploy
    ///
    /// `initial_owner` if given, else the admin address with `use_admin`,
    /// else the signer. Giving both is rejected.
    pub fn owner(&self, initial_owner: Option<Address>, use_admin: bool) -> ServiceResult<Address> {
        match (initial_owner, use_admin) {
            (Some(_), true) => Err(ServiceError::invalid_argument(
                "initial_owner cannot be combined with use_admin",
            )),
            (Some(owner), false) => Ok(owner),
            (None, true) => self.runtime.admin_address(),
            (None, false) => Ok(self.params.sender()),
        }
    }

    /// Resolve the contract the transaction goes to
    pub fn bind(
        self,
        address: Address,
        standard: TokenStandard,
        variant: ContractVariant,
    ) -> ServiceResult<Bound<'a>> {
        let contract = self.runtime.resolve(address, standard, variant)?;
        Ok(Bound {
            runtime: self.runtime,
            backend: self.backend,
            params: self.params,
            contract,
        })
    }

    /// Create a contract of kind `key`
    ///
    /// The creation payload is the configured bytecode for `key` followed by
    /// the encoded constructor arguments.
    pub async fn deploy(self, op: &str, key: AbiKey, args: &[Token]) -> ServiceResult<Deployment> {
        let code = self.runtime.creation_code(key)?;
        let abi = self.runtime.resolver().abi(key);
        let payload = abi
            .encode_deploy(&code, args)
            .map_err(|e| ServiceError::internal(format!("failed to encode {} constructor", key), e))?;

        let sender = self.params.sender();
        let timeout = self.runtime.settings().timeout;
        let deploy = self
            .backend
            .deploy(self.params.wallet(), self.params.chain_id(), payload);

        let (address, tx_hash) = self
            .params
            .context()
            .run(timeout, deploy)
            .await?
            .map_err(|e| {
                tracing::error!(kind = %key, deployer = %sender, error = %e, "contract creation failed");
                classify(op, e)
            })?;

        Ok(Deployment { address, tx_hash })
    }
}

/// Signing identity bound to a contract
pub struct Bound<'a> {
    runtime: &'a ServiceRuntime,
    backend: Arc<dyn ContractBackend>,
    params: SigningParams,
    contract: ContractHandle,
}

impl<'a> Bound<'a> {
    /// Address that signs
    pub fn sender(&self) -> Address {
        self.params.sender()
    }

    /// Resolved contract
    pub fn contract(&self) -> &ContractHandle {
        &self.contract
    }

    /// Require that `asserted` (taken from request field `field`) is the signer
    pub fn expect_sender(self, asserted: &Address, field: &str) -> ServiceResult<Self> {
        ensure_identity_matches(&self.params.sender(), asserted, field)?;
        Ok(self)
    }

    /// Sign and send a call to `method`, returning the transaction hash
    pub async fn invoke(self, op: &str, method: &str, args: &[Token]) -> ServiceResult<H256> {
        let address = self.contract.address();
        let data: Bytes = self.contract.encode(method, args)?;
        let timeout = self.runtime.settings().timeout;

        let transact = self
            .backend
            .transact(self.params.wallet(), self.params.chain_id(), address, data);

        let result = self.params.context().run(timeout, transact).await;
        result.and_then(|sent| sent.map_err(|e| classify(op, e))).inspect_err(|e| {
            tracing::error!(
                contract = %address,
                sender = %self.params.sender(),
                method,
                args = ?args,
                error = %e,
                "contract transaction failed"
            );
        })
    }
}
