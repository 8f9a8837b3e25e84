//! Signing identity resolution

use ercbridge_chain::Wallet;
use ercbridge_crypto::{private_key_from_bytes, public_key_to_address};
use ercbridge_primitives::Address;

use crate::context::RequestContext;
use crate::error::{ServiceError, ServiceResult};
use crate::runtime::ServiceRuntime;
use crate::validator::PrivateKey;

/// Address controlled by `key`
pub fn derive_address(key: &PrivateKey) -> ServiceResult<Address> {
    let signing_key = private_key_from_bytes(key.as_bytes())
        .map_err(|_| ServiceError::invalid_argument("invalid private key"))?;
    Ok(public_key_to_address(signing_key.verifying_key()))
}

/// Everything one submission needs to sign and send
///
/// Not `Clone`: each instance backs exactly one transaction.
pub struct SigningParams {
    wallet: Wallet,
    chain_id: u64,
    context: RequestContext,
}

impl SigningParams {
    /// Sender address derived from the key
    pub fn sender(&self) -> Address {
        *self.wallet.address()
    }

    /// Chain id used for EIP-155 signing
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Request context the submission runs under
    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    pub(crate) fn wallet(&self) -> &Wallet {
        &self.wallet
    }
}

impl std::fmt::Debug for SigningParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningParams")
            .field("sender", self.wallet.address())
            .field("chain_id", &self.chain_id)
            .finish_non_exhaustive()
    }
}

/// Bind `key` to the runtime's chain
///
/// Fails with `ChainNotConfigured` before `ClientNotInitialized`, and only
/// then looks at the key itself.
pub fn build_signing_params(
    runtime: &ServiceRuntime,
    ctx: &RequestContext,
    key: &PrivateKey,
) -> ServiceResult<SigningParams> {
    let chain_id = runtime.chain_id()?;
    runtime.backend()?;

    let wallet = Wallet::from_private_key(key.as_bytes())
        .map_err(|_| ServiceError::invalid_argument("invalid private key"))?;

    Ok(SigningParams {
        wallet,
        chain_id,
        context: *ctx,
    })
}

/// Reject a request whose asserted address is not the signer
pub fn ensure_identity_matches(signer: &Address, asserted: &Address, field: &str) -> ServiceResult<()> {
    if signer != asserted {
        return Err(ServiceError::invalid_argument(format!(
            "private key does not match {}",
            field
        )));
    }
    Ok(())
}
