use std::sync::Arc;

use ercbridge_chain::abi::Token;
use ercbridge_primitives::{Address, U256};

use super::types::*;
use crate::context::RequestContext;
use crate::error::ServiceResult;
use crate::pipeline::{BoundView, Pipeline};
use crate::resolver::{AbiKey, ContractVariant, TokenStandard};
use crate::runtime::ServiceRuntime;
use crate::validator::{
    parse_address, parse_amount, parse_contract_address, parse_private_key, validate_decimals,
    validate_token_name, validate_token_symbol,
};

/// Decimals reported when the token does not answer `decimals()`
pub const DEFAULT_DECIMALS: u32 = 18;

/// Fungible token operations
#[derive(Debug, Clone)]
pub struct Erc20Service {
    pipeline: Pipeline,
}

impl Erc20Service {
    /// Service over `runtime`
    pub fn new(runtime: Arc<ServiceRuntime>) -> Self {
        Self {
            pipeline: Pipeline::new(runtime),
        }
    }

    fn view(&self, ctx: &RequestContext, contract_address: &str, contract_type: &str) -> ServiceResult<BoundView<'_>> {
        let address = parse_contract_address(contract_address)?;
        self.pipeline
            .view(ctx, address, TokenStandard::Fungible, ContractVariant::parse(contract_type))
    }

    // ==================== Views ====================

    /// Balance of `owner_address`, with the token's decimals
    pub async fn get_balance(&self, ctx: &RequestContext, req: GetBalanceRequest) -> ServiceResult<GetBalanceResponse> {
        let contract = parse_contract_address(&req.contract_address)?;
        let owner = parse_address(&req.owner_address, "owner_address")?;

        let view = self
            .pipeline
            .view(ctx, contract, TokenStandard::Fungible, ContractVariant::parse(&req.contract_type))?;
        let balance = view.call_uint("get balance", "balanceOf", &[Token::Address(owner)]).await?;
        let decimals = decimals_or_default(&view).await;

        tracing::info!(contract = %contract, owner = %owner, balance = %balance, "balance queried");

        Ok(GetBalanceResponse {
            balance: balance.to_string(),
            decimals,
            contract_address: contract.to_hex(),
            owner_address: owner.to_hex(),
        })
    }

    /// Name, symbol, decimals and total supply
    pub async fn get_token_info(
        &self,
        ctx: &RequestContext,
        req: GetTokenInfoRequest,
    ) -> ServiceResult<GetTokenInfoResponse> {
        let view = self.view(ctx, &req.contract_address, &req.contract_type)?;

        let name = view.call_string("get token name", "name", &[]).await?;
        let symbol = view.call_string("get token symbol", "symbol", &[]).await?;
        let decimals = view.call_uint("get token decimals", "decimals", &[]).await?;
        let total_supply = view.call_uint("get total supply", "totalSupply", &[]).await?;

        let contract = view.contract().address();
        tracing::info!(contract = %contract, name = %name, symbol = %symbol, "token info queried");

        Ok(GetTokenInfoResponse {
            name,
            symbol,
            decimals: decimals_or_fallback(contract, Some(decimals)),
            total_supply: total_supply.to_string(),
            contract_address: contract.to_hex(),
        })
    }

    /// Allowance granted by `owner_address` to `spender_address`
    pub async fn get_allowance(
        &self,
        ctx: &RequestContext,
        req: GetAllowanceRequest,
    ) -> ServiceResult<GetAllowanceResponse> {
        let contract = parse_contract_address(&req.contract_address)?;
        let owner = parse_address(&req.owner_address, "owner_address")?;
        let spender = parse_address(&req.spender_address, "spender_address")?;

        let allowance = self
            .pipeline
            .view(ctx, contract, TokenStandard::Fungible, ContractVariant::parse(&req.contract_type))?
            .call_uint("get allowance", "allowance", &[Token::Address(owner), Token::Address(spender)])
            .await?;

        tracing::info!(contract = %contract, owner = %owner, spender = %spender, allowance = %allowance, "allowance queried");

        Ok(GetAllowanceResponse {
            allowance: allowance.to_string(),
            contract_address: contract.to_hex(),
            owner_address: owner.to_hex(),
            spender_address: spender.to_hex(),
        })
    }

    /// Owner of an ownable token; `InvalidArgument` on the standard variant
    pub async fn get_owner(&self, ctx: &RequestContext, req: GetOwnerRequest) -> ServiceResult<GetOwnerResponse> {
        let view = self.view(ctx, &req.contract_address, &req.contract_type)?;
        let owner = view.call_address("get owner", "owner", &[]).await?;

        let contract = view.contract().address();
        tracing::info!(contract = %contract, owner = %owner, "owner queried");

        Ok(GetOwnerResponse {
            owner_address: owner.to_hex(),
            contract_address: contract.to_hex(),
        })
    }

    // ==================== Mutations ====================

    /// Send `amount` from the signer to `to_address`
    pub async fn transfer(&self, ctx: &RequestContext, req: TransferRequest) -> ServiceResult<TransferResponse> {
        let contract = parse_contract_address(&req.contract_address)?;
        let to = parse_address(&req.to_address, "to_address")?;
        let amount = parse_amount(&req.amount, "amount")?;
        let key = parse_private_key(req.private_key.expose())?;

        let bound = self.pipeline.submission(ctx, &key)?.bind(
            contract,
            TokenStandard::Fungible,
            ContractVariant::parse(&req.contract_type),
        )?;
        let from = bound.sender();
        let tx_hash = bound
            .invoke("transfer tokens", "transfer", &[Token::Address(to), Token::Uint(amount)])
            .await?;

        tracing::info!(contract = %contract, from = %from, to = %to, amount = %amount, tx = %tx_hash, "transfer initiated");

        Ok(TransferResponse {
            tx_hash: tx_hash.to_hex(),
            contract_address: contract.to_hex(),
            from_address: from.to_hex(),
            to_address: to.to_hex(),
            amount: amount.to_string(),
        })
    }

    /// Move `amount` out of `from_address` on the signer's allowance
    ///
    /// The signer is the spender, so `from_address` is not compared to it.
    pub async fn transfer_from(
        &self,
        ctx: &RequestContext,
        req: TransferFromRequest,
    ) -> ServiceResult<TransferFromResponse> {
        let contract = parse_contract_address(&req.contract_address)?;
        let from = parse_address(&req.from_address, "from_address")?;
        let to = parse_address(&req.to_address, "to_address")?;
        let amount = parse_amount(&req.amount, "amount")?;
        let key = parse_private_key(req.private_key.expose())?;

        let bound = self.pipeline.submission(ctx, &key)?.bind(
            contract,
            TokenStandard::Fungible,
            ContractVariant::parse(&req.contract_type),
        )?;
        let spender = bound.sender();
        let tx_hash = bound
            .invoke(
                "transfer tokens from",
                "transferFrom",
                &[Token::Address(from), Token::Address(to), Token::Uint(amount)],
            )
            .await?;

        tracing::info!(
            contract = %contract,
            from = %from,
            to = %to,
            spender = %spender,
            amount = %amount,
            tx = %tx_hash,
            "transfer from initiated"
        );

        Ok(TransferFromResponse {
            tx_hash: tx_hash.to_hex(),
            contract_address: contract.to_hex(),
            from_address: from.to_hex(),
            to_address: to.to_hex(),
            spender_address: spender.to_hex(),
            amount: amount.to_string(),
        })
    }

    /// Set the allowance of `spender_address` over the signer's balance
    pub async fn approve(&self, ctx: &RequestContext, req: ApproveRequest) -> ServiceResult<ApproveResponse> {
        let contract = parse_contract_address(&req.contract_address)?;
        let spender = parse_address(&req.spender_address, "spender_address")?;
        let amount = parse_amount(&req.amount, "amount")?;
        let key = parse_private_key(req.private_key.expose())?;

        let bound = self.pipeline.submission(ctx, &key)?.bind(
            contract,
            TokenStandard::Fungible,
            ContractVariant::parse(&req.contract_type),
        )?;
        let owner = bound.sender();
        let tx_hash = bound
            .invoke("approve spender", "approve", &[Token::Address(spender), Token::Uint(amount)])
            .await?;

        tracing::info!(contract = %contract, owner = %owner, spender = %spender, amount = %amount, tx = %tx_hash, "approval initiated");

        Ok(ApproveResponse {
            tx_hash: tx_hash.to_hex(),
            contract_address: contract.to_hex(),
            owner_address: owner.to_hex(),
            spender_address: spender.to_hex(),
            amount: amount.to_string(),
        })
    }

    /// Mint `amount` to `to_address`
    pub async fn mint(&self, ctx: &RequestContext, req: MintRequest) -> ServiceResult<MintResponse> {
        let contract = parse_contract_address(&req.contract_address)?;
        let to = parse_address(&req.to_address, "to_address")?;
        let amount = parse_amount(&req.amount, "amount")?;
        let key = parse_private_key(req.private_key.expose())?;

        let tx_hash = self
            .pipeline
            .submission(ctx, &key)?
            .bind(contract, TokenStandard::Fungible, ContractVariant::parse(&req.contract_type))?
            .invoke("mint tokens", "mint", &[Token::Address(to), Token::Uint(amount)])
            .await?;

        tracing::info!(contract = %contract, to = %to, amount = %amount, tx = %tx_hash, "mint initiated");

        Ok(MintResponse {
            tx_hash: tx_hash.to_hex(),
            contract_address: contract.to_hex(),
            to_address: to.to_hex(),
            amount: amount.to_string(),
        })
    }

    /// Burn `amount` of the signer's balance
    pub async fn burn(&self, ctx: &RequestContext, req: BurnRequest) -> ServiceResult<BurnResponse> {
        let contract = parse_contract_address(&req.contract_address)?;
        let amount = parse_amount(&req.amount, "amount")?;
        let key = parse_private_key(req.private_key.expose())?;

        let bound = self.pipeline.submission(ctx, &key)?.bind(
            contract,
            TokenStandard::Fungible,
            ContractVariant::parse(&req.contract_type),
        )?;
        let from = bound.sender();
        let tx_hash = bound.invoke("burn tokens", "burn", &[Token::Uint(amount)]).await?;

        tracing::info!(contract = %contract, from = %from, amount = %amount, tx = %tx_hash, "burn initiated");

        Ok(BurnResponse {
            tx_hash: tx_hash.to_hex(),
            contract_address: contract.to_hex(),
            from_address: from.to_hex(),
            amount: amount.to_string(),
        })
    }

    /// Burn `amount` out of `from_address` on the signer's allowance
    pub async fn burn_from(&self, ctx: &RequestContext, req: BurnFromRequest) -> ServiceResult<BurnFromResponse> {
        let contract = parse_contract_address(&req.contract_address)?;
        let from = parse_address(&req.from_address, "from_address")?;
        let amount = parse_amount(&req.amount, "amount")?;
        let key = parse_private_key(req.private_key.expose())?;

        let tx_hash = self
            .pipeline
            .submission(ctx, &key)?
            .bind(contract, TokenStandard::Fungible, ContractVariant::parse(&req.contract_type))?
            .invoke("burn tokens from", "burnFrom", &[Token::Address(from), Token::Uint(amount)])
            .await?;

        tracing::info!(contract = %contract, from = %from, amount = %amount, tx = %tx_hash, "burn from initiated");

        Ok(BurnFromResponse {
            tx_hash: tx_hash.to_hex(),
            contract_address: contract.to_hex(),
            from_address: from.to_hex(),
            amount: amount.to_string(),
        })
    }

    /// Hand ownership of an ownable token to `new_owner_address`
    pub async fn transfer_ownership(
        &self,
        ctx: &RequestContext,
        req: TransferOwnershipRequest,
    ) -> ServiceResult<TransferOwnershipResponse> {
        let contract = parse_contract_address(&req.contract_address)?;
        let new_owner = parse_address(&req.new_owner_address, "new_owner_address")?;
        let key = parse_private_key(req.private_key.expose())?;

        let bound = self.pipeline.submission(ctx, &key)?.bind(
            contract,
            TokenStandard::Fungible,
            ContractVariant::parse(&req.contract_type),
        )?;
        let previous = bound.sender();
        let tx_hash = bound
            .invoke("transfer ownership", "transferOwnership", &[Token::Address(new_owner)])
            .await?;

        tracing::info!(contract = %contract, from = %previous, to = %new_owner, tx = %tx_hash, "ownership transfer initiated");

        Ok(TransferOwnershipResponse {
            tx_hash: tx_hash.to_hex(),
            contract_address: contract.to_hex(),
            previous_owner_address: previous.to_hex(),
            new_owner_address: new_owner.to_hex(),
        })
    }

    /// Leave an ownable token without an owner
    pub async fn renounce_ownership(
        &self,
        ctx: &RequestContext,
        req: RenounceOwnershipRequest,
    ) -> ServiceResult<RenounceOwnershipResponse> {
        let contract = parse_contract_address(&req.contract_address)?;
        let key = parse_private_key(req.private_key.expose())?;

        let bound = self.pipeline.submission(ctx, &key)?.bind(
            contract,
            TokenStandard::Fungible,
            ContractVariant::parse(&req.contract_type),
        )?;
        let previous = bound.sender();
        let tx_hash = bound.invoke("renounce ownership", "renounceOwnership", &[]).await?;

        tracing::info!(contract = %contract, owner = %previous, tx = %tx_hash, "ownership renounced");

        Ok(RenounceOwnershipResponse {
            tx_hash: tx_hash.to_hex(),
            contract_address: contract.to_hex(),
            previous_owner_address: previous.to_hex(),
        })
    }

    // ==================== Deploy ====================

    /// Create a token; the signer deploys and owns it, unless `use_admin` is
    /// set on the ownable variant
    pub async fn deploy(&self, ctx: &RequestContext, req: DeployRequest) -> ServiceResult<DeployResponse> {
        validate_token_name(&req.name)?;
        validate_token_symbol(&req.symbol)?;
        let decimals = validate_decimals(req.decimals)?;
        let initial_supply = if req.initial_supply.is_empty() {
            U256::zero()
        } else {
            parse_amount(&req.initial_supply, "initial_supply")?
        };
        let key = parse_private_key(req.private_key.expose())?;
        let variant = ContractVariant::parse(&req.contract_type);
        let abi_key = AbiKey::new(TokenStandard::Fungible, variant);

        let signer = self.pipeline.submission(ctx, &key)?;
        let deployer = signer.sender();
        // Only the ownable token takes the admin as owner
        let owner = signer.owner(None, req.use_admin && variant == ContractVariant::Ownable)?;

        let args = [
            Token::String(req.name.clone()),
            Token::String(req.symbol.clone()),
            Token::Uint(U256::from(decimals)),
            Token::Uint(initial_supply),
            Token::Address(owner),
        ];
        let deployment = signer.deploy("deploy ERC20 contract", abi_key, &args).await?;

        tracing::info!(
            kind = %abi_key,
            contract = %deployment.address,
            deployer = %deployer,
            owner = %owner,
            name = %req.name,
            symbol = %req.symbol,
            tx = %deployment.tx_hash,
            "contract deployed"
        );

        Ok(DeployResponse {
            tx_hash: deployment.tx_hash.to_hex(),
            contract_address: deployment.address.to_hex(),
            deployer_address: deployer.to_hex(),
            owner_address: owner.to_hex(),
            name: req.name,
            symbol: req.symbol,
            decimals: u32::from(decimals),
            initial_supply: initial_supply.to_string(),
        })
    }
}

async fn decimals_or_default(view: &BoundView<'_>) -> u32 {
    let decimals = view
        .call_opportunistic("decimals", &[])
        .await
        .and_then(|tokens| tokens.into_iter().next())
        .and_then(Token::into_uint);
    decimals_or_fallback(view.contract().address(), decimals)
}

/// `decimals` if it fits a `uint8`, else [`DEFAULT_DECIMALS`]
fn decimals_or_fallback(contract: Address, decimals: Option<U256>) -> u32 {
    match decimals.filter(|d| *d <= U256::from(u8::MAX)) {
        Some(d) => d.low_u32(),
        None => {
            tracing::warn!(
                contract = %contract,
                default = DEFAULT_DECIMALS,
                "failed to get decimals, using default"
            );
            DEFAULT_DECIMALS
        }
    }
}
