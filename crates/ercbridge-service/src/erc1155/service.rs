use std::sync::Arc;

use ercbridge_chain::abi::Token;
use ercbridge_primitives::{Address, U256};

use super::types::*;
use crate::context::RequestContext;
use crate::error::ServiceResult;
use crate::pipeline::{Bound, BoundView, Pipeline};
use crate::resolver::{AbiKey, ContractVariant, TokenStandard};
use crate::runtime::ServiceRuntime;
use crate::validator::{
    parse_address, parse_amount, parse_call_data, parse_contract_address, parse_optional_address,
    parse_pairs, parse_private_key, parse_token_id, validate_uri, PrivateKey,
};

/// Multi-token operations
#[derive(Debug, Clone)]
pub struct Erc1155Service {
    pipeline: Pipeline,
}

impl Erc1155Service {
    /// Service over `runtime`
    pub fn new(runtime: Arc<ServiceRuntime>) -> Self {
        Self {
            pipeline: Pipeline::new(runtime),
        }
    }

    fn view(&self, ctx: &RequestContext, contract: Address) -> ServiceResult<BoundView<'_>> {
        self.pipeline
            .view(ctx, contract, TokenStandard::MultiToken, ContractVariant::Standard)
    }

    fn bind(&self, ctx: &RequestContext, key: &PrivateKey, contract: Address) -> ServiceResult<Bound<'_>> {
        self.pipeline
            .submission(ctx, key)?
            .bind(contract, TokenStandard::MultiToken, ContractVariant::Standard)
    }

    // ==================== Views ====================

    /// Balance of `account_address` in `token_id`
    pub async fn get_balance(&self, ctx: &RequestContext, req: GetBalanceRequest) -> ServiceResult<GetBalanceResponse> {
        let contract = parse_contract_address(&req.contract_address)?;
        let account = parse_address(&req.account_address, "account_address")?;
        let token_id = parse_token_id(&req.token_id, "token_id")?;

        let balance = self
            .view(ctx, contract)?
            .call_uint("get balance", "balanceOf", &[Token::Address(account), Token::Uint(token_id)])
            .await?;

        tracing::info!(contract = %contract, account = %account, token_id = %token_id, balance = %balance, "balance queried");

        Ok(GetBalanceResponse {
            balance: balance.to_string(),
            contract_address: contract.to_hex(),
            account_address: account.to_hex(),
            token_id: token_id.to_string(),
        })
    }

    /// Pairwise balances of `accounts` and `token_ids`
    pub async fn get_balances_batch(
        &self,
        ctx: &RequestContext,
        req: GetBalancesBatchRequest,
    ) -> ServiceResult<GetBalancesBatchResponse> {
        let contract = parse_contract_address(&req.contract_address)?;
        let (accounts, token_ids) =
            parse_pairs(&req.accounts, "accounts", parse_address, &req.token_ids, "token_ids", parse_token_id)?;

        let args = [
            Token::address_array(accounts.iter().copied()),
            Token::uint_array(token_ids.iter().copied()),
        ];
        let balances = self
            .view(ctx, contract)?
            .call_uint_array("get batch balances", "balanceOfBatch", &args)
            .await?;

        tracing::info!(contract = %contract, num_accounts = accounts.len(), "batch balances queried");

        Ok(GetBalancesBatchResponse {
            balances: decimal_strings(&balances),
            contract_address: contract.to_hex(),
            accounts: accounts.iter().map(Address::to_hex).collect(),
            token_ids: decimal_strings(&token_ids),
        })
    }

    /// Metadata URI of `token_id`
    pub async fn get_token_uri(&self, ctx: &RequestContext, req: GetTokenUriRequest) -> ServiceResult<GetTokenUriResponse> {
        let contract = parse_contract_address(&req.contract_address)?;
        let token_id = parse_token_id(&req.token_id, "token_id")?;

        let uri = self
            .view(ctx, contract)?
            .call_string("get token URI", "uri", &[Token::Uint(token_id)])
            .await?;

        tracing::info!(contract = %contract, token_id = %token_id, "token URI queried");

        Ok(GetTokenUriResponse {
            uri,
            contract_address: contract.to_hex(),
            token_id: token_id.to_string(),
        })
    }

    /// Whether `operator_address` manages every token of `account_address`
    pub async fn is_approved_for_all(
        &self,
        ctx: &RequestContext,
        req: IsApprovedForAllRequest,
    ) -> ServiceResult<IsApprovedForAllResponse> {
        let contract = parse_contract_address(&req.contract_address)?;
        let account = parse_address(&req.account_address, "account_address")?;
        let operator = parse_address(&req.operator_address, "operator_address")?;

        let approved = self
            .view(ctx, contract)?
            .call_bool(
                "check approval for all",
                "isApprovedForAll",
                &[Token::Address(account), Token::Address(operator)],
            )
            .await?;

        tracing::info!(contract = %contract, account = %account, operator = %operator, approved, "operator approval queried");

        Ok(IsApprovedForAllResponse {
            approved,
            contract_address: contract.to_hex(),
            account_address: account.to_hex(),
            operator_address: operator.to_hex(),
        })
    }

    // ==================== Mutations ====================

    /// Move `amount` of `token_id` out of the signer's balance
    pub async fn safe_transfer(
        &self,
        ctx: &RequestContext,
        req: SafeTransferRequest,
    ) -> ServiceResult<SafeTransferResponse> {
        let contract = parse_contract_address(&req.contract_address)?;
        let from = parse_address(&req.from_address, "from_address")?;
        let to = parse_address(&req.to_address, "to_address")?;
        let token_id = parse_token_id(&req.token_id, "token_id")?;
        let amount = parse_amount(&req.amount, "amount")?;
        let data = parse_call_data(&req.data, "data")?;
        let key = parse_private_key(req.private_key.expose())?;

        let args = [
            Token::Address(from),
            Token::Address(to),
            Token::Uint(token_id),
            Token::Uint(amount),
            Token::Bytes(data.to_vec()),
        ];
        let tx_hash = self
            .bind(ctx, &key, contract)?
            .expect_sender(&from, "from_address")?
            .invoke("safe transfer token", "safeTransferFrom", &args)
            .await?;

        tracing::info!(
            contract = %contract,
            from = %from,
            to = %to,
            token_id = %token_id,
            amount = %amount,
            tx = %tx_hash,
            "safe transfer initiated"
        );

        Ok(SafeTransferResponse {
            tx_hash: tx_hash.to_hex(),
            contract_address: contract.to_hex(),
            from_address: from.to_hex(),
            to_address: to.to_hex(),
            token_id: token_id.to_string(),
            amount: amount.to_string(),
        })
    }

    /// Move several token ids out of the signer's balance in one transaction
    pub async fn safe_batch_transfer(
        &self,
        ctx: &RequestContext,
        req: SafeBatchTransferRequest,
    ) -> ServiceResult<SafeBatchTransferResponse> {
        let contract = parse_contract_address(&req.contract_address)?;
        let from = parse_address(&req.from_address, "from_address")?;
        let to = parse_address(&req.to_address, "to_address")?;
        let (token_ids, amounts) =
            parse_pairs(&req.token_ids, "token_ids", parse_token_id, &req.amounts, "amounts", parse_amount)?;
        let data = parse_call_data(&req.data, "data")?;
        let key = parse_private_key(req.private_key.expose())?;

        let args = [
            Token::Address(from),
            Token::Address(to),
            Token::uint_array(token_ids.iter().copied()),
            Token::uint_array(amounts.iter().copied()),
            Token::Bytes(data.to_vec()),
        ];
        let tx_hash = self
            .bind(ctx, &key, contract)?
            .expect_sender(&from, "from_address")?
            .invoke("safe batch transfer tokens", "safeBatchTransferFrom", &args)
            .await?;

        tracing::info!(
            contract = %contract,
            from = %from,
            to = %to,
            num_tokens = token_ids.len(),
            tx = %tx_hash,
            "safe batch transfer initiated"
        );

        Ok(SafeBatchTransferResponse {
            tx_hash: tx_hash.to_hex(),
            contract_address: contract.to_hex(),
            from_address: from.to_hex(),
            to_address: to.to_hex(),
            token_ids: decimal_strings(&token_ids),
            amounts: decimal_strings(&amounts),
        })
    }

    /// Grant or revoke `operator_address` over all of the signer's tokens
    pub async fn set_approval_for_all(
        &self,
        ctx: &RequestContext,
        req: SetApprovalForAllRequest,
    ) -> ServiceResult<SetApprovalForAllResponse> {
        let contract = parse_contract_address(&req.contract_address)?;
        let operator = parse_address(&req.operator_address, "operator_address")?;
        let key = parse_private_key(req.private_key.expose())?;

        let bound = self.bind(ctx, &key, contract)?;
        let account = bound.sender();
        let tx_hash = bound
            .invoke(
                "set approval for all",
                "setApprovalForAll",
                &[Token::Address(operator), Token::Bool(req.approved)],
            )
            .await?;

        tracing::info!(
            contract = %contract,
            account = %account,
            operator = %operator,
            approved = req.approved,
            tx = %tx_hash,
            "operator approval initiated"
        );

        Ok(SetApprovalForAllResponse {
            tx_hash: tx_hash.to_hex(),
            contract_address: contract.to_hex(),
            account_address: account.to_hex(),
            operator_address: operator.to_hex(),
            approved: req.approved,
        })
    }

    /// Mint `amount` of `token_id` to `to_address`
    pub async fn mint(&self, ctx: &RequestContext, req: MintRequest) -> ServiceResult<MintResponse> {
        let contract = parse_contract_address(&req.contract_address)?;
        let to = parse_address(&req.to_address, "to_address")?;
        let token_id = parse_token_id(&req.token_id, "token_id")?;
        let amount = parse_amount(&req.amount, "amount")?;
        let data = parse_call_data(&req.data, "data")?;
        let key = parse_private_key(req.private_key.expose())?;

        let args = [
            Token::Address(to),
            Token::Uint(token_id),
            Token::Uint(amount),
            Token::Bytes(data.to_vec()),
        ];
        let tx_hash = self
            .bind(ctx, &key, contract)?
            .invoke("mint token", "mint", &args)
            .await?;

        tracing::info!(contract = %contract, to = %to, token_id = %token_id, amount = %amount, tx = %tx_hash, "mint initiated");

        Ok(MintResponse {
            tx_hash: tx_hash.to_hex(),
            contract_address: contract.to_hex(),
            to_address: to.to_hex(),
            token_id: token_id.to_string(),
            amount: amount.to_string(),
        })
    }

    /// Mint several token ids to `to_address` in one transaction
    pub async fn mint_batch(&self, ctx: &RequestContext, req: MintBatchRequest) -> ServiceResult<MintBatchResponse> {
        let contract = parse_contract_address(&req.contract_address)?;
        let to = parse_address(&req.to_address, "to_address")?;
        let (token_ids, amounts) =
            parse_pairs(&req.token_ids, "token_ids", parse_token_id, &req.amounts, "amounts", parse_amount)?;
        let data = parse_call_data(&req.data, "data")?;
        let key = parse_private_key(req.private_key.expose())?;

        let args = [
            Token::Address(to),
            Token::uint_array(token_ids.iter().copied()),
            Token::uint_array(amounts.iter().copied()),
            Token::Bytes(data.to_vec()),
        ];
        let tx_hash = self
            .bind(ctx, &key, contract)?
            .invoke("mint batch tokens", "mintBatch", &args)
            .await?;

        tracing::info!(contract = %contract, to = %to, num_tokens = token_ids.len(), tx = %tx_hash, "batch mint initiated");

        Ok(MintBatchResponse {
            tx_hash: tx_hash.to_hex(),
            contract_address: contract.to_hex(),
            to_address: to.to_hex(),
            token_ids: decimal_strings(&token_ids),
            amounts: decimal_strings(&amounts),
        })
    }

    /// Burn `amount` of `token_id` from the signer's balance
    pub async fn burn(&self, ctx: &RequestContext, req: BurnRequest) -> ServiceResult<BurnResponse> {
        let contract = parse_contract_address(&req.contract_address)?;
        let account = parse_address(&req.account_address, "account_address")?;
        let token_id = parse_token_id(&req.token_id, "token_id")?;
        let amount = parse_amount(&req.amount, "amount")?;
        let key = parse_private_key(req.private_key.expose())?;

        let tx_hash = self
            .bind(ctx, &key, contract)?
            .expect_sender(&account, "account_address")?
            .invoke(
                "burn token",
                "burn",
                &[Token::Address(account), Token::Uint(token_id), Token::Uint(amount)],
            )
            .await?;

        tracing::info!(
            contract = %contract,
            account = %account,
            token_id = %token_id,
            amount = %amount,
            tx = %tx_hash,
            "burn initiated"
        );

        Ok(BurnResponse {
            tx_hash: tx_hash.to_hex(),
            contract_address: contract.to_hex(),
            account_address: account.to_hex(),
            token_id: token_id.to_string(),
            amount: amount.to_string(),
        })
    }

    /// Burn several token ids from the signer's balance in one transaction
    pub async fn burn_batch(&self, ctx: &RequestContext, req: BurnBatchRequest) -> ServiceResult<BurnBatchResponse> {
        let contract = parse_contract_address(&req.contract_address)?;
        let account = parse_address(&req.account_address, "account_address")?;
        let (token_ids, amounts) =
            parse_pairs(&req.token_ids, "token_ids", parse_token_id, &req.amounts, "amounts", parse_amount)?;
        let key = parse_private_key(req.private_key.expose())?;

        let args = [
            Token::Address(account),
            Token::uint_array(token_ids.iter().copied()),
            Token::uint_array(amounts.iter().copied()),
        ];
        let tx_hash = self
            .bind(ctx, &key, contract)?
            .expect_sender(&account, "account_address")?
            .invoke("burn batch tokens", "burnBatch", &args)
            .await?;

        tracing::info!(
            contract = %contract,
            account = %account,
            num_tokens = token_ids.len(),
            tx = %tx_hash,
            "batch burn initiated"
        );

        Ok(BurnBatchResponse {
            tx_hash: tx_hash.to_hex(),
            contract_address: contract.to_hex(),
            account_address: account.to_hex(),
            token_ids: decimal_strings(&token_ids),
            amounts: decimal_strings(&amounts),
        })
    }

    // ==================== Deploy ====================

    /// Create a multi-token contract
    pub async fn deploy(&self, ctx: &RequestContext, req: DeployRequest) -> ServiceResult<DeployResponse> {
        validate_uri(&req.uri)?;
        let initial_owner = parse_optional_address(&req.initial_owner, "initial_owner")?;
        let key = parse_private_key(req.private_key.expose())?;

        let signer = self.pipeline.submission(ctx, &key)?;
        let deployer = signer.sender();
        let owner = signer.owner(initial_owner, req.use_admin)?;

        let args = [Token::Address(owner), Token::String(req.uri.clone())];
        let deployment = signer.deploy("deploy ERC1155 contract", AbiKey::ERC1155, &args).await?;

        tracing::info!(
            contract = %deployment.address,
            deployer = %deployer,
            owner = %owner,
            uri = %req.uri,
            tx = %deployment.tx_hash,
            "contract deployed"
        );

        Ok(DeployResponse {
            tx_hash: deployment.tx_hash.to_hex(),
            contract_address: deployment.address.to_hex(),
            deployer_address: deployer.to_hex(),
            owner_address: owner.to_hex(),
            uri: req.uri,
        })
    }
}

fn decimal_strings(values: &[U256]) -> Vec<String> {
    values.iter().map(U256::to_string).collect()
}
