use std::sync::Arc;

use bytes::Bytes;
use ercbridge_chain::abi::Token;
use ercbridge_primitives::{Address, U256};

use super::types::*;
use crate::context::RequestContext;
use crate::error::ServiceResult;
use crate::pipeline::{Bound, BoundView, Pipeline};
use crate::resolver::{AbiKey, ContractVariant, TokenStandard};
use crate::runtime::ServiceRuntime;
use crate::validator::{
    parse_address, parse_call_data, parse_contract_address, parse_optional_address, parse_private_key,
    parse_token_id, validate_token_name, validate_token_symbol, PrivateKey,
};

/// Non-fungible token operations
#[derive(Debug, Clone)]
pub struct Erc721Service {
    pipeline: Pipeline,
}

/// Validated transfer fields
struct Transfer {
    contract: Address,
    from: Address,
    to: Address,
    token_id: U256,
    data: Option<Bytes>,
}

impl Transfer {
    fn args(&self) -> Vec<Token> {
        let mut args = vec![
            Token::Address(self.from),
            Token::Address(self.to),
            Token::Uint(self.token_id),
        ];
        if let Some(data) = &self.data {
            args.push(Token::Bytes(data.to_vec()));
        }
        args
    }
}

impl Erc721Service {
    /// Service over `runtime`
    pub fn new(runtime: Arc<ServiceRuntime>) -> Self {
        Self {
            pipeline: Pipeline::new(runtime),
        }
    }

    fn view(&self, ctx: &RequestContext, contract: Address) -> ServiceResult<BoundView<'_>> {
        self.pipeline
            .view(ctx, contract, TokenStandard::NonFungible, ContractVariant::Standard)
    }

    fn bind(&self, ctx: &RequestContext, key: &PrivateKey, contract: Address) -> ServiceResult<Bound<'_>> {
        self.pipeline
            .submission(ctx, key)?
            .bind(contract, TokenStandard::NonFungible, ContractVariant::Standard)
    }

    // ==================== Views ====================

    /// Number of tokens held by `owner_address`
    pub async fn get_balance(&self, ctx: &RequestContext, req: GetBalanceRequest) -> ServiceResult<GetBalanceResponse> {
        let contract = parse_contract_address(&req.contract_address)?;
        let owner = parse_address(&req.owner_address, "owner_address")?;

        let balance = self
            .view(ctx, contract)?
            .call_uint("get balance", "balanceOf", &[Token::Address(owner)])
            .await?;

        tracing::info!(contract = %contract, owner = %owner, balance = %balance, "balance queried");

        Ok(GetBalanceResponse {
            balance: balance.to_string(),
            contract_address: contract.to_hex(),
            owner_address: owner.to_hex(),
        })
    }

    /// Collection name and symbol
    pub async fn get_token_info(
        &self,
        ctx: &RequestContext,
        req: GetTokenInfoRequest,
    ) -> ServiceResult<GetTokenInfoResponse> {
        let contract = parse_contract_address(&req.contract_address)?;

        let view = self.view(ctx, contract)?;
        let name = view.call_string("get token name", "name", &[]).await?;
        let symbol = view.call_string("get token symbol", "symbol", &[]).await?;

        tracing::info!(contract = %contract, name = %name, symbol = %symbol, "token info queried");

        Ok(GetTokenInfoResponse {
            name,
            symbol,
            contract_address: contract.to_hex(),
        })
    }

    /// Metadata URI of one token
    pub async fn get_token_uri(&self, ctx: &RequestContext, req: TokenRequest) -> ServiceResult<GetTokenUriResponse> {
        let contract = parse_contract_address(&req.contract_address)?;
        let token_id = parse_token_id(&req.token_id, "token_id")?;

        let token_uri = self
            .view(ctx, contract)?
            .call_string("get token URI", "tokenURI", &[Token::Uint(token_id)])
            .await?;

        tracing::info!(contract = %contract, token_id = %token_id, "token URI queried");

        Ok(GetTokenUriResponse {
            token_uri,
            contract_address: contract.to_hex(),
            token_id: token_id.to_string(),
        })
    }

    /// Current holder of one token
    pub async fn get_owner_of(&self, ctx: &RequestContext, req: TokenRequest) -> ServiceResult<GetOwnerOfResponse> {
        let contract = parse_contract_address(&req.contract_address)?;
        let token_id = parse_token_id(&req.token_id, "token_id")?;

        let owner = self
            .view(ctx, contract)?
            .call_address("get token owner", "ownerOf", &[Token::Uint(token_id)])
            .await?;

        tracing::info!(contract = %contract, token_id = %token_id, owner = %owner, "token owner queried");

        Ok(GetOwnerOfResponse {
            owner_address: owner.to_hex(),
            contract_address: contract.to_hex(),
            token_id: token_id.to_string(),
        })
    }

    /// Address approved for one token, zero if none
    pub async fn get_approved(&self, ctx: &RequestContext, req: TokenRequest) -> ServiceResult<GetApprovedResponse> {
        let contract = parse_contract_address(&req.contract_address)?;
        let token_id = parse_token_id(&req.token_id, "token_id")?;

        let approved = self
            .view(ctx, contract)?
            .call_address("get approved address", "getApproved", &[Token::Uint(token_id)])
            .await?;

        tracing::info!(contract = %contract, token_id = %token_id, approved = %approved, "approval queried");

        Ok(GetApprovedResponse {
            approved_address: approved.to_hex(),
            contract_address: contract.to_hex(),
            token_id: token_id.to_string(),
        })
    }

    /// Whether `operator_address` manages every token of `owner_address`
    pub async fn is_approved_for_all(
        &self,
        ctx: &RequestContext,
        req: IsApprovedForAllRequest,
    ) -> ServiceResult<IsApprovedForAllResponse> {
        let contract = parse_contract_address(&req.contract_address)?;
        let owner = parse_address(&req.owner_address, "owner_address")?;
        let operator = parse_address(&req.operator_address, "operator_address")?;

        let approved = self
            .view(ctx, contract)?
            .call_bool(
                "check approval for all",
                "isApprovedForAll",
                &[Token::Address(owner), Token::Address(operator)],
            )
            .await?;

        tracing::info!(contract = %contract, owner = %owner, operator = %operator, approved, "operator approval queried");

        Ok(IsApprovedForAllResponse {
            approved,
            contract_address: contract.to_hex(),
            owner_address: owner.to_hex(),
            operator_address: operator.to_hex(),
        })
    }

    // ==================== Mutations ====================

    /// `transferFrom`, without the receiver check
    pub async fn transfer(&self, ctx: &RequestContext, req: TransferRequest) -> ServiceResult<TransferResponse> {
        let (transfer, key) = parse_transfer(&req, false)?;
        self.send_transfer(ctx, &key, transfer, "transfer token", "transferFrom", "transfer initiated")
            .await
    }

    /// `safeTransferFrom` without data
    pub async fn safe_transfer(&self, ctx: &RequestContext, req: TransferRequest) -> ServiceResult<TransferResponse> {
        let (transfer, key) = parse_transfer(&req, false)?;
        self.send_transfer(
            ctx,
            &key,
            transfer,
            "safe transfer token",
            "safeTransferFrom",
            "safe transfer initiated",
        )
        .await
    }

    /// `safeTransferFrom` passing `data` to the receiver
    pub async fn safe_transfer_with_data(
        &self,
        ctx: &RequestContext,
        req: TransferRequest,
    ) -> ServiceResult<TransferResponse> {
        let (transfer, key) = parse_transfer(&req, true)?;
        self.send_transfer(
            ctx,
            &key,
            transfer,
            "safe transfer token with data",
            "safeTransferFromWithData",
            "safe transfer with data initiated",
        )
        .await
    }

    async fn send_transfer(
        &self,
        ctx: &RequestContext,
        key: &PrivateKey,
        transfer: Transfer,
        op: &str,
        method: &str,
        message: &str,
    ) -> ServiceResult<TransferResponse> {
        let tx_hash = self
            .bind(ctx, key, transfer.contract)?
            .expect_sender(&transfer.from, "from_address")?
            .invoke(op, method, &transfer.args())
            .await?;

        tracing::info!(
            contract = %transfer.contract,
            from = %transfer.from,
            to = %transfer.to,
            token_id = %transfer.token_id,
            tx = %tx_hash,
            "{}",
            message
        );

        Ok(TransferResponse {
            tx_hash: tx_hash.to_hex(),
            contract_address: transfer.contract.to_hex(),
            from_address: transfer.from.to_hex(),
            to_address: transfer.to.to_hex(),
            token_id: transfer.token_id.to_string(),
        })
    }

    /// Approve `approved_address` for one of the signer's tokens
    pub async fn approve(&self, ctx: &RequestContext, req: ApproveRequest) -> ServiceResult<ApproveResponse> {
        let contract = parse_contract_address(&req.contract_address)?;
        let approved = parse_address(&req.approved_address, "approved_address")?;
        let token_id = parse_token_id(&req.token_id, "token_id")?;
        let key = parse_private_key(req.private_key.expose())?;

        let bound = self.bind(ctx, &key, contract)?;
        let owner = bound.sender();
        let tx_hash = bound
            .invoke("approve token", "approve", &[Token::Address(approved), Token::Uint(token_id)])
            .await?;

        tracing::info!(contract = %contract, owner = %owner, approved = %approved, token_id = %token_id, tx = %tx_hash, "approval initiated");

        Ok(ApproveResponse {
            tx_hash: tx_hash.to_hex(),
            contract_address: contract.to_hex(),
            owner_address: owner.to_hex(),
            approved_address: approved.to_hex(),
            token_id: token_id.to_string(),
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
        let owner = bound.sender();
        let tx_hash = bound
            .invoke(
                "set approval for all",
                "setApprovalForAll",
                &[Token::Address(operator), Token::Bool(req.approved)],
            )
            .await?;

        tracing::info!(
            contract = %contract,
            owner = %owner,
            operator = %operator,
            approved = req.approved,
            tx = %tx_hash,
            "operator approval initiated"
        );

        Ok(SetApprovalForAllResponse {
            tx_hash: tx_hash.to_hex(),
            contract_address: contract.to_hex(),
            owner_address: owner.to_hex(),
            operator_address: operator.to_hex(),
            approved: req.approved,
        })
    }

    /// Mint `token_id` to `to_address`
    pub async fn safe_mint(&self, ctx: &RequestContext, req: SafeMintRequest) -> ServiceResult<SafeMintResponse> {
        let contract = parse_contract_address(&req.contract_address)?;
        let to = parse_address(&req.to_address, "to_address")?;
        let token_id = parse_token_id(&req.token_id, "token_id")?;
        let key = parse_private_key(req.private_key.expose())?;

        let tx_hash = self
            .bind(ctx, &key, contract)?
            .invoke("mint token", "safeMint", &[Token::Address(to), Token::Uint(token_id)])
            .await?;

        tracing::info!(contract = %contract, to = %to, token_id = %token_id, tx = %tx_hash, "mint initiated");

        Ok(SafeMintResponse {
            tx_hash: tx_hash.to_hex(),
            contract_address: contract.to_hex(),
            to_address: to.to_hex(),
            token_id: token_id.to_string(),
        })
    }

    /// Destroy `token_id`
    pub async fn burn(&self, ctx: &RequestContext, req: BurnRequest) -> ServiceResult<BurnResponse> {
        let contract = parse_contract_address(&req.contract_address)?;
        let token_id = parse_token_id(&req.token_id, "token_id")?;
        let key = parse_private_key(req.private_key.expose())?;

        let bound = self.bind(ctx, &key, contract)?;
        let from = bound.sender();
        let tx_hash = bound.invoke("burn token", "burn", &[Token::Uint(token_id)]).await?;

        tracing::info!(contract = %contract, from = %from, token_id = %token_id, tx = %tx_hash, "burn initiated");

        Ok(BurnResponse {
            tx_hash: tx_hash.to_hex(),
            contract_address: contract.to_hex(),
            from_address: from.to_hex(),
            token_id: token_id.to_string(),
        })
    }

    // ==================== Deploy ====================

    /// Create a collection
    pub async fn deploy(&self, ctx: &RequestContext, req: DeployRequest) -> ServiceResult<DeployResponse> {
        validate_token_name(&req.name)?;
        validate_token_symbol(&req.symbol)?;
        let initial_owner = parse_optional_address(&req.initial_owner, "initial_owner")?;
        let key = parse_private_key(req.private_key.expose())?;

        let signer = self.pipeline.submission(ctx, &key)?;
        let deployer = signer.sender();
        let owner = signer.owner(initial_owner, req.use_admin)?;

        let args = [
            Token::Address(owner),
            Token::String(req.name.clone()),
            Token::String(req.symbol.clone()),
        ];
        let deployment = signer.deploy("deploy ERC721 contract", AbiKey::ERC721, &args).await?;

        tracing::info!(
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
        })
    }
}

fn parse_transfer(req: &TransferRequest, with_data: bool) -> ServiceResult<(Transfer, PrivateKey)> {
    let transfer = Transfer {
        contract: parse_contract_address(&req.contract_address)?,
        from: parse_address(&req.from_address, "from_address")?,
        to: parse_address(&req.to_address, "to_address")?,
        token_id: parse_token_id(&req.token_id, "token_id")?,
        data: with_data.then(|| parse_call_data(&req.data, "data")).transpose()?,
    };
    let key = parse_private_key(req.private_key.expose())?;
    Ok((transfer, key))
}
