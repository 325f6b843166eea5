//! Merkle distributor rewards of an account.

use ethers::types::Address;
use futures::future::try_join_all;
use quicksnap_context::IncentiveContext;
use quicksnap_price_oracle_backends::PriceBackend;
use quicksnap_types::{ClaimData, ClaimInfo, TokenInfo};
use quicksnap_utils::Result;
use serde::Serialize;

use crate::units::to_human_amount;

/// A reward that can be claimed from the merkle distributor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimableReward {
    /// The reward token.
    pub reward_token: TokenInfo,
    /// Claimable amount in whole tokens.
    pub claimable: f64,
    /// USD price of one token.
    pub reward_token_price: f64,
    /// Token logo.
    pub reward_token_logo: Option<String>,
    /// What to submit to claim it.
    pub claim_data: ClaimData,
}

/// The claimable rewards of an account.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardsListing {
    /// One entry per claim whose token could be read.
    pub rewards: Vec<ClaimableReward>,
    /// Totals over every account.
    pub claim_info: ClaimInfo,
}

async fn claimable(
    ctx: &IncentiveContext,
    claim: ClaimData,
) -> Result<Option<ClaimableReward>> {
    let (info, quote) = futures::join!(
        ctx.token_info(claim.token),
        ctx.price_oracle().get_price(claim.token)
    );
    let info = match info {
        Ok(info) => info,
        Err(e) => {
            tracing::warn!(
                token = ?claim.token,
                error = %e,
                "cannot read reward token, claim skipped"
            );
            return Ok(None);
        }
    };
    let quote = quote?;
    Ok(Some(ClaimableReward {
        claimable: to_human_amount(claim.amount, info.decimals)?,
        reward_token: info,
        reward_token_price: quote.usd_price,
        reward_token_logo: quote.logo_url,
        claim_data: claim,
    }))
}

/// Like [`get_rewards`], but returns the first error.
pub async fn try_get_rewards(
    ctx: &IncentiveContext,
    account: Address,
) -> Result<RewardsListing> {
    let listing = ctx.indexer().claims(account).await?;
    let rewards =
        try_join_all(listing.claims.into_iter().map(|c| claimable(ctx, c)))
            .await?
            .into_iter()
            .flatten()
            .collect();
    Ok(RewardsListing {
        rewards,
        claim_info: listing.claim_info,
    })
}

/// The merkle claims of `account` with their token, price and human amount.
///
/// Claims whose token metadata cannot be read are skipped, any other
/// failure yields an empty listing.
#[tracing::instrument(skip(ctx))]
pub async fn get_rewards(
    ctx: &IncentiveContext,
    account: Address,
) -> RewardsListing {
    try_get_rewards(ctx, account).await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to read rewards");
        RewardsListing::default()
    })
}
