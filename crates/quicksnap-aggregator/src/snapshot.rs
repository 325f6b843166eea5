//! Snapshot incentives whose window is open right now.

use std::collections::HashMap;

use ethers::types::{Address, U256};
use futures::future::try_join_all;
use quicksnap_context::IncentiveContext;
use quicksnap_price_oracle_backends::PriceBackend;
use quicksnap_types::{ProposalSummary, RewardRecord};
use quicksnap_utils::Result;
use serde::Serialize;

use crate::fee::apply_incentive_fee;
use crate::units::to_human_amount;

/// An incentive deposit joined with its proposal and token data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveSnapshotIncentive {
    /// Indexer id of the deposit.
    pub id: Option<String>,
    /// Proposal id.
    pub proposal_id: String,
    /// The proposal, when the hub knows it.
    pub proposal: Option<ProposalSummary>,
    /// 1-based choice index.
    pub option: u32,
    /// The incentivized choice, when it exists.
    pub choice: Option<String>,
    /// Reward token.
    pub token: Address,
    /// Reward token symbol.
    pub symbol: String,
    /// Reward token decimals.
    pub decimals: u8,
    /// Deposited amount, in the token's smallest unit.
    pub raw_amount: U256,
    /// Deposited amount in whole tokens, fee included.
    pub formatted_amount: f64,
    /// USD price of one token.
    pub price: f64,
    /// `formatted_amount * price`.
    pub usd_amount: f64,
    /// Token logo.
    pub logo: Option<String>,
    /// Incentive window start, unix seconds.
    pub start_time: u64,
    /// Incentive window end, unix seconds.
    pub end_time: u64,
}

async fn enrich(
    ctx: &IncentiveContext,
    record: RewardRecord,
    proposal: Option<ProposalSummary>,
) -> Result<ActiveSnapshotIncentive> {
    let (info, quote) = futures::try_join!(
        ctx.token_info(record.token),
        ctx.price_oracle().get_price(record.token)
    )?;
    let formatted_amount =
        apply_incentive_fee(to_human_amount(record.raw_amount, info.decimals)?);
    let proposal_id = record.proposal().unwrap_or_default().to_owned();
    let choice = proposal
        .as_ref()
        .and_then(|p| p.choice(record.option))
        .map(str::to_owned);
    Ok(ActiveSnapshotIncentive {
        id: record.id,
        proposal_id,
        proposal,
        option: record.option,
        choice,
        token: record.token,
        symbol: info.symbol,
        decimals: info.decimals,
        raw_amount: record.raw_amount,
        formatted_amount,
        price: quote.usd_price,
        usd_amount: formatted_amount * quote.usd_price,
        logo: quote.logo_url,
        start_time: record.start_time,
        end_time: record.end_time,
    })
}

/// Like [`active_snapshot_incentives`], but returns the first error.
pub async fn try_active_snapshot_incentives(
    ctx: &IncentiveContext,
    now: u64,
) -> Result<Vec<ActiveSnapshotIncentive>> {
    let records: Vec<_> = ctx
        .indexer()
        .active_rewards(now)
        .await?
        .into_iter()
        .filter(|r| r.is_active_at(now) && r.proposal().is_some())
        .collect();

    let mut proposal_ids: Vec<&str> =
        records.iter().filter_map(RewardRecord::proposal).collect();
    proposal_ids.sort_unstable();
    proposal_ids.dedup();
    let proposals: HashMap<String, ProposalSummary> = try_join_all(
        proposal_ids.iter().map(|id| ctx.indexer().proposal(id)),
    )
    .await?
    .into_iter()
    .flatten()
    .map(|p| (p.id.clone(), p))
    .collect();
    tracing::debug!(
        records = records.len(),
        proposals = proposals.len(),
        "active snapshot incentives"
    );

    try_join_all(records.into_iter().map(|record| {
        let proposal = record
            .proposal()
            .and_then(|id| proposals.get(id))
            .cloned();
        enrich(ctx, record, proposal)
    }))
    .await
}

/// Every snapshot incentive active at `now`, with its proposal, token symbol,
/// price, logo and fee-adjusted amount. Empty when any read fails.
#[tracing::instrument(skip(ctx))]
pub async fn active_snapshot_incentives(
    ctx: &IncentiveContext,
    now: u64,
) -> Vec<ActiveSnapshotIncentive> {
    try_active_snapshot_incentives(ctx, now)
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to read active incentives");
            Vec::new()
        })
}
