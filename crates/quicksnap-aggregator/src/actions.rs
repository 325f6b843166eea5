//! State-changing flows. Nothing on the read side calls into this module.

use ethers::types::{Address, TxHash};
use quicksnap_context::IncentiveContext;
use quicksnap_contracts::max_allowance;
use quicksnap_indexer::NewSnapshotIncentive;
use quicksnap_types::{ClaimData, GaugeTarget};
use quicksnap_utils::{Error, Result};

use crate::units::{to_human_amount, to_raw_amount};

/// An incentive for one choice of a snapshot proposal.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotIncentiveRequest {
    /// Snapshot space of the proposal. When set, the deposit is also
    /// recorded in the backend.
    pub space: Option<String>,
    /// Proposal id.
    pub proposal: String,
    /// 1-based choice index.
    pub option: u32,
    /// Reward token.
    pub token: Address,
    /// Amount in whole tokens.
    pub amount: f64,
    /// Incentive window start, unix seconds.
    pub start: u64,
    /// Incentive window end, unix seconds.
    pub end: u64,
}

/// Grants `spender` an unlimited allowance of `token`.
///
/// Returns whether the approval was mined, failures are logged.
pub async fn approve_token(
    ctx: &IncentiveContext,
    token: Address,
    spender: Address,
) -> bool {
    let approve = async {
        ctx.submitter()?
            .approve(token, spender, max_allowance())
            .await
    };
    match approve.await {
        Ok(tx_hash) => {
            tracing::info!(%token, %spender, ?tx_hash, "token approved");
            true
        }
        Err(e) => {
            tracing::error!(%token, %spender, error = %e, "approval failed");
            false
        }
    }
}

/// The allowance of the signer to `spender`, in whole tokens.
pub async fn allowance(
    ctx: &IncentiveContext,
    token: Address,
    spender: Address,
) -> Result<f64> {
    let owner = ctx.submitter()?.sender();
    let (raw, info) = futures::try_join!(
        ctx.chain().allowance(token, owner, spender),
        ctx.token_info(token)
    )?;
    to_human_amount(raw, info.decimals)
}

/// The balance of the signer, in whole tokens.
pub async fn token_balance(
    ctx: &IncentiveContext,
    token: Address,
) -> Result<f64> {
    let owner = ctx.submitter()?.sender();
    let (raw, info) = futures::try_join!(
        ctx.chain().balance_of(token, owner),
        ctx.token_info(token)
    )?;
    to_human_amount(raw, info.decimals)
}

/// Whether `token` answers `totalSupply()`.
pub async fn is_erc20(ctx: &IncentiveContext, token: Address) -> bool {
    match ctx.chain().total_supply(token).await {
        Ok(_) => true,
        Err(e) => {
            tracing::debug!(%token, error = %e, "not an erc20 token");
            false
        }
    }
}

/// Deposits `amount` whole tokens as a gauge incentive.
#[tracing::instrument(skip(ctx), fields(gauge = ?target.gauge))]
pub async fn add_reward_amount(
    ctx: &IncentiveContext,
    target: &GaugeTarget,
    token: Address,
    amount: f64,
) -> Result<TxHash> {
    let submitter = ctx.submitter()?;
    let info = ctx.token_info(token).await?;
    let raw = to_raw_amount(amount, info.decimals)?;
    let tx_hash = submitter
        .add_gauge_reward(target.bribe, target.gauge, token, raw)
        .await?;
    tracing::info!(?tx_hash, %raw, "gauge incentive added");
    Ok(tx_hash)
}

/// Deposits an incentive for a snapshot proposal choice, waits for it to
/// be mined, then records it in the backend when a space is given.
///
/// A failing backend record is logged, the deposit is on chain anyway.
#[tracing::instrument(
    skip_all,
    fields(proposal = %request.proposal, option = request.option)
)]
pub async fn add_snapshot_reward_amount(
    ctx: &IncentiveContext,
    request: &SnapshotIncentiveRequest,
) -> Result<TxHash> {
    if request.option == 0 {
        return Err(Error::InvalidAmount(String::from(
            "options are 1-based, got 0",
        )));
    }
    let submitter = ctx.submitter()?;
    let quicksnap = ctx.quicksnap()?;
    let info = ctx.token_info(request.token).await?;
    let raw = to_raw_amount(request.amount, info.decimals)?;
    let tx_hash = submitter
        .add_proposal_reward(
            quicksnap,
            &request.proposal,
            request.option,
            request.token,
            raw,
            request.start,
            request.end,
        )
        .await?;
    tracing::info!(?tx_hash, %raw, "snapshot incentive added");

    if let Some(space) = &request.space {
        let record = NewSnapshotIncentive {
            tx: tx_hash,
            space: space.clone(),
            proposal: request.proposal.clone(),
            option: request.option,
            token: request.token,
            amount: request.amount,
            start: request.start,
            end: request.end,
        };
        match ctx.indexer().record_snapshot_incentive(&record).await {
            Ok(true) => tracing::debug!("snapshot incentive recorded"),
            Ok(false) => {
                tracing::warn!("backend refused the snapshot incentive record")
            }
            Err(e) => tracing::error!(
                error = %e,
                "failed to record the snapshot incentive"
            ),
        }
    }
    Ok(tx_hash)
}

/// Claims one reward for the signer.
pub async fn claim_reward(
    ctx: &IncentiveContext,
    claim: &ClaimData,
) -> Result<TxHash> {
    let submitter = ctx.submitter()?;
    let distributor = ctx.merkle_distributor()?;
    submitter
        .claim(distributor, submitter.sender(), claim)
        .await
}

/// Claims every given reward for the signer in one transaction.
pub async fn claim_all_rewards(
    ctx: &IncentiveContext,
    claims: &[ClaimData],
) -> Result<TxHash> {
    if claims.is_empty() {
        return Err(Error::Generic("no rewards to claim"));
    }
    let submitter = ctx.submitter()?;
    let distributor = ctx.merkle_distributor()?;
    submitter
        .claim_multi(distributor, submitter.sender(), claims)
        .await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ethers::types::{H256, U256};
    use quicksnap_config::ContractsConfig;
    use quicksnap_types::ProjectTag;

    use super::*;
    use crate::test_utils::*;

    fn sender() -> Address {
        Address::repeat_byte(0xee)
    }

    fn usdc() -> Address {
        Address::repeat_byte(0x01)
    }

    fn contracts() -> ContractsConfig {
        ContractsConfig {
            merkle_distributor: Some(Address::repeat_byte(0xd1)),
            quicksnap: Some(Address::repeat_byte(0x05)),
            snapshot_bribe: None,
        }
    }

    fn signing_context(
        chain: FakeChain,
        indexer: Arc<FakeIndexer>,
        submitter: Arc<FakeSubmitter>,
    ) -> IncentiveContext {
        IncentiveContext::builder()
            .chain(Arc::new(chain.with_token(usdc(), "USDC", 6)))
            .price_oracle(Arc::new(prices(&[])))
            .indexer(indexer)
            .submitter(submitter)
            .contracts(contracts())
            .build()
    }

    fn claim(index: u64) -> ClaimData {
        ClaimData {
            token: usdc(),
            index: U256::from(index),
            amount: U256::from(1_000_000),
            merkle_proof: vec![H256::zero()],
        }
    }

    #[tokio::test]
    async fn read_only_context_cannot_sign() {
        let ctx = context(
            FakeChain::default(),
            FakeIndexer::default(),
            prices(&[]),
        );
        assert!(!approve_token(&ctx, usdc(), sender()).await);
        let err = token_balance(&ctx, usdc()).await.unwrap_err();
        assert!(matches!(err, Error::MissingSecrets));
    }

    #[tokio::test]
    async fn approvals_are_unlimited() {
        let submitter = Arc::new(FakeSubmitter::new(sender()));
        let ctx = signing_context(
            FakeChain::default(),
            Arc::default(),
            submitter.clone(),
        );
        let spender = Address::repeat_byte(0x5e);
        assert!(approve_token(&ctx, usdc(), spender).await);
        assert_eq!(
            submitter.submitted(),
            vec![Submitted::Approve {
                token: usdc(),
                spender,
                amount: max_allowance(),
            }]
        );
    }

    #[tokio::test]
    async fn balances_are_read_for_the_signer() {
        let spender = Address::repeat_byte(0x5e);
        let chain = FakeChain::default()
            .with_balance(usdc(), sender(), U256::from(2_500_000))
            .with_allowance(usdc(), sender(), spender, U256::from(500_000))
            .with_supply(usdc(), U256::from(1_000_000_000));
        let ctx = signing_context(
            chain,
            Arc::default(),
            Arc::new(FakeSubmitter::new(sender())),
        );
        assert_eq!(token_balance(&ctx, usdc()).await.unwrap(), 2.5);
        assert_eq!(allowance(&ctx, usdc(), spender).await.unwrap(), 0.5);
        assert!(is_erc20(&ctx, usdc()).await);
        assert!(!is_erc20(&ctx, Address::repeat_byte(0x77)).await);
    }

    #[tokio::test]
    async fn gauge_rewards_are_sent_in_raw_units() {
        let submitter = Arc::new(FakeSubmitter::new(sender()));
        let ctx = signing_context(
            FakeChain::default(),
            Arc::default(),
            submitter.clone(),
        );
        let target = GaugeTarget {
            project: ProjectTag::Curve,
            bribe: Address::repeat_byte(0xb1),
            controller: Address::repeat_byte(0xc0),
            gauge: Address::repeat_byte(0x9a),
        };
        let tx_hash = add_reward_amount(&ctx, &target, usdc(), 12.5)
            .await
            .unwrap();
        assert_eq!(tx_hash, TxHash::repeat_byte(1));
        assert_eq!(
            submitter.submitted(),
            vec![Submitted::GaugeReward {
                bribe: target.bribe,
                gauge: target.gauge,
                token: usdc(),
                amount: U256::from(12_500_000),
            }]
        );
    }

    #[tokio::test]
    async fn snapshot_rewards_are_recorded_after_mining() {
        let submitter = Arc::new(FakeSubmitter::new(sender()));
        let indexer = Arc::new(FakeIndexer::default());
        let ctx = signing_context(
            FakeChain::default(),
            indexer.clone(),
            submitter.clone(),
        );
        let request = SnapshotIncentiveRequest {
            space: Some("curve.eth".to_owned()),
            proposal: "0xproposal".to_owned(),
            option: 2,
            token: usdc(),
            amount: 100.0,
            start: 10,
            end: 20,
        };
        let tx_hash = add_snapshot_reward_amount(&ctx, &request).await.unwrap();

        assert_eq!(
            submitter.submitted(),
            vec![Submitted::ProposalReward {
                quicksnap: Address::repeat_byte(0x05),
                proposal: "0xproposal".to_owned(),
                option: 2,
                token: usdc(),
                amount: U256::from(100_000_000),
                start: 10,
                end: 20,
            }]
        );
        let recorded = indexer.recorded();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].tx, tx_hash);
        assert_eq!(recorded[0].space, "curve.eth");
        assert_eq!(recorded[0].amount, 100.0);
    }

    #[tokio::test]
    async fn failing_record_keeps_the_deposit() {
        let ctx = signing_context(
            FakeChain::default(),
            Arc::new(FakeIndexer::default().unavailable()),
            Arc::new(FakeSubmitter::new(sender())),
        );
        let request = SnapshotIncentiveRequest {
            space: Some("curve.eth".to_owned()),
            proposal: "0xproposal".to_owned(),
            option: 1,
            token: usdc(),
            amount: 1.0,
            start: 10,
            end: 20,
        };
        assert!(add_snapshot_reward_amount(&ctx, &request).await.is_ok());

        let zero = SnapshotIncentiveRequest { option: 0, ..request };
        assert!(add_snapshot_reward_amount(&ctx, &zero).await.is_err());
    }

    #[tokio::test]
    async fn claims_go_to_the_distributor_for_the_signer() {
        let submitter = Arc::new(FakeSubmitter::new(sender()));
        let ctx = signing_context(
            FakeChain::default(),
            Arc::default(),
            submitter.clone(),
        );
        let distributor = Address::repeat_byte(0xd1);

        claim_reward(&ctx, &claim(4)).await.unwrap();
        claim_all_rewards(&ctx, &[claim(1), claim(2)]).await.unwrap();
        assert!(claim_all_rewards(&ctx, &[]).await.is_err());

        assert_eq!(
            submitter.submitted(),
            vec![
                Submitted::Claim {
                    distributor,
                    account: sender(),
                    index: U256::from(4),
                },
                Submitted::ClaimMulti {
                    distributor,
                    account: sender(),
                    claims: 2,
                },
            ]
        );
    }
}
