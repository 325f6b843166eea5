//! Proposal incentives, attributed to the choices of a snapshot proposal.

use futures::future::try_join_all;
use quicksnap_config::ProposalRewardSource;
use quicksnap_context::IncentiveContext;
use quicksnap_price_oracle_backends::PriceBackend;
use quicksnap_types::{
    choice_at, IncentiveSubject, NormalizedIncentive, RewardRecord,
};
use quicksnap_utils::{Error, Result};
use serde::Serialize;

use crate::fee::apply_incentive_fee;
use crate::units::to_human_amount;

/// The USD total of one choice.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceTotal {
    /// The choice string.
    pub choice: String,
    /// Sum of the USD value of every incentive of the choice.
    pub usd_amount: f64,
    /// Number of incentives summed.
    pub incentives: usize,
}

async fn choice_incentive(
    ctx: &IncentiveContext,
    choice: &str,
    record: &RewardRecord,
) -> Result<NormalizedIncentive> {
    let (info, quote) = futures::try_join!(
        ctx.token_info(record.token),
        ctx.price_oracle().get_price(record.token)
    )?;
    let human_amount =
        apply_incentive_fee(to_human_amount(record.raw_amount, info.decimals)?);
    Ok(NormalizedIncentive {
        subject: IncentiveSubject::Choice(choice.to_owned()),
        token: record.token,
        symbol: info.symbol,
        human_amount,
        usd_amount: human_amount * quote.usd_price,
    })
}

/// Like [`aggregate_choice_incentives`], but returns the first error.
pub async fn try_aggregate_choice_incentives(
    ctx: &IncentiveContext,
    proposal: &str,
    choices: &[String],
    records: &[RewardRecord],
) -> Result<Vec<NormalizedIncentive>> {
    let mut resolved = Vec::with_capacity(records.len());
    for record in records {
        if record.proposal() != Some(proposal) {
            tracing::debug!(
                proposal,
                target = ?record.target,
                "reward record is bound to another target, ignored"
            );
            continue;
        }
        match choice_at(choices, record.option) {
            Some(choice) => resolved.push((choice, record)),
            None => tracing::warn!(
                proposal,
                option = record.option,
                choices = choices.len(),
                token = ?record.token,
                "reward option does not match any choice, skipped"
            ),
        }
    }
    try_join_all(
        resolved
            .into_iter()
            .map(|(choice, record)| choice_incentive(ctx, choice, record)),
    )
    .await
}

/// One fee-adjusted, USD valued entry per reward record of `proposal`.
///
/// Records are not merged, see [`sum_by_choice`]. Records whose 1-based
/// option has no choice are skipped with a warning. Any failing read drops
/// the whole proposal: the error is logged and nothing is returned.
pub async fn aggregate_choice_incentives(
    ctx: &IncentiveContext,
    proposal: &str,
    choices: &[String],
    records: &[RewardRecord],
) -> Vec<NormalizedIncentive> {
    try_aggregate_choice_incentives(ctx, proposal, choices, records)
        .await
        .unwrap_or_else(|e| {
            tracing::error!(
                proposal,
                error = %e,
                "failed to aggregate choice incentives"
            );
            Vec::new()
        })
}

/// The reward records of a proposal, from the configured source.
pub async fn proposal_reward_records(
    ctx: &IncentiveContext,
    proposal: &str,
) -> Result<Vec<RewardRecord>> {
    match ctx.proposal_reward_source() {
        ProposalRewardSource::Subgraph => {
            ctx.indexer().rewards_by_proposal(proposal).await
        }
        ProposalRewardSource::Contract => {
            let bribe = ctx
                .contracts()
                .snapshot_bribe
                .ok_or(Error::MissingContract("snapshot-bribe"))?;
            ctx.chain().rewards_per_proposal(bribe, proposal).await
        }
    }
}

/// Reads the reward records of a proposal and aggregates them per choice.
#[tracing::instrument(skip(ctx, choices))]
pub async fn incentives_for_proposal(
    ctx: &IncentiveContext,
    proposal: &str,
    choices: &[String],
) -> Vec<NormalizedIncentive> {
    match proposal_reward_records(ctx, proposal).await {
        Ok(records) => {
            aggregate_choice_incentives(ctx, proposal, choices, &records).await
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to read proposal rewards");
            Vec::new()
        }
    }
}

/// Groups choice incentives by choice string, in order of first appearance.
///
/// Gauge incentives are ignored.
#[must_use]
pub fn sum_by_choice(incentives: &[NormalizedIncentive]) -> Vec<ChoiceTotal> {
    let mut totals: Vec<ChoiceTotal> = Vec::new();
    for incentive in incentives {
        let IncentiveSubject::Choice(choice) = &incentive.subject else {
            continue;
        };
        match totals.iter_mut().find(|t| &t.choice == choice) {
            Some(total) => {
                total.usd_amount += incentive.usd_amount;
                total.incentives += 1;
            }
            None => totals.push(ChoiceTotal {
                choice: choice.clone(),
                usd_amount: incentive.usd_amount,
                incentives: 1,
            }),
        }
    }
    totals
}

#[cfg(test)]
mod tests {
    use ethers::types::{Address, U256};
    use quicksnap_config::ContractsConfig;
    use std::sync::Arc;

    use super::*;
    use crate::test_utils::*;

    const PROPOSAL: &str = "0xproposal";

    fn choices() -> Vec<String> {
        vec!["Yes".to_owned(), "No".to_owned()]
    }

    fn usdc() -> Address {
        Address::repeat_byte(0x01)
    }

    fn chain() -> FakeChain {
        FakeChain::default().with_token(usdc(), "USDC", 6)
    }

    #[tokio::test]
    async fn options_are_one_based() {
        let ctx = context(
            chain(),
            FakeIndexer::default(),
            prices(&[(usdc(), 1.0)]),
        );
        let records =
            [proposal_reward(PROPOSAL, 1, usdc(), U256::from(95_000_000))];
        let incentives =
            aggregate_choice_incentives(&ctx, PROPOSAL, &choices(), &records)
                .await;
        assert_eq!(incentives.len(), 1);
        assert_eq!(
            incentives[0].subject,
            IncentiveSubject::Choice("Yes".to_owned())
        );
        assert_eq!(incentives[0].human_amount, 100.0);
        assert_eq!(incentives[0].usd_amount, 100.0);
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn options_without_choice_are_skipped() {
        let ctx = context(
            chain(),
            FakeIndexer::default(),
            prices(&[(usdc(), 1.0)]),
        );
        let records = [
            proposal_reward(PROPOSAL, 0, usdc(), U256::from(1_000_000)),
            proposal_reward(PROPOSAL, 2, usdc(), U256::from(1_000_000)),
            proposal_reward(PROPOSAL, 3, usdc(), U256::from(1_000_000)),
            proposal_reward(
                PROPOSAL,
                RewardRecord::option_index(U256::MAX),
                usdc(),
                U256::from(1_000_000),
            ),
        ];
        let incentives =
            aggregate_choice_incentives(&ctx, PROPOSAL, &choices(), &records)
                .await;
        assert_eq!(incentives.len(), 1);
        assert_eq!(
            incentives[0].subject,
            IncentiveSubject::Choice("No".to_owned())
        );
        assert!(logs_contain(
            "reward option does not match any choice, skipped"
        ));
    }

    #[tokio::test]
    async fn records_of_other_proposals_are_ignored() {
        let ctx = context(
            chain(),
            FakeIndexer::default(),
            prices(&[(usdc(), 1.0)]),
        );
        let records = [
            proposal_reward("0xother", 1, usdc(), U256::from(1_000_000)),
            proposal_reward(PROPOSAL, 1, usdc(), U256::from(1_000_000)),
        ];
        let incentives =
            aggregate_choice_incentives(&ctx, PROPOSAL, &choices(), &records)
                .await;
        assert_eq!(incentives.len(), 1);
    }

    #[tokio::test]
    async fn a_missing_price_drops_the_proposal() {
        let ctx = context(chain(), FakeIndexer::default(), prices(&[]));
        let records =
            [proposal_reward(PROPOSAL, 1, usdc(), U256::from(1_000_000))];
        let incentives =
            aggregate_choice_incentives(&ctx, PROPOSAL, &choices(), &records)
                .await;
        assert!(incentives.is_empty());
    }

    #[tokio::test]
    async fn totals_are_grouped_by_choice_in_order() {
        let ctx = context(
            chain(),
            FakeIndexer::default(),
            prices(&[(usdc(), 2.0)]),
        );
        let records = [
            proposal_reward(PROPOSAL, 2, usdc(), U256::from(19_000_000)),
            proposal_reward(PROPOSAL, 1, usdc(), U256::from(95_000_000)),
            proposal_reward(PROPOSAL, 2, usdc(), U256::from(38_000_000)),
        ];
        let incentives =
            aggregate_choice_incentives(&ctx, PROPOSAL, &choices(), &records)
                .await;
        assert_eq!(incentives.len(), 3);
        let totals = sum_by_choice(&incentives);
        assert_eq!(
            totals,
            vec![
                ChoiceTotal {
                    choice: "No".to_owned(),
                    usd_amount: 40.0 + 80.0,
                    incentives: 2,
                },
                ChoiceTotal {
                    choice: "Yes".to_owned(),
                    usd_amount: 200.0,
                    incentives: 1,
                },
            ]
        );
    }

    #[tokio::test]
    async fn subgraph_is_the_default_source() {
        let indexer = FakeIndexer::default().with_reward(proposal_reward(
            PROPOSAL,
            1,
            usdc(),
            U256::from(1_000_000),
        ));
        let ctx = context(chain(), indexer, prices(&[(usdc(), 1.0)]));
        let incentives =
            incentives_for_proposal(&ctx, PROPOSAL, &choices()).await;
        assert_eq!(incentives.len(), 1);
    }

    fn contract_sourced(contracts: ContractsConfig) -> IncentiveContext {
        let chain = chain().with_proposal_reward(proposal_reward(
            PROPOSAL,
            2,
            usdc(),
            U256::from(1_000_000),
        ));
        IncentiveContext::builder()
            .chain(Arc::new(chain))
            .price_oracle(Arc::new(prices(&[(usdc(), 1.0)])))
            .indexer(Arc::new(FakeIndexer::default().unavailable()))
            .proposal_reward_source(ProposalRewardSource::Contract)
            .contracts(contracts)
            .build()
    }

    #[tokio::test]
    async fn contract_source_reads_the_snapshot_bribe() {
        let ctx = contract_sourced(ContractsConfig {
            snapshot_bribe: Some(Address::repeat_byte(0x5b)),
            ..Default::default()
        });
        let incentives =
            incentives_for_proposal(&ctx, PROPOSAL, &choices()).await;
        assert_eq!(incentives.len(), 1);
        assert_eq!(
            incentives[0].subject,
            IncentiveSubject::Choice("No".to_owned())
        );

        let ctx = contract_sourced(ContractsConfig::default());
        let err = proposal_reward_records(&ctx, PROPOSAL).await.unwrap_err();
        assert!(matches!(err, Error::MissingContract("snapshot-bribe")));
    }
}
