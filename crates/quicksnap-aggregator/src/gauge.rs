//! Gauge incentives: USD value of the rewards of a gauge for one period, and
//! the derived dollars per vote.

use ethers::types::Address;
use futures::future::try_join_all;
use futures::StreamExt;
use quicksnap_config::ProjectConfig;
use quicksnap_context::IncentiveContext;
use quicksnap_price_oracle_backends::PriceBackend;
use quicksnap_types::{
    GaugeTarget, IncentiveSubject, NormalizedIncentive, PeriodId, ProjectTag,
};
use quicksnap_utils::Result;
use serde::Serialize;

use crate::fee::apply_incentive_fee;
use crate::names::resolve_gauge_name;
use crate::units::{to_human_amount, GAUGE_WEIGHT_DECIMALS};

/// How many gauges of a project are read at the same time.
const MAX_CONCURRENT_GAUGES: usize = 8;

/// The incentives of one gauge in one period.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GaugeIncentives {
    /// The period the rewards were read for.
    pub period: PeriodId,
    /// Voting weight of the gauge.
    pub gauge_weight: f64,
    /// Sum of the USD value of every reward token, fees included.
    pub total_usd: f64,
    /// `total_usd / gauge_weight`, `0` when the gauge has no weight.
    pub dollars_per_vote: f64,
    /// One entry per reward token, in registration order.
    pub rewards_by_token: Vec<NormalizedIncentive>,
}

/// Everything shown for a gauge.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GaugeInfo {
    /// The project the gauge belongs to.
    pub project: ProjectTag,
    /// The gauge address.
    pub gauge: Address,
    /// Display name, see [`resolve_gauge_name`].
    pub gauge_name: String,
    /// Gauge type code of the controller.
    pub gauge_type: i128,
    /// Incentives of the period.
    #[serde(flatten)]
    pub incentives: GaugeIncentives,
}

/// Reads and values the rewards of one token for a gauge.
async fn token_incentive(
    ctx: &IncentiveContext,
    target: &GaugeTarget,
    period: PeriodId,
    token: Address,
) -> Result<NormalizedIncentive> {
    let (info, raw_amount, quote) = futures::try_join!(
        ctx.token_info(token),
        ctx.chain().reward_per_gauge(
            target.bribe,
            period.into(),
            target.gauge,
            token
        ),
        ctx.price_oracle().get_price(token)
    )?;
    let human_amount =
        apply_incentive_fee(to_human_amount(raw_amount, info.decimals)?);
    let usd_amount = human_amount * quote.usd_price;
    tracing::debug!(
        gauge = ?target.gauge,
        %token,
        symbol = %info.symbol,
        human_amount,
        usd_amount,
        "gauge reward"
    );
    Ok(NormalizedIncentive {
        subject: IncentiveSubject::Gauge(target.gauge),
        token,
        symbol: info.symbol,
        human_amount,
        usd_amount,
    })
}

/// Like [`aggregate_gauge_incentives`], but returns the first error.
pub async fn try_aggregate_gauge_incentives(
    ctx: &IncentiveContext,
    target: &GaugeTarget,
    period: PeriodId,
    reward_tokens: &[Address],
) -> Result<GaugeIncentives> {
    let rewards = try_join_all(
        reward_tokens
            .iter()
            .map(|token| token_incentive(ctx, target, period, *token)),
    );
    let (weight, rewards_by_token) = futures::try_join!(
        ctx.chain().gauge_weight(target.controller, target.gauge),
        rewards
    )?;
    let gauge_weight = to_human_amount(weight, GAUGE_WEIGHT_DECIMALS)?;
    let total_usd = rewards_by_token.iter().map(|r| r.usd_amount).sum();
    let dollars_per_vote = if gauge_weight > 0.0 {
        total_usd / gauge_weight
    } else {
        0.0
    };
    Ok(GaugeIncentives {
        period,
        gauge_weight,
        total_usd,
        dollars_per_vote,
        rewards_by_token,
    })
}

/// Values every reward token of a gauge for `period`.
///
/// All tokens are read concurrently. If any read fails (token metadata,
/// ledger amount, price or gauge weight) the whole gauge is dropped: the
/// error is logged and `None` is returned, partial sums are never reported.
pub async fn aggregate_gauge_incentives(
    ctx: &IncentiveContext,
    target: &GaugeTarget,
    period: PeriodId,
    reward_tokens: &[Address],
) -> Option<GaugeIncentives> {
    try_aggregate_gauge_incentives(ctx, target, period, reward_tokens)
        .await
        .map_err(|e| {
            tracing::error!(
                gauge = ?target.gauge,
                %period,
                error = %e,
                "failed to aggregate gauge incentives"
            );
        })
        .ok()
}

/// Like [`get_gauge_info`], but returns the first error.
pub async fn try_get_gauge_info(
    ctx: &IncentiveContext,
    target: &GaugeTarget,
    period: PeriodId,
) -> Result<GaugeInfo> {
    let chain = ctx.chain();
    let (gauge_type, reward_tokens) = futures::try_join!(
        chain.gauge_type(target.controller, target.gauge),
        chain.rewards_per_gauge(target.bribe, target.gauge)
    )?;
    let incentives =
        try_aggregate_gauge_incentives(ctx, target, period, &reward_tokens)
            .await?;
    let gauge_name = resolve_gauge_name(ctx, target, gauge_type).await;
    Ok(GaugeInfo {
        project: target.project,
        gauge: target.gauge,
        gauge_name,
        gauge_type,
        incentives,
    })
}

/// Type, incentives and name of a gauge for `period`, `None` on any read failure.
#[tracing::instrument(
    skip_all,
    fields(gauge = ?target.gauge, project = %target.project)
)]
pub async fn get_gauge_info(
    ctx: &IncentiveContext,
    target: &GaugeTarget,
    period: PeriodId,
) -> Option<GaugeInfo> {
    try_get_gauge_info(ctx, target, period)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "failed to read gauge info");
        })
        .ok()
}

/// The gauges of a project: the configured list, or every gauge of the controller.
pub async fn list_gauges(
    ctx: &IncentiveContext,
    project: &ProjectConfig,
) -> Result<Vec<Address>> {
    if !project.gauges.is_empty() {
        return Ok(project.gauges.clone());
    }
    let chain = ctx.chain();
    let count = chain.gauge_count(project.gauge_controller).await?;
    tracing::debug!(project = %project.tag, count, "enumerating gauges");
    try_join_all(
        (0..count).map(|i| chain.gauge_at(project.gauge_controller, i)),
    )
    .await
}

/// [`GaugeInfo`] of every gauge of a project, all read for the same `period`.
///
/// Gauges that fail are left out; failing to list the gauges yields nothing.
#[tracing::instrument(skip_all, fields(project = %project.tag, %period))]
pub async fn project_gauges(
    ctx: &IncentiveContext,
    project: &ProjectConfig,
    period: PeriodId,
) -> Vec<GaugeInfo> {
    let gauges = match list_gauges(ctx, project).await {
        Ok(gauges) => gauges,
        Err(e) => {
            tracing::error!(error = %e, "failed to list gauges");
            return Vec::new();
        }
    };
    let targets: Vec<_> = gauges
        .into_iter()
        .map(|gauge| GaugeTarget {
            project: project.tag,
            bribe: project.bribe,
            controller: project.gauge_controller,
            gauge,
        })
        .collect();
    futures::stream::iter(targets.iter())
        .map(|target| get_gauge_info(ctx, target, period))
        .buffered(MAX_CONCURRENT_GAUGES)
        .filter_map(futures::future::ready)
        .collect()
        .await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ethers::types::U256;
    use quicksnap_types::ProjectTag;

    use super::*;
    use crate::test_utils::*;

    const PERIOD: PeriodId = PeriodId::containing(1_699_488_000);

    fn target(gauge: Address) -> GaugeTarget {
        GaugeTarget {
            project: ProjectTag::Curve,
            bribe: Address::repeat_byte(0xb1),
            controller: Address::repeat_byte(0xc0),
            gauge,
        }
    }

    fn votes(n: u64) -> U256 {
        U256::exp10(18) * n
    }

    #[tokio::test]
    async fn rewards_are_grossed_up_and_priced() {
        let gauge = Address::repeat_byte(0x9a);
        let usdc = Address::repeat_byte(0x01);
        let chain = FakeChain::default()
            .with_token(usdc, "USDC", 6)
            .with_gauge(gauge, 0, votes(2))
            .with_reward(gauge, usdc, U256::from(1_000_000));
        let ctx = context(
            chain,
            FakeIndexer::default(),
            prices(&[(usdc, 2.0)]),
        );

        let incentives =
            aggregate_gauge_incentives(&ctx, &target(gauge), PERIOD, &[usdc])
                .await
                .unwrap();
        assert_eq!(incentives.period, PERIOD);
        assert_eq!(incentives.gauge_weight, 2.0);
        assert_eq!(incentives.rewards_by_token.len(), 1);
        let reward = &incentives.rewards_by_token[0];
        assert_eq!(reward.symbol, "USDC");
        assert_eq!(reward.human_amount, 1.1);
        assert_eq!(reward.usd_amount, 2.2);
        assert_eq!(reward.subject, IncentiveSubject::Gauge(gauge));
        assert_eq!(incentives.total_usd, 2.2);
        assert_eq!(incentives.dollars_per_vote, 1.1);
    }

    #[tokio::test]
    async fn gauge_without_weight_pays_nothing_per_vote() {
        let gauge = Address::repeat_byte(0x9a);
        let usdc = Address::repeat_byte(0x01);
        let chain = FakeChain::default()
            .with_token(usdc, "USDC", 6)
            .with_gauge(gauge, 0, U256::zero())
            .with_reward(gauge, usdc, U256::from(95_000_000));
        let ctx = context(
            chain,
            FakeIndexer::default(),
            prices(&[(usdc, 1.0)]),
        );

        let incentives =
            aggregate_gauge_incentives(&ctx, &target(gauge), PERIOD, &[usdc])
                .await
                .unwrap();
        assert_eq!(incentives.total_usd, 100.0);
        assert_eq!(incentives.dollars_per_vote, 0.0);
    }

    #[tokio::test]
    async fn one_missing_price_drops_the_gauge() {
        let gauge = Address::repeat_byte(0x9a);
        let tokens = [
            Address::repeat_byte(0x01),
            Address::repeat_byte(0x02),
            Address::repeat_byte(0x03),
        ];
        let chain = tokens.iter().fold(
            FakeChain::default().with_gauge(gauge, 0, votes(1)),
            |chain, token| {
                chain
                    .with_token(*token, "TKN", 18)
                    .with_reward(gauge, *token, votes(1))
            },
        );
        let ctx = context(
            chain,
            FakeIndexer::default(),
            prices(&[(tokens[0], 1.0), (tokens[2], 3.0)]),
        );

        let incentives =
            aggregate_gauge_incentives(&ctx, &target(gauge), PERIOD, &tokens)
                .await;
        assert!(incentives.is_none());
        let err = try_aggregate_gauge_incentives(
            &ctx,
            &target(gauge),
            PERIOD,
            &tokens,
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            quicksnap_utils::Error::FetchTokenPriceError { .. }
        ));
    }

    #[tokio::test]
    async fn every_token_is_read_for_the_same_period() {
        let gauge = Address::repeat_byte(0x9a);
        let (crv, cvx) =
            (Address::repeat_byte(0x01), Address::repeat_byte(0x02));
        let chain = Arc::new(
            FakeChain::default()
                .with_token(crv, "CRV", 18)
                .with_token(cvx, "CVX", 18)
                .with_gauge(gauge, 3, votes(10))
                .with_reward(gauge, crv, votes(19))
                .with_reward(gauge, cvx, votes(38)),
        );
        let ctx = shared_context(
            chain.clone(),
            Arc::new(FakeIndexer::default()),
            prices(&[(crv, 0.5), (cvx, 2.0)]),
        );

        let info = get_gauge_info(&ctx, &target(gauge), PERIOD).await.unwrap();
        assert_eq!(info.gauge_type, 3);
        assert_eq!(info.gauge_name, crate::names::UNKNOWN_GAUGE_NAME);
        assert_eq!(info.incentives.total_usd, 10.0 + 80.0);
        assert_eq!(info.incentives.dollars_per_vote, 9.0);
        let periods = chain.periods();
        assert_eq!(periods.len(), 2);
        assert!(periods.iter().all(|p| *p == U256::from(PERIOD)));
    }

    #[tokio::test]
    async fn failing_gauges_are_left_out_of_the_project() {
        let (good, bad) =
            (Address::repeat_byte(0x9a), Address::repeat_byte(0x9b));
        let (crv, unpriced) =
            (Address::repeat_byte(0x01), Address::repeat_byte(0x02));
        let chain = FakeChain::default()
            .with_token(crv, "CRV", 18)
            .with_token(unpriced, "NOPE", 18)
            .with_gauge(good, 1, votes(1))
            .with_gauge(bad, 1, votes(1))
            .with_reward(good, crv, votes(1))
            .with_reward(bad, unpriced, votes(1));
        let ctx = context(chain, FakeIndexer::default(), prices(&[(crv, 1.0)]));
        let project = ProjectConfig {
            tag: ProjectTag::Curve,
            enabled: true,
            bribe: Address::repeat_byte(0xb1),
            gauge_controller: Address::repeat_byte(0xc0),
            gauges: Vec::new(),
        };

        let gauges = project_gauges(&ctx, &project, PERIOD).await;
        assert_eq!(gauges.len(), 1);
        assert_eq!(gauges[0].gauge, good);
        assert_eq!(gauges[0].project, ProjectTag::Curve);
    }

    #[tokio::test]
    async fn configured_gauges_are_not_enumerated() {
        let listed = Address::repeat_byte(0x42);
        let ctx = context(
            FakeChain::default().with_gauge(
                Address::repeat_byte(0x9a),
                0,
                votes(1),
            ),
            FakeIndexer::default(),
            prices(&[]),
        );
        let project = ProjectConfig {
            tag: ProjectTag::Angle,
            enabled: true,
            bribe: Address::repeat_byte(0xb1),
            gauge_controller: Address::repeat_byte(0xc0),
            gauges: vec![listed],
        };
        assert_eq!(list_gauges(&ctx, &project).await.unwrap(), vec![listed]);
    }
}
