//! Gauge name resolution.

use quicksnap_context::IncentiveContext;
use quicksnap_types::{GaugeTarget, ProjectTag};
use quicksnap_utils::Result;

/// Name of a gauge no strategy could resolve.
pub const UNKNOWN_GAUGE_NAME: &str = "Unknown";

/// Gauge types whose gauges are named after their staked token.
const NAMED_GAUGE_TYPES: [i128; 3] = [0, 5, 6];

/// One way of naming a gauge. Strategies are tried in [`NameStrategy::ORDER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameStrategy {
    /// `name()` of the gauge's LP token (`staking_token()` for ANGLE).
    ByKnownProjectContractCall,
    /// The verified contract name of the gauge (FRAX only).
    ByVerifiedNameService,
    /// The static gauge name table.
    ByStaticTable,
    /// [`UNKNOWN_GAUGE_NAME`].
    Default,
}

impl NameStrategy {
    /// Resolution order.
    pub const ORDER: [NameStrategy; 4] = [
        Self::ByKnownProjectContractCall,
        Self::ByVerifiedNameService,
        Self::ByStaticTable,
        Self::Default,
    ];

    /// Whether this strategy is tried for a gauge of `project` with `gauge_type`.
    #[must_use]
    pub fn applies_to(&self, project: ProjectTag, gauge_type: i128) -> bool {
        let named_type = NAMED_GAUGE_TYPES.contains(&gauge_type);
        match self {
            Self::ByKnownProjectContractCall => {
                named_type && project != ProjectTag::Frax
            }
            Self::ByVerifiedNameService => {
                named_type && project == ProjectTag::Frax
            }
            Self::ByStaticTable | Self::Default => true,
        }
    }

    async fn resolve(
        &self,
        ctx: &IncentiveContext,
        target: &GaugeTarget,
    ) -> Result<Option<String>> {
        match self {
            Self::ByKnownProjectContractCall => {
                let chain = ctx.chain();
                let token = match target.project {
                    ProjectTag::Angle => {
                        chain.gauge_staking_token(target.gauge).await?
                    }
                    _ => chain.gauge_lp_token(target.gauge).await?,
                };
                Ok(Some(chain.token_name(token).await?))
            }
            Self::ByVerifiedNameService => match ctx.name_service() {
                Some(service) => {
                    Ok(Some(service.contract_name(target.gauge).await?))
                }
                None => {
                    tracing::debug!("no contract name service configured");
                    Ok(None)
                }
            },
            Self::ByStaticTable => {
                Ok(ctx.gauge_names().get(&target.gauge).map(str::to_owned))
            }
            Self::Default => Ok(Some(UNKNOWN_GAUGE_NAME.to_owned())),
        }
    }
}

/// Resolves the display name of a gauge.
///
/// A failing or empty strategy falls through to the next one, the chain
/// always ends with [`UNKNOWN_GAUGE_NAME`].
pub async fn resolve_gauge_name(
    ctx: &IncentiveContext,
    target: &GaugeTarget,
    gauge_type: i128,
) -> String {
    for strategy in NameStrategy::ORDER {
        if !strategy.applies_to(target.project, gauge_type) {
            continue;
        }
        match strategy.resolve(ctx, target).await {
            Ok(Some(name)) if !name.is_empty() => {
                tracing::trace!(
                    gauge = ?target.gauge,
                    ?strategy,
                    %name,
                    "gauge named"
                );
                return name;
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(
                    gauge = ?target.gauge,
                    ?strategy,
                    error = %e,
                    "gauge name lookup failed, falling back",
                );
            }
        }
    }
    UNKNOWN_GAUGE_NAME.to_owned()
}
