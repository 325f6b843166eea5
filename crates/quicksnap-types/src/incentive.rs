use ethers::types::{Address, U256};
use serde::{Deserialize, Serialize};

/// Length of one incentive period (one week), in seconds.
pub const WEEK_SECONDS: u64 = 7 * 86_400;

/// The start-of-week timestamp of an incentive period.
///
/// Always a multiple of [`WEEK_SECONDS`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
)]
#[serde(transparent)]
pub struct PeriodId(u64);

impl PeriodId {
    /// The period containing the unix timestamp `now` (seconds).
    #[must_use]
    pub const fn containing(now: u64) -> Self {
        Self((now / WEEK_SECONDS) * WEEK_SECONDS)
    }

    /// The first second of the period.
    #[must_use]
    pub const fn start(&self) -> u64 {
        self.0
    }

    /// The first second of the following period.
    #[must_use]
    pub const fn end(&self) -> u64 {
        self.0 + WEEK_SECONDS
    }
}

impl From<PeriodId> for U256 {
    fn from(period: PeriodId) -> Self {
        U256::from(period.0)
    }
}

impl std::fmt::Display for PeriodId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The DAO integrations with a gauge controller we know how to read.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProjectTag {
    /// Curve style gauges, exposing `lp_token()`.
    #[default]
    Curve,
    /// Frax gauges, named through the verified contract name.
    Frax,
    /// Angle gauges, exposing `staking_token()`.
    Angle,
}

impl std::fmt::Display for ProjectTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Curve => write!(f, "CURVE"),
            Self::Frax => write!(f, "FRAX"),
            Self::Angle => write!(f, "ANGLE"),
        }
    }
}

/// Everything needed to address one gauge on chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GaugeTarget {
    /// The project this gauge belongs to.
    pub project: ProjectTag,
    /// The bribe ledger holding rewards for the project's gauges.
    pub bribe: Address,
    /// The gauge controller holding types and weights.
    pub controller: Address,
    /// The gauge itself.
    pub gauge: Address,
}

/// What a reward record incentivizes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RewardTarget {
    /// A snapshot proposal, by id.
    Proposal(String),
    /// A gauge, by address.
    Gauge(Address),
}

/// One incentive deposit, as read from the bribe ledger or the indexer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardRecord {
    /// Indexer id of the deposit, if it came from an indexer.
    pub id: Option<String>,
    /// The proposal or gauge the deposit targets.
    pub target: RewardTarget,
    /// The reward token.
    pub token: Address,
    /// The deposited amount, in the token's smallest unit.
    pub raw_amount: U256,
    /// 1-based choice index; meaningless for gauge rewards.
    pub option: u32,
    /// Unix timestamp the incentive starts at.
    pub start_time: u64,
    /// Unix timestamp the incentive ends at.
    pub end_time: u64,
}

impl RewardRecord {
    /// Narrows an on-chain option index, saturating at `u32::MAX` so an
    /// out-of-range option stays out of range instead of wrapping.
    #[must_use]
    pub fn option_index(option: U256) -> u32 {
        if option > U256::from(u32::MAX) {
            u32::MAX
        } else {
            option.as_u32()
        }
    }

    /// The proposal id if this record targets a proposal.
    #[must_use]
    pub fn proposal(&self) -> Option<&str> {
        match &self.target {
            RewardTarget::Proposal(id) => Some(id),
            RewardTarget::Gauge(_) => None,
        }
    }

    /// Whether the incentive window contains `now`, both ends inclusive.
    #[must_use]
    pub const fn is_active_at(&self, now: u64) -> bool {
        self.start_time <= now && now <= self.end_time
    }
}

/// ERC-20 metadata. Never changes once read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    /// Token contract address.
    pub address: Address,
    /// Token symbol.
    pub symbol: String,
    /// Number of decimals of the token.
    pub decimals: u8,
}

/// The price of a token at the time it was asked for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    /// Price of one whole token, in USD.
    pub usd_price: f64,
    /// URL of the token logo, if the oracle knows one.
    pub logo_url: Option<String>,
}

impl PriceQuote {
    /// A quote without logo.
    #[must_use]
    pub const fn new(usd_price: f64) -> Self {
        Self {
            usd_price,
            logo_url: None,
        }
    }
}

/// The choice or gauge a normalized incentive is attributed to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum IncentiveSubject {
    /// The resolved choice string of a proposal.
    Choice(String),
    /// A gauge address.
    Gauge(Address),
}

/// A fee-adjusted, USD-denominated incentive.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedIncentive {
    /// Who receives the incentive.
    pub subject: IncentiveSubject,
    /// The reward token.
    pub token: Address,
    /// The reward token symbol.
    pub symbol: String,
    /// Amount in whole tokens, fee included.
    pub human_amount: f64,
    /// Value of `human_amount` in USD.
    pub usd_amount: f64,
}
