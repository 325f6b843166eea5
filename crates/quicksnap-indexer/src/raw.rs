//! Wire shapes of the GraphQL responses, before validation.

use ethers::types::{Address, H256, U256};
use quicksnap_types::{
    ClaimData, ClaimInfo, ProposalSummary, RewardRecord, RewardTarget,
};
use quicksnap_utils::Error;
use serde::Deserialize;

/// The GraphQL response envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlError {
    pub message: String,
}

impl<T> Envelope<T> {
    /// The data, or every error message joined.
    pub fn into_result(self) -> quicksnap_utils::Result<T> {
        if !self.errors.is_empty() {
            let messages: Vec<_> =
                self.errors.into_iter().map(|e| e.message).collect();
            return Err(Error::GraphQl(messages.join("; ")));
        }
        self.data
            .ok_or_else(|| Error::GraphQl(String::from("response has no data")))
    }
}

/// Subgraph `BigInt`s are strings, `Int`s are numbers, accept both.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum Numeric {
    Number(u64),
    Text(String),
}

impl Numeric {
    pub fn to_u256(&self) -> quicksnap_utils::Result<U256> {
        match self {
            Self::Number(n) => Ok(U256::from(*n)),
            Self::Text(s) => U256::from_dec_str(s)
                .map_err(|_| Error::InvalidAmount(s.clone())),
        }
    }

    pub fn to_u64(&self) -> quicksnap_utils::Result<u64> {
        match self {
            Self::Number(n) => Ok(*n),
            Self::Text(s) => {
                s.parse().map_err(|_| Error::InvalidAmount(s.clone()))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RewardAdded {
    pub id: String,
    pub proposal: String,
    pub option: Numeric,
    #[serde(rename = "reward_token")]
    pub reward_token: Address,
    pub amount: Numeric,
    pub start_time: Numeric,
    pub end_time: Numeric,
}

impl TryFrom<RewardAdded> for RewardRecord {
    type Error = Error;

    fn try_from(raw: RewardAdded) -> Result<Self, Self::Error> {
        Ok(RewardRecord {
            id: Some(raw.id),
            target: RewardTarget::Proposal(raw.proposal),
            token: raw.reward_token,
            raw_amount: raw.amount.to_u256()?,
            option: RewardRecord::option_index(raw.option.to_u256()?),
            start_time: raw.start_time.to_u64()?,
            end_time: raw.end_time.to_u64()?,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RewardAddeds {
    pub reward_addeds: Vec<RewardAdded>,
}

impl RewardAddeds {
    pub fn into_records(self) -> quicksnap_utils::Result<Vec<RewardRecord>> {
        self.reward_addeds
            .into_iter()
            .map(RewardRecord::try_from)
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProposalResponse {
    pub proposal: Option<ProposalSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Claim {
    pub token: Address,
    pub index: Numeric,
    pub amount: Numeric,
    #[serde(default)]
    pub merkle_proof: Vec<H256>,
}

impl TryFrom<Claim> for ClaimData {
    type Error = Error;

    fn try_from(raw: Claim) -> Result<Self, Self::Error> {
        Ok(ClaimData {
            token: raw.token,
            index: raw.index.to_u256()?,
            amount: raw.amount.to_u256()?,
            merkle_proof: raw.merkle_proof,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ClaimsResponse {
    #[serde(default)]
    pub claims: Vec<Claim>,
    #[serde(default)]
    pub claim_info: Option<ClaimInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddSnapshotBribeResponse {
    pub add_snapshot_bribe: Option<MutationStatus>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MutationStatus {
    #[serde(default)]
    pub success: bool,
}
