// Copyright 2022 QuickSnap Developers.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

#![deny(unsafe_code)]
#![warn(missing_docs)]

//! # QuickSnap Indexer
//!
//! Everything QuickSnap reads from (or records to) a GraphQL endpoint:
//! - the subgraph indexing `RewardAdded` events,
//! - the snapshot hub, for proposal titles and choices,
//! - the application backend, for merkle claims and the snapshot incentive log.

/// GraphQL documents.
pub mod queries;
/// Response shapes.
mod raw;

use std::time::Duration;

use ethers::types::{Address, TxHash};
use quicksnap_types::{ClaimData, ClaimInfo, ProposalSummary, RewardRecord};
use quicksnap_utils::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// An incentive deposit to record in the backend once it is mined.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewSnapshotIncentive {
    /// Hash of the deposit transaction.
    pub tx: TxHash,
    /// Snapshot space of the proposal.
    pub space: String,
    /// Proposal id.
    pub proposal: String,
    /// 1-based choice index.
    pub option: u32,
    /// Reward token.
    pub token: Address,
    /// Deposited amount, in whole tokens.
    pub amount: f64,
    /// Incentive window start, unix seconds.
    pub start: u64,
    /// Incentive window end, unix seconds.
    pub end: u64,
}

/// The merkle claims of an account.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClaimsListing {
    /// Claims that can be submitted to the merkle distributor.
    pub claims: Vec<ClaimData>,
    /// Totals over every account.
    pub claim_info: ClaimInfo,
}

/// Read (and record) indexed incentive data.
#[async_trait::async_trait]
pub trait Indexer: Send + Sync {
    /// Every reward added to `proposal`.
    async fn rewards_by_proposal(
        &self,
        proposal: &str,
    ) -> Result<Vec<RewardRecord>>;
    /// Every reward whose window contains `now`, across all pages.
    async fn active_rewards(&self, now: u64) -> Result<Vec<RewardRecord>>;
    /// A snapshot proposal, `None` if the hub does not know it.
    async fn proposal(&self, id: &str) -> Result<Option<ProposalSummary>>;
    /// The merkle claims of `account`.
    async fn claims(&self, account: Address) -> Result<ClaimsListing>;
    /// Records a mined snapshot incentive, returns whether the backend accepted it.
    async fn record_snapshot_incentive(
        &self,
        incentive: &NewSnapshotIncentive,
    ) -> Result<bool>;
}

#[derive(Serialize)]
struct Request<'a, V> {
    query: &'a str,
    variables: V,
}

/// An [`Indexer`] talking GraphQL over HTTP.
#[derive(Debug, Clone, typed_builder::TypedBuilder)]
pub struct GraphQlIndexer {
    /// The HTTP client, it carries the request timeout.
    #[builder(default)]
    client: reqwest::Client,
    /// The subgraph endpoint.
    graph: url::Url,
    /// The snapshot hub graphql endpoint.
    hub: url::Url,
    /// The backend graphql endpoint.
    api: url::Url,
}

impl GraphQlIndexer {
    /// A client with the given request timeout.
    pub fn http_client(timeout: Duration) -> Result<reqwest::Client> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(client)
    }

    async fn query<V, T>(
        &self,
        endpoint: &url::Url,
        query: &str,
        variables: V,
    ) -> Result<T>
    where
        V: Serialize + Send,
        T: DeserializeOwned,
    {
        let envelope: raw::Envelope<T> = self
            .client
            .post(endpoint.clone())
            .json(&Request { query, variables })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        envelope.into_result()
    }
}

#[async_trait::async_trait]
impl Indexer for GraphQlIndexer {
    #[tracing::instrument(skip(self))]
    async fn rewards_by_proposal(
        &self,
        proposal: &str,
    ) -> Result<Vec<RewardRecord>> {
        let response: raw::RewardAddeds = self
            .query(
                &self.graph,
                queries::REWARDS_BY_PROPOSAL,
                serde_json::json!({ "id": proposal }),
            )
            .await?;
        let records = response.into_records()?;
        tracing::debug!(count = records.len(), "rewards by proposal");
        Ok(records)
    }

    #[tracing::instrument(skip(self))]
    async fn active_rewards(&self, now: u64) -> Result<Vec<RewardRecord>> {
        let mut records = Vec::new();
        loop {
            let page: raw::RewardAddeds = self
                .query(
                    &self.graph,
                    queries::ACTIVE_REWARDS,
                    serde_json::json!({ "time": now, "skip": records.len() }),
                )
                .await?;
            let page = page.into_records()?;
            let last_page = page.len() < queries::PAGE_SIZE;
            records.extend(page);
            if last_page {
                break;
            }
        }
        tracing::debug!(count = records.len(), "active rewards");
        Ok(records)
    }

    #[tracing::instrument(skip(self))]
    async fn proposal(&self, id: &str) -> Result<Option<ProposalSummary>> {
        let response: raw::ProposalResponse = self
            .query(&self.hub, queries::PROPOSAL, serde_json::json!({ "id": id }))
            .await?;
        Ok(response.proposal)
    }

    #[tracing::instrument(skip(self))]
    async fn claims(&self, account: Address) -> Result<ClaimsListing> {
        let response: raw::ClaimsResponse = self
            .query(
                &self.api,
                queries::CLAIMS,
                serde_json::json!({ "account": format!("{account:?}") }),
            )
            .await?;
        let claims = response
            .claims
            .into_iter()
            .map(ClaimData::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(ClaimsListing {
            claims,
            claim_info: response.claim_info.unwrap_or_default(),
        })
    }

    #[tracing::instrument(skip_all, fields(tx = ?incentive.tx))]
    async fn record_snapshot_incentive(
        &self,
        incentive: &NewSnapshotIncentive,
    ) -> Result<bool> {
        let variables = serde_json::json!({
            "tx": format!("{:?}", incentive.tx),
            "space": incentive.space,
            "proposal": incentive.proposal,
            "option": incentive.option,
            "token": format!("{:?}", incentive.token),
            "amount": incentive.amount,
            "start": incentive.start,
            "end": incentive.end,
        });
        let response: raw::AddSnapshotBribeResponse = self
            .query(&self.api, queries::ADD_SNAPSHOT_BRIBE, variables)
            .await?;
        Ok(response.add_snapshot_bribe.map_or(false, |s| s.success))
    }
}
