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

//! # QuickSnap Types
//!
//! The data model used by the incentive aggregator and its collaborators,
//! plus a few configuration newtypes that can be read from env variables.

/// API keys read from config or environment.
pub mod api_key;
/// Merkle distributor claims.
pub mod claims;
/// Reward records, token metadata and normalized incentives.
pub mod incentive;
/// Private keys for the transaction submitter.
pub mod private_key;
/// Snapshot proposals.
pub mod proposal;
/// RPC and GraphQL endpoint URLs.
pub mod rpc_url;

pub use claims::{ClaimData, ClaimInfo};
pub use incentive::{
    GaugeTarget, IncentiveSubject, NormalizedIncentive, PeriodId, PriceQuote,
    ProjectTag, RewardRecord, RewardTarget, TokenInfo, WEEK_SECONDS,
};
pub use proposal::{choice_at, ProposalSummary, SpaceSummary};
