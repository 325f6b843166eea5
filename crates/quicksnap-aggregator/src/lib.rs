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

//! # QuickSnap Aggregator
//!
//! Reads raw incentive deposits from the bribe ledgers and the indexer,
//! prices them, grosses them up by the platform fee and attributes them to
//! gauges or to the choices of snapshot proposals.
//!
//! Every flow takes an [`IncentiveContext`](quicksnap_context::IncentiveContext)
//! explicitly. Gauge flows also take the [`PeriodId`](quicksnap_types::PeriodId)
//! to read, computed once per pass with [`compute_active_period`].
//!
//! Read flows never fail: errors are logged and the affected gauge, proposal
//! or listing is left out. Each has a `try_` twin returning the error.

/// Approvals, incentive deposits and merkle claims.
pub mod actions;
/// Per-choice incentives of snapshot proposals.
pub mod choice;
/// The platform fee.
pub mod fee;
/// Per-gauge incentives.
pub mod gauge;
/// Gauge display names.
pub mod names;
/// Incentive periods.
pub mod period;
/// Claimable merkle rewards.
pub mod rewards;
/// Currently active snapshot incentives.
pub mod snapshot;
/// Raw and human token amounts.
pub mod units;

#[cfg(test)]
mod test_utils;

pub use actions::{
    add_reward_amount, add_snapshot_reward_amount, allowance, approve_token,
    claim_all_rewards, claim_reward, is_erc20, token_balance,
    SnapshotIncentiveRequest,
};
pub use choice::{
    aggregate_choice_incentives, incentives_for_proposal, sum_by_choice,
    ChoiceTotal,
};
pub use fee::apply_incentive_fee;
pub use gauge::{
    aggregate_gauge_incentives, get_gauge_info, list_gauges, project_gauges,
    GaugeIncentives, GaugeInfo,
};
pub use names::{resolve_gauge_name, NameStrategy, UNKNOWN_GAUGE_NAME};
pub use period::{compute_active_period, unix_now};
pub use rewards::{get_rewards, ClaimableReward, RewardsListing};
pub use snapshot::{active_snapshot_incentives, ActiveSnapshotIncentive};
