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

//! # QuickSnap Contracts
//!
//! The on-chain collaborators of the incentive aggregator:
//!
//! * [`ChainReader`]: read-only calls to ERC-20 tokens, gauge controllers,
//!   gauges and the bribe ledgers.
//! * [`TransactionSubmitter`]: state-changing calls (approvals, incentive
//!   deposits, merkle claims). Never used by the read side.
//! * [`ContractNameService`]: verified contract names.
//!
//! Each trait comes with an implementation backed by `ethers`, the
//! aggregator only ever sees the traits.

/// Human readable ABIs of every contract we talk to.
pub mod abi;
/// Etherscan backed contract name service.
mod etherscan;
/// `ethers` backed chain reader.
mod reader;
/// `ethers` backed transaction submitter.
mod submitter;

use ethers::types::{Address, TxHash, U256};
use quicksnap_types::{ClaimData, RewardRecord};
use quicksnap_utils::Result;

pub use etherscan::EtherscanNameService;
pub use reader::EvmChainReader;
pub use submitter::EvmTransactionSubmitter;

/// The largest `int256`, used as an "unlimited" ERC-20 allowance.
pub fn max_allowance() -> U256 {
    U256::MAX >> 1
}

/// Read-only access to the contracts incentives are computed from.
#[async_trait::async_trait]
pub trait ChainReader: Send + Sync {
    /// ERC-20 `decimals()`.
    async fn token_decimals(&self, token: Address) -> Result<u8>;
    /// ERC-20 `symbol()`.
    async fn token_symbol(&self, token: Address) -> Result<String>;
    /// ERC-20 `name()`.
    async fn token_name(&self, token: Address) -> Result<String>;
    /// ERC-20 `balanceOf(owner)`.
    async fn balance_of(&self, token: Address, owner: Address)
        -> Result<U256>;
    /// ERC-20 `allowance(owner, spender)`.
    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256>;
    /// ERC-20 `totalSupply()`.
    async fn total_supply(&self, token: Address) -> Result<U256>;

    /// Gauge controller `gauge_types(gauge)`.
    async fn gauge_type(
        &self,
        controller: Address,
        gauge: Address,
    ) -> Result<i128>;
    /// Gauge controller `get_gauge_weight(gauge)`, 18 decimals fixed point.
    async fn gauge_weight(
        &self,
        controller: Address,
        gauge: Address,
    ) -> Result<U256>;
    /// Gauge controller `n_gauges()`.
    async fn gauge_count(&self, controller: Address) -> Result<u64>;
    /// Gauge controller `gauges(index)`.
    async fn gauge_at(&self, controller: Address, index: u64)
        -> Result<Address>;

    /// Gauge `lp_token()`.
    async fn gauge_lp_token(&self, gauge: Address) -> Result<Address>;
    /// Angle gauge `staking_token()`.
    async fn gauge_staking_token(&self, gauge: Address) -> Result<Address>;

    /// Bribe ledger `rewards_per_gauge(gauge)`: the reward tokens registered for a gauge.
    async fn rewards_per_gauge(
        &self,
        bribe: Address,
        gauge: Address,
    ) -> Result<Vec<Address>>;
    /// Bribe ledger `_reward_per_gauge(period, gauge, token)`: the raw amount of one
    /// reward token for a gauge in a period.
    async fn reward_per_gauge(
        &self,
        bribe: Address,
        period: U256,
        gauge: Address,
        token: Address,
    ) -> Result<U256>;
    /// Snapshot bribe `rewards_per_proposal(proposal)`.
    async fn rewards_per_proposal(
        &self,
        bribe: Address,
        proposal: &str,
    ) -> Result<Vec<RewardRecord>>;
}

/// Signs and broadcasts state-changing calls, returning the transaction hash.
#[async_trait::async_trait]
pub trait TransactionSubmitter: Send + Sync {
    /// The account transactions are sent from.
    fn sender(&self) -> Address;
    /// ERC-20 `approve(spender, amount)`, waits for one confirmation.
    async fn approve(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> Result<TxHash>;
    /// Bribe ledger `add_reward_amount(gauge, token, amount)`.
    async fn add_gauge_reward(
        &self,
        bribe: Address,
        gauge: Address,
        token: Address,
        amount: U256,
    ) -> Result<TxHash>;
    /// QuickSnap `add_reward_amount(proposal, option, token, amount, start, end)`,
    /// waits for one confirmation.
    #[allow(clippy::too_many_arguments)]
    async fn add_proposal_reward(
        &self,
        quicksnap: Address,
        proposal: &str,
        option: u32,
        token: Address,
        amount: U256,
        start: u64,
        end: u64,
    ) -> Result<TxHash>;
    /// Merkle distributor `claim(token, index, account, amount, proof)`.
    async fn claim(
        &self,
        distributor: Address,
        account: Address,
        claim: &ClaimData,
    ) -> Result<TxHash>;
    /// Merkle distributor `claimMulti(account, claims)`.
    async fn claim_multi(
        &self,
        distributor: Address,
        account: Address,
        claims: &[ClaimData],
    ) -> Result<TxHash>;
}

/// Resolves the verified name of a contract.
#[async_trait::async_trait]
pub trait ContractNameService: Send + Sync {
    /// The verified contract name of `address`.
    async fn contract_name(&self, address: Address) -> Result<String>;
}
