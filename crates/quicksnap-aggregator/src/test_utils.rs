//! In-memory collaborators for the aggregator tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ethers::types::{Address, TxHash, U256};
use parking_lot::Mutex;
use quicksnap_config::GaugeNames;
use quicksnap_context::IncentiveContext;
use quicksnap_contracts::{
    ChainReader, ContractNameService, TransactionSubmitter,
};
use quicksnap_indexer::{ClaimsListing, Indexer, NewSnapshotIncentive};
use quicksnap_price_oracle_backends::DummyPriceBackend;
use quicksnap_types::{
    ClaimData, ProposalSummary, RewardRecord, RewardTarget,
};
use quicksnap_utils::{Error, Result};

/// A chain where only what was registered exists.
#[derive(Debug, Default)]
pub struct FakeChain {
    tokens: HashMap<Address, (String, u8)>,
    names: HashMap<Address, String>,
    lp_tokens: HashMap<Address, Address>,
    staking_tokens: HashMap<Address, Address>,
    gauge_types: HashMap<Address, i128>,
    gauge_weights: HashMap<Address, U256>,
    gauges: Vec<Address>,
    reward_tokens: HashMap<Address, Vec<Address>>,
    reward_amounts: HashMap<(Address, Address), U256>,
    proposal_rewards: HashMap<String, Vec<RewardRecord>>,
    balances: HashMap<(Address, Address), U256>,
    allowances: HashMap<(Address, Address, Address), U256>,
    supplies: HashMap<Address, U256>,
    symbol_calls: AtomicUsize,
    periods: Mutex<Vec<U256>>,
}

impl FakeChain {
    pub fn with_token(
        mut self,
        token: Address,
        symbol: &str,
        decimals: u8,
    ) -> Self {
        self.tokens.insert(token, (symbol.to_owned(), decimals));
        self
    }

    pub fn with_name(mut self, token: Address, name: &str) -> Self {
        self.names.insert(token, name.to_owned());
        self
    }

    pub fn with_lp_token(mut self, gauge: Address, lp: Address) -> Self {
        self.lp_tokens.insert(gauge, lp);
        self
    }

    pub fn with_staking_token(
        mut self,
        gauge: Address,
        token: Address,
    ) -> Self {
        self.staking_tokens.insert(gauge, token);
        self
    }

    /// Registers a gauge in the controller.
    pub fn with_gauge(
        mut self,
        gauge: Address,
        gauge_type: i128,
        weight: U256,
    ) -> Self {
        self.gauge_types.insert(gauge, gauge_type);
        self.gauge_weights.insert(gauge, weight);
        self.gauges.push(gauge);
        self
    }

    /// Registers a reward token of a gauge, for every period.
    pub fn with_reward(
        mut self,
        gauge: Address,
        token: Address,
        raw: U256,
    ) -> Self {
        self.reward_tokens.entry(gauge).or_default().push(token);
        self.reward_amounts.insert((gauge, token), raw);
        self
    }

    pub fn with_proposal_reward(mut self, record: RewardRecord) -> Self {
        let proposal = record.proposal().unwrap_or_default().to_owned();
        self.proposal_rewards.entry(proposal).or_default().push(record);
        self
    }

    pub fn with_balance(
        mut self,
        token: Address,
        owner: Address,
        raw: U256,
    ) -> Self {
        self.balances.insert((token, owner), raw);
        self
    }

    pub fn with_allowance(
        mut self,
        token: Address,
        owner: Address,
        spender: Address,
        raw: U256,
    ) -> Self {
        self.allowances.insert((token, owner, spender), raw);
        self
    }

    pub fn with_supply(mut self, token: Address, raw: U256) -> Self {
        self.supplies.insert(token, raw);
        self
    }

    /// How many times `symbol()` was called.
    pub fn symbol_calls(&self) -> usize {
        self.symbol_calls.load(Ordering::SeqCst)
    }

    /// Every period `reward_per_gauge` was asked for.
    pub fn periods(&self) -> Vec<U256> {
        self.periods.lock().clone()
    }
}

fn found<T: Clone>(value: Option<&T>, what: &'static str) -> Result<T> {
    value.cloned().ok_or(Error::Generic(what))
}

#[async_trait::async_trait]
impl ChainReader for FakeChain {
    async fn token_decimals(&self, token: Address) -> Result<u8> {
        found(self.tokens.get(&token).map(|(_, d)| d), "no such token")
    }

    async fn token_symbol(&self, token: Address) -> Result<String> {
        self.symbol_calls.fetch_add(1, Ordering::SeqCst);
        found(self.tokens.get(&token).map(|(s, _)| s), "no such token")
    }

    async fn token_name(&self, token: Address) -> Result<String> {
        found(self.names.get(&token), "no token name")
    }

    async fn balance_of(&self, token: Address, owner: Address) -> Result<U256> {
        found(self.balances.get(&(token, owner)), "no balance")
    }

    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256> {
        found(self.allowances.get(&(token, owner, spender)), "no allowance")
    }

    async fn total_supply(&self, token: Address) -> Result<U256> {
        found(self.supplies.get(&token), "not a token")
    }

    async fn gauge_type(
        &self,
        _controller: Address,
        gauge: Address,
    ) -> Result<i128> {
        found(self.gauge_types.get(&gauge), "no such gauge")
    }

    async fn gauge_weight(
        &self,
        _controller: Address,
        gauge: Address,
    ) -> Result<U256> {
        found(self.gauge_weights.get(&gauge), "no such gauge")
    }

    async fn gauge_count(&self, _controller: Address) -> Result<u64> {
        Ok(self.gauges.len() as u64)
    }

    async fn gauge_at(
        &self,
        _controller: Address,
        index: u64,
    ) -> Result<Address> {
        found(self.gauges.get(index as usize), "gauge index out of range")
    }

    async fn gauge_lp_token(&self, gauge: Address) -> Result<Address> {
        found(self.lp_tokens.get(&gauge), "no lp token")
    }

    async fn gauge_staking_token(&self, gauge: Address) -> Result<Address> {
        found(self.staking_tokens.get(&gauge), "no staking token")
    }

    async fn rewards_per_gauge(
        &self,
        _bribe: Address,
        gauge: Address,
    ) -> Result<Vec<Address>> {
        Ok(self.reward_tokens.get(&gauge).cloned().unwrap_or_default())
    }

    async fn reward_per_gauge(
        &self,
        _bribe: Address,
        period: U256,
        gauge: Address,
        token: Address,
    ) -> Result<U256> {
        self.periods.lock().push(period);
        found(self.reward_amounts.get(&(gauge, token)), "no reward")
    }

    async fn rewards_per_proposal(
        &self,
        _bribe: Address,
        proposal: &str,
    ) -> Result<Vec<RewardRecord>> {
        Ok(self.proposal_rewards.get(proposal).cloned().unwrap_or_default())
    }
}

/// An indexer serving fixed data.
#[derive(Debug, Default)]
pub struct FakeIndexer {
    rewards: Vec<RewardRecord>,
    proposals: HashMap<String, ProposalSummary>,
    claims: ClaimsListing,
    unavailable: bool,
    recorded: Mutex<Vec<NewSnapshotIncentive>>,
}

impl FakeIndexer {
    pub fn with_reward(mut self, record: RewardRecord) -> Self {
        self.rewards.push(record);
        self
    }

    pub fn with_proposal(mut self, proposal: ProposalSummary) -> Self {
        self.proposals.insert(proposal.id.clone(), proposal);
        self
    }

    pub fn with_claims(mut self, claims: ClaimsListing) -> Self {
        self.claims = claims;
        self
    }

    /// Every call fails.
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    pub fn recorded(&self) -> Vec<NewSnapshotIncentive> {
        self.recorded.lock().clone()
    }

    fn check(&self) -> Result<()> {
        if self.unavailable {
            Err(Error::GraphQl(String::from("indexer unavailable")))
        } else {
            Ok(())
        }
    }
}

#[async_trait::async_trait]
impl Indexer for FakeIndexer {
    async fn rewards_by_proposal(
        &self,
        proposal: &str,
    ) -> Result<Vec<RewardRecord>> {
        self.check()?;
        Ok(self
            .rewards
            .iter()
            .filter(|r| r.proposal() == Some(proposal))
            .cloned()
            .collect())
    }

    async fn active_rewards(&self, _now: u64) -> Result<Vec<RewardRecord>> {
        self.check()?;
        Ok(self.rewards.clone())
    }

    async fn proposal(&self, id: &str) -> Result<Option<ProposalSummary>> {
        self.check()?;
        Ok(self.proposals.get(id).cloned())
    }

    async fn claims(&self, _account: Address) -> Result<ClaimsListing> {
        self.check()?;
        Ok(self.claims.clone())
    }

    async fn record_snapshot_incentive(
        &self,
        incentive: &NewSnapshotIncentive,
    ) -> Result<bool> {
        self.check()?;
        self.recorded.lock().push(incentive.clone());
        Ok(true)
    }
}

/// A name service knowing a fixed set of contracts. The default knows none.
#[derive(Debug, Default)]
pub struct FakeNameService {
    names: HashMap<Address, String>,
}

impl FakeNameService {
    pub fn with_name(address: Address, name: &str) -> Self {
        Self {
            names: HashMap::from([(address, name.to_owned())]),
        }
    }
}

#[async_trait::async_trait]
impl ContractNameService for FakeNameService {
    async fn contract_name(&self, address: Address) -> Result<String> {
        found(self.names.get(&address), "contract is not verified")
    }
}

/// A transaction sent to [`FakeSubmitter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submitted {
    Approve {
        token: Address,
        spender: Address,
        amount: U256,
    },
    GaugeReward {
        bribe: Address,
        gauge: Address,
        token: Address,
        amount: U256,
    },
    ProposalReward {
        quicksnap: Address,
        proposal: String,
        option: u32,
        token: Address,
        amount: U256,
        start: u64,
        end: u64,
    },
    Claim {
        distributor: Address,
        account: Address,
        index: U256,
    },
    ClaimMulti {
        distributor: Address,
        account: Address,
        claims: usize,
    },
}

/// Records transactions instead of sending them.
#[derive(Debug)]
pub struct FakeSubmitter {
    sender: Address,
    submitted: Mutex<Vec<Submitted>>,
}

impl FakeSubmitter {
    pub fn new(sender: Address) -> Self {
        Self {
            sender,
            submitted: Mutex::default(),
        }
    }

    pub fn submitted(&self) -> Vec<Submitted> {
        self.submitted.lock().clone()
    }

    /// The n-th transaction hashes to `n` repeated, starting at 1.
    fn push(&self, tx: Submitted) -> Result<TxHash> {
        let mut submitted = self.submitted.lock();
        submitted.push(tx);
        Ok(TxHash::repeat_byte(submitted.len() as u8))
    }
}

#[async_trait::async_trait]
impl TransactionSubmitter for FakeSubmitter {
    fn sender(&self) -> Address {
        self.sender
    }

    async fn approve(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> Result<TxHash> {
        self.push(Submitted::Approve {
            token,
            spender,
            amount,
        })
    }

    async fn add_gauge_reward(
        &self,
        bribe: Address,
        gauge: Address,
        token: Address,
        amount: U256,
    ) -> Result<TxHash> {
        self.push(Submitted::GaugeReward {
            bribe,
            gauge,
            token,
            amount,
        })
    }

    async fn add_proposal_reward(
        &self,
        quicksnap: Address,
        proposal: &str,
        option: u32,
        token: Address,
        amount: U256,
        start: u64,
        end: u64,
    ) -> Result<TxHash> {
        self.push(Submitted::ProposalReward {
            quicksnap,
            proposal: proposal.to_owned(),
            option,
            token,
            amount,
            start,
            end,
        })
    }

    async fn claim(
        &self,
        distributor: Address,
        account: Address,
        claim: &ClaimData,
    ) -> Result<TxHash> {
        self.push(Submitted::Claim {
            distributor,
            account,
            index: claim.index,
        })
    }

    async fn claim_multi(
        &self,
        distributor: Address,
        account: Address,
        claims: &[ClaimData],
    ) -> Result<TxHash> {
        self.push(Submitted::ClaimMulti {
            distributor,
            account,
            claims: claims.len(),
        })
    }
}

pub fn prices(prices: &[(Address, f64)]) -> DummyPriceBackend {
    DummyPriceBackend::from_usd_prices(prices.iter().copied())
}

pub fn gauge_names(names: &[(Address, &str)]) -> GaugeNames {
    names
        .iter()
        .map(|(gauge, name)| (*gauge, (*name).to_owned()))
        .collect()
}

/// A reward deposited for `option` of `proposal`.
pub fn proposal_reward(
    proposal: &str,
    option: u32,
    token: Address,
    raw_amount: U256,
) -> RewardRecord {
    RewardRecord {
        id: None,
        target: RewardTarget::Proposal(proposal.to_owned()),
        token,
        raw_amount,
        option,
        start_time: 0,
        end_time: u64::MAX,
    }
}

pub fn context(
    chain: FakeChain,
    indexer: FakeIndexer,
    prices: DummyPriceBackend,
) -> IncentiveContext {
    shared_context(Arc::new(chain), Arc::new(indexer), prices)
}

/// Like [`context`], for tests that inspect the fakes afterwards.
pub fn shared_context(
    chain: Arc<FakeChain>,
    indexer: Arc<FakeIndexer>,
    prices: DummyPriceBackend,
) -> IncentiveContext {
    IncentiveContext::builder()
        .chain(chain)
        .price_oracle(Arc::new(prices))
        .indexer(indexer)
        .build()
}
