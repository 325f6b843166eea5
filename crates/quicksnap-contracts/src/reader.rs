use std::sync::Arc;

use ethers::abi::{Detokenize, Tokenize};
use ethers::contract::{BaseContract, Contract};
use ethers::types::{Address, I256, U256};
use quicksnap_types::{RewardRecord, RewardTarget};
use quicksnap_utils::{HttpProvider, Result};

use crate::abi;

/// A [`ChainReader`](crate::ChainReader) doing `eth_call`s through an HTTP provider.
#[derive(Debug, Clone)]
pub struct EvmChainReader {
    client: Arc<HttpProvider>,
}

impl EvmChainReader {
    /// Creates a reader over the given provider.
    pub fn new(client: Arc<HttpProvider>) -> Self {
        Self { client }
    }

    /// The underlying provider.
    pub fn client(&self) -> Arc<HttpProvider> {
        self.client.clone()
    }

    async fn call<A, D>(
        &self,
        base: &BaseContract,
        address: Address,
        method: &str,
        args: A,
    ) -> Result<D>
    where
        A: Tokenize,
        D: Detokenize,
    {
        let contract =
            Contract::new(address, base.abi().clone(), self.client.clone());
        tracing::trace!(%address, method, "eth_call");
        let value = contract.method::<A, D>(method, args)?.call().await?;
        Ok(value)
    }
}

#[async_trait::async_trait]
impl crate::ChainReader for EvmChainReader {
    async fn token_decimals(&self, token: Address) -> Result<u8> {
        self.call(&abi::ERC20, token, "decimals", ()).await
    }

    async fn token_symbol(&self, token: Address) -> Result<String> {
        self.call(&abi::ERC20, token, "symbol", ()).await
    }

    async fn token_name(&self, token: Address) -> Result<String> {
        self.call(&abi::ERC20, token, "name", ()).await
    }

    async fn balance_of(
        &self,
        token: Address,
        owner: Address,
    ) -> Result<U256> {
        self.call(&abi::ERC20, token, "balanceOf", owner).await
    }

    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256> {
        self.call(&abi::ERC20, token, "allowance", (owner, spender))
            .await
    }

    async fn total_supply(&self, token: Address) -> Result<U256> {
        self.call(&abi::ERC20, token, "totalSupply", ()).await
    }

    async fn gauge_type(
        &self,
        controller: Address,
        gauge: Address,
    ) -> Result<i128> {
        let value: I256 = self
            .call(&abi::GAUGE_CONTROLLER, controller, "gauge_types", gauge)
            .await?;
        Ok(value.low_i128())
    }

    async fn gauge_weight(
        &self,
        controller: Address,
        gauge: Address,
    ) -> Result<U256> {
        self.call(
            &abi::GAUGE_CONTROLLER,
            controller,
            "get_gauge_weight",
            gauge,
        )
        .await
    }

    async fn gauge_count(&self, controller: Address) -> Result<u64> {
        let value: I256 = self
            .call(&abi::GAUGE_CONTROLLER, controller, "n_gauges", ())
            .await?;
        u64::try_from(value.low_i128())
            .map_err(|_| quicksnap_utils::Error::Generic("negative n_gauges"))
    }

    async fn gauge_at(
        &self,
        controller: Address,
        index: u64,
    ) -> Result<Address> {
        self.call(
            &abi::GAUGE_CONTROLLER,
            controller,
            "gauges",
            U256::from(index),
        )
        .await
    }

    async fn gauge_lp_token(&self, gauge: Address) -> Result<Address> {
        self.call(&abi::GAUGE, gauge, "lp_token", ()).await
    }

    async fn gauge_staking_token(&self, gauge: Address) -> Result<Address> {
        self.call(&abi::GAUGE, gauge, "staking_token", ()).await
    }

    async fn rewards_per_gauge(
        &self,
        bribe: Address,
        gauge: Address,
    ) -> Result<Vec<Address>> {
        self.call(&abi::BRIBE, bribe, "rewards_per_gauge", gauge)
            .await
    }

    async fn reward_per_gauge(
        &self,
        bribe: Address,
        period: U256,
        gauge: Address,
        token: Address,
    ) -> Result<U256> {
        self.call(
            &abi::BRIBE,
            bribe,
            "_reward_per_gauge",
            (period, gauge, token),
        )
        .await
    }

    async fn rewards_per_proposal(
        &self,
        bribe: Address,
        proposal: &str,
    ) -> Result<Vec<RewardRecord>> {
        let rewards: Vec<(U256, U256, Address)> = self
            .call(
                &abi::SNAPSHOT_BRIBE,
                bribe,
                "rewards_per_proposal",
                proposal.to_owned(),
            )
            .await?;
        Ok(proposal_records(proposal, rewards))
    }
}

/// Records of the legacy `rewards_per_proposal` tuples `(amount, option, token)`.
///
/// The legacy contract keeps no incentive window, so every record spans
/// `0..=u64::MAX`.
fn proposal_records(
    proposal: &str,
    rewards: Vec<(U256, U256, Address)>,
) -> Vec<RewardRecord> {
    rewards
        .into_iter()
        .map(|(amount, option, token)| RewardRecord {
            id: None,
            target: RewardTarget::Proposal(proposal.to_owned()),
            token,
            raw_amount: amount,
            option: RewardRecord::option_index(option),
            start_time: 0,
            end_time: u64::MAX,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_rewards_span_every_timestamp() {
        let token = Address::repeat_byte(7);
        let rewards = vec![(U256::from(10), U256::from(2), token)];
        let records = proposal_records("0xabc", rewards);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].proposal(), Some("0xabc"));
        assert_eq!(records[0].option, 2);
        assert_eq!(records[0].raw_amount, U256::from(10));
        assert!(records[0].is_active_at(0));
        assert!(records[0].is_active_at(u64::MAX));
    }

    #[test]
    fn oversized_options_do_not_wrap() {
        let token = Address::repeat_byte(7);
        let wrapping = (U256::one() << 64) + U256::one();
        let records = proposal_records(
            "0xabc",
            vec![
                (U256::from(1), wrapping, token),
                (U256::from(1), U256::from(u64::from(u32::MAX) + 1), token),
            ],
        );
        assert!(records.iter().all(|r| r.option == u32::MAX));
    }
}
