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

#![warn(missing_docs)]
//! # QuickSnap Context Module
//!
//! The collaborators every incentive flow works with, built once from the
//! configuration and passed explicitly to each call.

/// Read-through ERC-20 metadata cache.
mod token_cache;

use std::sync::Arc;
use std::time::Duration;

use ethers::providers::{Http, Provider};
use ethers::types::Address;
use quicksnap_config::{
    ContractsConfig, GaugeNames, ProjectConfig, ProposalRewardSource,
    QuickSnapConfig,
};
use quicksnap_contracts::{
    ChainReader, ContractNameService, EtherscanNameService, EvmChainReader,
    EvmTransactionSubmitter, TransactionSubmitter,
};
use quicksnap_indexer::{GraphQlIndexer, Indexer};
use quicksnap_price_oracle_backends::{
    CoinGeckoBackend, DummyPriceBackend, PriceBackend, PriceOracleMerger,
};
use quicksnap_types::{ProjectTag, TokenInfo};
use quicksnap_utils::{Error, Result};

pub use token_cache::TokenInfoCache;

/// IncentiveContext holds the chain, price, indexer and naming collaborators.
#[derive(Clone, typed_builder::TypedBuilder)]
pub struct IncentiveContext {
    /// Read-only chain access.
    chain: Arc<dyn ChainReader>,
    /// Price oracle, quotes are never cached.
    price_oracle: Arc<dyn PriceBackend>,
    /// Subgraph, snapshot hub and backend.
    indexer: Arc<dyn Indexer>,
    /// Verified contract names, used for FRAX gauges.
    #[builder(default, setter(strip_option))]
    name_service: Option<Arc<dyn ContractNameService>>,
    /// Signs and sends transactions, only when a private key is configured.
    #[builder(default, setter(strip_option))]
    submitter: Option<Arc<dyn TransactionSubmitter>>,
    /// The static gauge name table.
    #[builder(default)]
    gauge_names: GaugeNames,
    /// Where proposal incentives are read from.
    #[builder(default)]
    proposal_reward_source: ProposalRewardSource,
    /// Addresses of the non-gauge contracts.
    #[builder(default)]
    contracts: ContractsConfig,
    /// Enabled gauge projects.
    #[builder(default)]
    projects: Vec<ProjectConfig>,
    /// ERC-20 metadata, shared by every clone of the context.
    #[builder(default)]
    token_cache: Arc<TokenInfoCache>,
}

impl std::fmt::Debug for IncentiveContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IncentiveContext")
            .field("name_service", &self.name_service.is_some())
            .field("submitter", &self.submitter.is_some())
            .field("gauge_names", &self.gauge_names.len())
            .field("proposal_reward_source", &self.proposal_reward_source)
            .field("projects", &self.projects.len())
            .field("cached_tokens", &self.token_cache.len())
            .finish()
    }
}

impl IncentiveContext {
    /// Creates the context of a configuration: an HTTP provider for the
    /// chain, `CoinGecko` with the unlisted asset prices on top, the
    /// GraphQL indexer and, when configured, etherscan and a signer.
    pub fn new(config: &QuickSnapConfig) -> Result<Self> {
        let provider =
            Provider::<Http>::try_from(config.evm.http_endpoint.as_str())?
                .interval(Duration::from_millis(500));
        let http = GraphQlIndexer::http_client(Duration::from_secs(
            config.http_timeout_secs,
        ))?;

        let coingecko = {
            let oracle = &config.price_oracle;
            let builder = CoinGeckoBackend::builder()
                .client(http.clone())
                .base_url(oracle.base_url.clone())
                .platform(oracle.platform.clone());
            match &oracle.api_key {
                Some(key) => builder.api_key(key.as_str()).build(),
                None => builder.build(),
            }
        };
        let unlisted = DummyPriceBackend::from_usd_prices(
            config
                .unlisted_assets
                .iter()
                .map(|(token, asset)| (*token, asset.price)),
        );
        // unlisted asset prices win over CoinGecko.
        let price_oracle = PriceOracleMerger::builder()
            .merge(Box::new(coingecko))
            .merge(Box::new(unlisted))
            .build();

        let indexer = GraphQlIndexer::builder()
            .client(http)
            .graph(config.endpoints.graph.as_url().clone())
            .hub(config.endpoints.hub.as_url().clone())
            .api(config.endpoints.api.as_url().clone())
            .build();

        let name_service = config
            .etherscan
            .as_ref()
            .map(|etherscan| {
                EtherscanNameService::for_chain(
                    config.evm.chain_id,
                    etherscan.api_key.as_str(),
                    etherscan.api_url.as_ref(),
                )
            })
            .transpose()?
            .map(|service| Arc::new(service) as Arc<dyn ContractNameService>);

        let submitter = config
            .evm
            .private_key
            .as_ref()
            .map(|key| {
                EvmTransactionSubmitter::new(
                    provider.clone(),
                    key,
                    config.evm.chain_id,
                )
            })
            .transpose()?
            .map(|s| Arc::new(s) as Arc<dyn TransactionSubmitter>);

        Ok(Self {
            chain: Arc::new(EvmChainReader::new(Arc::new(provider))),
            price_oracle: Arc::new(price_oracle),
            indexer: Arc::new(indexer),
            name_service,
            submitter,
            gauge_names: config.gauge_name_table.clone(),
            proposal_reward_source: config.proposal_reward_source,
            contracts: config.contracts.clone(),
            projects: config.projects.clone(),
            token_cache: Arc::default(),
        })
    }

    /// Returns the chain reader.
    pub fn chain(&self) -> &dyn ChainReader {
        self.chain.as_ref()
    }

    /// Returns the price oracle.
    pub fn price_oracle(&self) -> &dyn PriceBackend {
        self.price_oracle.as_ref()
    }

    /// Returns the indexer.
    pub fn indexer(&self) -> &dyn Indexer {
        self.indexer.as_ref()
    }

    /// Returns the contract name service, if one is configured.
    pub fn name_service(&self) -> Option<&dyn ContractNameService> {
        self.name_service.as_deref()
    }

    /// Returns the transaction submitter.
    ///
    /// Fails with [`Error::MissingSecrets`] when no private key is configured.
    pub fn submitter(&self) -> Result<&dyn TransactionSubmitter> {
        self.submitter.as_deref().ok_or(Error::MissingSecrets)
    }

    /// Returns the static gauge name table.
    pub fn gauge_names(&self) -> &GaugeNames {
        &self.gauge_names
    }

    /// Where proposal incentives are read from.
    pub fn proposal_reward_source(&self) -> ProposalRewardSource {
        self.proposal_reward_source
    }

    /// Returns the configured address of a non-gauge contract.
    pub fn contracts(&self) -> &ContractsConfig {
        &self.contracts
    }

    /// The merkle distributor, or [`Error::MissingContract`].
    pub fn merkle_distributor(&self) -> Result<Address> {
        self.contracts
            .merkle_distributor
            .ok_or(Error::MissingContract("merkle-distributor"))
    }

    /// The QuickSnap contract, or [`Error::MissingContract`].
    pub fn quicksnap(&self) -> Result<Address> {
        self.contracts
            .quicksnap
            .ok_or(Error::MissingContract("quicksnap"))
    }

    /// Returns the enabled projects.
    pub fn projects(&self) -> &[ProjectConfig] {
        &self.projects
    }

    /// Returns the configuration of one project.
    pub fn project(&self, tag: ProjectTag) -> Option<&ProjectConfig> {
        self.projects.iter().find(|p| p.tag == tag)
    }

    /// Returns the ERC-20 metadata cache.
    pub fn token_cache(&self) -> &TokenInfoCache {
        &self.token_cache
    }

    /// ERC-20 metadata of `token`, read from the chain once per process.
    pub async fn token_info(&self, token: Address) -> Result<TokenInfo> {
        self.token_cache
            .get_or_fetch(self.chain.as_ref(), token)
            .await
    }
}
