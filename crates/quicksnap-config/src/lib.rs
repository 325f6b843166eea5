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

//! # QuickSnap Configuration Module
//!
//! ## Overview
//!
//! Every `*.toml` and `*.json` file of the configuration directory is merged,
//! then overridden by `QUICKSNAP_*` environment variables. Possible sections:
//! * `evm`: the chain to read from and, optionally, the signing key.
//! * `endpoints`: the subgraph, snapshot hub and backend GraphQL endpoints.
//! * `contracts`: merkle distributor, QuickSnap and snapshot bribe contracts.
//! * `price-oracle`: CoinGecko settings.
//! * `etherscan`: verified contract name lookups.
//! * `projects`: the gauge based integrations (bribe ledger + gauge controller).
//! * `gauge-names`: path of the static gauge name table.
//! * `unlisted-assets`: static USD prices for tokens CoinGecko does not know.

/// CLI configuration
#[cfg(feature = "cli")]
pub mod cli;
/// Default values
pub mod defaults;
/// The static gauge name table
pub mod gauge_names;
/// Utils for processing configuration
pub mod utils;

use std::collections::HashMap;
use std::path::PathBuf;

use ethers::types::Address;
use quicksnap_types::api_key::ApiKey;
use quicksnap_types::private_key::PrivateKey;
use quicksnap_types::rpc_url::RpcUrl;
use quicksnap_types::ProjectTag;
use serde::{Deserialize, Serialize};

pub use gauge_names::GaugeNames;

/// QuickSnapConfig is the configuration of the incentive aggregator and its collaborators.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct QuickSnapConfig {
    /// The EVM chain the contracts live on.
    pub evm: EvmChainConfig,
    /// GraphQL endpoints.
    pub endpoints: EndpointsConfig,
    /// Addresses of the non-gauge contracts.
    #[serde(default)]
    pub contracts: ContractsConfig,
    /// CoinGecko price oracle settings.
    #[serde(default)]
    pub price_oracle: PriceOracleConfig,
    /// Etherscan settings, used to resolve verified contract names.
    #[serde(default, skip_serializing)]
    pub etherscan: Option<EtherscanApiConfig>,
    /// Gauge based integrations.
    #[serde(default)]
    pub projects: Vec<ProjectConfig>,
    /// Path of the static gauge name table, relative to the config directory.
    #[serde(default)]
    pub gauge_names: Option<PathBuf>,
    /// The static gauge name table, loaded from [`Self::gauge_names`].
    #[serde(skip)]
    pub gauge_name_table: GaugeNames,
    /// Where proposal incentives are read from.
    #[serde(default)]
    pub proposal_reward_source: ProposalRewardSource,
    /// Timeout of every HTTP request (price oracle and GraphQL), in seconds.
    #[serde(default = "defaults::http_timeout_secs")]
    pub http_timeout_secs: u64,
    /// Static prices for tokens that are not listed on any exchange.
    ///
    /// A map between the token address and its configuration.
    #[serde(default)]
    pub unlisted_assets: HashMap<Address, UnlistedAssetConfig>,
}

impl QuickSnapConfig {
    /// Returns the configuration of the given project, if it is enabled.
    pub fn project(&self, tag: ProjectTag) -> Option<&ProjectConfig> {
        self.projects.iter().find(|p| p.enabled && p.tag == tag)
    }
}

/// EvmChainConfig is the configuration of the EVM network.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct EvmChainConfig {
    /// Human readable name of the chain.
    pub name: String,
    /// chain specific id (output of chainId opcode on EVM networks)
    #[serde(rename(serialize = "chainId"))]
    pub chain_id: u64,
    /// Http(s) Endpoint of the node.
    #[serde(skip_serializing)]
    pub http_endpoint: RpcUrl,
    /// Block Explorer for this chain.
    ///
    /// Optional, and only used for printing links to transactions.
    #[serde(default)]
    pub explorer: Option<url::Url>,
    /// The Private Key used to submit transactions.
    ///
    /// 1. if it starts with '0x' then this would be raw (64 bytes) hex encoded
    ///    private key.
    /// 2. if it starts with '$' then it would be considered as an Enviroment variable
    ///    of a hex-encoded private key.
    ///
    /// Read-only usage does not need it.
    #[serde(default, skip_serializing)]
    pub private_key: Option<PrivateKey>,
}

/// GraphQL endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct EndpointsConfig {
    /// The application backend (claims, recorded snapshot incentives).
    pub api: RpcUrl,
    /// The subgraph indexing `RewardAdded` events.
    pub graph: RpcUrl,
    /// The snapshot hub.
    #[serde(default = "defaults::snapshot_hub")]
    pub hub: RpcUrl,
}

/// Addresses of the contracts that are not tied to a project.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ContractsConfig {
    /// The merkle distributor rewards are claimed from.
    pub merkle_distributor: Option<Address>,
    /// The QuickSnap contract incentivizing snapshot proposals.
    pub quicksnap: Option<Address>,
    /// The legacy snapshot bribe contract, exposing `rewards_per_proposal`.
    pub snapshot_bribe: Option<Address>,
}

/// CoinGecko settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PriceOracleConfig {
    /// CoinGecko API base url.
    #[serde(default = "defaults::coingecko_base_url")]
    pub base_url: url::Url,
    /// CoinGecko asset platform of the chain, `ethereum` or `polygon-pos`.
    #[serde(default = "defaults::coingecko_platform")]
    pub platform: String,
    /// CoinGecko demo API key.
    #[serde(default, skip_serializing)]
    pub api_key: Option<ApiKey>,
}

impl Default for PriceOracleConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::coingecko_base_url(),
            platform: defaults::coingecko_platform(),
            api_key: None,
        }
    }
}

/// Configuration to add etherscan API key
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct EtherscanApiConfig {
    /// A wrapper type around the `String` to allow reading it from the env.
    #[serde(skip_serializing)]
    pub api_key: ApiKey,
    /// Overrides the default api url of the chain.
    #[serde(default)]
    pub api_url: Option<url::Url>,
}

/// A gauge based integration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProjectConfig {
    /// Which project this is.
    pub tag: ProjectTag,
    /// Whether the project is read at all.
    #[serde(default = "defaults::enabled")]
    pub enabled: bool,
    /// The bribe ledger of the project.
    pub bribe: Address,
    /// The gauge controller of the project.
    pub gauge_controller: Address,
    /// Gauges to report on.
    ///
    /// When empty every gauge of the controller is enumerated.
    #[serde(default)]
    pub gauges: Vec<Address>,
}

/// Where the incentives of a snapshot proposal are read from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProposalRewardSource {
    /// `rewardAddeds` entities of the subgraph.
    #[default]
    Subgraph,
    /// `rewards_per_proposal` of the snapshot bribe contract.
    Contract,
}

/// UnlistedAssetConfig is the configuration for the assets that are not listed on any exchange.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct UnlistedAssetConfig {
    /// The Price of the asset in USD.
    pub price: f64,
    /// The name of the asset.
    #[serde(default)]
    pub name: String,
}
