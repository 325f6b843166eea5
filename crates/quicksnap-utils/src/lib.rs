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

//! Error type shared by every QuickSnap incentive crate.

use ethers::core::k256::ecdsa::SigningKey;
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Provider};
use ethers::signers::Wallet;

/// The read-only provider used to talk to the EVM node.
pub type HttpProvider = Provider<Http>;
/// The signing client used for state-changing calls.
pub type SignerClient = SignerMiddleware<HttpProvider, Wallet<SigningKey>>;

/// An enum of all possible errors that could be encountered while reading
/// incentives, querying the indexers or submitting transactions.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An Io error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// JSON Error occurred.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// Config loading error.
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    /// Error while iterating over a glob pattern.
    #[error(transparent)]
    GlobPattern(#[from] glob::PatternError),
    /// Error from Glob Iterator.
    #[error(transparent)]
    Glob(#[from] glob::GlobError),
    /// Error while parsing a URL.
    #[error(transparent)]
    Url(#[from] url::ParseError),
    /// Reqwest error
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
    /// Elliptic Curve error.
    #[error(transparent)]
    EllipticCurve(#[from] ethers::core::k256::elliptic_curve::Error),
    /// Error in Http Provider (ethers client).
    #[error(transparent)]
    EthersProvider(#[from] ethers::providers::ProviderError),
    /// Error while encoding a contract call.
    #[error(transparent)]
    EthersAbi(#[from] ethers::contract::AbiError),
    /// Smart contract error.
    #[error(transparent)]
    EthersContractCall(
        #[from] ethers::contract::ContractError<HttpProvider>,
    ),
    /// Smart contract error.
    #[error(transparent)]
    EthersContractCallWithSigner(
        #[from] ethers::contract::ContractError<SignerClient>,
    ),
    /// Etherscan API error
    #[error(transparent)]
    Etherscan(#[from] ethers::etherscan::errors::EtherscanError),
    /// Ether wallet errors.
    #[error(transparent)]
    EtherWalletError(#[from] ethers::signers::WalletError),
    /// Ethers currency conversion error
    #[error(transparent)]
    Conversion(#[from] ethers::utils::ConversionError),
    /// Failed to convert string to float
    #[error(transparent)]
    ParseFloatError(#[from] std::num::ParseFloatError),
    /// Generic error.
    #[error("{}", _0)]
    Generic(&'static str),
    /// Error while parsing the config files.
    #[error("Config parse error: {}", _0)]
    ParseConfig(#[from] serde_path_to_error::Error<config::ConfigError>),
    /// The GraphQL endpoint answered with errors instead of data.
    #[error("GraphQL error: {}", _0)]
    GraphQl(String),
    /// Missing Secrets in the config, the private key is required for signing.
    #[error("Missing required private-key in the config")]
    MissingSecrets,
    /// A contract address required by the requested operation is not configured.
    #[error("Contract address for `{}` is not configured", _0)]
    MissingContract(&'static str),
    /// The price oracle returned no price for the token.
    #[error("Failed to fetch token price for token: {token}")]
    FetchTokenPriceError {
        /// The token address.
        token: String,
    },
    /// An amount coming from an indexer or the user could not be parsed.
    #[error("Invalid amount: {}", _0)]
    InvalidAmount(String),
}

/// A type alias for the result used across the incentive crates, that uses the `Error` enum.
pub type Result<T> = std::result::Result<T, Error>;
