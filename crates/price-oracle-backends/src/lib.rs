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

//! Price Oracle Backends
//!
//! A Price Oracle Backend is a service that provides a [`PriceQuote`] for a list of token
//! contract addresses, in USD. Quotes are never cached: prices drift, so
//! every aggregation pass asks again.
//!
//! As of now, the following backends are supported:
//! - [CoinGecko](https://www.coingecko.com/en/api), by contract address.
//! - A static backend, for tokens that are not listed anywhere.
//!
//! ## Usage
//! ```rust,no_run
//! # async fn run() -> quicksnap_utils::Result<()> {
//! use quicksnap_price_oracle_backends::{CoinGeckoBackend, PriceBackend};
//! let backend = CoinGeckoBackend::builder().build();
//! let weth = "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2".parse().unwrap();
//! let quote = backend.get_price(weth).await?;
//! println!("{}", quote.usd_price);
//! # Ok(())
//! # }
//! ```
//!
//! ## Features flags
//! - `coingecko` - enables `CoinGecko` backend

#![deny(unsafe_code)]
#![warn(missing_docs)]

use ethers::types::Address;
use quicksnap_types::PriceQuote;
use quicksnap_utils::Result;

/// `CoinGecko` Backend
#[cfg(feature = "coingecko")]
mod coingecko;
/// A Dummy Price Backend
mod dummy;
/// Merger Backend Module
mod merger;

#[cfg(feature = "coingecko")]
pub use crate::coingecko::CoinGeckoBackend;
pub use dummy::DummyPriceBackend;
pub use merger::PriceOracleMerger;

/// A type alias for a map of token addresses to price quotes
pub type PricesMap = std::collections::HashMap<Address, PriceQuote>;

/// A trait for a price backend
#[async_trait::async_trait]
pub trait PriceBackend: Send + Sync {
    /// Returns the USD prices of the given tokens.
    ///
    /// Tokens the backend does not know are left out of the map.
    async fn get_prices(&self, tokens: &[Address]) -> Result<PricesMap>;

    /// Returns the USD price of a single token.
    ///
    /// Fails with [`quicksnap_utils::Error::FetchTokenPriceError`] if no backend knows the token.
    async fn get_price(&self, token: Address) -> Result<PriceQuote> {
        let mut prices = PriceBackend::get_prices(self, &[token]).await?;
        prices.remove(&token).ok_or_else(|| {
            quicksnap_utils::Error::FetchTokenPriceError {
                token: format!("{token:?}"),
            }
        })
    }
}

#[async_trait::async_trait]
impl<B: PriceBackend + ?Sized> PriceBackend for std::sync::Arc<B> {
    async fn get_prices(&self, tokens: &[Address]) -> Result<PricesMap> {
        (**self).get_prices(tokens).await
    }
}
