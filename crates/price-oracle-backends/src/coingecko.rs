//! Price Backend implementation for `CoinGecko`

use std::collections::HashMap;

use ethers::types::Address;
use futures::future::try_join_all;
use quicksnap_types::PriceQuote;
use quicksnap_utils::Result;
use serde::Deserialize;

fn default_base_url() -> url::Url {
    url::Url::parse("https://api.coingecko.com/api/v3/")
        .expect("valid coingecko url")
}

/// A backend for fetching prices from `CoinGecko`, by token contract address.
///
/// A token `CoinGecko` has no market data for is quoted at `0`, request
/// failures (including rate limiting) are errors.
#[derive(Clone, typed_builder::TypedBuilder)]
pub struct CoinGeckoBackend {
    /// The HTTP client.
    #[builder(default)]
    client: reqwest::Client,
    /// The API base url, must end with a `/`.
    #[builder(default = default_base_url())]
    base_url: url::Url,
    /// The asset platform the contracts live on.
    #[builder(default = String::from("ethereum"), setter(into))]
    platform: String,
    /// Demo API key, sent as `x_cg_demo_api_key`.
    #[builder(default, setter(strip_option, into))]
    api_key: Option<String>,
}

impl std::fmt::Debug for CoinGeckoBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoinGeckoBackend")
            .field("base_url", &self.base_url.as_str())
            .field("platform", &self.platform)
            .finish()
    }
}

/// The part of `/coins/{platform}/contract/{address}` we care about.
#[derive(Debug, Default, Deserialize)]
struct ContractResponse {
    market_data: Option<MarketData>,
    image: Option<Image>,
}

#[derive(Debug, Deserialize)]
struct MarketData {
    #[serde(default)]
    current_price: HashMap<String, f64>,
}

#[derive(Debug, Deserialize)]
struct Image {
    large: Option<String>,
}

impl ContractResponse {
    fn into_quote(self) -> PriceQuote {
        let usd_price = self
            .market_data
            .and_then(|m| m.current_price.get("usd").copied())
            .unwrap_or_default();
        PriceQuote {
            usd_price,
            logo_url: self.image.and_then(|i| i.large),
        }
    }
}

impl CoinGeckoBackend {
    async fn fetch_quote(
        &self,
        token: Address,
    ) -> Result<(Address, PriceQuote)> {
        let mut url = self
            .base_url
            .join(&format!("coins/{}/contract/{token:?}", self.platform))?;
        if let Some(key) = &self.api_key {
            url.query_pairs_mut().append_pair("x_cg_demo_api_key", key);
        }
        tracing::trace!(%token, "fetching coingecko quote");
        let response = self.client.get(url).send().await?;
        // unlisted contracts answer 404 and are quoted like missing market data.
        let body: ContractResponse =
            if response.status() == reqwest::StatusCode::NOT_FOUND {
                tracing::debug!(%token, "token is not listed on coingecko");
                ContractResponse::default()
            } else {
                response.error_for_status()?.json().await?
            };
        Ok((token, body.into_quote()))
    }
}

#[async_trait::async_trait]
impl super::PriceBackend for CoinGeckoBackend {
    async fn get_prices(&self, tokens: &[Address]) -> Result<super::PricesMap> {
        let quotes =
            try_join_all(tokens.iter().map(|token| self.fetch_quote(*token)))
                .await?;
        Ok(quotes.into_iter().collect())
    }
}
