use ethers::types::Address;
use quicksnap_types::PriceQuote;
use quicksnap_utils::Result;

/// A static Price Oracle Backend
///
/// Returns the prices it was created with.
/// Used for tokens that are not listed on any exchange, and in tests.
#[derive(Debug, Clone, Default)]
pub struct DummyPriceBackend {
    /// The price data that is returned by the backend
    prices: super::PricesMap,
}

impl DummyPriceBackend {
    /// Creates a new dummy price backend
    #[must_use]
    pub fn new(prices: super::PricesMap) -> Self {
        Self { prices }
    }

    /// Creates a backend from plain USD prices, without logos.
    #[must_use]
    pub fn from_usd_prices<I>(prices: I) -> Self
    where
        I: IntoIterator<Item = (Address, f64)>,
    {
        Self::new(
            prices
                .into_iter()
                .map(|(token, price)| (token, PriceQuote::new(price)))
                .collect(),
        )
    }
}

#[async_trait::async_trait]
impl super::PriceBackend for DummyPriceBackend {
    async fn get_prices(&self, tokens: &[Address]) -> Result<super::PricesMap> {
        let result = tokens
            .iter()
            .filter_map(|token| {
                self.prices
                    .get(token)
                    .cloned()
                    .map(|quote| (*token, quote))
            })
            .collect();
        Ok(result)
    }
}
