use ethers::types::Address;
use quicksnap_utils::Result;

/// Stacks price backends on top of each other, used to put the statically
/// configured prices of unlisted tokens on top of `CoinGecko`.
///
/// Backends are asked from the last merged to the first, each one only for
/// the tokens no later backend could price. A token priced by a later
/// backend therefore never reaches the earlier ones, and a token no backend
/// knows is left out of the result. A failing backend fails the merger.
#[allow(clippy::module_name_repetitions)]
pub struct PriceOracleMerger {
    /// The underlying backends
    backends: Vec<Box<dyn super::PriceBackend>>,
}

impl std::fmt::Debug for PriceOracleMerger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PriceOracleMerger")
            .field("backends", &self.backends.len())
            .finish()
    }
}

impl PriceOracleMerger {
    /// Creates a new `PriceOracleMergerBuilder`
    #[must_use]
    pub fn builder() -> PriceOracleMergerBuilder {
        PriceOracleMergerBuilder {
            backends: Vec::default(),
        }
    }
}

/// A builder for the `PriceOracleMerger`
pub struct PriceOracleMergerBuilder {
    backends: Vec<Box<dyn super::PriceBackend>>,
}

impl PriceOracleMergerBuilder {
    /// Adds a backend on top of the ones merged before.
    #[must_use]
    pub fn merge(mut self, backend: Box<dyn super::PriceBackend>) -> Self {
        self.backends.push(backend);
        self
    }

    /// Builds the `PriceOracleMerger`
    #[must_use]
    pub fn build(self) -> PriceOracleMerger {
        PriceOracleMerger {
            backends: self.backends,
        }
    }
}

#[async_trait::async_trait]
impl super::PriceBackend for PriceOracleMerger {
    async fn get_prices(&self, tokens: &[Address]) -> Result<super::PricesMap> {
        let mut prices = super::PricesMap::with_capacity(tokens.len());
        for backend in self.backends.iter().rev() {
            let missing: Vec<Address> = tokens
                .iter()
                .filter(|token| !prices.contains_key(*token))
                .copied()
                .collect();
            if missing.is_empty() {
                break;
            }
            prices.extend(backend.get_prices(&missing).await?);
        }
        tracing::trace!(
            requested = tokens.len(),
            priced = prices.len(),
            "merged prices"
        );
        Ok(prices)
    }
}
