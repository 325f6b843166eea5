use std::collections::HashMap;

use ethers::types::Address;
use parking_lot::RwLock;
use quicksnap_contracts::ChainReader;
use quicksnap_types::TokenInfo;
use quicksnap_utils::Result;

/// Read-through cache of ERC-20 metadata.
///
/// Token metadata never changes, so entries are never invalidated. Two
/// concurrent misses for the same token may both hit the chain; the first
/// stored value wins.
#[derive(Debug, Default)]
pub struct TokenInfoCache {
    entries: RwLock<HashMap<Address, TokenInfo>>,
}

impl TokenInfoCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached metadata of `token`, without touching the chain.
    pub fn get(&self, token: Address) -> Option<TokenInfo> {
        self.entries.read().get(&token).cloned()
    }

    /// Number of cached tokens.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether nothing is cached yet.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// The metadata of `token`, read from `chain` (symbol and decimals
    /// concurrently) on the first call only. Failures are not cached.
    pub async fn get_or_fetch(
        &self,
        chain: &dyn ChainReader,
        token: Address,
    ) -> Result<TokenInfo> {
        if let Some(info) = self.get(token) {
            return Ok(info);
        }
        let (symbol, decimals) = futures::try_join!(
            chain.token_symbol(token),
            chain.token_decimals(token)
        )?;
        tracing::trace!(%token, %symbol, decimals, "token info fetched");
        let info = TokenInfo {
            address: token,
            symbol,
            decimals,
        };
        let stored = self.entries.write().entry(token).or_insert(info).clone();
        Ok(stored)
    }
}
