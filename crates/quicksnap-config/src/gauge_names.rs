use std::collections::HashMap;
use std::path::Path;

use ethers::types::Address;
use serde::Deserialize;

/// The static gauge address → display name table bundled with a deployment.
///
/// Read from a JSON array of `{ "address": "0x..", "name": ".." }` entries.
#[derive(Debug, Clone, Default)]
pub struct GaugeNames(HashMap<Address, String>);

#[derive(Deserialize)]
struct GaugeNameEntry {
    address: Address,
    name: String,
}

impl GaugeNames {
    /// Loads the table from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> quicksnap_utils::Result<Self> {
        tracing::trace!("Loading gauge names from {}", path.as_ref().display());
        let raw = std::fs::read(path)?;
        Self::from_json(&raw)
    }

    /// Parses the table from JSON bytes.
    pub fn from_json(raw: &[u8]) -> quicksnap_utils::Result<Self> {
        let entries: Vec<GaugeNameEntry> = serde_json::from_slice(raw)?;
        Ok(entries
            .into_iter()
            .map(|e| (e.address, e.name))
            .collect())
    }

    /// The display name of a gauge.
    pub fn get(&self, gauge: &Address) -> Option<&str> {
        self.0.get(gauge).map(String::as_str)
    }

    /// Number of known gauges.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no gauge is known.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(Address, String)> for GaugeNames {
    fn from_iter<T: IntoIterator<Item = (Address, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
