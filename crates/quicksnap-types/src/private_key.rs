use std::str::FromStr;

use ethers::types::H256;
use serde::Deserialize;

/// PrivateKey of the account used to submit incentive and claim transactions.
#[derive(Clone)]
pub struct PrivateKey(H256);

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PrivateKey").finish()
    }
}

impl From<H256> for PrivateKey {
    fn from(secret: H256) -> Self {
        PrivateKey(secret)
    }
}

impl std::ops::Deref for PrivateKey {
    type Target = H256;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'de> Deserialize<'de> for PrivateKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct PrivateKeyVistor;
        impl<'de> serde::de::Visitor<'de> for PrivateKeyVistor {
            type Value = H256;

            fn expecting(
                &self,
                formatter: &mut std::fmt::Formatter,
            ) -> std::fmt::Result {
                formatter.write_str(
                    "hex string or an env var containing a hex string in it",
                )
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                let hex = if value.starts_with("0x") {
                    value.to_owned()
                } else if let Some(var) = value.strip_prefix('$') {
                    tracing::trace!("Reading {} from env", var);
                    std::env::var(var).map_err(|e| {
                        serde::de::Error::custom(format!(
                            "error while loading this env {var}: {e}",
                        ))
                    })?
                } else {
                    return Err(serde::de::Error::custom(
                        "expected a 0x-prefixed hex string or a $ENV_VAR",
                    ));
                };
                H256::from_str(&hex).map_err(|e| {
                    serde::de::Error::custom(format!(
                        "{e}\n expected a 66 chars string (including the 0x prefix) but found {} chars",
                        hex.len()
                    ))
                })
            }
        }

        let secret = deserializer.deserialize_str(PrivateKeyVistor)?;
        Ok(Self(secret))
    }
}
