use serde::{Deserialize, Serialize};

/// An API key (CoinGecko, Etherscan, ...).
///
/// When the configured value starts with `$` the key is read from the
/// environment variable of that name.
#[derive(Clone, Serialize)]
pub struct ApiKey(String);

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ApiKey").finish()
    }
}

impl From<String> for ApiKey {
    fn from(api_key: String) -> Self {
        ApiKey(api_key)
    }
}

impl std::ops::Deref for ApiKey {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'de> Deserialize<'de> for ApiKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct ApiKeyVisitor;
        impl<'de> serde::de::Visitor<'de> for ApiKeyVisitor {
            type Value = String;

            fn expecting(
                &self,
                formatter: &mut std::fmt::Formatter,
            ) -> std::fmt::Result {
                formatter.write_str(
                    "api key or an env var containing an api key in it",
                )
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                if let Some(var) = value.strip_prefix('$') {
                    tracing::trace!("Reading {} from env", var);
                    let val = std::env::var(var).map_err(|e| {
                        serde::de::Error::custom(format!(
                            "error while loading this env {var}: {e}",
                        ))
                    })?;
                    return Ok(val);
                }
                Ok(value.to_string())
            }
        }

        let api_key = deserializer.deserialize_str(ApiKeyVisitor)?;
        Ok(Self(api_key))
    }
}
