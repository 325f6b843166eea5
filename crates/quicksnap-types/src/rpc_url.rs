use serde::{Deserialize, Serialize};

/// An endpoint URL (JSON-RPC node, subgraph, snapshot hub, backend).
///
/// Deserializes either from a literal URL or from `$VAR`, in which case the
/// URL is read from the environment variable `VAR`.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct RpcUrl(url::Url);

impl RpcUrl {
    /// Returns the inner [`url::Url`].
    pub fn as_url(&self) -> &url::Url {
        &self.0
    }
}

impl std::fmt::Display for RpcUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Debug for RpcUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // query strings may carry api keys
        write!(
            f,
            "{}://{}{}",
            self.0.scheme(),
            self.0.host_str().unwrap_or_default(),
            self.0.path()
        )
    }
}

impl From<RpcUrl> for url::Url {
    fn from(rpc_url: RpcUrl) -> Self {
        rpc_url.0
    }
}

impl From<url::Url> for RpcUrl {
    fn from(url: url::Url) -> Self {
        RpcUrl(url)
    }
}

impl std::ops::Deref for RpcUrl {
    type Target = url::Url;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'de> Deserialize<'de> for RpcUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct RpcUrlVistor;
        impl<'de> serde::de::Visitor<'de> for RpcUrlVistor {
            type Value = url::Url;

            fn expecting(
                &self,
                formatter: &mut std::fmt::Formatter,
            ) -> std::fmt::Result {
                formatter.write_str(
                    "url string or an env var containing a url string in it",
                )
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                let raw = match value.strip_prefix('$') {
                    Some(var) => {
                        tracing::trace!("Reading {} from env", var);
                        std::env::var(var).map_err(|e| {
                            serde::de::Error::custom(format!(
                                "error while loading this env {var}: {e}",
                            ))
                        })?
                    }
                    None => value.to_owned(),
                };
                url::Url::parse(&raw)
                    .map_err(|e| serde::de::Error::custom(format!("{e:?}")))
            }
        }

        let url = deserializer.deserialize_str(RpcUrlVistor)?;
        Ok(Self(url))
    }
}
