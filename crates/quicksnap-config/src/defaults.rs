/// HTTP requests time out after `30` seconds by default.
pub const fn http_timeout_secs() -> u64 {
    30
}

/// Projects are enabled by default.
pub const fn enabled() -> bool {
    true
}

/// The public snapshot hub.
pub fn snapshot_hub() -> quicksnap_types::rpc_url::RpcUrl {
    url::Url::parse("https://hub.snapshot.org/graphql")
        .expect("valid snapshot hub url")
        .into()
}

/// The public CoinGecko API.
pub fn coingecko_base_url() -> url::Url {
    url::Url::parse("https://api.coingecko.com/api/v3/")
        .expect("valid coingecko url")
}

/// Contracts live on Ethereum mainnet unless told otherwise.
pub fn coingecko_platform() -> String {
    String::from("ethereum")
}
