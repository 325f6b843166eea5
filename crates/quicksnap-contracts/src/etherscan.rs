use ethers::etherscan::Client;
use ethers::types::{Address, Chain};
use quicksnap_utils::{Error, Result};

/// Resolves verified contract names through the Etherscan `getsourcecode` API.
#[derive(Debug, Clone)]
pub struct EtherscanNameService {
    client: Client,
}

impl EtherscanNameService {
    /// Wraps an existing etherscan client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client for `chain_id`, optionally overriding the api url.
    pub fn for_chain(
        chain_id: u64,
        api_key: &str,
        api_url: Option<&url::Url>,
    ) -> Result<Self> {
        let chain = Chain::try_from(chain_id)
            .map_err(|_| Error::Generic("chain is not supported by etherscan"))?;
        let builder = Client::builder().chain(chain)?.with_api_key(api_key);
        // if the api url is set, override the default
        let client = if let Some(api_url) = api_url {
            builder.with_api_url(api_url.as_str())?.build()?
        } else {
            builder.build()?
        };
        Ok(Self::new(client))
    }
}

#[async_trait::async_trait]
impl crate::ContractNameService for EtherscanNameService {
    async fn contract_name(&self, address: Address) -> Result<String> {
        let metadata = self.client.contract_source_code(address).await?;
        metadata
            .items
            .into_iter()
            .map(|item| item.contract_name)
            .find(|name| !name.is_empty())
            .ok_or(Error::Generic("contract is not verified"))
    }
}
