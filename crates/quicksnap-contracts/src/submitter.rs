use std::sync::Arc;

use ethers::abi::{Token, Tokenize};
use ethers::contract::{BaseContract, Contract};
use ethers::middleware::SignerMiddleware;
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Address, TxHash, U256};
use quicksnap_types::private_key::PrivateKey;
use quicksnap_types::ClaimData;
use quicksnap_utils::{HttpProvider, Result, SignerClient};

use crate::abi;

/// A [`TransactionSubmitter`](crate::TransactionSubmitter) signing with a local wallet.
#[derive(Debug, Clone)]
pub struct EvmTransactionSubmitter {
    client: Arc<SignerClient>,
}

impl EvmTransactionSubmitter {
    /// Creates a submitter signing with `private_key` for `chain_id`.
    pub fn new(
        provider: HttpProvider,
        private_key: &PrivateKey,
        chain_id: u64,
    ) -> Result<Self> {
        let key =
            ethers::core::k256::SecretKey::from_slice(private_key.as_bytes())?;
        let wallet = LocalWallet::from(key).with_chain_id(chain_id);
        let client = SignerMiddleware::new(provider, wallet);
        Ok(Self {
            client: Arc::new(client),
        })
    }

    /// The chain id transactions are signed for.
    pub fn chain_id(&self) -> u64 {
        self.client.signer().chain_id()
    }

    /// Sends `method` and returns its hash, optionally waiting for confirmations.
    async fn send<A: Tokenize>(
        &self,
        base: &BaseContract,
        address: Address,
        method: &str,
        args: A,
        confirmations: usize,
    ) -> Result<TxHash> {
        let contract =
            Contract::new(address, base.abi().clone(), self.client.clone());
        let call = contract.method::<A, ()>(method, args)?;
        let pending = call.send().await?;
        let tx_hash = *pending;
        tracing::debug!(%address, method, ?tx_hash, "transaction sent");
        if confirmations > 0 {
            let receipt = pending.confirmations(confirmations).await?;
            tracing::debug!(
                ?tx_hash,
                block = ?receipt.and_then(|r| r.block_number),
                "transaction confirmed"
            );
        }
        Ok(tx_hash)
    }
}

fn proof_token(claim: &ClaimData) -> Token {
    Token::Array(
        claim
            .merkle_proof
            .iter()
            .map(|node| Token::FixedBytes(node.as_bytes().to_vec()))
            .collect(),
    )
}

fn claim_token(claim: &ClaimData) -> Token {
    Token::Tuple(vec![
        Token::Address(claim.token),
        Token::Uint(claim.index),
        Token::Uint(claim.amount),
        proof_token(claim),
    ])
}

#[async_trait::async_trait]
impl crate::TransactionSubmitter for EvmTransactionSubmitter {
    fn sender(&self) -> Address {
        self.client.address()
    }

    async fn approve(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> Result<TxHash> {
        self.send(&abi::ERC20, token, "approve", (spender, amount), 1)
            .await
    }

    async fn add_gauge_reward(
        &self,
        bribe: Address,
        gauge: Address,
        token: Address,
        amount: U256,
    ) -> Result<TxHash> {
        self.send(
            &abi::BRIBE,
            bribe,
            "add_reward_amount",
            (gauge, token, amount),
            0,
        )
        .await
    }

    async fn add_proposal_reward(
        &self,
        quicksnap: Address,
        proposal: &str,
        option: u32,
        token: Address,
        amount: U256,
        start: u64,
        end: u64,
    ) -> Result<TxHash> {
        let args = (
            proposal.to_owned(),
            U256::from(option),
            token,
            amount,
            U256::from(start),
            U256::from(end),
        );
        self.send(&abi::QUICKSNAP, quicksnap, "add_reward_amount", args, 1)
            .await
    }

    async fn claim(
        &self,
        distributor: Address,
        account: Address,
        claim: &ClaimData,
    ) -> Result<TxHash> {
        let args = (
            claim.token,
            claim.index,
            account,
            claim.amount,
            proof_token(claim),
        );
        self.send(&abi::MERKLE_DISTRIBUTOR, distributor, "claim", args, 0)
            .await
    }

    async fn claim_multi(
        &self,
        distributor: Address,
        account: Address,
        claims: &[ClaimData],
    ) -> Result<TxHash> {
        let claims = Token::Array(claims.iter().map(claim_token).collect());
        self.send(
            &abi::MERKLE_DISTRIBUTOR,
            distributor,
            "claimMulti",
            (account, claims),
            0,
        )
        .await
    }
}
