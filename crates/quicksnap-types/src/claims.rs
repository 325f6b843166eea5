use ethers::types::{Address, H256, U256};
use serde::{Deserialize, Serialize};

/// One merkle distributor claim, as published by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimData {
    /// The reward token.
    pub token: Address,
    /// Leaf index in the distribution tree.
    pub index: U256,
    /// Claimable amount, in the token's smallest unit.
    pub amount: U256,
    /// Proof of the leaf against the published root.
    pub merkle_proof: Vec<H256>,
}

/// Claim totals across every account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimInfo {
    /// Total amount ever distributed, in USD.
    pub total_balance: f64,
    /// Total amount already claimed, in USD.
    pub total_claimed: f64,
}
