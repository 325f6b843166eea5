//! GraphQL documents sent to the subgraph, the snapshot hub and the backend.

/// Subgraph: every reward added to one proposal.
pub const REWARDS_BY_PROPOSAL: &str = r#"
query RewardsByProposal($id: String!) {
  rewardAddeds(where: { proposal: $id }) {
    id
    proposal
    option
    reward_token
    amount
    startTime
    endTime
  }
}
"#;

/// Subgraph: one page of the rewards whose window contains `$time`.
pub const ACTIVE_REWARDS: &str = r#"
query ActiveRewards($time: Int!, $skip: Int!) {
  rewardAddeds(
    first: 1000
    skip: $skip
    where: { startTime_lte: $time, endTime_gte: $time }
  ) {
    id
    proposal
    option
    reward_token
    amount
    startTime
    endTime
  }
}
"#;

/// Snapshot hub: the fields of a proposal shown next to its incentives.
pub const PROPOSAL: &str = r#"
query Proposal($id: String!) {
  proposal(id: $id) {
    id
    title
    choices
    state
    start
    end
    space {
      id
      name
    }
  }
}
"#;

/// Backend: merkle claims of an account, plus the global claim totals.
pub const CLAIMS: &str = r#"
query Claims($account: String!) {
  claims(account: $account) {
    token
    index
    amount
    merkleProof
  }
  claimInfo {
    totalBalance
    totalClaimed
  }
}
"#;

/// Backend: records a snapshot incentive deposited on chain.
pub const ADD_SNAPSHOT_BRIBE: &str = r#"
mutation AddSnapshotBribe(
  $tx: String!
  $space: String!
  $proposal: String!
  $option: Int!
  $token: String!
  $amount: Float!
  $start: Int!
  $end: Int!
) {
  addSnapshotBribe(
    tx: $tx
    space: $space
    proposal: $proposal
    option: $option
    token: $token
    amount: $amount
    start: $start
    end: $end
  ) {
    success
  }
}
"#;

/// Page size of the subgraph, the largest `first` it accepts.
pub const PAGE_SIZE: usize = 1000;
