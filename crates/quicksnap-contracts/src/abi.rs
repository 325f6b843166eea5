use ethers::abi::parse_abi;
use ethers::contract::BaseContract;
use once_cell::sync::Lazy;

fn human_readable(signatures: &[&str]) -> BaseContract {
    let abi = parse_abi(signatures).expect("human readable abi is valid");
    BaseContract::from(abi)
}

/// The ERC-20 surface we use.
pub static ERC20: Lazy<BaseContract> = Lazy::new(|| {
    human_readable(&[
        "function name() external view returns (string)",
        "function symbol() external view returns (string)",
        "function decimals() external view returns (uint8)",
        "function totalSupply() external view returns (uint256)",
        "function balanceOf(address owner) external view returns (uint256)",
        "function allowance(address owner, address spender) external view returns (uint256)",
        "function approve(address spender, uint256 amount) external returns (bool)",
    ])
});

/// Curve style gauge controller.
pub static GAUGE_CONTROLLER: Lazy<BaseContract> = Lazy::new(|| {
    human_readable(&[
        "function gauge_types(address gauge) external view returns (int128)",
        "function get_gauge_weight(address gauge) external view returns (uint256)",
        "function n_gauges() external view returns (int128)",
        "function gauges(uint256 index) external view returns (address)",
    ])
});

/// Liquidity gauges, `lp_token` for Curve, `staking_token` for Angle.
pub static GAUGE: Lazy<BaseContract> = Lazy::new(|| {
    human_readable(&[
        "function lp_token() external view returns (address)",
        "function staking_token() external view returns (address)",
    ])
});

/// Gauge bribe ledger.
pub static BRIBE: Lazy<BaseContract> = Lazy::new(|| {
    human_readable(&[
        "function rewards_per_gauge(address gauge) external view returns (address[])",
        "function _reward_per_gauge(uint256 period, address gauge, address token) external view returns (uint256)",
        "function add_reward_amount(address gauge, address reward_token, uint256 amount) external returns (bool)",
    ])
});

/// Legacy snapshot bribe, keeping rewards per proposal.
pub static SNAPSHOT_BRIBE: Lazy<BaseContract> = Lazy::new(|| {
    human_readable(&[
        "struct Reward { uint256 amount; uint256 option; address token; }",
        "function rewards_per_proposal(string proposal) external view returns (Reward[])",
    ])
});

/// QuickSnap proposal incentives.
pub static QUICKSNAP: Lazy<BaseContract> = Lazy::new(|| {
    human_readable(&[
        "function add_reward_amount(string proposal, uint256 option, address reward_token, uint256 amount, uint256 start_time, uint256 end_time) external returns (bool)",
    ])
});

/// Merkle distributor rewards are claimed from.
pub static MERKLE_DISTRIBUTOR: Lazy<BaseContract> = Lazy::new(|| {
    human_readable(&[
        "struct Claim { address token; uint256 index; uint256 amount; bytes32[] merkleProof; }",
        "function claim(address token, uint256 index, address account, uint256 amount, bytes32[] merkleProof) external",
        "function claimMulti(address account, Claim[] claims) external",
    ])
});
