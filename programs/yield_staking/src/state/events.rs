use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// Events: Emitted for off-chain indexers/clients to track ledger changes
// ──────────────────────────────────────────────────────────────────────────────
//

/// Emitted once when a stake pool is created.
#[event]
#[derive(Debug)]
pub struct PoolInitialized {
    /// Pool PDA.
    pub stake_pool: Pubkey,
    /// Yield reserve program used to wrap deposits.
    pub yield_program: Pubkey,
    /// Reward token mint.
    pub reward_mint: Pubkey,
    /// Oracle feed pricing the staked asset.
    pub price_feed: Pubkey,
    /// Minimum first stake, in lamports.
    pub min_stake: u64,
    /// Annualized reward rate, in basis points.
    pub annual_rate_bps: u16,
}

/// Emitted after a successful stake.
#[event]
#[derive(Debug, PartialEq, Eq)]
pub struct Staked {
    /// Stakeholder.
    pub account: Pubkey,
    /// Lamports staked by this call.
    pub amount: u64,
}

/// Emitted after a principal withdrawal.
///
/// `reward_paid` is zero when nothing was owed or when the payout was
/// deferred; a deferral is always accompanied by [`RewardPayoutDeferred`].
#[event]
#[derive(Debug, PartialEq, Eq)]
pub struct Withdrawn {
    /// Stakeholder.
    pub account: Pubkey,
    /// Principal withdrawn, in lamports.
    pub amount: u64,
    /// Reward units paid alongside the withdrawal.
    pub reward_paid: u64,
}

/// Emitted when a withdrawal succeeded but the reward pool could not cover
/// the reward owed. The reward stays on the stakeholder record.
#[event]
#[derive(Debug, PartialEq, Eq)]
pub struct RewardPayoutDeferred {
    /// Stakeholder.
    pub account: Pubkey,
    /// Reward units still owed.
    pub owed: u64,
}

/// Emitted when a stakeholder claims rewards without withdrawing.
#[event]
#[derive(Debug, PartialEq, Eq)]
pub struct RewardsClaimed {
    /// Stakeholder.
    pub account: Pubkey,
    /// Reward units paid.
    pub amount: u64,
}

/// Emitted when reward tokens are deposited into the pool.
#[event]
#[derive(Debug)]
pub struct RewardPoolFunded {
    /// Funder.
    pub funder: Pubkey,
    /// Reward units deposited.
    pub amount: u64,
    /// Reward pool balance after funding.
    pub balance: u64,
}
