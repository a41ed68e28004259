//! # Yield Staking Program
//!
//! A native-SOL staking program whose deposits earn twice: the custody wraps
//! every stake in an external yield reserve, and stakeholders accrue a fixed
//! annualized reward valued at the oracle price of SOL.
//!
//! reward = principal * elapsed * annual_rate * price
//!          / (SECONDS_PER_YEAR * PRICE_SCALE * RATE_SCALE)
//!
//! ## Features
//! - Minimum first stake, unrestricted top-ups
//! - Proportional redemption of proxy units on partial withdrawal
//! - Reward payout that fails independently of the principal withdrawal
//! - Stale and non-positive oracle prices rejected
//! - 256-bit intermediate math for accrual
//!
//! The accounting lives in [`engine`] and is independent of Solana accounts;
//! [`adapters`] implement its collaborator traits on top of CPI calls.

use anchor_lang::prelude::*;

declare_id!("FaUbvLASmGJuR21wwso7qjyJr1p9F1GGMxcRCRZeB26q");

pub mod adapters;
pub mod constants;
pub mod engine;
pub mod error;
pub mod instructions;
pub mod state;

use instructions::*;

#[program]
pub mod yield_staking {
    use super::*;

    /// Initializes a stake pool bound to a yield reserve, a reward mint and
    /// a price feed.
    ///
    /// # Arguments
    /// * `ctx` - The context containing all accounts needed for initialization
    /// * `params` - Yield program, price feed, minimum stake, annual rate
    ///   (basis points) and oracle staleness bound (seconds)
    ///
    /// # Errors
    /// Returns an error if:
    /// - Any external handle is the zero address
    /// - The annual rate exceeds the maximum
    /// - The minimum stake or staleness bound is zero
    pub fn initialize(ctx: Context<Initialize>, params: InitializeParams) -> Result<()> {
        instructions::initialize::handler(ctx, params)
    }

    /// Stakes lamports into the pool.
    ///
    /// # Arguments
    /// * `ctx` - The context containing all accounts needed for staking
    /// * `amount` - Lamports to stake
    ///
    /// # Errors
    /// Returns an error if:
    /// - Amount is zero
    /// - A first stake is below the pool minimum
    /// - The oracle price is stale or invalid
    /// - The yield reserve mints no proxy units
    pub fn stake(ctx: Context<Stake>, amount: u64) -> Result<()> {
        instructions::stake::handler(ctx, amount)
    }

    /// Withdraws principal and pays any unpaid reward.
    ///
    /// # Arguments
    /// * `ctx` - The context containing all accounts needed for withdrawing
    /// * `amount` - Lamports of principal to withdraw
    ///
    /// # Errors
    /// Returns an error if:
    /// - Amount is zero or exceeds the staked principal
    /// - The oracle price is stale or invalid
    ///
    /// An insolvent reward pool does not fail the withdrawal; the reward is
    /// deferred and `RewardPayoutDeferred` is emitted.
    pub fn withdraw(ctx: Context<Withdraw>, amount: u64) -> Result<()> {
        instructions::withdraw::handler(ctx, amount)
    }

    /// Claims accumulated rewards without withdrawing.
    ///
    /// # Errors
    /// Returns an error if:
    /// - No rewards are owed
    /// - The reward pool cannot cover the amount owed
    pub fn claim_rewards(ctx: Context<ClaimRewards>) -> Result<()> {
        instructions::claim_rewards::handler(ctx)
    }

    /// Funds the reward pool with reward tokens.
    ///
    /// # Arguments
    /// * `ctx` - The context containing funding accounts
    /// * `amount` - Reward tokens to deposit
    ///
    /// # Errors
    /// Returns an error if amount is zero or insufficient balance.
    pub fn fund_reward_pool(ctx: Context<FundRewardPool>, amount: u64) -> Result<()> {
        instructions::fund_reward_pool::handler(ctx, amount)
    }
}
