//! Claim rewards instruction handler.
//!
//! Handles claiming accumulated rewards without withdrawing principal.

use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::adapters::{AccountLedger, ChainlinkFeed, PoolTransfers, ReserveRate};
use crate::constants::*;
use crate::engine::StakingService;
use crate::error::StakingError;
use crate::state::{RewardsClaimed, StakePool, Stakeholder};

/// Accounts required for claiming rewards.
#[derive(Accounts)]
pub struct ClaimRewards<'info> {
    /// The user claiming rewards.
    #[account(mut)]
    pub user: Signer<'info>,

    /// The stake pool.
    #[account(
        mut,
        seeds = [STAKE_POOL_SEED, stake_pool.reward_mint.as_ref()],
        bump = stake_pool.bump
    )]
    pub stake_pool: Box<Account<'info, StakePool>>,

    /// User's stakeholder record.
    #[account(
        mut,
        seeds = [STAKEHOLDER_SEED, stake_pool.key().as_ref(), user.key().as_ref()],
        bump = stakeholder.bump,
        constraint = stakeholder.owner == user.key() @ StakingError::Unauthorized,
        constraint = stakeholder.stake_pool == stake_pool.key() @ StakingError::AccountMismatch
    )]
    pub stakeholder: Box<Account<'info, Stakeholder>>,

    /// Lamport custody PDA.
    #[account(
        mut,
        seeds = [CUSTODY_SEED, stake_pool.key().as_ref()],
        bump = stake_pool.custody_bump
    )]
    pub custody: SystemAccount<'info>,

    /// CHECK: Yield reserve program pinned at initialization.
    #[account(address = stake_pool.yield_program @ StakingError::AccountMismatch)]
    pub yield_program: UncheckedAccount<'info>,

    /// CHECK: Reserve state; read for the exchange rate only. Owner is
    /// checked against `yield_program` when the rate is read.
    #[account(address = stake_pool.yield_reserve @ StakingError::AccountMismatch)]
    pub yield_reserve: UncheckedAccount<'info>,

    /// CHECK: Oracle aggregator pinned at initialization.
    #[account(address = stake_pool.price_feed @ StakingError::AccountMismatch)]
    pub price_feed: UncheckedAccount<'info>,

    /// Pool's reward vault.
    #[account(
        mut,
        seeds = [REWARD_VAULT_SEED, stake_pool.key().as_ref()],
        bump = stake_pool.reward_vault_bump,
        address = stake_pool.reward_vault @ StakingError::AccountMismatch
    )]
    pub reward_vault: Box<Account<'info, TokenAccount>>,

    /// User's token account for receiving rewards.
    #[account(
        mut,
        constraint = user_reward_account.mint == stake_pool.reward_mint @ StakingError::MintMismatch,
        constraint = user_reward_account.owner == user.key() @ StakingError::Unauthorized
    )]
    pub user_reward_account: Box<Account<'info, TokenAccount>>,

    /// System program.
    pub system_program: Program<'info, System>,

    /// Token program.
    pub token_program: Program<'info, Token>,
}

impl<'info> ClaimRewards<'info> {
    /// Claiming never wraps or redeems; settlement only reads the rate.
    fn yield_rate(&self) -> ReserveRate<'info> {
        ReserveRate {
            program: self.yield_program.to_account_info(),
            reserve: self.yield_reserve.to_account_info(),
        }
    }

    fn transfers(&self) -> PoolTransfers<'info> {
        PoolTransfers {
            user: self.user.to_account_info(),
            custody: self.custody.to_account_info(),
            stake_pool: self.stake_pool.to_account_info(),
            system_program: self.system_program.to_account_info(),
            token_program: self.token_program.to_account_info(),
            reward_accounts: Some((
                self.reward_vault.to_account_info(),
                self.user_reward_account.to_account_info(),
            )),
            reward_mint: self.stake_pool.reward_mint,
            pool_bump: self.stake_pool.bump,
            custody_bump: self.stake_pool.custody_bump,
        }
    }
}

/// Claim accumulated rewards.
///
/// Settles the record and pays the whole unpaid reward from the reward
/// vault. Principal is untouched.
///
/// # Errors
/// - `NoRewardsAvailable` if nothing is owed
/// - `RewardPoolInsolvent` if the reward pool cannot cover the amount owed
/// - `RewardPayoutFailed` if the reward transfer fails
pub fn handler(ctx: Context<ClaimRewards>) -> Result<()> {
    let clock = Clock::get()?;
    let user_key = ctx.accounts.user.key();

    let pool = &ctx.accounts.stake_pool;
    let ledger = AccountLedger::load(&ctx.accounts.stakeholder, user_key, pool);
    let mut service = StakingService::new(
        pool.handles(),
        pool.accrual_config(),
        ledger,
        pool.reward_pool(),
        ctx.accounts.yield_rate(),
        ChainlinkFeed::new(ctx.accounts.price_feed.to_account_info()),
        ctx.accounts.transfers(),
    )?;

    let claimed = service.claim_rewards(&user_key, clock.unix_timestamp)?;
    let (ledger, reward_pool) = service.into_parts();

    let stakeholder = &mut ctx.accounts.stakeholder;
    let stake_pool = &mut ctx.accounts.stake_pool;
    ledger.commit(stakeholder, stake_pool);
    stake_pool.commit_reward_pool(&reward_pool);
    stake_pool.last_updated = clock.unix_timestamp;

    emit!(RewardsClaimed {
        account: user_key,
        amount: claimed,
    });

    msg!("Claimed {} reward tokens", claimed);
    msg!("Total rewards claimed by user: {}", stakeholder.total_reward_paid);
    msg!("Total distributed from pool: {}", stake_pool.total_rewards_paid);

    Ok(())
}
