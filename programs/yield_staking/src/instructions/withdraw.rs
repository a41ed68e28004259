//! Withdraw instruction handler.
//!
//! Redeems the stakeholder's share of proxy units, returns the lamports and
//! pays any unpaid reward.
//!
//! ## Security Guarantees
//! - Only the record owner can withdraw
//! - Principal can never go below zero
//! - An insolvent reward pool defers the reward instead of blocking the
//!   principal

use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::adapters::{AccountLedger, ChainlinkFeed, CpiYieldSource, PoolTransfers};
use crate::constants::*;
use crate::engine::StakingService;
use crate::error::StakingError;
use crate::state::{RewardPayoutDeferred, StakePool, Stakeholder};

/// Accounts required for withdrawing.
#[derive(Accounts)]
pub struct Withdraw<'info> {
    /// The user withdrawing.
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
    /// SECURITY: PDA + owner validation.
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

    /// CHECK: Reserve state; owner re-checked when the rate is read.
    #[account(mut, address = stake_pool.yield_reserve @ StakingError::AccountMismatch)]
    pub yield_reserve: UncheckedAccount<'info>,

    /// CHECK: Reserve liquidity vault; validated by the yield program.
    #[account(mut)]
    pub yield_liquidity_vault: UncheckedAccount<'info>,

    /// CHECK: Proxy token mint pinned at initialization.
    #[account(mut, address = stake_pool.proxy_mint @ StakingError::AccountMismatch)]
    pub proxy_mint: UncheckedAccount<'info>,

    /// CHECK: Pool proxy vault pinned at initialization.
    #[account(mut, address = stake_pool.proxy_vault @ StakingError::AccountMismatch)]
    pub proxy_vault: UncheckedAccount<'info>,

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

impl<'info> Withdraw<'info> {
    fn yield_source(&self) -> CpiYieldSource<'info> {
        CpiYieldSource {
            program: self.yield_program.to_account_info(),
            reserve: self.yield_reserve.to_account_info(),
            liquidity_vault: self.yield_liquidity_vault.to_account_info(),
            proxy_mint: self.proxy_mint.to_account_info(),
            proxy_vault: self.proxy_vault.to_account_info(),
            custody: self.custody.to_account_info(),
            token_program: self.token_program.to_account_info(),
            system_program: self.system_program.to_account_info(),
            stake_pool: self.stake_pool.key(),
            custody_bump: self.stake_pool.custody_bump,
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

/// Withdraw principal from the pool.
///
/// The principal part and the reward part fail independently. When the
/// reward pool cannot cover the reward owed, the withdrawal still commits,
/// the reward stays on the record and `RewardPayoutDeferred` is emitted.
///
/// # Errors
/// - `InvalidWithdrawAmount` if `amount` is zero, exceeds the principal or
///   is too small to redeem a proxy unit
/// - `StalePrice` / `InvalidPrice` / `InvalidTime` from settlement
pub fn handler(ctx: Context<Withdraw>, amount: u64) -> Result<()> {
    let clock = Clock::get()?;
    let user_key = ctx.accounts.user.key();

    let pool = &ctx.accounts.stake_pool;
    let ledger = AccountLedger::load(&ctx.accounts.stakeholder, user_key, pool);
    let mut service = StakingService::new(
        pool.handles(),
        pool.accrual_config(),
        ledger,
        pool.reward_pool(),
        ctx.accounts.yield_source(),
        ChainlinkFeed::new(ctx.accounts.price_feed.to_account_info()),
        ctx.accounts.transfers(),
    )?;

    let receipt = service.withdraw(&user_key, amount, clock.unix_timestamp)?;
    let (ledger, reward_pool) = service.into_parts();

    let stakeholder = &mut ctx.accounts.stakeholder;
    let stake_pool = &mut ctx.accounts.stake_pool;
    ledger.commit(stakeholder, stake_pool);
    stake_pool.commit_reward_pool(&reward_pool);
    stake_pool.last_updated = clock.unix_timestamp;

    emit!(receipt.event());

    msg!(
        "Withdrew {} lamports ({} proxy units redeemed for {})",
        receipt.amount,
        receipt.proxy_released,
        receipt.released
    );

    if let Err(payout_error) = receipt.payout_result() {
        emit!(RewardPayoutDeferred {
            account: user_key,
            owed: stakeholder.accrued_unpaid_reward,
        });
        msg!("Reward payout deferred: {}", payout_error);
        msg!("Reward still owed: {}", stakeholder.accrued_unpaid_reward);
    } else {
        msg!("Reward paid: {}", receipt.payout.paid());
    }
    msg!("Remaining principal: {}", stakeholder.principal);
    msg!("Remaining position value in lamports: {}", receipt.underlying_value);

    Ok(())
}
