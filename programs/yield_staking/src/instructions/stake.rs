//! Stake instruction handler.
//!
//! Takes lamports from the user into custody, wraps them in the yield
//! reserve and credits the stakeholder record.

use anchor_lang::prelude::*;
use anchor_spl::token::Token;

use crate::adapters::{AccountLedger, ChainlinkFeed, CpiYieldSource, PoolTransfers};
use crate::constants::*;
use crate::engine::StakingService;
use crate::error::StakingError;
use crate::state::{StakePool, Stakeholder};

/// Accounts required for staking.
#[derive(Accounts)]
pub struct Stake<'info> {
    /// The user staking lamports.
    #[account(mut)]
    pub user: Signer<'info>,

    /// The stake pool.
    #[account(
        mut,
        seeds = [STAKE_POOL_SEED, stake_pool.reward_mint.as_ref()],
        bump = stake_pool.bump
    )]
    pub stake_pool: Box<Account<'info, StakePool>>,

    /// User's stakeholder record (created if first time staking).
    #[account(
        init_if_needed,
        payer = user,
        space = Stakeholder::LEN,
        seeds = [STAKEHOLDER_SEED, stake_pool.key().as_ref(), user.key().as_ref()],
        bump
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

    /// System program.
    pub system_program: Program<'info, System>,

    /// Token program.
    pub token_program: Program<'info, Token>,
}

impl<'info> Stake<'info> {
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
            reward_accounts: None,
            reward_mint: self.stake_pool.reward_mint,
            pool_bump: self.stake_pool.bump,
            custody_bump: self.stake_pool.custody_bump,
        }
    }
}

/// Stake lamports into the pool.
///
/// A first stake must reach the pool minimum; top-ups may be any positive
/// amount. Reward accrued so far is settled into the unpaid balance.
pub fn handler(ctx: Context<Stake>, amount: u64) -> Result<()> {
    let clock = Clock::get()?;
    let user_key = ctx.accounts.user.key();
    let stake_pool_key = ctx.accounts.stake_pool.key();

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

    let receipt = service.stake(&user_key, amount, clock.unix_timestamp)?;
    let (ledger, _) = service.into_parts();

    // Update stakeholder record
    let stakeholder = &mut ctx.accounts.stakeholder;
    if !stakeholder.is_initialized() {
        stakeholder.owner = user_key;
        stakeholder.stake_pool = stake_pool_key;
        stakeholder.bump = ctx.bumps.stakeholder;
    }

    let stake_pool = &mut ctx.accounts.stake_pool;
    ledger.commit(stakeholder, stake_pool);
    stake_pool.last_updated = clock.unix_timestamp;

    emit!(receipt.event());

    msg!(
        "Staked {} lamports for {} proxy units",
        receipt.amount,
        receipt.proxy_minted
    );
    msg!("Reward settled: {}", receipt.reward_accrued);
    msg!("Total staked by user: {}", stakeholder.principal);
    msg!("Position value in lamports: {}", receipt.underlying_value);

    Ok(())
}
