/// Fund reward pool instruction handler.
///
/// Handles depositing reward tokens into the reward vault.
///
/// ## Security Guarantees
/// - Reward vault validation ensures correct PDA
/// - Mint validation prevents wrong token deposits
/// - Anyone can fund (no admin restriction)

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::engine::RewardVault;
use crate::error::StakingError;
use crate::state::{RewardPoolFunded, StakePool};

/// Accounts required for funding the reward pool.
///
/// ## Security Notes
/// - Reward vault must match the pool's reward vault
/// - Funder token account must be for the reward mint
#[derive(Accounts)]
pub struct FundRewardPool<'info> {
    /// The funder (anyone can fund - no admin restriction).
    #[account(mut)]
    pub funder: Signer<'info>,

    /// The stake pool.
    #[account(
        mut,
        seeds = [STAKE_POOL_SEED, stake_pool.reward_mint.as_ref()],
        bump = stake_pool.bump,
        has_one = reward_vault @ StakingError::AccountMismatch
    )]
    pub stake_pool: Box<Account<'info, StakePool>>,

    /// Funder's token account.
    /// SECURITY: Mint and owner validation.
    #[account(
        mut,
        constraint = funder_token_account.mint == stake_pool.reward_mint @ StakingError::MintMismatch,
        constraint = funder_token_account.owner == funder.key() @ StakingError::Unauthorized
    )]
    pub funder_token_account: Account<'info, TokenAccount>,

    /// Pool's reward vault.
    #[account(
        mut,
        seeds = [REWARD_VAULT_SEED, stake_pool.key().as_ref()],
        bump = stake_pool.reward_vault_bump,
        constraint = reward_vault.owner == stake_pool.key() @ StakingError::AccountMismatch,
        constraint = reward_vault.mint == stake_pool.reward_mint @ StakingError::MintMismatch
    )]
    pub reward_vault: Account<'info, TokenAccount>,

    /// Token program.
    pub token_program: Program<'info, Token>,
}

/// Fund the reward pool with reward tokens.
///
/// # Errors
/// - `ZeroAmount` if `amount` is zero
/// - `MathOverflow` if the tracked balance would overflow
pub fn handler(ctx: Context<FundRewardPool>, amount: u64) -> Result<()> {
    // === INPUT VALIDATION ===

    require!(amount > 0, StakingError::ZeroAmount);

    let mut reward_pool = ctx.accounts.stake_pool.reward_pool();
    reward_pool.fund(amount)?;

    // === TOKEN TRANSFER ===

    let cpi_accounts = Transfer {
        from: ctx.accounts.funder_token_account.to_account_info(),
        to: ctx.accounts.reward_vault.to_account_info(),
        authority: ctx.accounts.funder.to_account_info(),
    };
    let cpi_program = ctx.accounts.token_program.to_account_info();
    let cpi_ctx = CpiContext::new(cpi_program, cpi_accounts);
    token::transfer(cpi_ctx, amount)?;

    // === STATE UPDATE ===

    let stake_pool = &mut ctx.accounts.stake_pool;
    stake_pool.commit_reward_pool(&reward_pool);
    stake_pool.last_updated = Clock::get()?.unix_timestamp;

    emit!(RewardPoolFunded {
        funder: ctx.accounts.funder.key(),
        amount,
        balance: reward_pool.balance(),
    });

    msg!("Reward pool funded with {} tokens", amount);
    msg!("Tracked reward balance: {}", reward_pool.balance());
    msg!("Funder: {}", ctx.accounts.funder.key());

    Ok(())
}
