/// Initialize instruction handler.
///
/// Creates a stake pool bound to a yield reserve, a reward mint and a price
/// feed.
///
/// ## Security Guarantees
/// - Reward vault and proxy vault are PDAs whose authority is fixed at creation
/// - The three external handles are locked into pool state
/// - All parameters validated before storage

use anchor_lang::prelude::*;
use anchor_lang::system_program;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::*;
use crate::engine::{AccrualConfig, PoolHandles};
use crate::error::StakingError;
use crate::state::{PoolInitialized, StakePool};

/// Deployment parameters of a pool.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug)]
pub struct InitializeParams {
    /// Yield reserve program that wraps deposits.
    pub yield_program: Pubkey,
    /// Oracle feed pricing the staked asset.
    pub price_feed: Pubkey,
    /// Minimum first stake, in lamports.
    pub min_stake: u64,
    /// Annualized reward rate, in basis points.
    pub annual_rate_bps: u16,
    /// Oldest accepted oracle observation, in seconds.
    pub max_price_age: u64,
}

impl Default for InitializeParams {
    fn default() -> Self {
        let config = AccrualConfig::default();
        Self {
            yield_program: Pubkey::default(),
            price_feed: Pubkey::default(),
            min_stake: config.min_stake,
            annual_rate_bps: config.annual_rate_bps,
            max_price_age: config.max_price_age,
        }
    }
}

/// Accounts required for pool initialization.
///
/// ## Security Notes
/// - `reward_vault` is a PDA token account with `stake_pool` as authority
/// - `proxy_vault` is a PDA token account with the custody PDA as authority,
///   so only custody can sign redemptions
/// - `yield_reserve` must be owned by the configured yield program
#[derive(Accounts)]
#[instruction(params: InitializeParams)]
pub struct Initialize<'info> {
    /// The authority creating the pool; pays for all accounts.
    #[account(mut)]
    pub authority: Signer<'info>,

    /// The reward token mint.
    pub reward_mint: Box<Account<'info, Mint>>,

    /// The stake pool account to be created.
    /// SECURITY: PDA derived from STAKE_POOL_SEED + reward mint ensures uniqueness per reward token.
    #[account(
        init,
        payer = authority,
        space = StakePool::LEN,
        seeds = [STAKE_POOL_SEED, reward_mint.key().as_ref()],
        bump
    )]
    pub stake_pool: Box<Account<'info, StakePool>>,

    /// The vault that will hold reward tokens.
    #[account(
        init,
        payer = authority,
        seeds = [REWARD_VAULT_SEED, stake_pool.key().as_ref()],
        bump,
        token::mint = reward_mint,
        token::authority = stake_pool
    )]
    pub reward_vault: Box<Account<'info, TokenAccount>>,

    /// Lamport custody PDA; funded to rent exemption here.
    #[account(
        mut,
        seeds = [CUSTODY_SEED, stake_pool.key().as_ref()],
        bump
    )]
    pub custody: SystemAccount<'info>,

    /// CHECK: Yield reserve program; executable and pinned by `params.yield_program`.
    #[account(
        executable,
        address = params.yield_program @ StakingError::AccountMismatch
    )]
    pub yield_program: UncheckedAccount<'info>,

    /// CHECK: Reserve state of the yield program; owner checked against it.
    #[account(
        constraint = *yield_reserve.owner == yield_program.key() @ StakingError::InvalidYieldReserve
    )]
    pub yield_reserve: UncheckedAccount<'info>,

    /// Mint of the proxy tokens issued by the yield reserve.
    pub proxy_mint: Box<Account<'info, Mint>>,

    /// Token account holding the pool's proxy tokens.
    #[account(
        init,
        payer = authority,
        seeds = [PROXY_VAULT_SEED, stake_pool.key().as_ref()],
        bump,
        token::mint = proxy_mint,
        token::authority = custody
    )]
    pub proxy_vault: Box<Account<'info, TokenAccount>>,

    /// CHECK: Oracle aggregator; layout validated on every read.
    #[account(address = params.price_feed @ StakingError::AccountMismatch)]
    pub price_feed: UncheckedAccount<'info>,

    /// System program for account creation.
    pub system_program: Program<'info, System>,

    /// Token program for token account operations.
    pub token_program: Program<'info, Token>,

    /// Rent sysvar for rent-exempt calculations.
    pub rent: Sysvar<'info, Rent>,
}

/// Initialize a new stake pool.
///
/// # Errors
/// - `ZeroAddress` if the yield program, reward mint or price feed is unset
/// - `RateTooHigh` if the annual rate exceeds `MAX_ANNUAL_RATE_BPS`
/// - `InvalidConfig` if the minimum stake or staleness bound is zero
pub fn handler(ctx: Context<Initialize>, params: InitializeParams) -> Result<()> {
    // === INPUT VALIDATION ===

    let handles = PoolHandles {
        yield_source: params.yield_program,
        reward_token: ctx.accounts.reward_mint.key(),
        value_oracle: params.price_feed,
    };
    handles.validate()?;

    let config = AccrualConfig {
        annual_rate_bps: params.annual_rate_bps,
        min_stake: params.min_stake,
        max_price_age: params.max_price_age,
    };
    config.validate()?;

    // === CUSTODY FUNDING ===

    let rent_exempt = Rent::get()?.minimum_balance(0);
    let custody_lamports = ctx.accounts.custody.lamports();
    if custody_lamports < rent_exempt {
        let cpi_accounts = system_program::Transfer {
            from: ctx.accounts.authority.to_account_info(),
            to: ctx.accounts.custody.to_account_info(),
        };
        let cpi_ctx = CpiContext::new(ctx.accounts.system_program.to_account_info(), cpi_accounts);
        system_program::transfer(cpi_ctx, rent_exempt - custody_lamports)?;
    }

    // === STATE INITIALIZATION ===

    let clock = Clock::get()?;
    let stake_pool_key = ctx.accounts.stake_pool.key();
    let reward_vault_key = ctx.accounts.reward_vault.key();
    let proxy_mint_key = ctx.accounts.proxy_mint.key();
    let proxy_vault_key = ctx.accounts.proxy_vault.key();
    let yield_reserve_key = ctx.accounts.yield_reserve.key();

    let stake_pool = &mut ctx.accounts.stake_pool;
    stake_pool.authority = ctx.accounts.authority.key();
    stake_pool.yield_program = handles.yield_source;
    stake_pool.yield_reserve = yield_reserve_key;
    stake_pool.proxy_mint = proxy_mint_key;
    stake_pool.proxy_vault = proxy_vault_key;
    stake_pool.reward_mint = handles.reward_token;
    stake_pool.reward_vault = reward_vault_key;
    stake_pool.price_feed = handles.value_oracle;

    stake_pool.min_stake = config.min_stake;
    stake_pool.annual_rate_bps = config.annual_rate_bps;
    stake_pool.max_price_age = config.max_price_age;

    stake_pool.total_staked = 0;
    stake_pool.total_proxy = 0;
    stake_pool.reward_pool_balance = 0;
    stake_pool.total_rewards_paid = 0;
    stake_pool.staker_count = 0;
    stake_pool.created_at = clock.unix_timestamp;
    stake_pool.last_updated = clock.unix_timestamp;

    stake_pool.bump = ctx.bumps.stake_pool;
    stake_pool.custody_bump = ctx.bumps.custody;
    stake_pool.reward_vault_bump = ctx.bumps.reward_vault;

    emit!(PoolInitialized {
        stake_pool: stake_pool_key,
        yield_program: handles.yield_source,
        reward_mint: handles.reward_token,
        price_feed: handles.value_oracle,
        min_stake: config.min_stake,
        annual_rate_bps: config.annual_rate_bps,
    });

    msg!("Yield Staking Pool initialized successfully");
    msg!("Yield program: {}", handles.yield_source);
    msg!("Reward mint: {}", handles.reward_token);
    msg!("Price feed: {}", handles.value_oracle);
    msg!(
        "Min stake: {} lamports, Rate: {}bp, Max price age: {}s",
        config.min_stake,
        config.annual_rate_bps,
        config.max_price_age
    );

    Ok(())
}
