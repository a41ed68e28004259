//! Program constants for the Yield Staking program.
//!
//! Seeds, time periods, fixed-point scales and the default deployment
//! parameters used by `initialize`.

/// Seed for deriving the stake pool PDA
pub const STAKE_POOL_SEED: &[u8] = b"stake_pool";

/// Seed for deriving stakeholder record PDAs
pub const STAKEHOLDER_SEED: &[u8] = b"stakeholder";

/// Seed for deriving the lamport custody PDA
pub const CUSTODY_SEED: &[u8] = b"custody";

/// Seed for deriving the reward vault PDA
pub const REWARD_VAULT_SEED: &[u8] = b"reward_vault";

/// Seed for deriving the proxy token vault PDA
pub const PROXY_VAULT_SEED: &[u8] = b"proxy_vault";

/// Number of seconds in a year (365 days)
pub const SECONDS_PER_YEAR: u64 = 365 * 86_400;

/// Oracle prices are normalized to 8 decimals
pub const PRICE_SCALE: u64 = 100_000_000;

/// Basis points denominator (100% = 10000 basis points)
pub const RATE_SCALE: u64 = 10_000;

/// Yield reserve exchange rates are scaled by 10^18
pub const EXCHANGE_RATE_SCALE: u128 = 1_000_000_000_000_000_000;

/// Largest number of decimals accepted from an oracle feed
pub const MAX_PRICE_DECIMALS: u8 = 18;

/// Lamports per SOL
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Default minimum first stake (5 SOL)
pub const DEFAULT_MIN_STAKE: u64 = 5 * LAMPORTS_PER_SOL;

/// Default annualized reward rate (10% = 1000 basis points)
pub const DEFAULT_ANNUAL_RATE_BPS: u16 = 1000;

/// Maximum allowed annualized rate (50% = 5000 basis points)
pub const MAX_ANNUAL_RATE_BPS: u16 = 5000;

/// Default oracle staleness bound in seconds
pub const DEFAULT_MAX_PRICE_AGE: u64 = 3_600;
