//! Reward accrual.
//!
//! Rewards accrue linearly on principal, converted into the reward unit by the
//! oracle price:
//!
//! ```text
//! reward = principal * elapsed * annual_rate_bps * price
//!          / (SECONDS_PER_YEAR * PRICE_SCALE * RATE_SCALE)
//! ```
//!
//! The product is evaluated in 256-bit integers and floored once, so a
//! stakeholder never gains more than the truncation of the exact value.

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::engine::ledger::StakeRecord;
use crate::error::StakingError;

// Expanded in its own module so the macro's bare `Result` does not resolve to
// `anchor_lang::prelude::Result`.
mod u256 {
    use uint::construct_uint;

    construct_uint! {
        pub struct U256(4);
    }
}
pub use u256::U256;

/// Deployment parameters of a pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccrualConfig {
    /// Annualized reward rate in basis points.
    pub annual_rate_bps: u16,
    /// Minimum amount of an account's first stake.
    pub min_stake: u64,
    /// Oldest oracle observation accepted, in seconds.
    pub max_price_age: u64,
}

impl Default for AccrualConfig {
    fn default() -> Self {
        Self {
            annual_rate_bps: DEFAULT_ANNUAL_RATE_BPS,
            min_stake: DEFAULT_MIN_STAKE,
            max_price_age: DEFAULT_MAX_PRICE_AGE,
        }
    }
}

impl AccrualConfig {
    pub fn validate(&self) -> Result<()> {
        require!(
            self.annual_rate_bps <= MAX_ANNUAL_RATE_BPS,
            StakingError::RateTooHigh
        );
        require!(self.min_stake > 0, StakingError::InvalidConfig);
        require!(self.max_price_age > 0, StakingError::InvalidConfig);
        Ok(())
    }
}

/// Pure settlement of a single stake record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccrualEngine {
    annual_rate_bps: u16,
}

impl AccrualEngine {
    pub fn new(annual_rate_bps: u16) -> Self {
        Self { annual_rate_bps }
    }

    /// Settles `record` up to `now`.
    ///
    /// Returns the record with its checkpoint moved to `now` and the reward
    /// earned since the previous checkpoint. The reward is not added to
    /// `accrued_unpaid_reward`; the caller owns that step.
    ///
    /// # Errors
    /// - `InvalidTime` if `now` is before the record's checkpoint
    /// - `MathOverflow` if the reward does not fit in a `u64`
    pub fn settle(
        &self,
        record: &StakeRecord,
        now: i64,
        price: u64,
        exchange_rate: u128,
    ) -> Result<(StakeRecord, u64)> {
        let reward = self.preview(record, now, price)?;

        let settled = StakeRecord {
            last_accrual_timestamp: now,
            last_exchange_rate: exchange_rate,
            ..*record
        };

        Ok((settled, reward))
    }

    /// Reward that `settle` would report at `now`, without moving the
    /// checkpoint.
    pub fn preview(&self, record: &StakeRecord, now: i64, price: u64) -> Result<u64> {
        require!(
            now >= record.last_accrual_timestamp,
            StakingError::InvalidTime
        );

        if record.principal == 0 {
            return Ok(0);
        }

        let elapsed = now
            .checked_sub(record.last_accrual_timestamp)
            .ok_or(StakingError::MathOverflow)? as u64;

        self.reward_for(record.principal, elapsed, price)
    }

    fn reward_for(&self, principal: u64, elapsed: u64, price: u64) -> Result<u64> {
        if elapsed == 0 || price == 0 || self.annual_rate_bps == 0 {
            return Ok(0);
        }

        let numerator = U256::from(principal)
            .checked_mul(U256::from(elapsed))
            .and_then(|v| v.checked_mul(U256::from(self.annual_rate_bps)))
            .and_then(|v| v.checked_mul(U256::from(price)))
            .ok_or(StakingError::MathOverflow)?;

        let denominator = U256::from(SECONDS_PER_YEAR)
            * U256::from(PRICE_SCALE)
            * U256::from(RATE_SCALE);

        let reward = numerator / denominator;
        require!(
            reward <= U256::from(u64::MAX),
            StakingError::MathOverflow
        );

        Ok(reward.low_u64())
    }
}
