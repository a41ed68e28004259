//! Capability traits for the collaborators the staking engine does not own.
//!
//! The program implements these over Solana accounts (see `crate::adapters`);
//! tests implement them with deterministic doubles.

use anchor_lang::prelude::*;

use crate::error::StakingError;

/// A price observation from the value oracle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OraclePrice {
    /// Price scaled by `PRICE_SCALE` (8 decimals).
    pub price: u64,
    /// Unix timestamp of the observation.
    pub updated_at: i64,
}

impl OraclePrice {
    /// Returns the price if it is positive and no older than `max_age`
    /// seconds at `now`. Observations from the future are rejected.
    pub fn ensure_fresh(&self, now: i64, max_age: u64) -> Result<u64> {
        require!(self.price > 0, StakingError::InvalidPrice);

        let age = now
            .checked_sub(self.updated_at)
            .ok_or(StakingError::MathOverflow)?;
        require!(
            age >= 0 && age as u64 <= max_age,
            StakingError::StalePrice
        );

        Ok(self.price)
    }
}

/// External price feed for the staked asset.
pub trait ValueOracle {
    fn latest_price(&self) -> Result<OraclePrice>;
}

/// Read side of the yield source. Settlement only needs this.
pub trait YieldRate {
    /// Base units per proxy unit, scaled by `EXCHANGE_RATE_SCALE`.
    fn exchange_rate(&self) -> Result<u128>;
}

/// External interest-bearing instrument the custody deposits into.
pub trait YieldSource: YieldRate {
    /// Deposits `amount` base units and returns the proxy units minted.
    fn wrap(&mut self, amount: u64) -> Result<u64>;

    /// Redeems `proxy_amount` proxy units and returns the base units received.
    fn unwrap(&mut self, proxy_amount: u64) -> Result<u64>;
}

/// Movement of the base asset and of reward tokens.
pub trait Transfers {
    /// Takes `amount` base units from `from` into custody.
    fn accept(&mut self, from: &Pubkey, amount: u64) -> Result<()>;

    /// Sends `amount` base units from custody to `to`.
    fn release(&mut self, to: &Pubkey, amount: u64) -> Result<()>;

    /// Sends `amount` reward units from the reward vault to `to`.
    fn payout(&mut self, to: &Pubkey, amount: u64) -> Result<()>;
}

/// Handles to the three external collaborators a pool is bound to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolHandles {
    pub yield_source: Pubkey,
    pub reward_token: Pubkey,
    pub value_oracle: Pubkey,
}

impl PoolHandles {
    pub fn validate(&self) -> Result<()> {
        require_keys_neq!(self.yield_source, Pubkey::default(), StakingError::ZeroAddress);
        require_keys_neq!(self.reward_token, Pubkey::default(), StakingError::ZeroAddress);
        require_keys_neq!(self.value_oracle, Pubkey::default(), StakingError::ZeroAddress);
        Ok(())
    }
}
