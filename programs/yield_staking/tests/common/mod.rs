//! Deterministic collaborators for driving `StakingService` off-chain.

#![allow(dead_code)]

use anchor_lang::prelude::*;

use yield_staking::constants::{EXCHANGE_RATE_SCALE, LAMPORTS_PER_SOL, PRICE_SCALE};
use yield_staking::engine::{
    AccrualConfig, MemoryLedger, OraclePrice, PoolHandles, RewardPool, StakingService, Transfers,
    ValueOracle, YieldRate, YieldSource,
};
use yield_staking::error::StakingError;

pub const SOL: u64 = LAMPORTS_PER_SOL;
pub const WEEK: i64 = 7 * 86_400;
pub const START: i64 = 1_700_000_000;

/// Reward for 5 SOL over ten weeks at 10% and a price of 1.00.
pub const TEN_WEEK_REWARD_5_SOL: u64 = 95_890_410;

pub struct FixedOracle {
    pub price: u64,
    pub updated_at: i64,
}

impl ValueOracle for FixedOracle {
    fn latest_price(&self) -> Result<OraclePrice> {
        Ok(OraclePrice {
            price: self.price,
            updated_at: self.updated_at,
        })
    }
}

/// Yield source at a fixed exchange rate.
pub struct MockYieldSource {
    pub rate: u128,
    pub fail_wrap: bool,
    pub wrapped: u64,
    pub unwrapped: u64,
}

impl MockYieldSource {
    pub fn at_par() -> Self {
        Self {
            rate: EXCHANGE_RATE_SCALE,
            fail_wrap: false,
            wrapped: 0,
            unwrapped: 0,
        }
    }
}

impl YieldSource for MockYieldSource {
    fn wrap(&mut self, amount: u64) -> Result<u64> {
        if self.fail_wrap {
            return err!(StakingError::InvalidYieldReserve);
        }
        self.wrapped += amount;
        Ok((amount as u128 * EXCHANGE_RATE_SCALE / self.rate) as u64)
    }

    fn unwrap(&mut self, proxy_amount: u64) -> Result<u64> {
        let released = (proxy_amount as u128 * self.rate / EXCHANGE_RATE_SCALE) as u64;
        self.unwrapped += released;
        Ok(released)
    }
}

impl YieldRate for MockYieldSource {
    fn exchange_rate(&self) -> Result<u128> {
        Ok(self.rate)
    }
}

#[derive(Default)]
pub struct RecordingTransfers {
    pub accepted: Vec<(Pubkey, u64)>,
    pub released: Vec<(Pubkey, u64)>,
    pub paid: Vec<(Pubkey, u64)>,
    pub fail_payout: bool,
    pub fail_release: bool,
}

impl RecordingTransfers {
    pub fn total_accepted(&self) -> u64 {
        self.accepted.iter().map(|(_, amount)| amount).sum()
    }

    pub fn total_released(&self) -> u64 {
        self.released.iter().map(|(_, amount)| amount).sum()
    }

    pub fn total_paid(&self) -> u64 {
        self.paid.iter().map(|(_, amount)| amount).sum()
    }
}

impl Transfers for RecordingTransfers {
    fn accept(&mut self, from: &Pubkey, amount: u64) -> Result<()> {
        self.accepted.push((*from, amount));
        Ok(())
    }

    fn release(&mut self, to: &Pubkey, amount: u64) -> Result<()> {
        if self.fail_release {
            return err!(StakingError::AccountMismatch);
        }
        self.released.push((*to, amount));
        Ok(())
    }

    fn payout(&mut self, to: &Pubkey, amount: u64) -> Result<()> {
        if self.fail_payout {
            return err!(StakingError::AccountMismatch);
        }
        self.paid.push((*to, amount));
        Ok(())
    }
}

pub type TestService =
    StakingService<MemoryLedger, RewardPool, MockYieldSource, FixedOracle, RecordingTransfers>;

pub fn handles() -> PoolHandles {
    PoolHandles {
        yield_source: Pubkey::new_unique(),
        reward_token: Pubkey::new_unique(),
        value_oracle: Pubkey::new_unique(),
    }
}

pub fn service_with(handles: PoolHandles, config: AccrualConfig) -> Result<TestService> {
    StakingService::new(
        handles,
        config,
        MemoryLedger::new(),
        RewardPool::default(),
        MockYieldSource::at_par(),
        FixedOracle {
            price: PRICE_SCALE,
            updated_at: START,
        },
        RecordingTransfers::default(),
    )
}

/// Service with the default config, a price of 1.00 and an empty reward pool.
pub fn service() -> TestService {
    service_with(handles(), AccrualConfig::default()).unwrap()
}

/// Moves the oracle's observation to `now` so it is fresh at that time.
pub fn observe(service: &mut TestService, now: i64) {
    service.oracle_mut().updated_at = now;
}
