use anchor_lang::prelude::*;

use crate::engine::vault::RewardVault;
use crate::engine::{AccrualConfig, PoolHandles, RewardPool};

#[account]
pub struct StakePool {
    pub authority: Pubkey,

    pub yield_program: Pubkey,
    pub yield_reserve: Pubkey,
    pub proxy_mint: Pubkey,
    pub proxy_vault: Pubkey,
    pub reward_mint: Pubkey,
    pub reward_vault: Pubkey,
    pub price_feed: Pubkey,

    pub min_stake: u64,
    pub annual_rate_bps: u16,
    pub max_price_age: u64,

    pub total_staked: u64,
    pub total_proxy: u64,
    pub reward_pool_balance: u64,
    pub total_rewards_paid: u64,
    pub staker_count: u64,

    pub last_updated: i64,
    pub created_at: i64,

    pub custody_bump: u8,
    pub reward_vault_bump: u8,
    pub bump: u8,
}

impl StakePool {
    pub const LEN: usize = 8
        + (32 * 8)
        + 8 + 2 + 8
        + (8 * 5)
        + (8 * 2)
        + 3;

    pub fn handles(&self) -> PoolHandles {
        PoolHandles {
            yield_source: self.yield_program,
            reward_token: self.reward_mint,
            value_oracle: self.price_feed,
        }
    }

    pub fn accrual_config(&self) -> AccrualConfig {
        AccrualConfig {
            annual_rate_bps: self.annual_rate_bps,
            min_stake: self.min_stake,
            max_price_age: self.max_price_age,
        }
    }

    pub fn reward_pool(&self) -> RewardPool {
        RewardPool::new(self.reward_pool_balance, self.total_rewards_paid)
    }

    pub fn commit_reward_pool(&mut self, pool: &RewardPool) {
        self.reward_pool_balance = pool.balance();
        self.total_rewards_paid = pool.total_paid();
    }
}
