use anchor_lang::prelude::*;

use crate::engine::StakeRecord;

/// On-chain ledger entry for one `(pool, owner)` pair.
///
/// Created on the first stake and never closed; a fully withdrawn account
/// stays at zero principal and can stake again.
#[account]
pub struct Stakeholder {
    pub owner: Pubkey,
    pub stake_pool: Pubkey,

    pub principal: u64,
    pub proxy_balance: u64,
    pub accrued_unpaid_reward: u64,
    pub total_reward_paid: u64,

    pub last_accrual_timestamp: i64,
    pub last_exchange_rate: u128,

    pub bump: u8,
}

impl Stakeholder {
    pub const LEN: usize = 8 + 32 + 32 + 8 + 8 + 8 + 8 + 8 + 16 + 1;

    pub fn is_initialized(&self) -> bool {
        self.owner != Pubkey::default()
    }

    pub fn record(&self) -> StakeRecord {
        StakeRecord {
            principal: self.principal,
            proxy_balance: self.proxy_balance,
            last_accrual_timestamp: self.last_accrual_timestamp,
            accrued_unpaid_reward: self.accrued_unpaid_reward,
            total_reward_paid: self.total_reward_paid,
            last_exchange_rate: self.last_exchange_rate,
        }
    }

    pub fn store(&mut self, record: &StakeRecord) {
        self.principal = record.principal;
        self.proxy_balance = record.proxy_balance;
        self.last_accrual_timestamp = record.last_accrual_timestamp;
        self.accrued_unpaid_reward = record.accrued_unpaid_reward;
        self.total_reward_paid = record.total_reward_paid;
        self.last_exchange_rate = record.last_exchange_rate;
    }
}
