use anchor_lang::prelude::*;

use crate::engine::{LedgerTotals, StakeLedger, StakeRecord};
use crate::error::StakingError;
use crate::state::{StakePool, Stakeholder};

/// Ledger view over a single `Stakeholder` account and the pool counters.
///
/// Loaded before the engine runs and committed back only after it returns
/// successfully, so a failed instruction never leaves a half-written record.
pub struct AccountLedger {
    owner: Pubkey,
    record: StakeRecord,
    totals: LedgerTotals,
}

impl AccountLedger {
    pub fn load(stakeholder: &Stakeholder, owner: Pubkey, pool: &StakePool) -> Self {
        Self {
            owner,
            record: stakeholder.record(),
            totals: LedgerTotals {
                staked: pool.total_staked,
                proxy: pool.total_proxy,
            },
        }
    }

    /// Writes the record and counters back, keeping `staker_count` in step
    /// with accounts that hold principal.
    pub fn commit(&self, stakeholder: &mut Stakeholder, pool: &mut StakePool) {
        let was_staking = stakeholder.principal > 0;
        let is_staking = self.record.principal > 0;

        if !was_staking && is_staking {
            pool.staker_count = pool.staker_count.saturating_add(1);
        } else if was_staking && !is_staking {
            pool.staker_count = pool.staker_count.saturating_sub(1);
        }

        stakeholder.store(&self.record);
        pool.total_staked = self.totals.staked;
        pool.total_proxy = self.totals.proxy;
    }
}

impl StakeLedger for AccountLedger {
    fn get(&self, account: &Pubkey) -> Result<StakeRecord> {
        require_keys_eq!(*account, self.owner, StakingError::Unauthorized);
        Ok(self.record)
    }

    fn put(&mut self, account: &Pubkey, record: StakeRecord) -> Result<()> {
        require_keys_eq!(*account, self.owner, StakingError::Unauthorized);
        self.record = record;
        Ok(())
    }

    fn total_staked(&self) -> u64 {
        self.totals.staked
    }

    fn total_proxy(&self) -> u64 {
        self.totals.proxy
    }

    fn credit_total(&mut self, amount: u64, proxy: u64) -> Result<()> {
        self.totals.credit(amount, proxy)
    }

    fn debit_total(&mut self, amount: u64, proxy: u64) -> Result<()> {
        self.totals.debit(amount, proxy)
    }
}
