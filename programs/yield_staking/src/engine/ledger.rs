//! Per-account stake records and the global staked total.

use std::collections::BTreeMap;

use anchor_lang::prelude::*;

use crate::constants::EXCHANGE_RATE_SCALE;
use crate::error::StakingError;

/// Ledger entry of a single stakeholder.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StakeRecord {
    /// Base units currently staked.
    pub principal: u64,
    /// Proxy units held for this stakeholder.
    pub proxy_balance: u64,
    /// Last settlement time.
    pub last_accrual_timestamp: i64,
    /// Reward units settled but not yet paid.
    pub accrued_unpaid_reward: u64,
    /// Reward units paid over the record's lifetime.
    pub total_reward_paid: u64,
    /// Exchange rate observed at the last settlement.
    pub last_exchange_rate: u128,
}

impl StakeRecord {
    /// Adds a deposit and the proxy units it was wrapped into.
    pub fn credit(&self, amount: u64, proxy: u64) -> Result<Self> {
        Ok(Self {
            principal: self
                .principal
                .checked_add(amount)
                .ok_or(StakingError::MathOverflow)?,
            proxy_balance: self
                .proxy_balance
                .checked_add(proxy)
                .ok_or(StakingError::MathOverflow)?,
            ..*self
        })
    }

    /// Removes a withdrawal and the proxy units released for it.
    pub fn debit(&self, amount: u64, proxy: u64) -> Result<Self> {
        Ok(Self {
            principal: self
                .principal
                .checked_sub(amount)
                .ok_or(StakingError::Underflow)?,
            proxy_balance: self
                .proxy_balance
                .checked_sub(proxy)
                .ok_or(StakingError::Underflow)?,
            ..*self
        })
    }

    pub fn add_reward(&self, reward: u64) -> Result<Self> {
        Ok(Self {
            accrued_unpaid_reward: self
                .accrued_unpaid_reward
                .checked_add(reward)
                .ok_or(StakingError::MathOverflow)?,
            ..*self
        })
    }

    /// Clears `paid` from the unpaid reward and books it as paid.
    pub fn mark_paid(&self, paid: u64) -> Result<Self> {
        Ok(Self {
            accrued_unpaid_reward: self
                .accrued_unpaid_reward
                .checked_sub(paid)
                .ok_or(StakingError::Underflow)?,
            total_reward_paid: self
                .total_reward_paid
                .checked_add(paid)
                .ok_or(StakingError::MathOverflow)?,
            ..*self
        })
    }

    /// Proxy units backing `amount` of principal.
    ///
    /// Proportional to the share of principal withdrawn, floored; a full
    /// withdrawal releases the whole proxy balance so no dust is stranded.
    pub fn proxy_share(&self, amount: u64) -> Result<u64> {
        require!(amount <= self.principal, StakingError::Underflow);
        if amount == self.principal {
            return Ok(self.proxy_balance);
        }

        let share = (self.proxy_balance as u128)
            .checked_mul(amount as u128)
            .ok_or(StakingError::MathOverflow)?
            / self.principal as u128;

        Ok(u64::try_from(share).map_err(|_| StakingError::MathOverflow)?)
    }

    /// Base-unit value of the proxy balance at `exchange_rate`.
    pub fn underlying_value(&self, exchange_rate: u128) -> Result<u64> {
        let value = (self.proxy_balance as u128)
            .checked_mul(exchange_rate)
            .ok_or(StakingError::MathOverflow)?
            / EXCHANGE_RATE_SCALE;

        Ok(u64::try_from(value).map_err(|_| StakingError::MathOverflow)?)
    }
}

/// Storage for stake records.
///
/// `put` replaces a record wholesale; callers read, settle, mutate and write
/// back rather than patching fields in place.
pub trait StakeLedger {
    /// Record of `account`, zero-valued when the account never staked.
    fn get(&self, account: &Pubkey) -> Result<StakeRecord>;

    fn put(&mut self, account: &Pubkey, record: StakeRecord) -> Result<()>;

    /// Sum of all principals.
    fn total_staked(&self) -> u64;

    /// Sum of all proxy balances.
    fn total_proxy(&self) -> u64;

    fn credit_total(&mut self, amount: u64, proxy: u64) -> Result<()>;

    fn debit_total(&mut self, amount: u64, proxy: u64) -> Result<()>;
}

/// Pool-wide counters shared by every ledger implementation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LedgerTotals {
    pub staked: u64,
    pub proxy: u64,
}

impl LedgerTotals {
    pub fn credit(&mut self, amount: u64, proxy: u64) -> Result<()> {
        let staked = self
            .staked
            .checked_add(amount)
            .ok_or(StakingError::MathOverflow)?;
        let total_proxy = self
            .proxy
            .checked_add(proxy)
            .ok_or(StakingError::MathOverflow)?;

        self.staked = staked;
        self.proxy = total_proxy;
        Ok(())
    }

    pub fn debit(&mut self, amount: u64, proxy: u64) -> Result<()> {
        let staked = self
            .staked
            .checked_sub(amount)
            .ok_or(StakingError::Underflow)?;
        let total_proxy = self
            .proxy
            .checked_sub(proxy)
            .ok_or(StakingError::Underflow)?;

        self.staked = staked;
        self.proxy = total_proxy;
        Ok(())
    }
}

/// In-memory ledger keyed by account.
#[derive(Clone, Debug, Default)]
pub struct MemoryLedger {
    records: BTreeMap<Pubkey, StakeRecord>,
    totals: LedgerTotals,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl StakeLedger for MemoryLedger {
    fn get(&self, account: &Pubkey) -> Result<StakeRecord> {
        Ok(self.records.get(account).copied().unwrap_or_default())
    }

    fn put(&mut self, account: &Pubkey, record: StakeRecord) -> Result<()> {
        self.records.insert(*account, record);
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

#[cfg(test)]
mod tests {
    use super::*;

    fn record(principal: u64, proxy_balance: u64) -> StakeRecord {
        StakeRecord {
            principal,
            proxy_balance,
            ..StakeRecord::default()
        }
    }

    #[test]
    fn debit_below_zero_is_underflow() {
        let err = record(10, 10).debit(11, 0).unwrap_err();
        assert_eq!(err, StakingError::Underflow.into());

        let err = record(10, 10).debit(5, 11).unwrap_err();
        assert_eq!(err, StakingError::Underflow.into());
    }

    #[test]
    fn proxy_share_is_proportional_and_floored() {
        let rec = record(5_000, 4_999);

        assert_eq!(rec.proxy_share(2_000).unwrap(), 1_999);
        assert_eq!(rec.proxy_share(5_000).unwrap(), 4_999);
        assert_eq!(rec.proxy_share(0).unwrap(), 0);
    }

    #[test]
    fn mark_paid_moves_reward_to_total() {
        let rec = StakeRecord {
            accrued_unpaid_reward: 70,
            total_reward_paid: 30,
            ..StakeRecord::default()
        };

        let paid = rec.mark_paid(70).unwrap();

        assert_eq!(paid.accrued_unpaid_reward, 0);
        assert_eq!(paid.total_reward_paid, 100);
    }

    #[test]
    fn underlying_value_uses_exchange_rate() {
        let rec = record(0, 1_000);
        let rate = EXCHANGE_RATE_SCALE * 3 / 2;

        assert_eq!(rec.underlying_value(rate).unwrap(), 1_500);
    }

    #[test]
    fn memory_ledger_defaults_to_zero_record() {
        let ledger = MemoryLedger::new();
        let who = Pubkey::new_unique();

        assert_eq!(ledger.get(&who).unwrap(), StakeRecord::default());
        assert!(ledger.is_empty());
    }

    #[test]
    fn totals_reject_underflow_without_partial_update() {
        let mut totals = LedgerTotals { staked: 10, proxy: 5 };

        let err = totals.debit(3, 6).unwrap_err();

        assert_eq!(err, StakingError::Underflow.into());
        assert_eq!(totals, LedgerTotals { staked: 10, proxy: 5 });
    }
}
