//! Reward pool accounting.

use anchor_lang::prelude::*;

use crate::error::StakingError;

/// Pool of reward units available for payout.
pub trait RewardVault {
    /// Units currently available.
    fn balance(&self) -> u64;

    /// Units paid out over the pool's lifetime.
    fn total_paid(&self) -> u64;

    /// Debits `amount` if the pool can cover it. Returns `false` and leaves
    /// the pool untouched otherwise; the payout is never truncated.
    fn reserve(&mut self, amount: u64) -> bool;

    /// Returns a reservation whose payout could not be delivered.
    fn cancel(&mut self, amount: u64) -> Result<()>;

    fn fund(&mut self, amount: u64) -> Result<()>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RewardPool {
    balance: u64,
    total_paid: u64,
}

impl RewardPool {
    pub fn new(balance: u64, total_paid: u64) -> Self {
        Self {
            balance,
            total_paid,
        }
    }

    pub fn is_solvent_for(&self, amount: u64) -> bool {
        self.balance >= amount
    }
}

impl RewardVault for RewardPool {
    fn balance(&self) -> u64 {
        self.balance
    }

    fn total_paid(&self) -> u64 {
        self.total_paid
    }

    fn reserve(&mut self, amount: u64) -> bool {
        if !self.is_solvent_for(amount) {
            return false;
        }
        match self.total_paid.checked_add(amount) {
            Some(total_paid) => {
                self.balance -= amount;
                self.total_paid = total_paid;
                true
            }
            None => false,
        }
    }

    fn cancel(&mut self, amount: u64) -> Result<()> {
        let total_paid = self
            .total_paid
            .checked_sub(amount)
            .ok_or(StakingError::Underflow)?;
        let balance = self
            .balance
            .checked_add(amount)
            .ok_or(StakingError::MathOverflow)?;

        self.balance = balance;
        self.total_paid = total_paid;
        Ok(())
    }

    fn fund(&mut self, amount: u64) -> Result<()> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(StakingError::MathOverflow)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserve_debits_when_solvent() {
        let mut pool = RewardPool::new(100, 0);

        assert!(pool.reserve(60));
        assert_eq!(pool.balance(), 40);
        assert_eq!(pool.total_paid(), 60);
    }

    #[test]
    fn reserve_refuses_without_truncating() {
        let mut pool = RewardPool::new(50, 0);

        assert!(!pool.reserve(51));
        assert_eq!(pool, RewardPool::new(50, 0));
    }

    #[test]
    fn reserve_of_exact_balance_empties_pool() {
        let mut pool = RewardPool::new(50, 7);

        assert!(pool.reserve(50));
        assert_eq!(pool.balance(), 0);
        assert!(!pool.reserve(1));
    }

    #[test]
    fn cancel_restores_reservation() {
        let mut pool = RewardPool::new(100, 0);
        assert!(pool.reserve(30));

        pool.cancel(30).unwrap();

        assert_eq!(pool, RewardPool::new(100, 0));
    }

    #[test]
    fn fund_overflow_is_rejected() {
        let mut pool = RewardPool::new(u64::MAX, 0);

        let err = pool.fund(1).unwrap_err();

        assert_eq!(err, StakingError::MathOverflow.into());
        assert_eq!(pool.balance(), u64::MAX);
    }
}
