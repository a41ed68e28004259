//! Stake and withdraw orchestration.
//!
//! Every mutating call settles the caller's record first, then changes
//! principal, then moves funds through the yield source and the reward vault.
//! Preconditions are checked before anything is touched.

use anchor_lang::prelude::*;

use crate::engine::accrual::{AccrualConfig, AccrualEngine};
use crate::engine::interfaces::{PoolHandles, Transfers, ValueOracle, YieldRate, YieldSource};
use crate::engine::ledger::{StakeLedger, StakeRecord};
use crate::engine::vault::RewardVault;
use crate::error::StakingError;
use crate::state::{Staked, Withdrawn};

/// Outcome of a successful stake.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StakeReceipt {
    pub account: Pubkey,
    pub amount: u64,
    /// Proxy units minted for the deposit.
    pub proxy_minted: u64,
    /// Reward settled by this call and added to the unpaid balance.
    pub reward_accrued: u64,
    /// Base-unit value of the account's proxy balance after the deposit.
    pub underlying_value: u64,
}

impl StakeReceipt {
    pub fn event(&self) -> Staked {
        Staked {
            account: self.account,
            amount: self.amount,
        }
    }
}

/// What happened to the reward owed at withdrawal time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RewardPayout {
    NothingOwed,
    Paid(u64),
    /// The reward pool could not cover `owed`; it stays on the record.
    Deferred { owed: u64 },
    /// The reward transfer failed; the reservation was returned and `owed`
    /// stays on the record.
    Failed { owed: u64 },
}

impl RewardPayout {
    pub fn paid(&self) -> u64 {
        match self {
            RewardPayout::Paid(amount) => *amount,
            _ => 0,
        }
    }
}

/// Outcome of a withdrawal. The principal part always succeeded; the reward
/// part is in `payout`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WithdrawReceipt {
    pub account: Pubkey,
    pub amount: u64,
    pub proxy_released: u64,
    /// Base units returned by the yield source and sent to the account.
    pub released: u64,
    /// Base-unit value of the proxy balance left on the record.
    pub underlying_value: u64,
    pub payout: RewardPayout,
}

impl WithdrawReceipt {
    pub fn event(&self) -> Withdrawn {
        Withdrawn {
            account: self.account,
            amount: self.amount,
            reward_paid: self.payout.paid(),
        }
    }

    /// Reward paid, or the reason it is still owed.
    pub fn payout_result(&self) -> Result<u64> {
        match self.payout {
            RewardPayout::Deferred { .. } => err!(StakingError::RewardPoolInsolvent),
            RewardPayout::Failed { .. } => err!(StakingError::RewardPayoutFailed),
            payout => Ok(payout.paid()),
        }
    }
}

pub struct StakingService<L, V, Y, O, T> {
    handles: PoolHandles,
    config: AccrualConfig,
    engine: AccrualEngine,
    ledger: L,
    vault: V,
    yield_source: Y,
    oracle: O,
    transfers: T,
}

impl<L, V, Y, O, T> StakingService<L, V, Y, O, T>
where
    L: StakeLedger,
    V: RewardVault,
    Y: YieldRate,
    O: ValueOracle,
    T: Transfers,
{
    /// # Errors
    /// - `ZeroAddress` if any handle is unset
    /// - `RateTooHigh` / `InvalidConfig` for out-of-range parameters
    pub fn new(
        handles: PoolHandles,
        config: AccrualConfig,
        ledger: L,
        vault: V,
        yield_source: Y,
        oracle: O,
        transfers: T,
    ) -> Result<Self> {
        handles.validate()?;
        config.validate()?;

        Ok(Self {
            handles,
            config,
            engine: AccrualEngine::new(config.annual_rate_bps),
            ledger,
            vault,
            yield_source,
            oracle,
            transfers,
        })
    }

    /// Settles and pays the whole unpaid reward of `account`.
    ///
    /// # Errors
    /// - `NoRewardsAvailable` if nothing is owed
    /// - `RewardPoolInsolvent` if the pool cannot cover it; nothing changes
    /// - `RewardPayoutFailed` if the reward transfer fails; nothing changes
    pub fn claim_rewards(&mut self, account: &Pubkey, now: i64) -> Result<u64> {
        let record = self.ledger.get(account)?;
        let (settled, _) = self.settle(&record, now)?;
        require!(
            settled.accrued_unpaid_reward > 0,
            StakingError::NoRewardsAvailable
        );

        match self.pay_reward(account, settled)? {
            (updated, RewardPayout::Paid(amount)) => {
                self.ledger.put(account, updated)?;
                Ok(amount)
            }
            (_, RewardPayout::Deferred { .. }) => err!(StakingError::RewardPoolInsolvent),
            (_, RewardPayout::Failed { .. }) => err!(StakingError::RewardPayoutFailed),
            (_, RewardPayout::NothingOwed) => err!(StakingError::NoRewardsAvailable),
        }
    }

    /// Unpaid reward of `account` if it were settled at `now`.
    pub fn pending_reward(&self, account: &Pubkey, now: i64) -> Result<u64> {
        let record = self.ledger.get(account)?;
        let price = self.fresh_price(now)?;
        let accruing = self.engine.preview(&record, now, price)?;

        Ok(record
            .accrued_unpaid_reward
            .checked_add(accruing)
            .ok_or(StakingError::MathOverflow)?)
    }

    /// Adds `amount` reward units to the pool and returns the new balance.
    pub fn fund_rewards(&mut self, amount: u64) -> Result<u64> {
        require!(amount > 0, StakingError::ZeroAmount);
        self.vault.fund(amount)?;
        Ok(self.vault.balance())
    }

    pub fn record(&self, account: &Pubkey) -> Result<StakeRecord> {
        self.ledger.get(account)
    }

    pub fn total_staked(&self) -> u64 {
        self.ledger.total_staked()
    }

    pub fn reward_pool_balance(&self) -> u64 {
        self.vault.balance()
    }

    pub fn handles(&self) -> &PoolHandles {
        &self.handles
    }

    pub fn config(&self) -> &AccrualConfig {
        &self.config
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn vault(&self) -> &V {
        &self.vault
    }

    pub fn yield_source(&self) -> &Y {
        &self.yield_source
    }

    pub fn yield_source_mut(&mut self) -> &mut Y {
        &mut self.yield_source
    }

    pub fn oracle_mut(&mut self) -> &mut O {
        &mut self.oracle
    }

    pub fn transfers(&self) -> &T {
        &self.transfers
    }

    pub fn transfers_mut(&mut self) -> &mut T {
        &mut self.transfers
    }

    /// Hands back the ledger and vault so the caller can persist them.
    pub fn into_parts(self) -> (L, V) {
        (self.ledger, self.vault)
    }

    fn fresh_price(&self, now: i64) -> Result<u64> {
        self.oracle
            .latest_price()?
            .ensure_fresh(now, self.config.max_price_age)
    }

    /// Settles `record` at `now` and books the delta as unpaid reward.
    fn settle(&self, record: &StakeRecord, now: i64) -> Result<(StakeRecord, u64)> {
        let price = self.fresh_price(now)?;
        let exchange_rate = self.yield_source.exchange_rate()?;

        let (settled, reward) = self.engine.settle(record, now, price, exchange_rate)?;
        Ok((settled.add_reward(reward)?, reward))
    }

    fn pay_reward(
        &mut self,
        account: &Pubkey,
        record: StakeRecord,
    ) -> Result<(StakeRecord, RewardPayout)> {
        let owed = record.accrued_unpaid_reward;
        if owed == 0 {
            return Ok((record, RewardPayout::NothingOwed));
        }

        if !self.vault.reserve(owed) {
            return Ok((record, RewardPayout::Deferred { owed }));
        }

        if let Err(payout_error) = self.transfers.payout(account, owed) {
            self.vault.cancel(owed)?;
            msg!("Reward payout of {} to {} failed: {}", owed, account, payout_error);
            return Ok((record, RewardPayout::Failed { owed }));
        }

        Ok((record.mark_paid(owed)?, RewardPayout::Paid(owed)))
    }
}

impl<L, V, Y, O, T> StakingService<L, V, Y, O, T>
where
    L: StakeLedger,
    V: RewardVault,
    Y: YieldSource,
    O: ValueOracle,
    T: Transfers,
{
    /// Stakes `amount` base units for `account`.
    ///
    /// Pending reward is settled into the unpaid balance first. If the yield
    /// source rejects the deposit, the accepted funds are released back and
    /// no state changes.
    ///
    /// # Errors
    /// - `ZeroAmount` if `amount` is zero
    /// - `BelowMinimumStake` on a first stake below the pool minimum
    /// - `InvalidTime`, `StalePrice`, `InvalidPrice` from settlement
    /// - `ZeroProxyMinted` or the yield source's error if wrapping fails
    pub fn stake(&mut self, account: &Pubkey, amount: u64, now: i64) -> Result<StakeReceipt> {
        require!(amount > 0, StakingError::ZeroAmount);

        let record = self.ledger.get(account)?;
        if record.principal == 0 {
            require!(
                amount >= self.config.min_stake,
                StakingError::BelowMinimumStake
            );
        }
        self.ledger
            .total_staked()
            .checked_add(amount)
            .ok_or(StakingError::MathOverflow)?;

        let (settled, reward_accrued) = self.settle(&record, now)?;

        self.transfers.accept(account, amount)?;
        let proxy_minted = match self.yield_source.wrap(amount) {
            Ok(proxy) if proxy > 0 => proxy,
            Ok(_) => {
                self.refund(account, amount);
                return err!(StakingError::ZeroProxyMinted);
            }
            Err(wrap_error) => {
                self.refund(account, amount);
                return Err(wrap_error);
            }
        };

        let updated = settled.credit(amount, proxy_minted)?;
        let underlying_value = updated.underlying_value(updated.last_exchange_rate)?;
        self.ledger.credit_total(amount, proxy_minted)?;
        self.ledger.put(account, updated)?;

        Ok(StakeReceipt {
            account: *account,
            amount,
            proxy_minted,
            reward_accrued,
            underlying_value,
        })
    }

    /// Withdraws `amount` of principal for `account` and pays any unpaid
    /// reward.
    ///
    /// Once the principal has left custody the call always succeeds: an
    /// insolvent reward pool or a failed reward transfer leaves the reward on
    /// the record and is reported in [`WithdrawReceipt::payout`].
    ///
    /// # Errors
    /// - `InvalidWithdrawAmount` if `amount` is zero, exceeds the principal,
    ///   or is too small to release any proxy units
    /// - `InvalidTime`, `StalePrice`, `InvalidPrice` from settlement
    /// - the yield source's or the lamport transfer's error
    pub fn withdraw(
        &mut self,
        account: &Pubkey,
        amount: u64,
        now: i64,
    ) -> Result<WithdrawReceipt> {
        require!(amount > 0, StakingError::InvalidWithdrawAmount);

        let record = self.ledger.get(account)?;
        require!(
            amount <= record.principal,
            StakingError::InvalidWithdrawAmount
        );

        let (settled, _) = self.settle(&record, now)?;

        let proxy_released = settled.proxy_share(amount)?;
        require!(proxy_released > 0, StakingError::InvalidWithdrawAmount);
        let updated = settled.debit(amount, proxy_released)?;
        let underlying_value = updated.underlying_value(updated.last_exchange_rate)?;
        self.ledger
            .total_staked()
            .checked_sub(amount)
            .ok_or(StakingError::Underflow)?;

        let released = self.yield_source.unwrap(proxy_released)?;
        self.transfers.release(account, released)?;

        let (updated, payout) = self.pay_reward(account, updated)?;
        self.ledger.debit_total(amount, proxy_released)?;
        self.ledger.put(account, updated)?;

        Ok(WithdrawReceipt {
            account: *account,
            amount,
            proxy_released,
            released,
            underlying_value,
            payout,
        })
    }

    /// Returns a deposit the yield source refused. A failed refund is logged
    /// so the wrap error reaches the caller.
    fn refund(&mut self, account: &Pubkey, amount: u64) {
        if let Err(refund_error) = self.transfers.release(account, amount) {
            msg!("Refund of {} to {} failed: {}", amount, account, refund_error);
        }
    }
}
