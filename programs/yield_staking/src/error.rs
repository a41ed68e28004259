//! Error types for the Yield Staking program.
//!
//! Every failure the program or the staking engine can report is a variant of
//! [`StakingError`], so on-chain handlers and off-chain callers see the same
//! codes.

use anchor_lang::prelude::*;

/// Custom error codes for the Yield Staking program.
///
/// Error codes start at 6000 (Anchor's custom error offset).
#[error_code]
pub enum StakingError {
    // ========== Input Validation Errors ==========

    /// [6000] A required handle (yield program, reward mint, price feed) is unset.
    #[msg("Address must not be the zero address")]
    ZeroAddress,

    /// [6001] Cannot stake, withdraw or fund with zero amount.
    #[msg("Amount must be greater than zero")]
    ZeroAmount,

    /// [6002] First stake of an account is below the pool minimum.
    #[msg("First stake is below the minimum stake amount")]
    BelowMinimumStake,

    /// [6003] Withdraw amount is zero or exceeds the staked principal.
    #[msg("Invalid withdraw amount")]
    InvalidWithdrawAmount,

    /// [6004] Annualized rate exceeds the maximum allowed limit (50%).
    #[msg("Annual rate exceeds maximum allowed value of 5000 basis points (50%)")]
    RateTooHigh,

    /// [6005] A pool parameter is out of range.
    #[msg("Invalid pool configuration")]
    InvalidConfig,

    // ========== Reward Pool Errors ==========

    /// [6006] The reward pool cannot cover the reward owed.
    #[msg("Reward pool balance is insufficient for the payout")]
    RewardPoolInsolvent,

    /// [6007] No rewards are available to claim.
    #[msg("No rewards available to claim")]
    NoRewardsAvailable,

    /// [6008] The reward transfer failed after the pool reserved it; the
    /// reward stays owed.
    #[msg("Reward payout transfer failed")]
    RewardPayoutFailed,

    // ========== Time/Oracle Errors ==========

    /// [6009] Current time is earlier than the account's last checkpoint.
    #[msg("Clock regression: time is before the last accrual checkpoint")]
    InvalidTime,

    /// [6010] Oracle price is older than the pool's staleness bound.
    #[msg("Oracle price is stale")]
    StalePrice,

    /// [6011] Oracle returned a non-positive or unscalable price.
    #[msg("Oracle price is invalid")]
    InvalidPrice,

    /// [6012] Oracle account data is too short or does not match the pool feed.
    #[msg("Oracle account is invalid")]
    InvalidOracleAccount,

    // ========== Math/Ledger Errors ==========

    /// [6013] Arithmetic overflow occurred during calculation.
    #[msg("Arithmetic overflow occurred during calculation")]
    MathOverflow,

    /// [6014] A ledger balance would go below zero.
    #[msg("Ledger balance underflow")]
    Underflow,

    // ========== Yield Source Errors ==========

    /// [6015] Yield reserve account data could not be read.
    #[msg("Yield reserve account is invalid")]
    InvalidYieldReserve,

    /// [6016] Wrapping a positive amount produced no proxy units.
    #[msg("Yield source minted zero proxy units")]
    ZeroProxyMinted,

    // ========== Account Validation Errors ==========

    /// [6017] Signer does not own the stakeholder record.
    #[msg("Unauthorized: signer does not own this stake")]
    Unauthorized,

    /// [6018] Token account mint does not match the pool reward mint.
    #[msg("Token mint mismatch - wrong token for this pool")]
    MintMismatch,

    /// [6019] An account does not match the address recorded in the pool.
    #[msg("Account does not match the pool configuration")]
    AccountMismatch,
}
