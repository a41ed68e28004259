//! Instruction handlers for the Yield Staking program.
//!
//! Each handler loads the accounts it needs into the staking engine, runs
//! one operation and writes the result back.

pub mod claim_rewards;
pub mod fund_reward_pool;
pub mod initialize;
pub mod stake;
pub mod withdraw;

pub use claim_rewards::*;
pub use fund_reward_pool::*;
pub use initialize::*;
pub use stake::*;
pub use withdraw::*;
