//! State structures for the Yield Staking program.
//!
//! This module defines all account structures and events.

pub mod events;
pub mod stake_pool;
pub mod stakeholder;

pub use events::*;
pub use stake_pool::*;
pub use stakeholder::*;
