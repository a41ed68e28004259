//! Staking ledger engine.
//!
//! Pure accounting for stakes, accrual and reward payouts. It knows nothing
//! about Solana accounts: external collaborators are reached through the
//! traits in [`interfaces`], which the program implements in
//! `crate::adapters`.

pub mod accrual;
pub mod interfaces;
pub mod ledger;
pub mod service;
pub mod vault;

pub use accrual::*;
pub use interfaces::*;
pub use ledger::*;
pub use service::*;
pub use vault::*;
