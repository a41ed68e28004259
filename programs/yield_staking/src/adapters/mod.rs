//! On-chain implementations of the engine's collaborator traits.

pub mod ledger;
pub mod oracle;
pub mod transfers;
pub mod yield_source;

pub use ledger::*;
pub use oracle::*;
pub use transfers::*;
pub use yield_source::*;
