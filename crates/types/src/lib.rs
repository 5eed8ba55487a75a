//! Poolaudit Shared Types
//!
//! Core data model for the pool contribution audit:
//! - Ledger account addresses with canonical hex encoding
//! - Issuance events and their per-block groupings
//! - Unbounded token/balance amounts and display-unit formatting

pub mod address;
pub mod event;
pub mod units;

pub use address::*;
pub use event::*;
pub use units::*;

/// Module version for API introspection
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Height of a ledger block; all events and balance reads are indexed by it.
pub type BlockNumber = u64;
