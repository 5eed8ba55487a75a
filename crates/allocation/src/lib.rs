//! Poolaudit Allocation Engine
//!
//! Reconstructs, from a ledger's historical issuance log, how much each
//! participant contributed to the growth of a shared pooled balance:
//! - Groups issuance events by block, merging same-block recipients
//! - Computes the pool's balance delta per block and splits it across the
//!   block's recipients proportional to tokens issued, in exact rationals
//! - Accumulates per-participant running totals into a final snapshot
//!
//! The event and balance sources are passed in explicitly as traits, so the
//! whole pipeline runs unchanged against in-memory fixtures or a real log.

pub mod allocator;
pub mod driver;
pub mod errors;
pub mod grouper;
pub mod ledger;
pub mod sources;

pub use allocator::*;
pub use driver::*;
pub use errors::*;
pub use grouper::*;
pub use ledger::*;
pub use sources::*;

/// Module version for API introspection
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
