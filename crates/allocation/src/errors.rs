use poolaudit_types::{BlockNumber, EventError};
use thiserror::Error;

/// Transport-level failures reported by the event or balance source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("source unavailable: {context}")]
    Unavailable { context: String },

    #[error("source returned malformed data: {context}")]
    MalformedData { context: String },
}

/// Errors that can occur while reconstructing pool contributions.
///
/// Nothing here is retried: source failures abort the run, and the remaining
/// variants are invariant violations in the input or the pipeline itself.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("event or balance source failed")]
    Source(#[from] SourceError),

    #[error("token total for block {block_number} is zero; proportional split is undefined")]
    DivisionUndefined { block_number: BlockNumber },

    #[error("malformed issuance event")]
    MalformedEvent(#[from] EventError),
}
