//! Error types for engine operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// A referenced schedule, group, or proposal does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Input that violates the engine's data contract (e.g. expanding a
    /// record that carries no recurrence rule).
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Storage or expansion failure. The operation is aborted as a whole;
    /// no partial results are returned.
    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
