//! Crate error type.

use thiserror::Error;

/// Errors surfaced by the scheduling engine.
#[derive(Debug, Error)]
pub enum InvigilError {
    #[error("exam calendar contains no days")]
    EmptyCalendar,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("exact solver failed: {0}")]
    SolverFailed(String),

    #[error("scheduling run failed: {0}")]
    RunFailed(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}
