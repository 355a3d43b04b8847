//! Error taxonomy for the analytics core.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid range: {0}")]
    InvalidRange(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Storage or aggregation fault.
    #[error("computation failed: {0}")]
    Computation(#[from] anyhow::Error),
}

pub type AnalyticsResult<T> = Result<T, AnalyticsError>;
