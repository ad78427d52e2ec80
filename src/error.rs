//! Error types for Watch Flux

use thiserror::Error;

/// Errors that can occur while computing watch analytics
///
/// Sparse or empty watch histories are never errors; every analytic resolves
/// them to its zeroed stats object instead.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("Data access error: {0}")]
    DataAccess(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to parse snapshot: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    #[error("Logging setup failed: {0}")]
    LoggingInit(String),
}
