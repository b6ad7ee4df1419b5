// Central Error Type for the Tracker

use thiserror::Error;

/// Tracker-level error type
///
/// Every failure is scoped to the operation that produced it; there is no
/// global error state. A poll failure for one job never aborts polling for
/// another.
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Report catalog unavailable: {0}")]
    CatalogUnavailable(String),

    #[error("Submission rejected: {0}")]
    Submission(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed report payload: {0}")]
    MalformedPayload(String),

    #[error("Unable to cancel job {job_id}: {reason}")]
    Cancel { job_id: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TrackerError {
    /// Malformed payloads indicate a contract mismatch with the backend,
    /// not a network blip; pollers log them distinctly.
    pub fn is_contract_mismatch(&self) -> bool {
        matches!(self, TrackerError::MalformedPayload(_))
    }
}

/// Result type alias using TrackerError
pub type Result<T> = std::result::Result<T, TrackerError>;
