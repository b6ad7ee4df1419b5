// Job Canceler - out-of-band cancellation of non-terminal jobs

use crate::application::board::StatusBoard;
use crate::domain::ReportJob;
use crate::error::{Result, TrackerError};
use crate::port::ReportBackend;
use std::sync::Arc;
use tracing::{info, warn};

/// Requests backend cancellation of a job.
///
/// Safe to call concurrently with an in-flight poll for the same job: the
/// board is last-write-wins and the next scheduled poll reconciles within
/// one interval. Double-cancel is not an error at this layer; the backend
/// decides.
pub struct JobCanceler {
    backend: Arc<dyn ReportBackend>,
    board: Arc<StatusBoard>,
}

impl JobCanceler {
    pub fn new(backend: Arc<dyn ReportBackend>, board: Arc<StatusBoard>) -> Self {
        Self { backend, board }
    }

    /// Cancel a job, returning the best-known post-cancellation snapshot
    /// (possibly stale relative to the backend's actual terminal state).
    ///
    /// On failure the job remains tracked and keeps polling.
    pub async fn cancel(&self, job_id: &str) -> Result<ReportJob> {
        match self.backend.cancel_job(job_id).await {
            Ok(job) => {
                info!(
                    job_id = %job_id,
                    status = job.status.as_deref().unwrap_or(""),
                    "Cancellation accepted"
                );
                self.board.record(job.clone());
                Ok(job)
            }
            Err(e) => {
                warn!(job_id = %job_id, error = %e, "Cancellation failed, job keeps polling");
                Err(TrackerError::Cancel {
                    job_id: job_id.to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }
}
