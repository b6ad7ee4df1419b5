// Job Submitter - fire-and-forget submission into tracking

use crate::application::board::StatusBoard;
use crate::application::registry::ActiveJobRegistry;
use crate::domain::{ReportJob, TrackedJob};
use crate::error::{Result, TrackerError};
use crate::port::ReportBackend;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// Submits a report job and registers it for tracking.
///
/// Submission is not idempotent: identical parameters yield two independent
/// jobs. On any failure nothing enters the registry (no partial state).
pub struct JobSubmitter {
    backend: Arc<dyn ReportBackend>,
    registry: Arc<ActiveJobRegistry>,
    board: Arc<StatusBoard>,
}

impl JobSubmitter {
    pub fn new(
        backend: Arc<dyn ReportBackend>,
        registry: Arc<ActiveJobRegistry>,
        board: Arc<StatusBoard>,
    ) -> Self {
        Self {
            backend,
            registry,
            board,
        }
    }

    /// Submit a job; returns as soon as the backend assigns an id.
    ///
    /// Report-type validation is left to the backend. The returned job is
    /// enriched with the submitted type and parameters when the backend's
    /// synchronous reply omits them.
    pub async fn submit(&self, report_type: &str, parameters: Option<Value>) -> Result<ReportJob> {
        let mut job = self
            .backend
            .start_job(report_type, parameters.as_ref())
            .await
            .map_err(|e| TrackerError::Submission(e.to_string()))?;

        if job.report_type.is_none() {
            job.report_type = Some(report_type.to_string());
        }
        if job.parameters.is_none() {
            job.parameters = parameters;
        }

        info!(job_id = %job.job_id, report_type = %report_type, "Report job submitted");
        self.registry.add(TrackedJob::from(&job));
        self.board.record(job.clone());
        Ok(job)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::report_backend::mocks::{ScriptedBackend, ScriptedResponse};
    use serde_json::json;

    fn submitter(backend: Arc<ScriptedBackend>) -> (JobSubmitter, Arc<ActiveJobRegistry>) {
        let registry = Arc::new(ActiveJobRegistry::new());
        let board = Arc::new(StatusBoard::new());
        (
            JobSubmitter::new(backend, registry.clone(), board),
            registry,
        )
    }

    #[tokio::test]
    async fn test_successful_submission_enters_registry() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.script_submission(ScriptedResponse::Job(ReportJob::new("42")));
        let (submitter, registry) = submitter(backend);

        let job = submitter
            .submit("enrollment_export", Some(json!({"start": "2024-01-01"})))
            .await
            .unwrap();

        assert_eq!(job.job_id, "42");
        assert_eq!(job.report_type.as_deref(), Some("enrollment_export"));

        let active = registry.all();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].parameters, Some(json!({"start": "2024-01-01"})));
    }

    #[tokio::test]
    async fn test_failed_submission_leaves_no_partial_state() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.script_submission(ScriptedResponse::Transport("boom".into()));
        let (submitter, registry) = submitter(backend);

        match submitter.submit("enrollment_export", None).await {
            Err(TrackerError::Submission(_)) => {}
            other => panic!("expected Submission error, got {other:?}"),
        }
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_submission_yields_independent_jobs() {
        let backend = Arc::new(ScriptedBackend::new());
        let (submitter, registry) = submitter(backend);
        let params = json!({"start": "2024-01-01"});

        let first = submitter
            .submit("enrollment_export", Some(params.clone()))
            .await
            .unwrap();
        let second = submitter
            .submit("enrollment_export", Some(params))
            .await
            .unwrap();

        assert_ne!(first.job_id, second.job_id);
        assert_eq!(registry.len(), 2);
    }
}
