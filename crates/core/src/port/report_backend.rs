// Report Backend Port (Interface)
// Abstraction over the report-generation engine; treated as a black box
// beyond these five operations.

use crate::domain::{ReportDefinition, ReportJob};
use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Backend interface for report discovery, execution and history.
///
/// Implementations:
/// - HttpReportBackend (reportrack-infra-http): JSON-over-HTTP adapter
/// - mocks::ScriptedBackend: deterministic scripted responses for tests
#[async_trait]
pub trait ReportBackend: Send + Sync {
    /// Fetch the static list of report definitions
    async fn list_reports(&self) -> Result<Vec<ReportDefinition>>;

    /// Start asynchronous execution of a report.
    ///
    /// Only `job_id` is guaranteed populated on the returned job; status may
    /// not be available until the first poll.
    async fn start_job(&self, report_type: &str, parameters: Option<&Value>) -> Result<ReportJob>;

    /// Fetch the current status of one job (single fetch, no scheduling)
    async fn fetch_job(&self, job_id: &str) -> Result<ReportJob>;

    /// Fetch the durable job history, most recent first as returned by the
    /// backend; the tracker never re-sorts it
    async fn list_jobs(&self) -> Result<Vec<ReportJob>>;

    /// Request cancellation of a job.
    ///
    /// The backend is the source of truth: cancelling an already-terminal
    /// job may no-op or report the real terminal state, and is not an error.
    async fn cancel_job(&self, job_id: &str) -> Result<ReportJob>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::domain::JobId;
    use crate::error::TrackerError;
    use std::collections::{HashMap, VecDeque};
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// One scripted backend response
    #[derive(Debug, Clone)]
    pub enum ScriptedResponse {
        /// Return this job
        Job(ReportJob),
        /// Fail with a transport error
        Transport(String),
        /// Fail with a malformed-payload error (contract mismatch)
        Malformed(String),
    }

    impl ScriptedResponse {
        fn into_result(self) -> Result<ReportJob> {
            match self {
                ScriptedResponse::Job(job) => Ok(job),
                ScriptedResponse::Transport(msg) => Err(TrackerError::Transport(msg)),
                ScriptedResponse::Malformed(msg) => Err(TrackerError::MalformedPayload(msg)),
            }
        }
    }

    /// Scripted backend for deterministic tests.
    ///
    /// Poll and cancel responses are per-job queues; the last entry is
    /// sticky, so a queue of [running, completed] yields running once and
    /// completed forever after. Unscripted submissions synthesize
    /// sequential job ids (job-1, job-2, ...).
    #[derive(Default)]
    pub struct ScriptedBackend {
        catalog: Mutex<Vec<ReportDefinition>>,
        catalog_error: Mutex<Option<String>>,
        history: Mutex<Vec<ReportJob>>,
        history_error: Mutex<Option<String>>,
        submissions: Mutex<VecDeque<ScriptedResponse>>,
        polls: Mutex<HashMap<JobId, VecDeque<ScriptedResponse>>>,
        cancels: Mutex<HashMap<JobId, VecDeque<ScriptedResponse>>>,

        next_job_id: AtomicU64,
        list_reports_calls: AtomicUsize,
        list_jobs_calls: AtomicUsize,
        submit_calls: AtomicUsize,
        poll_calls: Mutex<HashMap<JobId, usize>>,
        cancel_calls: Mutex<HashMap<JobId, usize>>,
    }

    impl ScriptedBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_catalog(&self, definitions: Vec<ReportDefinition>) {
            *self.catalog.lock().unwrap() = definitions;
        }

        pub fn fail_catalog(&self, message: impl Into<String>) {
            *self.catalog_error.lock().unwrap() = Some(message.into());
        }

        pub fn set_history(&self, jobs: Vec<ReportJob>) {
            *self.history.lock().unwrap() = jobs;
        }

        pub fn fail_history(&self, message: impl Into<String>) {
            *self.history_error.lock().unwrap() = Some(message.into());
        }

        pub fn script_submission(&self, response: ScriptedResponse) {
            self.submissions.lock().unwrap().push_back(response);
        }

        pub fn script_polls(&self, job_id: impl Into<JobId>, responses: Vec<ScriptedResponse>) {
            self.polls
                .lock()
                .unwrap()
                .entry(job_id.into())
                .or_default()
                .extend(responses);
        }

        pub fn script_cancel(&self, job_id: impl Into<JobId>, response: ScriptedResponse) {
            self.cancels
                .lock()
                .unwrap()
                .entry(job_id.into())
                .or_default()
                .push_back(response);
        }

        pub fn list_reports_calls(&self) -> usize {
            self.list_reports_calls.load(Ordering::SeqCst)
        }

        pub fn list_jobs_calls(&self) -> usize {
            self.list_jobs_calls.load(Ordering::SeqCst)
        }

        pub fn submit_calls(&self) -> usize {
            self.submit_calls.load(Ordering::SeqCst)
        }

        pub fn poll_calls(&self, job_id: &str) -> usize {
            *self.poll_calls.lock().unwrap().get(job_id).unwrap_or(&0)
        }

        pub fn cancel_calls(&self, job_id: &str) -> usize {
            *self.cancel_calls.lock().unwrap().get(job_id).unwrap_or(&0)
        }

        /// Pop the next response for a job; the last one is sticky
        fn next_response(
            queues: &Mutex<HashMap<JobId, VecDeque<ScriptedResponse>>>,
            job_id: &str,
        ) -> Option<ScriptedResponse> {
            let mut queues = queues.lock().unwrap();
            let queue = queues.get_mut(job_id)?;
            if queue.len() > 1 {
                queue.pop_front()
            } else {
                queue.front().cloned()
            }
        }
    }

    #[async_trait]
    impl ReportBackend for ScriptedBackend {
        async fn list_reports(&self) -> Result<Vec<ReportDefinition>> {
            self.list_reports_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(msg) = self.catalog_error.lock().unwrap().clone() {
                return Err(TrackerError::Transport(msg));
            }
            Ok(self.catalog.lock().unwrap().clone())
        }

        async fn start_job(
            &self,
            report_type: &str,
            parameters: Option<&Value>,
        ) -> Result<ReportJob> {
            self.submit_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(response) = self.submissions.lock().unwrap().pop_front() {
                return response.into_result();
            }
            // Synthesize a fresh id: submission is never idempotent
            let id = self.next_job_id.fetch_add(1, Ordering::SeqCst) + 1;
            let mut job = ReportJob::new(format!("job-{id}")).with_report_type(report_type);
            job.parameters = parameters.cloned();
            Ok(job)
        }

        async fn fetch_job(&self, job_id: &str) -> Result<ReportJob> {
            *self
                .poll_calls
                .lock()
                .unwrap()
                .entry(job_id.to_string())
                .or_insert(0) += 1;

            if let Some(response) = Self::next_response(&self.polls, job_id) {
                return response.into_result();
            }
            // Fall back to the history entry, if any
            self.history
                .lock()
                .unwrap()
                .iter()
                .find(|job| job.job_id == job_id)
                .cloned()
                .ok_or_else(|| {
                    TrackerError::Transport(format!("no scripted response for job {job_id}"))
                })
        }

        async fn list_jobs(&self) -> Result<Vec<ReportJob>> {
            self.list_jobs_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(msg) = self.history_error.lock().unwrap().clone() {
                return Err(TrackerError::Transport(msg));
            }
            Ok(self.history.lock().unwrap().clone())
        }

        async fn cancel_job(&self, job_id: &str) -> Result<ReportJob> {
            *self
                .cancel_calls
                .lock()
                .unwrap()
                .entry(job_id.to_string())
                .or_insert(0) += 1;

            if let Some(response) = Self::next_response(&self.cancels, job_id) {
                return response.into_result();
            }
            Ok(ReportJob::new(job_id).with_status("cancelled"))
        }
    }
}
