// Report Session - composition root for the tracker services

use crate::application::board::StatusBoard;
use crate::application::cancel::JobCanceler;
use crate::application::catalog::ReportCatalog;
use crate::application::poller::{JobPoller, POLL_INTERVAL};
use crate::application::registry::ActiveJobRegistry;
use crate::application::submit::JobSubmitter;
use crate::application::tracker::JobTracker;
use crate::domain::{ReportDefinition, ReportJob, TrackedJob};
use crate::error::Result;
use crate::port::{ReportBackend, TimeProvider};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// One session's view of the report-job lifecycle: catalog discovery,
/// submission, tracking, polling and cancellation wired around a single
/// backend.
///
/// Outlives any single view of the data; tearing it down deterministically
/// releases every poll loop.
pub struct ReportSession {
    catalog: ReportCatalog,
    registry: Arc<ActiveJobRegistry>,
    board: Arc<StatusBoard>,
    tracker: JobTracker,
    poller: JobPoller,
    submitter: JobSubmitter,
    canceler: JobCanceler,
}

impl ReportSession {
    pub fn new(backend: Arc<dyn ReportBackend>, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self::with_poll_interval(backend, time_provider, POLL_INTERVAL)
    }

    pub fn with_poll_interval(
        backend: Arc<dyn ReportBackend>,
        time_provider: Arc<dyn TimeProvider>,
        poll_interval: Duration,
    ) -> Self {
        let registry = Arc::new(ActiveJobRegistry::new());
        let board = Arc::new(StatusBoard::new());

        Self {
            catalog: ReportCatalog::new(Arc::clone(&backend), time_provider),
            tracker: JobTracker::new(Arc::clone(&backend), Arc::clone(&registry)),
            poller: JobPoller::with_interval(
                Arc::clone(&backend),
                Arc::clone(&board),
                poll_interval,
            ),
            submitter: JobSubmitter::new(
                Arc::clone(&backend),
                Arc::clone(&registry),
                Arc::clone(&board),
            ),
            canceler: JobCanceler::new(backend, Arc::clone(&board)),
            registry,
            board,
        }
    }

    /// Available report definitions (cached per the staleness window)
    pub async fn reports(&self) -> Result<Vec<ReportDefinition>> {
        self.catalog.list().await
    }

    /// Submit a job and start polling it immediately
    pub async fn submit(&self, report_type: &str, parameters: Option<Value>) -> Result<ReportJob> {
        let job = self.submitter.submit(report_type, parameters).await?;
        self.poller.watch(&TrackedJob::from(&job));
        Ok(job)
    }

    /// Refresh history, merge with the active registry and reconcile poll
    /// loops against the resulting tracked set
    pub async fn tracked_jobs(&self) -> Result<Vec<TrackedJob>> {
        self.tracker.refresh_history().await?;
        let tracked = self.tracker.tracked();
        self.poller.sync(&tracked);
        Ok(tracked)
    }

    /// Last refreshed history, store order preserved
    pub fn history(&self) -> Vec<ReportJob> {
        self.tracker.history()
    }

    /// Last known snapshot for a job, if any fetch has resolved yet
    pub fn job(&self, job_id: &str) -> Option<ReportJob> {
        self.board.get(job_id)
    }

    /// Whether a job has reached a terminal state
    pub fn is_settled(&self, job_id: &str) -> bool {
        self.board.is_settled(job_id)
    }

    /// Manual out-of-band poll
    pub async fn refresh(&self, job_id: &str) -> Result<ReportJob> {
        self.poller.refresh(job_id).await
    }

    /// Cancel a non-terminal job
    pub async fn cancel(&self, job_id: &str) -> Result<ReportJob> {
        self.canceler.cancel(job_id).await
    }

    /// Jobs submitted during this session, most recent first
    pub fn active_jobs(&self) -> Vec<TrackedJob> {
        self.registry.all()
    }

    /// Release every outstanding poll loop
    pub fn shutdown(&self) {
        self.poller.shutdown();
    }
}
