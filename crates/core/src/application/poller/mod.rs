// Job Poller - per-job status fetch loops

pub mod constants;
mod teardown;

pub use constants::POLL_INTERVAL;
pub use teardown::{teardown_channel, TeardownHandle, TeardownToken};

use crate::application::board::StatusBoard;
use crate::domain::{JobId, ReportJob, TrackedJob};
use crate::error::Result;
use crate::port::ReportBackend;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Owns one independent poll loop per tracked, non-terminal job.
///
/// Loops are not sequenced relative to each other: N tracked jobs produce N
/// concurrently in-flight fetches at a polling tick. Each loop is a scoped
/// resource, acquired when a job enters polling and released when it settles,
/// when the job leaves the tracked set, or when the poller is torn down;
/// `Drop` covers every remaining exit path.
pub struct JobPoller {
    backend: Arc<dyn ReportBackend>,
    board: Arc<StatusBoard>,
    interval: Duration,
    tasks: Mutex<HashMap<JobId, JoinHandle<()>>>,
    teardown: TeardownHandle,
    token: TeardownToken,
}

impl JobPoller {
    pub fn new(backend: Arc<dyn ReportBackend>, board: Arc<StatusBoard>) -> Self {
        Self::with_interval(backend, board, POLL_INTERVAL)
    }

    /// Interval is injectable so tests run on short cadences
    pub fn with_interval(
        backend: Arc<dyn ReportBackend>,
        board: Arc<StatusBoard>,
        interval: Duration,
    ) -> Self {
        let (teardown, token) = teardown_channel();
        Self {
            backend,
            board,
            interval,
            tasks: Mutex::new(HashMap::new()),
            teardown,
            token,
        }
    }

    /// Start polling a job unless it is already settled or being polled
    pub fn watch(&self, job: &TrackedJob) {
        if self.board.is_settled(&job.job_id) {
            return;
        }
        let mut tasks = self.tasks.lock().unwrap();
        if let Some(handle) = tasks.get(&job.job_id) {
            if !handle.is_finished() {
                return;
            }
        }

        let handle = tokio::spawn(poll_loop(
            Arc::clone(&self.backend),
            Arc::clone(&self.board),
            job.job_id.clone(),
            self.interval,
            self.token.clone(),
        ));
        tasks.insert(job.job_id.clone(), handle);
    }

    /// Reconcile running loops against the current tracked set: loops for
    /// jobs no longer tracked stop without error, new jobs start polling
    pub fn sync(&self, tracked: &[TrackedJob]) {
        let ids: HashSet<&str> = tracked.iter().map(|j| j.job_id.as_str()).collect();
        {
            let mut tasks = self.tasks.lock().unwrap();
            tasks.retain(|job_id, handle| {
                if !ids.contains(job_id.as_str()) {
                    debug!(job_id = %job_id, "Job left tracked set, stopping its poll loop");
                    handle.abort();
                    return false;
                }
                !handle.is_finished()
            });
        }
        for job in tracked {
            self.watch(job);
        }
    }

    /// Out-of-band single fetch (the manual Refresh action).
    ///
    /// Updates the board like a scheduled tick would; a terminal result also
    /// releases the job's scheduled loop.
    pub async fn refresh(&self, job_id: &str) -> Result<ReportJob> {
        let job = self.backend.fetch_job(job_id).await?;
        let terminal = job.is_terminal();
        self.board.record(job.clone());
        if terminal {
            self.stop(job_id);
        }
        Ok(job)
    }

    /// Stop one job's poll loop, if any
    pub fn stop(&self, job_id: &str) {
        if let Some(handle) = self.tasks.lock().unwrap().remove(job_id) {
            handle.abort();
        }
    }

    /// Number of jobs currently being polled
    pub fn active_count(&self) -> usize {
        self.tasks
            .lock()
            .unwrap()
            .values()
            .filter(|h| !h.is_finished())
            .count()
    }

    /// Deterministically release every outstanding poll loop
    pub fn shutdown(&self) {
        self.teardown.signal();
        let mut tasks = self.tasks.lock().unwrap();
        for (_, handle) in tasks.drain() {
            handle.abort();
        }
    }
}

impl Drop for JobPoller {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// One job's poll loop: immediate first fetch, then a fixed cadence until
/// the status is terminal or teardown is signalled.
///
/// A single failed fetch is not a job failure: transient transport errors
/// retry on the next tick, and malformed payloads do the same but are logged
/// distinctly since they indicate a contract mismatch.
async fn poll_loop(
    backend: Arc<dyn ReportBackend>,
    board: Arc<StatusBoard>,
    job_id: JobId,
    interval: Duration,
    mut token: TeardownToken,
) {
    debug!(job_id = %job_id, "Polling started");
    loop {
        if token.is_torn_down() {
            debug!(job_id = %job_id, "Polling stopped by teardown");
            break;
        }

        match backend.fetch_job(&job_id).await {
            Ok(job) => {
                let terminal = job.is_terminal();
                let status = job.status.clone();
                board.record(job);
                if terminal {
                    info!(
                        job_id = %job_id,
                        status = status.as_deref().unwrap_or(""),
                        "Job settled, polling stopped"
                    );
                    break;
                }
            }
            Err(e) if e.is_contract_mismatch() => {
                warn!(job_id = %job_id, error = %e, "Malformed report payload, retrying next tick");
            }
            Err(e) => {
                debug!(job_id = %job_id, error = %e, "Poll failed, retrying next tick");
            }
        }

        tokio::select! {
            _ = sleep(interval) => {}
            _ = token.wait() => {
                debug!(job_id = %job_id, "Polling interrupted during idle");
                break;
            }
        }
    }
}
