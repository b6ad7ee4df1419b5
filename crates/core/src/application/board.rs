// Status Board - last known snapshot per job

use crate::domain::{JobId, ReportJob};
use std::collections::HashMap;
use std::sync::Mutex;

/// Last-write-wins map of the most recently resolved snapshot per job.
///
/// Written by pollers and the canceler; both races are accepted: a slow poll
/// response landing after a cancel response transiently shows stale data
/// until the next tick corrects it (bounded by one poll interval). Settled
/// snapshots stay available for historical display.
#[derive(Default)]
pub struct StatusBoard {
    jobs: Mutex<HashMap<JobId, ReportJob>>,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the most recently resolved snapshot for a job
    pub fn record(&self, job: ReportJob) {
        self.jobs.lock().unwrap().insert(job.job_id.clone(), job);
    }

    /// Last known snapshot, if any poll or cancel has resolved yet
    pub fn get(&self, job_id: &str) -> Option<ReportJob> {
        self.jobs.lock().unwrap().get(job_id).cloned()
    }

    /// Whether the last known snapshot is terminal
    pub fn is_settled(&self, job_id: &str) -> bool {
        self.jobs
            .lock()
            .unwrap()
            .get(job_id)
            .is_some_and(ReportJob::is_terminal)
    }

    /// All known snapshots (unordered)
    pub fn all(&self) -> Vec<ReportJob> {
        self.jobs.lock().unwrap().values().cloned().collect()
    }
}
