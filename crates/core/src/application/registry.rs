// Active Job Registry - session-scoped store of just-submitted jobs

use crate::domain::TrackedJob;
use std::sync::Mutex;
use tracing::debug;

/// Session-local set of jobs submitted but not yet confirmed present in
/// durable history.
///
/// Mutated only by the submitter (append) and read by the tracker; the
/// poller never touches it. Once history reports the same job id the entry
/// becomes redundant, which is safe: merge dedup handles it.
#[derive(Default)]
pub struct ActiveJobRegistry {
    jobs: Mutex<Vec<TrackedJob>>,
}

impl ActiveJobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a submitted job, most recent first
    pub fn add(&self, job: TrackedJob) {
        debug!(job_id = %job.job_id, "Job added to active registry");
        self.jobs.lock().unwrap().insert(0, job);
    }

    /// Snapshot of active jobs, most recent first
    pub fn all(&self) -> Vec<TrackedJob> {
        self.jobs.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.jobs.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.lock().unwrap().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_most_recent_first() {
        let registry = ActiveJobRegistry::new();
        registry.add(TrackedJob::new("1"));
        registry.add(TrackedJob::new("2"));
        registry.add(TrackedJob::new("3"));

        let ids: Vec<_> = registry.all().into_iter().map(|j| j.job_id).collect();
        assert_eq!(ids, vec!["3", "2", "1"]);
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let registry = ActiveJobRegistry::new();
        registry.add(TrackedJob::new("1"));

        let mut snapshot = registry.all();
        snapshot.clear();
        assert_eq!(registry.len(), 1);
    }
}
