// Job Tracker - merged view of active-registry and history jobs

use crate::application::registry::ActiveJobRegistry;
use crate::domain::{ReportJob, TrackedJob};
use crate::error::Result;
use crate::port::ReportBackend;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Merge active and history jobs into one deduplicated, ordered view.
///
/// Pure function: inputs are never mutated, identical inputs yield identical
/// output. History entries come first in store order (assumed caller-facing
/// recency order, already enriched by at least one poll); active entries not
/// present in history are prepended in registry order, most recent first.
/// For a job id present in both, the history projection wins: the thinner
/// active-only shape must not shadow enriched data.
pub fn merge_tracked(active: &[TrackedJob], history: &[ReportJob]) -> Vec<TrackedJob> {
    let mut seen: HashSet<&str> = history.iter().map(|job| job.job_id.as_str()).collect();

    let mut merged: Vec<TrackedJob> = Vec::with_capacity(active.len() + history.len());
    for entry in active {
        if seen.insert(entry.job_id.as_str()) {
            merged.push(entry.clone());
        }
    }
    merged.extend(history.iter().map(TrackedJob::from));
    merged
}

/// Holds the last refreshed history and exposes the merged tracked view.
///
/// Recomputed on each history refresh and each registry read; never caches
/// the merge itself.
pub struct JobTracker {
    backend: Arc<dyn ReportBackend>,
    registry: Arc<ActiveJobRegistry>,
    history: Mutex<Vec<ReportJob>>,
}

impl JobTracker {
    pub fn new(backend: Arc<dyn ReportBackend>, registry: Arc<ActiveJobRegistry>) -> Self {
        Self {
            backend,
            registry,
            history: Mutex::new(Vec::new()),
        }
    }

    /// Refresh the durable history from the backend
    pub async fn refresh_history(&self) -> Result<Vec<ReportJob>> {
        let jobs = self.backend.list_jobs().await?;
        debug!(count = jobs.len(), "Job history refreshed");
        *self.history.lock().unwrap() = jobs.clone();
        Ok(jobs)
    }

    /// Last refreshed history, store order preserved
    pub fn history(&self) -> Vec<ReportJob> {
        self.history.lock().unwrap().clone()
    }

    /// Current merged view of tracked jobs
    pub fn tracked(&self) -> Vec<TrackedJob> {
        merge_tracked(&self.registry.all(), &self.history.lock().unwrap())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn history_job(job_id: &str, report_type: &str) -> ReportJob {
        ReportJob::new(job_id)
            .with_report_type(report_type)
            .with_status("running")
    }

    #[test]
    fn test_merge_is_idempotent() {
        let active = vec![TrackedJob::new("9"), TrackedJob::new("7")];
        let history = vec![history_job("7", "a"), history_job("5", "b")];

        let first = merge_tracked(&active, &history);
        let second = merge_tracked(&active, &history);
        assert_eq!(first, second);
    }

    #[test]
    fn test_merge_dedup_prefers_history_data() {
        let mut active_seven = TrackedJob::new("7");
        active_seven.parameters = Some(json!({"thin": true}));
        let active = vec![active_seven];

        let mut enriched = history_job("7", "enrollment_export");
        enriched.parameters = Some(json!({"start": "2024-01-01"}));
        let history = vec![enriched];

        let merged = merge_tracked(&active, &history);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].report_type.as_deref(), Some("enrollment_export"));
        assert_eq!(merged[0].parameters, Some(json!({"start": "2024-01-01"})));
    }

    #[test]
    fn test_merge_prepends_active_only_entries() {
        let active = vec![TrackedJob::new("new-2"), TrackedJob::new("new-1")];
        let history = vec![history_job("old-1", "a"), history_job("old-2", "b")];

        let ids: Vec<_> = merge_tracked(&active, &history)
            .into_iter()
            .map(|j| j.job_id)
            .collect();
        assert_eq!(ids, vec!["new-2", "new-1", "old-1", "old-2"]);
    }

    #[test]
    fn test_merge_preserves_history_order() {
        let history = vec![
            history_job("3", "a"),
            history_job("1", "b"),
            history_job("2", "c"),
        ];

        let ids: Vec<_> = merge_tracked(&[], &history)
            .into_iter()
            .map(|j| j.job_id)
            .collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
    }

    #[test]
    fn test_merge_collapses_duplicate_active_ids() {
        // Defensive: the registry should never hold duplicate ids, but the
        // merged view must still contain each id exactly once.
        let active = vec![TrackedJob::new("9"), TrackedJob::new("9")];
        let merged = merge_tracked(&active, &[]);
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn test_merge_does_not_mutate_inputs() {
        let active = vec![TrackedJob::new("9")];
        let history = vec![history_job("5", "a")];
        let active_before = active.clone();
        let history_before = history.clone();

        let _ = merge_tracked(&active, &history);
        assert_eq!(active, active_before);
        assert_eq!(history, history_before);
    }

    #[tokio::test]
    async fn test_tracker_merges_registry_and_history() {
        use crate::port::report_backend::mocks::ScriptedBackend;

        let backend = Arc::new(ScriptedBackend::new());
        backend.set_history(vec![history_job("5", "a")]);
        let registry = Arc::new(ActiveJobRegistry::new());
        registry.add(TrackedJob::new("9"));

        let tracker = JobTracker::new(backend, registry);
        tracker.refresh_history().await.unwrap();

        let ids: Vec<_> = tracker.tracked().into_iter().map(|j| j.job_id).collect();
        assert_eq!(ids, vec!["9", "5"]);
    }
}
