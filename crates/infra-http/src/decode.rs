// Tolerant response-envelope decoding
//
// The backend wraps responses in one of three shapes: the bare value,
// `{"data": ...}`, or a named field (`{"jobs": [...]}`, `{"job": {...}}`).
// Candidates are tried in that order; each returns a sentinel "did not
// match" rather than throwing, and only exhausting all of them is a hard
// parse failure.

use reportrack_core::error::{Result, TrackerError};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Decode a backend payload, tolerating the three envelope shapes.
///
/// Unknown extra fields pass through unexamined. A payload matching none of
/// the shapes surfaces as `TrackerError::MalformedPayload`.
pub fn decode_payload<T: DeserializeOwned>(value: &Value, field: &str) -> Result<T> {
    try_candidates(value, field).ok_or_else(|| {
        TrackerError::MalformedPayload(format!(
            "response matched none of the tolerated shapes (bare, data-wrapped, or `{field}` field)"
        ))
    })
}

fn try_candidates<T: DeserializeOwned>(value: &Value, field: &str) -> Option<T> {
    // Bare shape first
    if let Ok(parsed) = serde_json::from_value::<T>(value.clone()) {
        return Some(parsed);
    }
    // Then unwrap `data`, recursively: `{"data": {"jobs": [...]}}` is legal
    if let Some(inner) = value.get("data") {
        if let Some(parsed) = try_candidates(inner, field) {
            return Some(parsed);
        }
    }
    // Finally the named wrapper
    if let Some(inner) = value.get(field) {
        if let Ok(parsed) = serde_json::from_value::<T>(inner.clone()) {
            return Some(parsed);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use reportrack_core::domain::ReportJob;
    use serde_json::json;

    #[test]
    fn test_bare_object() {
        let job: ReportJob = decode_payload(&json!({"jobId": "42"}), "job").unwrap();
        assert_eq!(job.job_id, "42");
    }

    #[test]
    fn test_data_wrapper() {
        let job: ReportJob =
            decode_payload(&json!({"data": {"jobId": "42", "status": "running"}}), "job").unwrap();
        assert_eq!(job.status.as_deref(), Some("running"));
    }

    #[test]
    fn test_named_wrapper() {
        let job: ReportJob = decode_payload(&json!({"job": {"jobId": 42}}), "job").unwrap();
        assert_eq!(job.job_id, "42");
    }

    #[test]
    fn test_data_then_named_wrapper() {
        let jobs: Vec<ReportJob> =
            decode_payload(&json!({"data": {"jobs": [{"jobId": "1"}, {"jobId": 2}]}}), "jobs")
                .unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[1].job_id, "2");
    }

    #[test]
    fn test_bare_array() {
        let jobs: Vec<ReportJob> = decode_payload(&json!([{"jobId": "1"}]), "jobs").unwrap();
        assert_eq!(jobs.len(), 1);
    }

    #[test]
    fn test_extra_fields_beside_wrapper_ignored() {
        let jobs: Vec<ReportJob> = decode_payload(
            &json!({"jobs": [{"jobId": "1"}], "pagination": {"page": 1}}),
            "jobs",
        )
        .unwrap();
        assert_eq!(jobs.len(), 1);
    }

    #[test]
    fn test_unrecognized_shape_is_hard_failure() {
        let result: Result<ReportJob> = decode_payload(&json!({"unexpected": "shape"}), "job");
        match result {
            Err(TrackerError::MalformedPayload(_)) => {}
            other => panic!("expected MalformedPayload, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_named_list_is_valid() {
        let jobs: Vec<ReportJob> = decode_payload(&json!({"jobs": []}), "jobs").unwrap();
        assert!(jobs.is_empty());
    }
}
