// Report Job Domain Model

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Job ID (backend-assigned, opaque)
///
/// Always carried as a string. Backends that encode the id as a JSON number
/// are coerced at the wire boundary; ids are never compared numerically.
pub type JobId = String;

/// Statuses from which no further progress or status change is expected.
///
/// Matching is case-insensitive. Both `cancelled` and `canceled` are kept as
/// distinct entries: the backend's vocabulary is unknown from this layer, so
/// spelling is never normalized.
pub const TERMINAL_STATUSES: [&str; 5] = ["completed", "failed", "cancelled", "canceled", "expired"];

/// Check whether a backend-reported status is terminal
pub fn is_terminal_status(status: &str) -> bool {
    TERMINAL_STATUSES
        .iter()
        .any(|t| status.eq_ignore_ascii_case(t))
}

/// One execution instance of a report, as reported by the backend.
///
/// `job_id` is the sole identity key and is immutable once assigned. All
/// other fields are optional: a freshly submitted job carries only its id
/// until the first successful poll enriches it. Unknown wire fields pass
/// through unexamined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportJob {
    #[serde(deserialize_with = "de_job_id")]
    pub job_id: JobId,

    #[serde(default)]
    pub report_type: Option<String>,

    /// Free-form status string from the backend, matched case-insensitively
    #[serde(default)]
    pub status: Option<String>,

    /// 0-100
    #[serde(default)]
    pub progress: Option<f64>,

    #[serde(default, deserialize_with = "de_opt_string_coerce")]
    pub submitted_at: Option<String>,

    #[serde(default, deserialize_with = "de_opt_string_coerce")]
    pub started_at: Option<String>,

    #[serde(default, deserialize_with = "de_opt_string_coerce")]
    pub completed_at: Option<String>,

    #[serde(default)]
    pub requested_by: Option<String>,

    #[serde(default)]
    pub download_url: Option<String>,

    #[serde(default)]
    pub file_name: Option<String>,

    #[serde(default)]
    pub attempts: Option<i64>,

    #[serde(default)]
    pub parameters: Option<Value>,

    #[serde(default)]
    pub message: Option<String>,
}

impl ReportJob {
    /// Create a job with only its identity known (the post-submission shape)
    pub fn new(job_id: impl Into<JobId>) -> Self {
        Self {
            job_id: job_id.into(),
            report_type: None,
            status: None,
            progress: None,
            submitted_at: None,
            started_at: None,
            completed_at: None,
            requested_by: None,
            download_url: None,
            file_name: None,
            attempts: None,
            parameters: None,
            message: None,
        }
    }

    pub fn with_report_type(mut self, report_type: impl Into<String>) -> Self {
        self.report_type = Some(report_type.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_progress(mut self, progress: f64) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn with_download_url(mut self, url: impl Into<String>) -> Self {
        self.download_url = Some(url.into());
        self
    }

    pub fn with_parameters(mut self, parameters: Value) -> Self {
        self.parameters = Some(parameters);
        self
    }

    /// A job with no status yet is non-terminal and keeps being polled
    pub fn is_terminal(&self) -> bool {
        self.status.as_deref().is_some_and(is_terminal_status)
    }
}

/// Minimal identity projection used to drive polling regardless of whether
/// the job came from the session-local registry or durable history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedJob {
    pub job_id: JobId,

    #[serde(default)]
    pub report_type: Option<String>,

    #[serde(default)]
    pub parameters: Option<Value>,
}

impl TrackedJob {
    pub fn new(job_id: impl Into<JobId>) -> Self {
        Self {
            job_id: job_id.into(),
            report_type: None,
            parameters: None,
        }
    }
}

impl From<&ReportJob> for TrackedJob {
    fn from(job: &ReportJob) -> Self {
        Self {
            job_id: job.job_id.clone(),
            report_type: job.report_type.clone(),
            parameters: job.parameters.clone(),
        }
    }
}

/// Coerce a required string-or-number id to its string form
fn de_job_id<'de, D>(deserializer: D) -> Result<JobId, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "job id must be a string or number, got {other}"
        ))),
    }
}

/// Coerce an optional string-or-number field (timestamps vary by backend)
pub(crate) fn de_opt_string_coerce<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}
