// HTTP Report Backend (reqwest adapter)

use crate::decode::decode_payload;
use async_trait::async_trait;
use reportrack_core::domain::{ReportDefinition, ReportJob};
use reportrack_core::error::{Result, TrackerError};
use reportrack_core::port::ReportBackend;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP backend configuration
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL of the report service, e.g. `http://127.0.0.1:8080`
    pub base_url: String,
    /// Per-request timeout enforced at the transport layer
    pub request_timeout: Duration,
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// `ReportBackend` adapter speaking the JSON-over-HTTP contract:
///
/// - `GET    /reports`            - list report definitions
/// - `POST   /reports/{type}`     - start a job
/// - `GET    /reports/jobs`       - list job history
/// - `GET    /reports/jobs/{id}`  - poll one job
/// - `DELETE /reports/jobs/{id}`  - cancel a job
pub struct HttpReportBackend {
    http: reqwest::Client,
    base_url: String,
}

impl HttpReportBackend {
    pub fn new(config: BackendConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| TrackerError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and parse the body as JSON.
    ///
    /// Non-2xx responses and transport failures are `Transport`; a body that
    /// is not JSON at all is already a contract mismatch.
    async fn send(&self, request: reqwest::RequestBuilder, path: &str) -> Result<Value> {
        let response = request
            .send()
            .await
            .map_err(|e| TrackerError::Transport(format!("{path}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TrackerError::Transport(format!(
                "{path} returned HTTP {status}: {body}"
            )));
        }

        debug!(path = %path, status = %status, "Backend request completed");
        response
            .json::<Value>()
            .await
            .map_err(|e| TrackerError::MalformedPayload(format!("{path}: body is not JSON: {e}")))
    }
}

#[async_trait]
impl ReportBackend for HttpReportBackend {
    async fn list_reports(&self) -> Result<Vec<ReportDefinition>> {
        let path = "/reports";
        let body = self.send(self.http.get(self.url(path)), path).await?;
        decode_payload(&body, "reports")
    }

    async fn start_job(&self, report_type: &str, parameters: Option<&Value>) -> Result<ReportJob> {
        let path = format!("/reports/{report_type}");
        let empty = Value::Object(serde_json::Map::new());
        let request = self
            .http
            .post(self.url(&path))
            .json(parameters.unwrap_or(&empty));
        let body = self.send(request, &path).await?;
        decode_payload(&body, "job")
    }

    async fn fetch_job(&self, job_id: &str) -> Result<ReportJob> {
        let path = format!("/reports/jobs/{job_id}");
        let body = self.send(self.http.get(self.url(&path)), &path).await?;
        decode_payload(&body, "job")
    }

    async fn list_jobs(&self) -> Result<Vec<ReportJob>> {
        let path = "/reports/jobs";
        let body = self.send(self.http.get(self.url(path)), path).await?;
        decode_payload(&body, "jobs")
    }

    async fn cancel_job(&self, job_id: &str) -> Result<ReportJob> {
        let path = format!("/reports/jobs/{job_id}");
        let body = self.send(self.http.delete(self.url(&path)), &path).await?;
        decode_payload(&body, "job")
    }
}
