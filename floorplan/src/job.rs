//! Analysis jobs: the job record, its transport seams, and result-view resolution.
//!
//! A job moves `pending → processing → completed | failed`. The host fetches
//! the record through a [`JobSource`] and persists edited floorplans through a
//! [`FloorplanSink`]; both are traits so the native CLI, the browser host, and
//! tests can each supply their own transport.
//!
//! [`resolve_view`] decides what the result page shows for a given record:
//! the progress poller, or the editor loaded with the analysis result, a
//! partial result, the demo room, or the empty placeholder.

#[cfg(test)]
#[path = "job_test.rs"]
mod job_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::doc::FloorplanDocument;

// =============================================================
// Status
// =============================================================

/// Lifecycle state of an analysis job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    /// `completed` and `failed` are final; no further polling happens.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(format!("unknown job status: {other}")),
        }
    }
}

// =============================================================
// Record
// =============================================================

/// Job record as served by `GET /api/jobs/{jobId}`.
///
/// Only `status` and `result` drive behavior; the rest is carried for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    #[serde(default)]
    pub job_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    pub status: JobStatus,
    /// Floorplan JSON, or `{ "raw": ..., "error": ... }` when the model output
    /// could not be parsed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

impl JobRecord {
    /// A bare record with the given id and status.
    #[must_use]
    pub fn new(job_id: impl Into<String>, status: JobStatus) -> Self {
        Self {
            job_id: job_id.into(),
            user_id: None,
            video_url: None,
            status,
            result: None,
            error: None,
            raw_output: None,
            video_duration: None,
            created_at: None,
            updated_at: None,
            completed_at: None,
        }
    }

    #[must_use]
    pub fn with_result(mut self, result: Value) -> Self {
        self.result = Some(result);
        self
    }

    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// The floorplan carried in `result`, if it looks like one and decodes.
    ///
    /// A result must be an object with at least one of `walls`, `items`, or
    /// `dimensions`; the parse-failure shape `{ raw, error }` does not qualify.
    #[must_use]
    pub fn floorplan(&self) -> Option<FloorplanDocument> {
        let result = self.result.as_ref()?;
        let map = result.as_object()?;
        if !["walls", "items", "dimensions"].iter().any(|key| map.contains_key(*key)) {
            return None;
        }
        match FloorplanDocument::from_value(result.clone()) {
            Ok(doc) => Some(doc),
            Err(error) => {
                warn!(job_id = %self.job_id, %error, "job result is not a decodable floorplan");
                None
            }
        }
    }

    /// Error string embedded in `result` by a failed model-output parse.
    #[must_use]
    pub fn result_error(&self) -> Option<&str> {
        self.result.as_ref()?.get("error")?.as_str()
    }
}

// =============================================================
// Transport
// =============================================================

/// Errors fetching a job record. The poller treats all of them as transient.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The request could not be sent or the connection failed.
    #[error("job request failed: {0}")]
    Request(String),

    /// The server does not know the job.
    #[error("job not found: {job_id}")]
    NotFound { job_id: String },

    /// The server returned a non-success HTTP status.
    #[error("job response error: status {status}")]
    Status { status: u16 },

    /// The response body was not a job record.
    #[error("job response parse failed: {0}")]
    Decode(String),
}

impl FetchError {
    /// Whether retrying the same request later could succeed.
    #[must_use]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::Request(_) | Self::Status { status: 429 | 500..=599 })
    }
}

/// Errors persisting an edited floorplan.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SaveError {
    /// Demo and placeholder views carry no job to save into.
    #[error("cannot save without a job id")]
    NoJob,

    #[error("save request failed: {0}")]
    Request(String),

    #[error("job not found: {job_id}")]
    NotFound { job_id: String },

    #[error("save rejected: status {status}")]
    Status { status: u16 },

    #[error("floorplan encode failed: {0}")]
    Encode(String),
}

/// Source of job records. Enables mocking in tests.
#[async_trait::async_trait]
pub trait JobSource: Send + Sync {
    /// Fetch the current record for `job_id`.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] if the request fails or the body is not a job record.
    async fn fetch_job(&self, job_id: &str) -> Result<JobRecord, FetchError>;
}

/// Destination for edited floorplans.
#[async_trait::async_trait]
pub trait FloorplanSink: Send + Sync {
    /// Replace the stored result of `job_id` with `doc`.
    ///
    /// # Errors
    ///
    /// Returns a [`SaveError`] if the request fails or is rejected.
    async fn save_floorplan(&self, job_id: &str, doc: &FloorplanDocument) -> Result<(), SaveError>;
}

/// Body of `PATCH /api/floorplan/{jobId}`.
#[derive(Debug, Serialize)]
pub struct SaveRequest<'a> {
    pub data: &'a FloorplanDocument,
}

/// Path of the job status endpoint.
#[must_use]
pub fn job_status_path(job_id: &str) -> String {
    format!("/api/jobs/{job_id}")
}

/// Path of the floorplan persistence endpoint.
#[must_use]
pub fn floorplan_path(job_id: &str) -> String {
    format!("/api/floorplan/{job_id}")
}

// =============================================================
// Result view
// =============================================================

/// Where the document shown in the editor came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    /// The completed analysis result.
    Analysis,
    /// Whatever a failed job managed to produce.
    Partial,
    /// The built-in sample room.
    Demo,
    /// The empty 1 × 1 room.
    Placeholder,
}

impl DataSource {
    /// Badge text shown over the editor.
    #[must_use]
    pub fn badge(self) -> &'static str {
        match self {
            Self::Analysis => "ANALYSIS RESULT",
            Self::Partial => "PARTIAL RESULT",
            Self::Demo => "MOCK DATA (Demo)",
            Self::Placeholder => "NO RESULT",
        }
    }
}

/// What the result page should present.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultView {
    /// The job is still running; show the progress poller.
    Polling { job_id: String, status: JobStatus },
    /// Show the editor.
    Editor {
        document: FloorplanDocument,
        source: DataSource,
        /// Saving is possible only with a job id.
        job_id: Option<String>,
        /// Error to surface next to the editor.
        error: Option<String>,
    },
}

impl ResultView {
    /// The document the editor opens with, if this is an editor view.
    #[must_use]
    pub fn document(&self) -> Option<&FloorplanDocument> {
        match self {
            Self::Editor { document, .. } => Some(document),
            Self::Polling { .. } => None,
        }
    }
}

/// Decide what to show for `job` (`None` when no job was requested or found).
#[must_use]
pub fn resolve_view(job: Option<&JobRecord>) -> ResultView {
    let Some(job) = job else {
        return ResultView::Editor {
            document: FloorplanDocument::demo(),
            source: DataSource::Demo,
            job_id: None,
            error: None,
        };
    };
    let job_id = Some(job.job_id.clone()).filter(|id| !id.is_empty());

    match job.status {
        JobStatus::Pending | JobStatus::Processing => ResultView::Polling {
            job_id: job.job_id.clone(),
            status: job.status,
        },
        JobStatus::Completed => match job.floorplan() {
            Some(document) => ResultView::Editor {
                document,
                source: DataSource::Analysis,
                job_id,
                error: None,
            },
            None => ResultView::Editor {
                document: FloorplanDocument::demo(),
                source: DataSource::Demo,
                job_id,
                error: job.result_error().map(str::to_owned).or_else(|| job.error.clone()),
            },
        },
        JobStatus::Failed => match (job.floorplan(), job.error.clone().filter(|e| !e.is_empty())) {
            (Some(document), error) => ResultView::Editor {
                document,
                source: DataSource::Partial,
                job_id,
                error: error.or_else(|| Some(String::from("analysis failed"))),
            },
            (None, Some(error)) => ResultView::Editor {
                document: FloorplanDocument::placeholder(),
                source: DataSource::Placeholder,
                job_id,
                error: Some(error),
            },
            // Nothing to show and nothing to explain: same as having no job.
            (None, None) => ResultView::Editor {
                document: FloorplanDocument::demo(),
                source: DataSource::Demo,
                job_id,
                error: None,
            },
        },
    }
}
