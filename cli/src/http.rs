//! HTTP transport for the job and floorplan endpoints.

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use floorplan::doc::FloorplanDocument;
use floorplan::job::{
    FetchError, FloorplanSink, JobRecord, JobSource, SaveError, SaveRequest, floorplan_path, job_status_path,
};
use reqwest::StatusCode;

/// `reqwest` client bound to one API base URL.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self { client, base_url: base_url.into() }
    }

    fn url(&self, path: &str) -> String {
        endpoint(&self.base_url, path)
    }
}

#[async_trait::async_trait]
impl JobSource for HttpBackend {
    async fn fetch_job(&self, job_id: &str) -> Result<JobRecord, FetchError> {
        let response = self
            .client
            .get(self.url(&job_status_path(job_id)))
            .send()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;
        if let Some(err) = fetch_status_error(response.status(), job_id) {
            return Err(err);
        }
        response
            .json::<JobRecord>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[async_trait::async_trait]
impl FloorplanSink for HttpBackend {
    async fn save_floorplan(&self, job_id: &str, doc: &FloorplanDocument) -> Result<(), SaveError> {
        if job_id.is_empty() {
            return Err(SaveError::NoJob);
        }
        let body = serde_json::to_value(SaveRequest { data: doc }).map_err(|e| SaveError::Encode(e.to_string()))?;
        let response = self
            .client
            .patch(self.url(&floorplan_path(job_id)))
            .json(&body)
            .send()
            .await
            .map_err(|e| SaveError::Request(e.to_string()))?;
        match save_status_error(response.status(), job_id) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Join `base_url` and an absolute `path`, tolerating a trailing slash.
#[must_use]
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

fn fetch_status_error(status: StatusCode, job_id: &str) -> Option<FetchError> {
    if status.is_success() {
        None
    } else if status == StatusCode::NOT_FOUND {
        Some(FetchError::NotFound { job_id: job_id.to_owned() })
    } else {
        Some(FetchError::Status { status: status.as_u16() })
    }
}

fn save_status_error(status: StatusCode, job_id: &str) -> Option<SaveError> {
    if status.is_success() {
        None
    } else if status == StatusCode::NOT_FOUND {
        Some(SaveError::NotFound { job_id: job_id.to_owned() })
    } else {
        Some(SaveError::Status { status: status.as_u16() })
    }
}
