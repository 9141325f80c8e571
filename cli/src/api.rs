//! HTTP client for the Doppler simulation service.
//!
//! Thin reqwest wrapper over the service's JSON endpoints. Response bodies go
//! through pure `parse_*` functions so the wire handling is testable without a
//! server.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::time::Duration;

use doppler_canvas::submit::{ParamSpec, SimulationRequest};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{ClientConfig, PollConfig};

/// Progress reported for a processing job that did not send one.
pub const DEFAULT_PROGRESS: f64 = 50.0;

/// Message used when a failed job carries no error text.
pub const UNKNOWN_FAILURE: &str = "Unknown error occurred";

// =============================================================================
// ERRORS
// =============================================================================

/// Errors produced by simulation service calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The request could not be sent or its body could not be read.
    #[error("request failed: {0}")]
    Request(String),

    /// The service returned a non-success HTTP status.
    #[error("service returned status {status}: {body}")]
    Response { status: u16, body: String },

    /// The response body did not match the expected shape.
    #[error("response parse failed: {0}")]
    Decode(String),

    #[error("simulation failed: {0}")]
    JobFailed(String),

    #[error("job {job_id} still processing after {polls} polls")]
    Timeout { job_id: String, polls: u32 },
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VehiclesResponse {
    vehicles: Vec<Vehicle>,
}

/// A path family as listed in the service catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parameters: Vec<ParamSpec>,
}

#[derive(Debug, Deserialize)]
struct PathsResponse {
    paths: Vec<PathInfo>,
}

#[derive(Debug, Deserialize)]
struct SimulateResponse {
    job_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Processing,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FreqRatioRange {
    pub min: f64,
    pub max: f64,
}

/// Descriptor of a finished simulation. Fields the client does not model are
/// kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobResult {
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freq_ratio_range: Option<FreqRatioRange>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStatus {
    pub status: JobState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<JobResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// What a single status poll means for the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    Pending { progress: f64 },
    Done(JobResult),
    Failed(String),
}

impl JobStatus {
    #[must_use]
    pub fn outcome(self) -> JobOutcome {
        match (self.status, self.result) {
            (JobState::Completed, Some(result)) => JobOutcome::Done(result),
            (JobState::Completed, None) => JobOutcome::Failed("completed job has no result".to_owned()),
            (JobState::Failed, _) => JobOutcome::Failed(
                self.error.filter(|e| !e.trim().is_empty()).unwrap_or_else(|| UNKNOWN_FAILURE.to_owned()),
            ),
            (JobState::Processing | JobState::Unknown, _) => {
                JobOutcome::Pending { progress: self.progress.unwrap_or(DEFAULT_PROGRESS) }
            }
        }
    }
}

// =============================================================================
// PARSING
// =============================================================================

fn decode<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    serde_json::from_str(text).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Parse a `/api/vehicles` body.
///
/// # Errors
///
/// Returns [`ApiError::Decode`] when the body is not the expected JSON.
pub fn parse_vehicles(text: &str) -> Result<Vec<Vehicle>, ApiError> {
    decode::<VehiclesResponse>(text).map(|r| r.vehicles)
}

/// Parse a `/api/paths` body.
///
/// # Errors
///
/// Returns [`ApiError::Decode`] when the body is not the expected JSON.
pub fn parse_paths(text: &str) -> Result<Vec<PathInfo>, ApiError> {
    decode::<PathsResponse>(text).map(|r| r.paths)
}

/// Parse a `/api/simulate` body into the job id.
///
/// # Errors
///
/// Returns [`ApiError::Decode`] when the body has no `job_id`.
pub fn parse_job_id(text: &str) -> Result<String, ApiError> {
    decode::<SimulateResponse>(text).map(|r| r.job_id)
}

/// Parse a `/api/job/{id}` body.
///
/// # Errors
///
/// Returns [`ApiError::Decode`] when the body is not a job status.
pub fn parse_job_status(text: &str) -> Result<JobStatus, ApiError> {
    decode(text)
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns [`ApiError::HttpClientBuild`] if the TLS backend fails to load.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: config.base_url.clone() })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    #[must_use]
    pub fn download_url(&self, filename: &str) -> String {
        self.url(&format!("/api/download/{filename}"))
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await.map_err(|e| ApiError::Request(e.to_string()))?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| ApiError::Request(e.to_string()))?;
        if !(200..300).contains(&status) {
            return Err(ApiError::Response { status, body: text });
        }
        Ok(text)
    }

    async fn get(&self, path: &str) -> Result<String, ApiError> {
        tracing::debug!(path, "GET");
        self.send(self.http.get(self.url(path))).await
    }

    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure, non-success status, or a
    /// non-JSON body.
    pub async fn health(&self) -> Result<Value, ApiError> {
        decode(&self.get("/health").await?)
    }

    /// # Errors
    ///
    /// Same as [`ApiClient::health`].
    pub async fn info(&self) -> Result<Value, ApiError> {
        decode(&self.get("/api/info").await?)
    }

    /// # Errors
    ///
    /// Same as [`ApiClient::health`].
    pub async fn vehicles(&self) -> Result<Vec<Vehicle>, ApiError> {
        parse_vehicles(&self.get("/api/vehicles").await?)
    }

    /// Path catalog, optionally filtered to one vehicle.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::health`].
    pub async fn paths(&self, vehicle_type: Option<&str>) -> Result<Vec<PathInfo>, ApiError> {
        let mut request = self.http.get(self.url("/api/paths"));
        if let Some(vehicle) = vehicle_type {
            request = request.query(&[("vehicle_type", vehicle)]);
        }
        tracing::debug!(?vehicle_type, "GET /api/paths");
        parse_paths(&self.send(request).await?)
    }

    /// Submit a simulation job and return its id.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::health`].
    pub async fn simulate(&self, request: &SimulationRequest) -> Result<String, ApiError> {
        tracing::info!(path = %request.path, vehicle = %request.vehicle_type, "submitting simulation");
        let text = self.send(self.http.post(self.url("/api/simulate")).json(request)).await?;
        let job_id = parse_job_id(&text)?;
        tracing::info!(%job_id, "simulation accepted");
        Ok(job_id)
    }

    /// # Errors
    ///
    /// Same as [`ApiClient::health`].
    pub async fn job(&self, job_id: &str) -> Result<JobStatus, ApiError> {
        parse_job_status(&self.get(&format!("/api/job/{job_id}")).await?)
    }
}

// =============================================================================
// POLLING
// =============================================================================

/// Anything that can report a job's status.
pub(crate) trait JobSource {
    async fn job_status(&self, job_id: &str) -> Result<JobStatus, ApiError>;
}

impl JobSource for ApiClient {
    async fn job_status(&self, job_id: &str) -> Result<JobStatus, ApiError> {
        self.job(job_id).await
    }
}

/// Poll `job_id` until it completes, fails, or the poll budget runs out.
///
/// `on_progress` sees the progress of every processing poll.
pub(crate) async fn wait_for_job(
    source: &impl JobSource,
    job_id: &str,
    poll: PollConfig,
    mut on_progress: impl FnMut(f64),
) -> Result<JobResult, ApiError> {
    for attempt in 1..=poll.max_polls {
        match source.job_status(job_id).await?.outcome() {
            JobOutcome::Done(result) => {
                tracing::info!(%job_id, filename = %result.filename, "simulation completed");
                return Ok(result);
            }
            JobOutcome::Failed(message) => {
                tracing::warn!(%job_id, %message, "simulation failed");
                return Err(ApiError::JobFailed(message));
            }
            JobOutcome::Pending { progress } => {
                tracing::debug!(%job_id, attempt, progress, "simulation processing");
                on_progress(progress);
            }
        }
        if attempt < poll.max_polls {
            tokio::time::sleep(poll.interval()).await;
        }
    }
    Err(ApiError::Timeout { job_id: job_id.to_owned(), polls: poll.max_polls })
}
