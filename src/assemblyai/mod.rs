//! AssemblyAI transcription client.
//!
//! Drives one audio file through the service's asynchronous job model:
//! upload the bytes, submit a transcription job, then poll until the job
//! reaches a terminal state. The polling interval and attempt bound are
//! client fields so tests can run a zero-delay variant.

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::sleep;

pub const DEFAULT_BASE_URL: &str = "https://api.assemblyai.com";

/// Fixed delay between status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Status checks before giving up (~5 minutes at the default interval).
pub const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 100;

const UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from the remote transcription protocol.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("audio file is empty: {0}")]
    EmptyAudio(PathBuf),

    #[error("failed to read audio file: {0}")]
    Io(#[from] std::io::Error),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upload failed with status {status}: {body}")]
    UploadFailed { status: StatusCode, body: String },

    #[error("transcription submission failed with status {status}: {body}")]
    SubmitFailed { status: StatusCode, body: String },

    #[error("polling failed with status {status}")]
    PollFailed { status: StatusCode },

    #[error("transcription did not finish after {attempts} status checks")]
    PollTimeout { attempts: u32 },

    #[error("transcription failed: {0}")]
    JobFailed(String),

    #[error("completed transcript contained no text")]
    MissingText,
}

/// Status of a remote transcription job.
///
/// Statuses the service may add later deserialize as `Unknown` and are
/// treated as non-terminal, so polling keeps going.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Error,
    Unknown(String),
}

impl From<String> for JobStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "queued" => JobStatus::Queued,
            "processing" => JobStatus::Processing,
            "completed" => JobStatus::Completed,
            "error" => JobStatus::Error,
            _ => JobStatus::Unknown(value),
        }
    }
}

impl JobStatus {
    /// Terminal states end polling.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Error)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Queued => write!(f, "queued"),
            JobStatus::Processing => write!(f, "processing"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Error => write!(f, "error"),
            JobStatus::Unknown(s) => write!(f, "{}", s),
        }
    }
}

/// One outstanding remote transcription request. Mutated only by polling
/// responses, never by the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionJob {
    pub id: String,
    pub status: JobStatus,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Serialize)]
struct TranscriptionRequest<'a> {
    audio_url: &'a str,
    speech_model: &'a str,
}

#[derive(Deserialize)]
struct UploadResponse {
    upload_url: String,
}

/// AssemblyAI HTTP client
pub struct TranscriptClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    poll_interval: Duration,
    max_poll_attempts: u32,
}

impl TranscriptClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_poll_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
        }
    }

    /// Point the client at a different service endpoint (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_max_poll_attempts(mut self, attempts: u32) -> Self {
        self.max_poll_attempts = attempts;
        self
    }

    /// Transcribe an audio file: upload, submit, poll to a terminal state.
    ///
    /// No retries happen here; any failed step surfaces immediately and
    /// retry policy belongs to the caller.
    pub async fn transcribe(&self, audio_path: &Path, model: &str) -> Result<String, ClientError> {
        tracing::info!("Starting transcription...");

        let upload_url = self.upload(audio_path).await?;
        tracing::debug!("Audio uploaded: {}", upload_url);

        let job = self.submit(&upload_url, model).await?;
        tracing::info!("Transcription job {} submitted, waiting...", job.id);

        let job = self.poll(&job.id).await?;

        match job.status {
            JobStatus::Completed => job.text.ok_or(ClientError::MissingText),
            JobStatus::Error => Err(ClientError::JobFailed(
                job.error.unwrap_or_else(|| "unknown error".to_string()),
            )),
            // poll() only returns terminal jobs
            other => Err(ClientError::JobFailed(format!(
                "unexpected terminal status: {}",
                other
            ))),
        }
    }

    /// Upload raw audio bytes as a multipart form, returning the opaque
    /// upload URL the service hands back.
    async fn upload(&self, audio_path: &Path) -> Result<String, ClientError> {
        let data = fs_err::read(audio_path)?;
        if data.is_empty() {
            return Err(ClientError::EmptyAudio(audio_path.to_path_buf()));
        }

        let part = reqwest::multipart::Part::bytes(data).file_name("audio.mp3");
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(format!("{}/v2/upload", self.base_url))
            .header(AUTHORIZATION, self.api_key.as_str())
            .timeout(UPLOAD_TIMEOUT)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::UploadFailed { status, body });
        }

        let upload: UploadResponse = response.json().await?;
        Ok(upload.upload_url)
    }

    /// Submit a transcription job for an uploaded file.
    async fn submit(
        &self,
        audio_url: &str,
        model: &str,
    ) -> Result<TranscriptionJob, ClientError> {
        let request = TranscriptionRequest {
            audio_url,
            speech_model: model,
        };

        let response = self
            .http
            .post(format!("{}/v2/transcript", self.base_url))
            .header(AUTHORIZATION, self.api_key.as_str())
            .timeout(REQUEST_TIMEOUT)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::SubmitFailed { status, body });
        }

        Ok(response.json().await?)
    }

    /// Poll job status until a terminal state, bounded by
    /// `max_poll_attempts` non-terminal observations.
    async fn poll(&self, job_id: &str) -> Result<TranscriptionJob, ClientError> {
        let progress = ProgressBar::new_spinner();
        progress.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        progress.set_message("Processing audio...");

        for attempt in 1..=self.max_poll_attempts {
            let response = self
                .http
                .get(format!("{}/v2/transcript/{}", self.base_url, job_id))
                .header(AUTHORIZATION, self.api_key.as_str())
                .timeout(REQUEST_TIMEOUT)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                progress.finish_and_clear();
                return Err(ClientError::PollFailed { status });
            }

            let job: TranscriptionJob = response.json().await?;

            if job.status.is_terminal() {
                progress.finish_and_clear();
                return Ok(job);
            }

            match &job.status {
                JobStatus::Unknown(s) => {
                    tracing::debug!("Unknown transcript status '{}', still waiting", s)
                }
                status => tracing::debug!("Transcript status: {}", status),
            }
            progress.set_message(format!("Processing audio... ({}, check #{})", job.status, attempt));

            if attempt < self.max_poll_attempts {
                sleep(self.poll_interval).await;
            }
        }

        progress.finish_and_clear();
        Err(ClientError::PollTimeout {
            attempts: self.max_poll_attempts,
        })
    }
}
