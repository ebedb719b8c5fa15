use std::thread;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::StatusCode;
use serde::Deserialize;

use crate::config::{Credentials, Settings};
use crate::error::ArchiveError;
use crate::history::{HistoryLog, LogRecord, Status, NO_LINK};
use crate::progress::PollObserver;

/// Response header carrying the job id when the body does not.
pub const JOB_ID_HEADER: &str = "X-Archive-Wayback-Job-ID";

/// Server-assigned id of an in-progress capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle {
    id: String,
}

impl JobHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// How the save endpoint answered a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// A capture job was started.
    Queued(JobHandle),
    /// Accepted without a job id; the page was captured recently and is served from cache.
    Cached,
    /// Anything but `200 OK`.
    Rejected(u16),
}

/// Classification of a status query. `Pending` is the only non-terminal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollResult {
    Success {
        final_url: String,
        timestamp: Option<String>,
    },
    Error {
        message: String,
    },
    Pending,
    Timeout {
        status_url: String,
    },
}

impl PollResult {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PollResult::Pending)
    }
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    job_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: Option<String>,
    timestamp: Option<String>,
    message: Option<String>,
}

/// The row written for one URL, with its status still typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archived {
    pub status: Status,
    pub record: LogRecord,
}

/// Blocking client for the Save Page Now API.
#[derive(Debug)]
pub struct ArchiveClient {
    http: Client,
    credentials: Credentials,
    settings: Settings,
}

impl ArchiveClient {
    pub fn new(credentials: Credentials, settings: Settings) -> reqwest::Result<Self> {
        let http = Client::builder()
            .timeout(settings.request_timeout)
            .build()?;
        Ok(Self {
            http,
            credentials,
            settings,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, self.credentials.authorization())
    }

    fn send(&self, endpoint: &str, request: RequestBuilder) -> Result<Response, ArchiveError> {
        let response = self
            .authorized(request)
            .send()
            .map_err(|err| ArchiveError::transport(endpoint, err))?;
        log::debug!("{} answered {}", endpoint, response.status());
        Ok(response)
    }

    /// Ask the archive to capture `url`, with outlinks, a screenshot and a plain GET.
    ///
    /// Makes exactly one request; a failed submission is not retried.
    pub fn submit(&self, url: &str) -> Result<Submission, ArchiveError> {
        let endpoint = self.settings.submit_url();
        let form = [
            ("url", url),
            ("capture_all", "1"),
            ("capture_screenshot", "1"),
            ("force_get", "1"),
        ];
        let response = self.send(&endpoint, self.http.post(&endpoint).form(&form))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Ok(Submission::Rejected(status.as_u16()));
        }

        let header_id = response
            .headers()
            .get(JOB_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response
            .text()
            .map_err(|err| ArchiveError::transport(&endpoint, err))?;
        let body_id = match serde_json::from_str::<SubmitResponse>(&body) {
            Ok(parsed) => parsed.job_id,
            Err(err) => {
                log::warn!("Submit response for {} is not JSON ({}), checking headers", url, err);
                None
            }
        };

        let job_id = non_empty(body_id).or_else(|| non_empty(header_id));
        Ok(match job_id {
            Some(id) => Submission::Queued(JobHandle::new(id)),
            None => Submission::Cached,
        })
    }

    /// Query the job once and classify the answer.
    ///
    /// Anything that is not a readable `success` or `error` report is `Pending`, including
    /// non-200 answers and bodies that fail to parse. Only transport failures are errors.
    pub fn check_status(&self, job: &JobHandle, url: &str) -> Result<PollResult, ArchiveError> {
        let endpoint = self.settings.status_url(job.id());
        let response = self.send(&endpoint, self.http.get(&endpoint))?;
        let status = response.status();
        let body = response
            .text()
            .map_err(|err| ArchiveError::transport(&endpoint, err))?;

        if status != StatusCode::OK {
            log::warn!("Status check for job {} returned {}", job.id(), status);
            return Ok(PollResult::Pending);
        }

        let report: StatusResponse = match serde_json::from_str(&body) {
            Ok(report) => report,
            Err(err) => {
                log::warn!("Unreadable status for job {}: {}", job.id(), err);
                return Ok(PollResult::Pending);
            }
        };

        Ok(match report.status.as_deref() {
            Some("success") => {
                let timestamp = non_empty(report.timestamp);
                let final_url = match &timestamp {
                    Some(ts) => self.settings.capture_url(ts, url),
                    None => self.settings.history_url(url),
                };
                PollResult::Success {
                    final_url,
                    timestamp,
                }
            }
            Some("error") => PollResult::Error {
                message: report.message.unwrap_or_else(|| "unknown error".to_string()),
            },
            other => {
                log::debug!("Job {} still {:?}", job.id(), other);
                PollResult::Pending
            }
        })
    }

    /// Poll until the job succeeds or fails, giving up after `max_attempts` queries.
    ///
    /// Sleeps `poll_interval` between pending attempts, never after the last one. The budget
    /// counts attempts, so slow responses stretch the total wait.
    pub fn wait_for_completion(
        &self,
        job: &JobHandle,
        url: &str,
        observer: &dyn PollObserver,
    ) -> Result<PollResult, ArchiveError> {
        let max_attempts = self.settings.max_attempts;
        for attempt in 1..=max_attempts {
            let result = self.check_status(job, url)?;
            if result.is_terminal() {
                return Ok(result);
            }

            observer.waiting(attempt, max_attempts);
            if attempt < max_attempts {
                thread::sleep(self.settings.poll_interval);
            }
        }

        Ok(PollResult::Timeout {
            status_url: self.settings.status_url(job.id()),
        })
    }

    /// Submit `url`, wait for the outcome and append exactly one row to `history`.
    ///
    /// Transport failures abort before anything is written.
    pub fn archive(
        &self,
        url: &str,
        history: &HistoryLog,
        observer: &dyn PollObserver,
    ) -> Result<Archived, ArchiveError> {
        observer.submitting(url);

        let (status, link) = match self.submit(url)? {
            Submission::Queued(job) => {
                observer.submitted(url, &job);
                let result = self.wait_for_completion(&job, url, observer)?;
                observer.finished(url, &result);
                self.outcome_for(&job, result)
            }
            Submission::Cached => {
                let link = self.settings.history_url(url);
                observer.cached(url, &link);
                (Status::AcceptedNoId, link)
            }
            Submission::Rejected(code) => {
                observer.rejected(url, code);
                (Status::ApiError(code), NO_LINK.to_string())
            }
        };

        let record = LogRecord::new(url, &link, status.clone());
        history.append(&record)?;
        Ok(Archived { status, record })
    }

    fn outcome_for(&self, job: &JobHandle, result: PollResult) -> (Status, String) {
        match result {
            PollResult::Success { final_url, .. } => (Status::Success, final_url),
            PollResult::Error { message } => (Status::Error(message), NO_LINK.to_string()),
            PollResult::Timeout { status_url } => (Status::Timeout, status_url),
            // not produced by wait_for_completion
            PollResult::Pending => (Status::Timeout, self.settings.status_url(job.id())),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
