use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

pub const ACCESS_KEY_VAR: &str = "WAYBACK_ACCESS_KEY";
pub const SECRET_KEY_VAR: &str = "WAYBACK_SECRET_KEY";

/// The S3-style key pair of an archive.org account.
#[derive(Clone)]
pub struct Credentials {
    access_key: String,
    secret_key: String,
}

impl Credentials {
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Resolve both keys through `lookup`. Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let fetch = |var: &'static str| {
            lookup(var)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::MissingCredential { var })
        };

        Ok(Self {
            access_key: fetch(ACCESS_KEY_VAR)?,
            secret_key: fetch(SECRET_KEY_VAR)?,
        })
    }

    /// Value of the `Authorization` header sent on every request.
    pub fn authorization(&self) -> String {
        format!("LOW {}:{}", self.access_key, self.secret_key)
    }
}

// Keep the secret out of debug logs
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    /// Host of the Save Page Now API.
    pub api_base: String,
    /// Prefix of public capture links.
    pub archive_base: String,
    pub max_attempts: u32,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    pub history_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: "https://web.archive.org".to_string(),
            archive_base: "https://web.archive.org/web".to_string(),
            max_attempts: 12,
            poll_interval: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
            history_path: PathBuf::from("archive_history.csv"),
        }
    }
}

impl Settings {
    pub fn submit_url(&self) -> String {
        format!("{}/save/", self.api_base.trim_end_matches('/'))
    }

    pub fn status_url(&self, job_id: &str) -> String {
        format!("{}/save/status/{}", self.api_base.trim_end_matches('/'), job_id)
    }

    pub fn capture_url(&self, timestamp: &str, url: &str) -> String {
        format!("{}/{}/{}", self.archive_base.trim_end_matches('/'), timestamp, url)
    }

    /// Listing of every capture of `url`; used when no single capture can be named.
    pub fn history_url(&self, url: &str) -> String {
        self.capture_url("*", url)
    }
}

/// Build the list of URLs to archive from command-line arguments and an optional list file.
///
/// Arguments come first, then the file's lines in order. Blank lines and lines starting
/// with `#` are skipped.
pub fn load_targets(args: &[String], file: Option<&Path>) -> Result<Vec<String>, ConfigError> {
    let mut targets: Vec<String> = args
        .iter()
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .collect();

    if let Some(path) = file {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::TargetFile {
            path: path.to_path_buf(),
            source,
        })?;
        targets.extend(
            contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(str::to_string),
        );
    }

    if targets.is_empty() {
        return Err(ConfigError::NoTargets);
    }
    Ok(targets)
}
