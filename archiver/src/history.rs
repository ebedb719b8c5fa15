use std::fmt;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::error::HistoryError;

/// Placeholder written when an outcome has no link to show.
pub const NO_LINK: &str = "N/A";

/// Label of the `Status` column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Success,
    Error(String),
    Timeout,
    AcceptedNoId,
    ApiError(u16),
}

impl Status {
    /// True when the page is known to be in the archive.
    pub fn is_ok(&self) -> bool {
        matches!(self, Status::Success | Status::AcceptedNoId)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Success => write!(f, "Success"),
            Status::Error(message) => write!(f, "Error: {}", message),
            Status::Timeout => write!(f, "Timeout/Pending"),
            Status::AcceptedNoId => write!(f, "Accepted (No ID)"),
            Status::ApiError(code) => write!(f, "API Error {}", code),
        }
    }
}

/// One row of the history file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Original URL")]
    pub original_url: String,
    #[serde(rename = "Wayback Link")]
    pub wayback_link: String,
    #[serde(rename = "Status")]
    pub status: String,
}

impl LogRecord {
    /// Record stamped with the current local time, to the second.
    pub fn new(original_url: &str, wayback_link: &str, status: Status) -> Self {
        Self {
            date: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            original_url: original_url.to_string(),
            wayback_link: wayback_link.to_string(),
            status: status.to_string(),
        }
    }
}

/// Append-only CSV file of submission outcomes.
///
/// Every call to [`HistoryLog::append`] opens the file, writes exactly one row and closes it
/// again, so a crash never loses more than the row being written. The header goes in only
/// when the file is created. There is no locking: one writer at a time.
#[derive(Debug, Clone)]
pub struct HistoryLog {
    path: PathBuf,
}

impl HistoryLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, record: &LogRecord) -> Result<(), HistoryError> {
        let existed = self.path.exists();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| HistoryError::Open {
                path: self.path.clone(),
                source,
            })?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(!existed)
            .from_writer(file);
        writer
            .serialize(record)
            .and_then(|()| writer.flush().map_err(csv::Error::from))
            .map_err(|source| HistoryError::Write {
                path: self.path.clone(),
                source,
            })?;

        log::debug!(
            "Appended {} -> {} to {}",
            record.original_url,
            record.status,
            self.path.display()
        );
        Ok(())
    }

    /// All rows in the order they were written. A missing file has no rows.
    pub fn read_all(&self) -> Result<Vec<LogRecord>, HistoryError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let read_err = |source| HistoryError::Read {
            path: self.path.clone(),
            source,
        };
        let mut reader = csv::Reader::from_path(&self.path).map_err(read_err)?;
        reader
            .deserialize()
            .collect::<Result<Vec<LogRecord>, _>>()
            .map_err(read_err)
    }
}
