use std::path::PathBuf;

use thiserror::Error;

/// Problems with the process configuration. Reported once, before any URL is touched.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {var} is not set")]
    MissingCredential { var: &'static str },

    #[error("no URLs to archive")]
    NoTargets,

    #[error("failed to read URL list {path}: {source}")]
    TargetFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("failed to open history file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write history file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to read history file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Failures that abort the handling of a single URL.
///
/// HTTP error statuses and server-reported capture failures are not errors here: they are
/// outcomes, and end up in the history file. Only the cases below leave no record behind
/// (apart from `History`, where writing the record itself failed).
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error(transparent)]
    History(#[from] HistoryError),
}

impl ArchiveError {
    pub(crate) fn transport(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        ArchiveError::Transport {
            endpoint: endpoint.into(),
            source,
        }
    }

    /// True when the URL was dropped without writing a record.
    pub fn is_transport(&self) -> bool {
        matches!(self, ArchiveError::Transport { .. })
    }
}
