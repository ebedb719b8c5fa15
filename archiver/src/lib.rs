// Client, history record and driver for saving pages to the Wayback Machine
pub mod archive;
pub mod config;
pub mod error;
pub mod history;
pub mod progress;
pub mod runner;

// Unit and mock-server tests
#[cfg(test)]
pub mod tests;

// Re-export key types and functions for easier access
pub use crate::archive::{ArchiveClient, Archived, JobHandle, PollResult, Submission};
pub use crate::config::{load_targets, Credentials, Settings};
pub use crate::error::{ArchiveError, ConfigError, HistoryError};
pub use crate::history::{HistoryLog, LogRecord, Status};
pub use crate::progress::{ConsoleProgress, PollObserver, SilentProgress};
pub use crate::runner::{install_interrupt_handler, run, RunSummary};
