use std::io::Write;

use crate::archive::{JobHandle, PollResult};

/// Receives progress from [`crate::ArchiveClient::archive`].
///
/// Reporting is decoupled from timing: the client sleeps once per attempt and calls
/// `waiting` once per attempt, however the observer chooses to display it.
pub trait PollObserver {
    fn submitting(&self, _url: &str) {}
    fn submitted(&self, _url: &str, _job: &JobHandle) {}
    fn cached(&self, _url: &str, _history_link: &str) {}
    fn rejected(&self, _url: &str, _status: u16) {}
    fn waiting(&self, _attempt: u32, _max_attempts: u32) {}
    fn finished(&self, _url: &str, _result: &PollResult) {}
}

/// Drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentProgress;

impl PollObserver for SilentProgress {}

/// Prints operator messages to stdout, one dot per pending poll.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleProgress;

impl PollObserver for ConsoleProgress {
    fn submitting(&self, url: &str) {
        println!("\n🚀 Initializing capture for: {}", url);
    }

    fn submitted(&self, _url: &str, job: &JobHandle) {
        println!("✅ Capture submitted! Job ID: {}", job.id());
        println!("⏳ Waiting for archival...");
    }

    fn cached(&self, _url: &str, history_link: &str) {
        println!("✅ Accepted (cached). History: {}", history_link);
    }

    fn rejected(&self, _url: &str, status: u16) {
        println!("⚠️ API Error: {}", status);
    }

    fn waiting(&self, _attempt: u32, _max_attempts: u32) {
        print!(".");
        let _ = std::io::stdout().flush();
    }

    fn finished(&self, _url: &str, result: &PollResult) {
        match result {
            PollResult::Success { final_url, .. } => {
                println!("\n✨ SUCCESS! Permanent Link: {}", final_url)
            }
            PollResult::Error { message } => println!("\n❌ Archival failed: {}", message),
            PollResult::Timeout { status_url } => {
                println!("\n⏰ Timeout. Check manually: {}", status_url)
            }
            PollResult::Pending => {}
        }
    }
}
