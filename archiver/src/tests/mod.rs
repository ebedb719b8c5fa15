use std::cell::RefCell;

use tokio::runtime::Runtime;
use wiremock::{Mock, MockServer, Request};

use crate::archive::{JobHandle, PollResult};
use crate::config::{Credentials, Settings};
use crate::progress::PollObserver;

pub mod fixtures;


/// A wiremock server driven from synchronous tests.
///
/// The server answers on its own thread, so the blocking client can call it from the test
/// thread while the runtime is idle.
pub struct MockApi {
    server: MockServer,
    runtime: Runtime,
}

impl MockApi {
    pub fn start() -> Self {
        let runtime = Runtime::new().expect("tokio runtime");
        let server = runtime.block_on(MockServer::start());
        Self { server, runtime }
    }

    pub fn mount(&self, mock: Mock) {
        self.runtime.block_on(mock.mount(&self.server));
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Panics if any mock's `expect` was not met.
    pub fn verify(&self) {
        self.runtime.block_on(self.server.verify());
    }

    pub fn received(&self) -> Vec<Request> {
        self.runtime
            .block_on(self.server.received_requests())
            .unwrap_or_default()
    }
}

pub fn test_credentials() -> Credentials {
    Credentials::new("access", "secret")
}

/// Settings pointed at `api_base` with no wait between polls.
pub fn test_settings(api_base: &str) -> Settings {
    Settings {
        api_base: api_base.to_string(),
        poll_interval: std::time::Duration::ZERO,
        request_timeout: std::time::Duration::from_secs(5),
        ..Settings::default()
    }
}

/// Observer that remembers every event as a short string.
#[derive(Default)]
pub struct RecordingObserver {
    pub events: RefCell<Vec<String>>,
}

impl RecordingObserver {
    pub fn waits(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|event| event.starts_with("waiting"))
            .count()
    }
}

impl PollObserver for RecordingObserver {
    fn submitting(&self, url: &str) {
        self.events.borrow_mut().push(format!("submitting {}", url));
    }

    fn submitted(&self, _url: &str, job: &JobHandle) {
        self.events.borrow_mut().push(format!("submitted {}", job.id()));
    }

    fn cached(&self, _url: &str, history_link: &str) {
        self.events.borrow_mut().push(format!("cached {}", history_link));
    }

    fn rejected(&self, _url: &str, status: u16) {
        self.events.borrow_mut().push(format!("rejected {}", status));
    }

    fn waiting(&self, attempt: u32, max_attempts: u32) {
        self.events
            .borrow_mut()
            .push(format!("waiting {}/{}", attempt, max_attempts));
    }

    fn finished(&self, _url: &str, result: &PollResult) {
        self.events.borrow_mut().push(format!("finished {:?}", result));
    }
}
