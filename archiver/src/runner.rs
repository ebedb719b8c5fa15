use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::archive::ArchiveClient;
use crate::history::HistoryLog;
use crate::progress::PollObserver;

/// Tally of one run over the target list.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Rows written with status `Success` or `Accepted (No ID)`.
    pub succeeded: usize,
    /// Rows written with any other status, plus rows that could not be written.
    pub failed: usize,
    /// URLs abandoned on a transport failure, with no row.
    pub dropped: usize,
    pub interrupted: bool,
}

impl RunSummary {
    pub fn processed(&self) -> usize {
        self.succeeded + self.failed + self.dropped
    }
}

/// Archive each target in order, one at a time.
///
/// `stop` is checked before every URL; a URL already in flight always runs to completion.
/// Per-URL failures are reported and the loop moves on.
pub fn run(
    client: &ArchiveClient,
    history: &HistoryLog,
    targets: &[String],
    stop: &AtomicBool,
    observer: &dyn PollObserver,
) -> RunSummary {
    let mut summary = RunSummary::default();

    for url in targets {
        if stop.load(Ordering::SeqCst) {
            log::info!(
                "Stop requested, skipping remaining {} URL(s)",
                targets.len() - summary.processed()
            );
            summary.interrupted = true;
            break;
        }

        match client.archive(url, history, observer) {
            Ok(archived) => {
                if archived.status.is_ok() {
                    summary.succeeded += 1;
                } else {
                    summary.failed += 1;
                }
            }
            Err(err) if err.is_transport() => {
                println!("❌ Error: {}", err);
                summary.dropped += 1;
            }
            Err(err) => {
                println!("❌ Error: {}", err);
                summary.failed += 1;
            }
        }
    }

    // A stop raised while the last URL was in flight still counts
    summary.interrupted |= stop.load(Ordering::SeqCst);
    summary
}

/// Install the Ctrl+C handler and return the flag it raises.
///
/// The first interrupt asks [`run`] to stop before the next URL. A second one exits
/// the process at once, still with status 0.
pub fn install_interrupt_handler() -> Result<Arc<AtomicBool>, ctrlc::Error> {
    let stop = Arc::new(AtomicBool::new(false));
    let flag = stop.clone();
    ctrlc::set_handler(move || {
        if flag.swap(true, Ordering::SeqCst) {
            println!("\n\n🛑 Script stopped by user.");
            std::process::exit(0);
        }
        println!("\n🛑 Stop requested, finishing the current URL (Ctrl+C again to quit now)");
    })?;
    Ok(stop)
}
