//! Scenario tests for modal prompts
//!
//! Tests are organized by calling context:
//! - `ui_thread` - prompts shown from the UI thread (nested dispatch loop)
//! - `worker_thread` - prompts shown from worker threads (blocking wait)
//! - `failures` - toolkit failures, interruption and timeouts


use std::sync::Arc;
use std::sync::mpsc::channel;
use std::thread;
use std::time::{Duration, Instant};

use crate::headless::HeadlessToolkit;
use crate::toolkit::HostToolkit;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

fn labels(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// Run `f` on the toolkit's UI thread and wait for its return value.
fn on_ui_thread<T, F>(toolkit: &Arc<HeadlessToolkit>, f: F) -> T
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = channel();
    toolkit
        .run_on_ui_thread(Box::new(move || {
            let _ = tx.send(f());
        }))
        .unwrap();
    rx.recv_timeout(RECV_TIMEOUT).unwrap()
}

/// Wait until `count` dialogs are pending on the headless toolkit.
fn wait_for_pending(toolkit: &HeadlessToolkit, count: usize) {
    let deadline = Instant::now() + RECV_TIMEOUT;
    while toolkit.pending_count() < count {
        assert!(Instant::now() < deadline, "dialog never became pending");
        thread::sleep(Duration::from_millis(2));
    }
}
