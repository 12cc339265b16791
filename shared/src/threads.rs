use std::{
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use log::{error, warn};

const JOIN_POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Joins `handle` if the thread finishes within `grace`.
/// A thread that overruns is detached and left to exit on its own;
/// returns whether the join happened.
pub fn join_with_grace(name: &str, handle: JoinHandle<()>, grace: Duration) -> bool {
    let deadline = Instant::now() + grace;
    while !handle.is_finished() {
        if Instant::now() >= deadline {
            warn!(
                "Thread '{}' did not stop within {} ms, detaching it",
                name,
                grace.as_millis()
            );
            return false;
        }
        thread::sleep(JOIN_POLL_INTERVAL);
    }
    if handle.join().is_err() {
        error!("Thread '{}' panicked before shutdown", name);
    }
    true
}
