//! Cancellable delayed execution for live search input.
//!
//! Each `schedule` cancels whatever was scheduled before it and arms a
//! fresh timer, so a burst of keystrokes results in at most one fired
//! action once the input pauses.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Delay applied to live city-search input.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    /// Arm `action` to run after the configured delay, cancelling any
    /// previously scheduled action that has not fired yet.
    pub fn schedule<F>(&mut self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action.await;
        }));
    }

    /// Cancel the scheduled action, if any has not fired yet.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
