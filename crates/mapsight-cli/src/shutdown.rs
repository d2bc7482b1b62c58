use std::sync::{Condvar, Mutex};
use std::time::Duration;

/// Stop flag for the frame loop. Sleeping on it returns early once stop is
/// requested, so Ctrl-C never waits out a tick.
#[derive(Debug, Default)]
pub struct ShutdownSignal {
    stopped: Mutex<bool>,
    wake: Condvar,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        if let Ok(mut stopped) = self.stopped.lock() {
            *stopped = true;
        }
        self.wake.notify_all();
    }

    pub fn is_shutdown(&self) -> bool {
        self.stopped.lock().map(|stopped| *stopped).unwrap_or(true)
    }

    /// Sleep for `duration`. Returns true when stop was requested.
    pub fn wait(&self, duration: Duration) -> bool {
        let Ok(guard) = self.stopped.lock() else {
            return true;
        };
        match self
            .wake
            .wait_timeout_while(guard, duration, |stopped| !*stopped)
        {
            Ok((stopped, _)) => *stopped,
            Err(_) => true,
        }
    }
}
