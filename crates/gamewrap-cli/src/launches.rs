//! Launches started by this process that may still be running.

use gamewrap_core::{LaunchHandle, LaunchReport, SupervisorError};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

pub type LaunchResult = Result<LaunchReport, SupervisorError>;

/// Shared set of in-flight launches.
///
/// Clones share the same set, so a Ctrl-C handler can cancel launches the
/// editor started.
#[derive(Debug, Clone, Default)]
pub struct ActiveLaunches {
    handles: Arc<Mutex<Vec<LaunchHandle>>>,
}

impl ActiveLaunches {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LaunchHandle>> {
        self.handles
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn push(&self, handle: LaunchHandle) {
        self.lock().push(handle);
    }

    /// Names of games still being supervised.
    pub fn running(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|h| !h.is_finished())
            .map(|h| h.game().to_string())
            .collect()
    }

    /// Remove and join every launch whose worker has finished.
    pub fn take_finished(&self) -> Vec<LaunchResult> {
        let finished: Vec<LaunchHandle> = {
            let mut handles = self.lock();
            let (done, running): (Vec<_>, Vec<_>) =
                handles.drain(..).partition(LaunchHandle::is_finished);
            *handles = running;
            done
        };

        finished.into_iter().map(LaunchHandle::join).collect()
    }

    /// Request cancellation of every launch.
    pub fn cancel_all(&self) {
        for handle in self.lock().iter() {
            handle.cancel();
        }
    }

    /// Block until no registered launch is still running.
    ///
    /// Handles stay registered while waiting so `cancel_all` still reaches
    /// them.
    pub fn wait_idle(&self, step: Duration) {
        while self.lock().iter().any(|h| !h.is_finished()) {
            std::thread::sleep(step);
        }
    }
}
