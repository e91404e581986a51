//! The launch sequence and its handle.

use super::host::{ProcessHost, SpawnedProcess, SystemProcessHost};
use crate::cancel::CancellationToken;
use crate::config::LauncherConfig;
use crate::error::SupervisorError;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// How a supervised session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// The game exited on its own.
    TargetExited { code: Option<i32> },
    /// `cancel()` was called; the game, if started, was left running.
    Cancelled,
    /// The configured session limit elapsed; the game was left running.
    TimedOut,
}

/// Summary of a completed launch sequence.
#[derive(Debug, Clone)]
pub struct LaunchReport {
    pub game: String,
    pub helper_pid: u32,
    /// `None` when the sequence was cancelled before the game started.
    pub target_pid: Option<u32>,
    pub outcome: LaunchOutcome,
    /// Helper pids confirmed stopped after the session.
    pub stopped_helpers: Vec<u32>,
    pub elapsed: Duration,
}

/// Runs the helper/game lifecycle.
///
/// # Example
///
/// ```rust,no_run
/// use gamewrap_core::{LaunchSupervisor, LauncherConfig};
///
/// let supervisor = LaunchSupervisor::new(LauncherConfig::default());
/// let handle = supervisor.launch("Chess", "/usr/games/chess").unwrap();
/// match handle.join() {
///     Ok(report) => println!("{} finished: {:?}", report.game, report.outcome),
///     Err(e) => eprintln!("launch failed: {e}"),
/// }
/// ```
#[derive(Clone)]
pub struct LaunchSupervisor {
    config: Arc<LauncherConfig>,
    host: Arc<dyn ProcessHost>,
}

impl std::fmt::Debug for LaunchSupervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LaunchSupervisor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl LaunchSupervisor {
    /// Create a supervisor that manages real OS processes.
    pub fn new(config: LauncherConfig) -> Self {
        Self::with_host(config, Arc::new(SystemProcessHost))
    }

    /// Create a supervisor over a custom process host.
    pub fn with_host(config: LauncherConfig, host: Arc<dyn ProcessHost>) -> Self {
        Self {
            config: Arc::new(config),
            host,
        }
    }

    pub fn config(&self) -> &LauncherConfig {
        &self.config
    }

    /// Start the launch sequence for `game` on a new worker thread.
    ///
    /// Returns immediately; use the handle to cancel or wait.
    pub fn launch(&self, game: &str, executable: impl AsRef<Path>) -> std::io::Result<LaunchHandle> {
        let token = CancellationToken::new();
        let worker = self.clone();
        let worker_token = token.clone();
        let worker_game = game.to_string();
        let executable = executable.as_ref().to_path_buf();

        let join = thread::Builder::new()
            .name("gamewrap-launch".to_string())
            .spawn(move || worker.run(&worker_game, &executable, &worker_token))?;

        Ok(LaunchHandle {
            game: game.to_string(),
            token,
            join,
        })
    }

    /// Run the launch sequence on the calling thread.
    ///
    /// 1. Start the helper.
    /// 2. Wait the settle time.
    /// 3. Start the game.
    /// 4. Poll the game until it exits (or the session is cancelled/limited).
    /// 5. Stop the helper, then sweep processes matching the helper name.
    pub fn run(
        &self,
        game: &str,
        executable: &Path,
        token: &CancellationToken,
    ) -> Result<LaunchReport, SupervisorError> {
        let started = Instant::now();
        let helper_path = &self.config.helper_path;

        info!("Starting helper {} for {}", helper_path.display(), game);
        let mut helper = self
            .host
            .spawn(helper_path)
            .map_err(|source| SupervisorError::HelperSpawn {
                path: helper_path.clone(),
                source,
            })?;
        let helper_pid = helper.pid();

        if token.wait(self.config.settle_time) {
            info!("Launch of {} cancelled before the game started", game);
            let stopped_helpers = self.stop_helpers(helper.as_mut());
            return Ok(LaunchReport {
                game: game.to_string(),
                helper_pid,
                target_pid: None,
                outcome: LaunchOutcome::Cancelled,
                stopped_helpers,
                elapsed: started.elapsed(),
            });
        }

        info!("Launching {} from {}", game, executable.display());
        let mut target = match self.host.spawn(executable) {
            Ok(target) => target,
            Err(source) => {
                self.stop_helpers(helper.as_mut());
                return Err(SupervisorError::TargetSpawn {
                    game: game.to_string(),
                    path: PathBuf::from(executable),
                    source,
                });
            }
        };
        let target_pid = target.pid();
        info!("{} running with PID {}", game, target_pid);

        let outcome = match self.watch(game, target.as_mut(), token, started) {
            Ok(outcome) => outcome,
            Err(e) => {
                self.stop_helpers(helper.as_mut());
                return Err(e);
            }
        };

        match outcome {
            LaunchOutcome::TargetExited { code } => {
                info!("{} exited with code {:?}", game, code)
            }
            LaunchOutcome::Cancelled => info!("Supervision of {} cancelled", game),
            LaunchOutcome::TimedOut => warn!("Session limit reached for {}", game),
        }

        let stopped_helpers = self.stop_helpers(helper.as_mut());

        Ok(LaunchReport {
            game: game.to_string(),
            helper_pid,
            target_pid: Some(target_pid),
            outcome,
            stopped_helpers,
            elapsed: started.elapsed(),
        })
    }

    /// Poll the game at the configured interval until it stops running.
    fn watch(
        &self,
        game: &str,
        target: &mut dyn SpawnedProcess,
        token: &CancellationToken,
        started: Instant,
    ) -> Result<LaunchOutcome, SupervisorError> {
        let poll_interval = self.config.poll_interval;

        loop {
            match target.try_wait() {
                Ok(Some(exit)) => return Ok(LaunchOutcome::TargetExited { code: exit.code }),
                Ok(None) => debug!("{} (PID {}) still running", game, target.pid()),
                Err(source) => {
                    return Err(SupervisorError::Poll {
                        game: game.to_string(),
                        pid: target.pid(),
                        source,
                    })
                }
            }

            let wait = match self.config.session_limit {
                Some(limit) => {
                    let elapsed = started.elapsed();
                    if elapsed >= limit {
                        return Ok(LaunchOutcome::TimedOut);
                    }
                    poll_interval.min(limit - elapsed)
                }
                None => poll_interval,
            };

            if token.wait(wait) {
                return Ok(LaunchOutcome::Cancelled);
            }
        }
    }

    /// Stop the spawned helper, then every process matching the helper name.
    fn stop_helpers(&self, helper: &mut dyn SpawnedProcess) -> Vec<u32> {
        let grace = self.config.kill_grace;
        let mut stopped = Vec::new();

        match helper.try_wait() {
            Ok(Some(exit)) => debug!(
                "Helper (PID {}) already exited with code {:?}",
                helper.pid(),
                exit.code
            ),
            _ => match helper.terminate(grace) {
                Ok(()) => stopped.push(helper.pid()),
                Err(e) => warn!("Failed to stop helper (PID {}): {}", helper.pid(), e),
            },
        }

        if let Some(fragment) = self.config.helper_name_fragment() {
            for pid in self.host.stop_by_name(&fragment, grace) {
                if !stopped.contains(&pid) {
                    stopped.push(pid);
                }
            }
        }

        info!("Stopped {} helper process(es)", stopped.len());
        stopped
    }
}

/// Handle to a launch running on its worker thread.
#[derive(Debug)]
pub struct LaunchHandle {
    game: String,
    token: CancellationToken,
    join: JoinHandle<Result<LaunchReport, SupervisorError>>,
}

impl LaunchHandle {
    /// Name of the game being supervised.
    pub fn game(&self) -> &str {
        &self.game
    }

    /// Request cooperative shutdown.
    ///
    /// Pending waits wake immediately and the helper is stopped; the game
    /// itself keeps running.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Token shared with the worker, for wiring into signal handlers.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Block until the sequence ends.
    pub fn join(self) -> Result<LaunchReport, SupervisorError> {
        match self.join.join() {
            Ok(result) => result,
            Err(_) => Err(SupervisorError::WorkerPanicked { game: self.game }),
        }
    }
}
