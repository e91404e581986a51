//! Non-interactive launch selected with `--game`.

use crate::notify::{self, GAME_NOT_FOUND};
use anyhow::{Context, Result};
use gamewrap_core::{GameStore, LaunchHandle, LaunchReport, LaunchSupervisor, SupervisorError};
use std::io::Write;
use tracing::{error, info};

/// Result of a `--game` run.
#[derive(Debug)]
pub enum GameRun {
    /// The name is not in the list; nothing was started.
    NotFound,
    Finished(LaunchReport),
    Failed(SupervisorError),
}

impl GameRun {
    pub fn is_success(&self) -> bool {
        !matches!(self, GameRun::Failed(_))
    }
}

/// Resolve `name` in the store and supervise it until the session ends.
///
/// `on_launch` runs once the worker has started, before this call blocks;
/// the binary uses it to route Ctrl-C to the launch.
pub fn run<W, F>(
    store: &GameStore,
    supervisor: &LaunchSupervisor,
    name: &str,
    out: &mut W,
    on_launch: F,
) -> Result<GameRun>
where
    W: Write,
    F: FnOnce(&LaunchHandle),
{
    let Some(entry) = store.get(name).filter(|_| !name.trim().is_empty()) else {
        info!("{} is not in {}", name, store.path().display());
        writeln!(out, "{}", GAME_NOT_FOUND)?;
        return Ok(GameRun::NotFound);
    };

    let handle = supervisor
        .launch(&entry.name, &entry.executable)
        .context("failed to start launch worker")?;
    on_launch(&handle);

    match handle.join() {
        Ok(report) => {
            writeln!(out, "{}", notify::describe_report(&report))?;
            Ok(GameRun::Finished(report))
        }
        Err(e) => {
            error!(step = e.step(), "Launch of {} failed: {}", name, e);
            writeln!(out, "{}", notify::describe_error(&e))?;
            Ok(GameRun::Failed(e))
        }
    }
}
