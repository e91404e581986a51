//! Scripted process host shared by the front-end tests.

#![allow(dead_code)]

use gamewrap_core::{LauncherConfig, ProcessExit, ProcessHost, SpawnedProcess};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

pub const HELPER: &str = "/opt/helper/Tuner.exe";

/// Records every spawn with its time. Programs in `lifetimes` exit after
/// that long; everything else runs until terminated.
#[derive(Default)]
pub struct ScriptedHost {
    lifetimes: HashMap<PathBuf, Duration>,
    next_pid: AtomicU32,
    spawns: Arc<Mutex<Vec<(Instant, PathBuf)>>>,
}

impl ScriptedHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lifetime(mut self, program: impl AsRef<Path>, lifetime: Duration) -> Self {
        self.lifetimes
            .insert(program.as_ref().to_path_buf(), lifetime);
        self
    }

    /// Spawn log that stays readable after the host moves into a supervisor.
    pub fn spawns_handle(&self) -> Arc<Mutex<Vec<(Instant, PathBuf)>>> {
        self.spawns.clone()
    }
}

struct ScriptedProcess {
    pid: u32,
    started: Instant,
    lifetime: Option<Duration>,
    terminated: bool,
}

impl SpawnedProcess for ScriptedProcess {
    fn pid(&self) -> u32 {
        self.pid
    }

    fn try_wait(&mut self) -> io::Result<Option<ProcessExit>> {
        let exited =
            self.terminated || self.lifetime.is_some_and(|l| self.started.elapsed() >= l);
        Ok(exited.then_some(ProcessExit { code: Some(0) }))
    }

    fn terminate(&mut self, _grace: Duration) -> io::Result<()> {
        self.terminated = true;
        Ok(())
    }
}

impl ProcessHost for ScriptedHost {
    fn spawn(&self, program: &Path) -> io::Result<Box<dyn SpawnedProcess>> {
        self.spawns
            .lock()
            .unwrap()
            .push((Instant::now(), program.to_path_buf()));
        Ok(Box::new(ScriptedProcess {
            pid: 500 + self.next_pid.fetch_add(1, Ordering::SeqCst),
            started: Instant::now(),
            lifetime: self.lifetimes.get(program).copied(),
            terminated: false,
        }))
    }

    fn stop_by_name(&self, _fragment: &str, _grace: Duration) -> Vec<u32> {
        Vec::new()
    }
}

pub fn fast_config(config_path: impl AsRef<Path>) -> LauncherConfig {
    LauncherConfig::new(config_path)
        .with_helper_path(HELPER)
        .with_settle_time(Duration::from_millis(40))
        .with_poll_interval(Duration::from_millis(10))
}
