//! Process host abstraction.
//!
//! The launch sequence talks to the OS only through [`ProcessHost`] and
//! [`SpawnedProcess`], so it can run against real processes or a scripted
//! host in tests.

use crate::platform;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::Duration;
use tracing::debug;

#[cfg(unix)]
use std::os::unix::process::CommandExt;

#[cfg(windows)]
use std::os::windows::process::CommandExt;

/// Exit information of a finished process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessExit {
    /// Exit code, if the process exited normally.
    pub code: Option<i32>,
}

/// A process started by a [`ProcessHost`].
pub trait SpawnedProcess: Send {
    /// OS process id.
    fn pid(&self) -> u32;

    /// Non-blocking liveness check. `Ok(Some(_))` once the process is gone.
    fn try_wait(&mut self) -> io::Result<Option<ProcessExit>>;

    /// Stop the process, escalating to a forced kill after `grace`.
    ///
    /// Succeeds without doing anything if the process already exited.
    fn terminate(&mut self, grace: Duration) -> io::Result<()>;
}

/// Spawning and name-based termination of OS processes.
pub trait ProcessHost: Send + Sync {
    /// Start `program` with no arguments.
    fn spawn(&self, program: &Path) -> io::Result<Box<dyn SpawnedProcess>>;

    /// Stop every running process whose name contains `fragment`.
    ///
    /// Returns the pids that were stopped.
    fn stop_by_name(&self, fragment: &str, grace: Duration) -> Vec<u32>;
}

/// [`ProcessHost`] backed by `std::process` and the platform module.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessHost;

impl ProcessHost for SystemProcessHost {
    fn spawn(&self, program: &Path) -> io::Result<Box<dyn SpawnedProcess>> {
        let program = &resolve_program(program, &std::env::current_dir()?);
        let mut cmd = Command::new(program);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        // Games commonly load assets relative to their own directory.
        if let Some(dir) = program.parent().filter(|d| d.is_dir()) {
            cmd.current_dir(dir);
        }

        // Own process group so a Ctrl-C aimed at the launcher does not also
        // reach the helper and the game.
        #[cfg(unix)]
        {
            cmd.process_group(0);
        }

        #[cfg(windows)]
        {
            const CREATE_NEW_PROCESS_GROUP: u32 = 0x00000200;
            cmd.creation_flags(CREATE_NEW_PROCESS_GROUP);
        }

        let child = cmd.spawn()?;
        debug!("Spawned {} with PID {}", program.display(), child.id());
        Ok(Box::new(SystemProcess { child }))
    }

    fn stop_by_name(&self, fragment: &str, grace: Duration) -> Vec<u32> {
        platform::terminate_processes_by_name(fragment, grace)
    }
}

/// Anchor a relative path with a directory part to `base`.
///
/// The child runs in the program's own directory, so a relative path would
/// otherwise be resolved a second time from there. Bare names are left for
/// the `PATH` search.
fn resolve_program(program: &Path, base: &Path) -> PathBuf {
    if program.is_relative() && program.components().count() > 1 {
        base.join(program)
    } else {
        program.to_path_buf()
    }
}

/// A child process owned by the launcher.
#[derive(Debug)]
pub struct SystemProcess {
    child: Child,
}

impl SpawnedProcess for SystemProcess {
    fn pid(&self) -> u32 {
        self.child.id()
    }

    fn try_wait(&mut self) -> io::Result<Option<ProcessExit>> {
        Ok(self
            .child
            .try_wait()?
            .map(|status| ProcessExit { code: status.code() }))
    }

    fn terminate(&mut self, grace: Duration) -> io::Result<()> {
        if self.child.try_wait()?.is_some() {
            return Ok(());
        }

        #[cfg(unix)]
        {
            use nix::sys::signal::{kill, Signal};
            use nix::unistd::Pid;

            let pid = Pid::from_raw(self.child.id() as i32);
            if kill(pid, Signal::SIGTERM).is_ok() {
                let step = Duration::from_millis(50);
                let mut waited = Duration::ZERO;
                while waited < grace {
                    std::thread::sleep(step);
                    waited += step;
                    if self.child.try_wait()?.is_some() {
                        debug!("Process {} terminated gracefully", self.child.id());
                        return Ok(());
                    }
                }
            }
        }

        #[cfg(not(unix))]
        let _ = grace;

        debug!("Killing process {}", self.child.id());
        match self.child.kill() {
            Ok(()) => {}
            // Exited between the last check and the kill.
            Err(e) if e.kind() == io::ErrorKind::InvalidInput => {}
            Err(e) => return Err(e),
        }
        self.child.wait()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_missing_program_fails() {
        let host = SystemProcessHost;
        let result = host.spawn(Path::new("/definitely/not/a/real/program"));
        assert!(result.is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_program() {
        let base = Path::new("/home/player/launcher");
        assert_eq!(
            resolve_program(Path::new("games/chess"), base),
            PathBuf::from("/home/player/launcher/games/chess")
        );
        assert_eq!(
            resolve_program(Path::new("./chess"), base),
            PathBuf::from("/home/player/launcher/./chess")
        );
        assert_eq!(resolve_program(Path::new("chess"), base), PathBuf::from("chess"));
        assert_eq!(
            resolve_program(Path::new("/usr/games/chess"), base),
            PathBuf::from("/usr/games/chess")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_spawn_and_wait_for_exit() {
        let host = SystemProcessHost;
        let Ok(mut process) = host.spawn(Path::new("/bin/true")) else {
            return;
        };

        let mut exit = None;
        for _ in 0..100 {
            exit = process.try_wait().unwrap();
            if exit.is_some() {
                break;
            }
            std::thread::sleep(Duration::from_millis(20));
        }

        assert_eq!(exit, Some(ProcessExit { code: Some(0) }));
        assert!(!platform::is_process_alive(process.pid()));
    }

    #[cfg(unix)]
    #[test]
    fn test_terminate_running_process() {
        let yes = Path::new("/usr/bin/yes");
        if !yes.exists() {
            return;
        }

        let host = SystemProcessHost;
        let mut process = host.spawn(yes).unwrap();
        assert!(process.try_wait().unwrap().is_none());

        process.terminate(Duration::from_millis(500)).unwrap();
        assert!(process.try_wait().unwrap().is_some());
    }
}
