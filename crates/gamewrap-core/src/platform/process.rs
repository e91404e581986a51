//! Platform-specific process management.
//!
//! Liveness checks, termination, and process table scans by name. These are
//! the OS primitives behind `SystemProcessHost`.

use crate::error::{LauncherError, Result};
use std::path::Path;
use std::time::Duration;
use sysinfo::{Process, ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind};
use tracing::{debug, warn};

/// Check if a process with the given PID is alive.
///
/// # Platform Behavior
/// - **Linux/macOS**: `kill(pid, 0)`; `EPERM` still means the process exists
/// - **Windows**: `OpenProcess` with `PROCESS_QUERY_LIMITED_INFORMATION`
pub fn is_process_alive(pid: u32) -> bool {
    #[cfg(unix)]
    {
        use nix::errno::Errno;
        use nix::sys::signal::kill;
        use nix::unistd::Pid;

        let Ok(raw) = i32::try_from(pid) else {
            return false;
        };
        match kill(Pid::from_raw(raw), None) {
            Ok(()) => true,
            Err(Errno::EPERM) => true,
            Err(_) => false,
        }
    }

    #[cfg(windows)]
    {
        is_process_alive_windows(pid)
    }

    #[cfg(not(any(unix, windows)))]
    {
        warn!("Process alive check not implemented for this platform");
        true
    }
}

#[cfg(windows)]
#[allow(unsafe_code)]
fn is_process_alive_windows(pid: u32) -> bool {
    use windows_sys::Win32::Foundation::CloseHandle;
    use windows_sys::Win32::System::Threading::{OpenProcess, PROCESS_QUERY_LIMITED_INFORMATION};

    // SAFETY: OpenProcess has no preconditions; a non-null handle is closed
    // exactly once before returning.
    unsafe {
        let handle = OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, 0, pid);
        if handle.is_null() {
            false
        } else {
            CloseHandle(handle);
            true
        }
    }
}

/// Terminate a process gracefully, then forcefully if needed.
///
/// # Platform Behavior
/// - **Linux/macOS**: SIGTERM, wait up to `grace`, then SIGKILL
/// - **Windows**: `taskkill /PID {pid} /F /T`
///
/// Returns `true` if the process is gone afterwards (or was never running).
pub fn terminate_process(pid: u32, grace: Duration) -> Result<bool> {
    if !is_process_alive(pid) {
        debug!("Process {} is not running", pid);
        return Ok(true);
    }

    #[cfg(unix)]
    {
        terminate_process_unix(pid, grace)
    }

    #[cfg(windows)]
    {
        let _ = grace;
        terminate_process_windows(pid)
    }

    #[cfg(not(any(unix, windows)))]
    {
        let _ = grace;
        Err(LauncherError::Other(
            "Process termination not implemented for this platform".into(),
        ))
    }
}

#[cfg(unix)]
fn terminate_process_unix(pid: u32, grace: Duration) -> Result<bool> {
    use nix::errno::Errno;
    use nix::sys::signal::{kill, Signal};
    use nix::sys::wait::{waitpid, WaitPidFlag};
    use nix::unistd::Pid;
    use std::thread::sleep;

    let raw = i32::try_from(pid)
        .map_err(|_| LauncherError::Other(format!("Invalid process id {}", pid)))?;
    let nix_pid = Pid::from_raw(raw);

    debug!("Sending SIGTERM to process {}", pid);
    if let Err(e) = kill(nix_pid, Signal::SIGTERM) {
        if e == Errno::ESRCH {
            return Ok(true);
        }
        warn!("Failed to send SIGTERM to {}: {}", pid, e);
    }

    let wait_interval = Duration::from_millis(50);
    let iterations = (grace.as_millis() / wait_interval.as_millis()).max(1);

    for _ in 0..iterations {
        sleep(wait_interval);
        // Reaps the zombie when the process is our child; ECHILD otherwise.
        let _ = waitpid(nix_pid, Some(WaitPidFlag::WNOHANG));
        if !is_process_alive(pid) {
            debug!("Process {} terminated gracefully", pid);
            return Ok(true);
        }
    }

    debug!("Process {} still running, sending SIGKILL", pid);
    if let Err(e) = kill(nix_pid, Signal::SIGKILL) {
        if e == Errno::ESRCH {
            return Ok(true);
        }
        return Err(LauncherError::Other(format!(
            "Failed to kill process {}: {}",
            pid, e
        )));
    }

    sleep(wait_interval);
    let _ = waitpid(nix_pid, Some(WaitPidFlag::WNOHANG));

    Ok(!is_process_alive(pid))
}

#[cfg(windows)]
fn terminate_process_windows(pid: u32) -> Result<bool> {
    use std::process::Command;

    debug!("Terminating process {} with taskkill", pid);

    let output = Command::new("taskkill")
        .args(["/PID", &pid.to_string(), "/F", "/T"])
        .output()
        .map_err(|e| LauncherError::Other(format!("Failed to run taskkill: {}", e)))?;

    if output.status.success() {
        Ok(true)
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        if stderr.contains("not found") || stderr.contains("not running") {
            Ok(true)
        } else {
            warn!("taskkill failed for {}: {}", pid, stderr);
            Ok(false)
        }
    }
}

/// Find running processes whose name contains `fragment`.
///
/// Matching is case-sensitive. Besides the process name, which Linux cuts to
/// 15 bytes, the executable's file name and `argv[0]` are checked so helpers
/// with long names are still found. The calling process is never included.
/// Returns `(pid, name)` pairs, where `name` is the name that matched.
pub fn find_processes_by_name(fragment: &str) -> Vec<(u32, String)> {
    let fragment = fragment.trim();
    if fragment.is_empty() {
        return vec![];
    }

    let mut system = System::new();
    system.refresh_processes_specifics(
        ProcessesToUpdate::All,
        true,
        ProcessRefreshKind::new()
            .with_exe(UpdateKind::OnlyIfNotSet)
            .with_cmd(UpdateKind::OnlyIfNotSet),
    );

    let own_pid = std::process::id();
    let mut matches: Vec<(u32, String)> = system
        .processes()
        .iter()
        .filter(|(pid, _)| pid.as_u32() != own_pid)
        .filter_map(|(pid, process)| {
            matching_name(&candidate_names(process), fragment).map(|name| (pid.as_u32(), name))
        })
        .collect();

    matches.sort_by_key(|(pid, _)| *pid);
    matches
}

/// Names a process can be recognised by.
fn candidate_names(process: &Process) -> Vec<String> {
    let exe_name = process.exe().and_then(Path::file_name);
    let argv0_name = process
        .cmd()
        .first()
        .and_then(|arg| Path::new(arg).file_name());

    std::iter::once(Some(process.name()))
        .chain([exe_name, argv0_name])
        .flatten()
        .map(|name| name.to_string_lossy().into_owned())
        .collect()
}

fn matching_name(names: &[String], fragment: &str) -> Option<String> {
    names.iter().find(|name| name.contains(fragment)).cloned()
}

/// Terminate every process whose name contains `fragment`.
///
/// Failures on individual processes are logged and skipped. Returns the
/// pids that are confirmed gone.
pub fn terminate_processes_by_name(fragment: &str, grace: Duration) -> Vec<u32> {
    let mut stopped = Vec::new();

    for (pid, name) in find_processes_by_name(fragment) {
        match terminate_process(pid, grace) {
            Ok(true) => {
                debug!("Stopped {} (pid {})", name, pid);
                stopped.push(pid);
            }
            Ok(false) => warn!("{} (pid {}) is still running", name, pid),
            Err(e) => warn!("Failed to stop {} (pid {}): {}", name, pid, e),
        }
    }

    stopped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_process_alive_self() {
        assert!(is_process_alive(std::process::id()));
    }

    #[test]
    fn test_is_process_alive_nonexistent() {
        assert!(!is_process_alive(4_000_000_000));
    }

    #[test]
    fn test_terminate_nonexistent() {
        let result = terminate_process(4_000_000_000, Duration::from_millis(100));
        assert!(result.unwrap());
    }

    #[test]
    fn test_find_processes_blank_fragment_matches_nothing() {
        assert!(find_processes_by_name("   ").is_empty());
    }

    #[test]
    fn test_matching_name_is_case_sensitive() {
        let names = vec![
            "ThrottleStopHe".to_string(),
            "ThrottleStopHelperDaemon".to_string(),
        ];
        assert_eq!(
            matching_name(&names, "HelperDaemon"),
            Some("ThrottleStopHelperDaemon".to_string())
        );
        assert_eq!(
            matching_name(&names, "ThrottleStop"),
            Some("ThrottleStopHe".to_string())
        );
        assert_eq!(matching_name(&names, "throttlestop"), None);
        assert_eq!(matching_name(&["YES".to_string()], "yes"), None);
    }

    #[test]
    fn test_find_processes_excludes_self() {
        let own_pid = std::process::id();
        let own_name = {
            let mut system = System::new();
            system.refresh_processes_specifics(
                ProcessesToUpdate::All,
                true,
                ProcessRefreshKind::new(),
            );
            system
                .process(sysinfo::Pid::from_u32(own_pid))
                .map(|p| p.name().to_string_lossy().into_owned())
        };

        if let Some(name) = own_name {
            let found = find_processes_by_name(&name);
            assert!(found.iter().all(|(pid, _)| *pid != own_pid));
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_terminate_spawned_child() {
        use std::process::{Command, Stdio};

        let Ok(mut child) = Command::new("sleep")
            .arg("30")
            .stdout(Stdio::null())
            .spawn()
        else {
            return;
        };

        let pid = child.id();
        assert!(is_process_alive(pid));
        assert!(terminate_process(pid, Duration::from_millis(500)).unwrap());
        let _ = child.wait();
        assert!(!is_process_alive(pid));
    }
}
