//! Platform abstraction layer.
//!
//! All `#[cfg]` blocks for OS-specific process and path behavior live here:
//! - `paths` - desktop directory and shortcut file extension
//! - `process` - liveness checks, termination, name-based process scans

pub mod paths;
pub mod process;

pub use paths::{desktop_dir, shortcut_extension};
pub use process::{
    find_processes_by_name, is_process_alive, terminate_process, terminate_processes_by_name,
};

/// Returns the current platform name.
pub fn current_platform() -> &'static str {
    #[cfg(target_os = "linux")]
    {
        "linux"
    }
    #[cfg(target_os = "windows")]
    {
        "windows"
    }
    #[cfg(target_os = "macos")]
    {
        "macos"
    }
    #[cfg(not(any(target_os = "linux", target_os = "windows", target_os = "macos")))]
    {
        "unknown"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_platform() {
        let platform = current_platform();
        assert!(["linux", "windows", "macos", "unknown"].contains(&platform));
    }
}
