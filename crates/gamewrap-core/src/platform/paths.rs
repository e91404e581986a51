//! Platform-specific path utilities.

use crate::error::{LauncherError, Result};
use std::path::PathBuf;

/// Get the user's desktop directory.
///
/// # Platform Behavior
/// Uses the `dirs` crate which handles platform differences:
/// - **Linux**: XDG `DESKTOP` user dir, usually `~/Desktop`
/// - **Windows**: `C:\Users\{user}\Desktop`
/// - **macOS**: `~/Desktop`
pub fn desktop_dir() -> Result<PathBuf> {
    dirs::desktop_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Desktop")))
        .ok_or_else(|| LauncherError::Config {
            message: "Could not determine desktop directory".to_string(),
        })
}

/// Get the file extension for shortcuts on the current platform.
///
/// # Platform Behavior
/// - **Windows**: `lnk`
/// - **macOS**: `command` (double-clickable shell script)
/// - **Linux and other Unix**: `desktop` (freedesktop entry)
pub fn shortcut_extension() -> &'static str {
    #[cfg(target_os = "windows")]
    {
        "lnk"
    }
    #[cfg(target_os = "macos")]
    {
        "command"
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        "desktop"
    }
}
