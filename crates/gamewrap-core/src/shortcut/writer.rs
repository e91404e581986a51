//! Desktop shortcuts that re-invoke the launcher for one game.

use super::desktop_entry::DesktopEntry;
use crate::config::LauncherConfig;
use crate::error::{LauncherError, Result};
use crate::platform;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes per-game shortcuts to the user's desktop.
#[derive(Debug, Clone)]
pub struct ShortcutWriter {
    /// Directory shortcuts are written to.
    desktop_dir: PathBuf,
    /// Program the shortcut runs (normally the current executable).
    executable: PathBuf,
    /// Working directory of the shortcut, where the game list lives.
    working_dir: PathBuf,
}

impl ShortcutWriter {
    /// Create a writer targeting the user's desktop and the running binary.
    pub fn new(config: &LauncherConfig) -> Result<Self> {
        let desktop_dir = platform::desktop_dir()?;
        let executable = std::env::current_exe().map_err(|e| LauncherError::Io {
            message: "Could not determine the launcher executable".to_string(),
            path: None,
            source: Some(e),
        })?;

        Ok(Self {
            desktop_dir,
            executable,
            working_dir: config.working_dir(),
        })
    }

    /// Create a writer with explicit locations.
    pub fn with_paths(
        desktop_dir: impl AsRef<Path>,
        executable: impl AsRef<Path>,
        working_dir: impl AsRef<Path>,
    ) -> Self {
        Self {
            desktop_dir: desktop_dir.as_ref().to_path_buf(),
            executable: executable.as_ref().to_path_buf(),
            working_dir: working_dir.as_ref().to_path_buf(),
        }
    }

    /// Where the shortcut for `game` is (or would be) written.
    pub fn shortcut_path(&self, game: &str) -> PathBuf {
        self.desktop_dir.join(format!(
            "{}.{}",
            file_stem_for(game),
            platform::shortcut_extension()
        ))
    }

    pub fn exists(&self, game: &str) -> bool {
        self.shortcut_path(game).exists()
    }

    /// Write the shortcut for `game`, replacing any existing one.
    pub fn create(&self, game: &str) -> Result<PathBuf> {
        let path = self.shortcut_path(game);

        #[cfg(windows)]
        self.write_lnk(game, &path)?;

        #[cfg(target_os = "macos")]
        self.write_command_script(game, &path)?;

        #[cfg(not(any(windows, target_os = "macos")))]
        self.write_desktop_entry(game, &path)?;

        info!("Created shortcut for {} at {}", game, path.display());
        Ok(path)
    }

    #[cfg_attr(any(windows, target_os = "macos"), allow(dead_code))]
    fn write_desktop_entry(&self, game: &str, path: &Path) -> Result<()> {
        DesktopEntry::builder()
            .name(game)
            .comment(format!("Launch {} with its helper", game))
            .exec([
                self.executable.to_string_lossy().into_owned(),
                game_argument(game),
            ])
            .working_dir(self.working_dir.to_string_lossy())
            .icon(self.executable.to_string_lossy())
            .build()
            .write_to_file(path)
    }

    #[cfg_attr(not(target_os = "macos"), allow(dead_code))]
    fn write_command_script(&self, game: &str, path: &Path) -> Result<()> {
        let script = format!(
            "#!/bin/sh\ncd {} && exec {} {}\n",
            shell_quote(&self.working_dir.to_string_lossy()),
            shell_quote(&self.executable.to_string_lossy()),
            shell_quote(&game_argument(game)),
        );

        fs::create_dir_all(&self.desktop_dir)
            .map_err(|e| LauncherError::io_with_path(e, &self.desktop_dir))?;
        fs::write(path, script).map_err(|e| LauncherError::io_with_path(e, path))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o755))
                .map_err(|e| LauncherError::io_with_path(e, path))?;
        }

        Ok(())
    }

    #[cfg(windows)]
    fn write_lnk(&self, game: &str, path: &Path) -> Result<()> {
        use lnk::ShellLink;

        let shortcut_error = |message: String| LauncherError::Shortcut {
            path: path.to_path_buf(),
            message,
        };

        fs::create_dir_all(&self.desktop_dir)
            .map_err(|e| LauncherError::io_with_path(e, &self.desktop_dir))?;

        let mut link =
            ShellLink::new_simple(&self.executable).map_err(|e| shortcut_error(e.to_string()))?;
        link.set_name(Some(format!("Launch {}", game)));
        link.set_arguments(Some(format!("--game=\"{}\"", game.replace('"', "\\\""))));
        link.set_working_dir(Some(self.working_dir.to_string_lossy().into_owned()));
        link.set_icon_location(Some(self.executable.to_string_lossy().into_owned()));
        link.save(path).map_err(|e| shortcut_error(e.to_string()))
    }
}

/// The argument a shortcut passes to select `game`.
pub fn game_argument(game: &str) -> String {
    format!("--game={}", game)
}

/// Filesystem-safe file stem for a game name.
pub fn file_stem_for(game: &str) -> String {
    let safe: String = game
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let trimmed = safe.trim_matches(|c: char| c == '.' || c.is_whitespace());
    if trimmed.is_empty() {
        "game".to_string()
    } else {
        trimmed.chars().take(120).collect()
    }
}

fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}
