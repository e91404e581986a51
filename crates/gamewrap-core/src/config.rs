//! Centralized configuration for gamewrap.
//!
//! Constant tables hold the defaults; `LauncherConfig` is the explicit value
//! handed to the store, the supervisor and the shortcut writer.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application-level constants.
pub struct AppConfig;

impl AppConfig {
    pub const APP_NAME: &'static str = "gamewrap";
    pub const CONFIG_FILE_NAME: &'static str = "games_config.json";
    pub const CONFIG_ENV_VAR: &'static str = "GAMEWRAP_CONFIG";
    pub const HELPER_ENV_VAR: &'static str = "GAMEWRAP_HELPER";
}

/// Timing defaults for the launch sequence.
pub struct SupervisorDefaults;

impl SupervisorDefaults {
    /// Delay between starting the helper and starting the game.
    pub const SETTLE_TIME: Duration = Duration::from_secs(2);
    /// Interval between game liveness checks.
    pub const POLL_INTERVAL: Duration = Duration::from_secs(5);
    /// Grace period between SIGTERM and SIGKILL when stopping a helper.
    pub const KILL_GRACE: Duration = Duration::from_millis(1000);
}

/// Default helper executable for the current platform.
pub fn default_helper_path() -> PathBuf {
    #[cfg(windows)]
    {
        PathBuf::from(r"C:\ThrottleStop\ThrottleStop.exe")
    }

    #[cfg(not(windows))]
    {
        PathBuf::from("/usr/bin/gamemoded")
    }
}

/// How helper processes are found for the name sweep after the game exits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HelperMatch {
    /// Match on the helper executable's file stem (e.g. `ThrottleStop`).
    FileStem,
    /// Match on an explicit name fragment.
    Fragment(String),
    /// Only the spawned helper pid is stopped.
    Disabled,
}

/// Configuration passed explicitly to every component.
#[derive(Debug, Clone)]
pub struct LauncherConfig {
    /// Path of the JSON game list. Relative paths resolve against the
    /// working directory.
    pub config_path: PathBuf,
    /// Helper executable started before each game.
    pub helper_path: PathBuf,
    /// Name matching used to stop helpers after the game exits.
    pub helper_match: HelperMatch,
    /// Delay between helper start and game start.
    pub settle_time: Duration,
    /// Interval between game liveness checks.
    pub poll_interval: Duration,
    /// Upper bound on a play session. `None` waits for the game forever.
    pub session_limit: Option<Duration>,
    /// Grace period before a helper is force-killed.
    pub kill_grace: Duration,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(AppConfig::CONFIG_FILE_NAME),
            helper_path: default_helper_path(),
            helper_match: HelperMatch::FileStem,
            settle_time: SupervisorDefaults::SETTLE_TIME,
            poll_interval: SupervisorDefaults::POLL_INTERVAL,
            session_limit: None,
            kill_grace: SupervisorDefaults::KILL_GRACE,
        }
    }
}

impl LauncherConfig {
    /// Create a config with default timings and the given store path.
    pub fn new(config_path: impl AsRef<Path>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Set the helper executable.
    pub fn with_helper_path(mut self, path: impl AsRef<Path>) -> Self {
        self.helper_path = path.as_ref().to_path_buf();
        self
    }

    /// Set how helpers are matched by name.
    pub fn with_helper_match(mut self, helper_match: HelperMatch) -> Self {
        self.helper_match = helper_match;
        self
    }

    /// Set the settle time.
    pub fn with_settle_time(mut self, settle_time: Duration) -> Self {
        self.settle_time = settle_time;
        self
    }

    /// Set the poll interval.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Bound the play session.
    pub fn with_session_limit(mut self, limit: Option<Duration>) -> Self {
        self.session_limit = limit;
        self
    }

    /// Set the helper kill grace period.
    pub fn with_kill_grace(mut self, grace: Duration) -> Self {
        self.kill_grace = grace;
        self
    }

    /// Name fragment used for the helper sweep, if any.
    pub fn helper_name_fragment(&self) -> Option<String> {
        match &self.helper_match {
            HelperMatch::FileStem => self
                .helper_path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .filter(|stem| !stem.is_empty()),
            HelperMatch::Fragment(fragment) if !fragment.trim().is_empty() => {
                Some(fragment.trim().to_string())
            }
            _ => None,
        }
    }

    /// Directory that relative store paths resolve against.
    ///
    /// Shortcuts use this as their working directory.
    pub fn working_dir(&self) -> PathBuf {
        let absolute = if self.config_path.is_absolute() {
            self.config_path.clone()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(&self.config_path))
                .unwrap_or_else(|_| self.config_path.clone())
        };

        absolute
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LauncherConfig::default();
        assert_eq!(config.config_path, PathBuf::from("games_config.json"));
        assert_eq!(config.settle_time, Duration::from_secs(2));
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert!(config.session_limit.is_none());
    }

    #[test]
    fn test_helper_fragment_from_file_stem() {
        let config = LauncherConfig::default().with_helper_path("/opt/tools/ThrottleStop.exe");
        assert_eq!(config.helper_name_fragment().as_deref(), Some("ThrottleStop"));
    }

    #[test]
    fn test_helper_fragment_explicit_and_disabled() {
        let config = LauncherConfig::default()
            .with_helper_match(HelperMatch::Fragment("  tuner ".to_string()));
        assert_eq!(config.helper_name_fragment().as_deref(), Some("tuner"));

        let config = config.with_helper_match(HelperMatch::Disabled);
        assert!(config.helper_name_fragment().is_none());

        let config = config.with_helper_match(HelperMatch::Fragment("   ".to_string()));
        assert!(config.helper_name_fragment().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_working_dir_of_absolute_path() {
        let config = LauncherConfig::new("/srv/games/games_config.json");
        assert_eq!(config.working_dir(), PathBuf::from("/srv/games"));
    }

    #[test]
    fn test_working_dir_of_relative_path_is_absolute() {
        let config = LauncherConfig::default();
        assert!(config.working_dir().is_absolute());
    }
}
