//! Command-line arguments.

use clap::Parser;
use gamewrap_core::{AppConfig, HelperMatch, LauncherConfig};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = AppConfig::APP_NAME, version)]
#[command(about = "Launch games alongside a helper process")]
pub struct Args {
    /// Launch this game from the list instead of opening the editor
    #[arg(long, value_name = "NAME", value_parser = parse_game_name)]
    pub game: Option<String>,

    /// Game list file
    #[arg(long, env = AppConfig::CONFIG_ENV_VAR, default_value = AppConfig::CONFIG_FILE_NAME)]
    pub config: PathBuf,

    /// Helper executable started before each game
    #[arg(long, env = AppConfig::HELPER_ENV_VAR)]
    pub helper: Option<PathBuf>,

    /// Stop processes whose name contains this after a game exits
    /// (defaults to the helper's file name; empty disables the sweep)
    #[arg(long, value_name = "FRAGMENT")]
    pub helper_name: Option<String>,

    /// Seconds between starting the helper and starting the game
    #[arg(long, value_name = "SECS", default_value = "2", value_parser = parse_secs)]
    pub settle_secs: Duration,

    /// Seconds between checks that the game is still running
    #[arg(long, value_name = "SECS", default_value = "5", value_parser = parse_interval)]
    pub poll_secs: Duration,

    /// Stop supervising after this many seconds (default: wait for the game)
    #[arg(long, value_name = "SECS", value_parser = parse_secs)]
    pub session_limit_secs: Option<Duration>,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,
}

impl Args {
    /// Build the launcher configuration these arguments describe.
    pub fn to_config(&self) -> LauncherConfig {
        let mut config = LauncherConfig::new(&self.config)
            .with_settle_time(self.settle_secs)
            .with_poll_interval(self.poll_secs)
            .with_session_limit(self.session_limit_secs);

        if let Some(ref helper) = self.helper {
            config = config.with_helper_path(helper);
        }

        match self.helper_name.as_deref().map(str::trim) {
            Some("") => config.with_helper_match(HelperMatch::Disabled),
            Some(fragment) => config.with_helper_match(HelperMatch::Fragment(fragment.to_string())),
            None => config,
        }
    }
}

/// Accept `Chess`, `"Chess"` or `'Chess'`.
///
/// Shortcuts on some platforms deliver the quotes verbatim. An empty name is
/// passed through and reported as not found.
fn parse_game_name(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    let unquoted = ['"', '\'']
        .iter()
        .find_map(|q| {
            trimmed
                .strip_prefix(*q)
                .and_then(|rest| rest.strip_suffix(*q))
        })
        .unwrap_or(trimmed);

    Ok(unquoted.trim().to_string())
}

fn parse_secs(raw: &str) -> Result<Duration, String> {
    let secs: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number of seconds", raw))?;
    Duration::try_from_secs_f64(secs).map_err(|e| format!("invalid duration '{}': {}", raw, e))
}

/// Like `parse_secs`, but zero would turn polling into a busy loop.
fn parse_interval(raw: &str) -> Result<Duration, String> {
    let interval = parse_secs(raw)?;
    if interval.is_zero() {
        return Err("interval must be greater than zero".to_string());
    }
    Ok(interval)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("gamewrap").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_no_arguments_opens_editor() {
        let args = parse(&[]);
        assert!(args.game.is_none());
        assert!(!args.debug);
    }

    #[test]
    fn test_game_argument_forms() {
        assert_eq!(parse(&["--game=Chess"]).game.as_deref(), Some("Chess"));
        assert_eq!(parse(&["--game", "Space Quest"]).game.as_deref(), Some("Space Quest"));
        assert_eq!(parse(&["--game=\"Chess\""]).game.as_deref(), Some("Chess"));
        assert_eq!(parse(&["--game='Go'"]).game.as_deref(), Some("Go"));
    }

    #[test]
    fn test_empty_game_selects_game_mode() {
        assert_eq!(parse(&["--game="]).game.as_deref(), Some(""));
        assert_eq!(parse(&["--game=\"\""]).game.as_deref(), Some(""));
    }

    #[test]
    fn test_to_config_defaults() {
        let config = parse(&["--config", "/tmp/list.json"]).to_config();
        assert_eq!(config.config_path, PathBuf::from("/tmp/list.json"));
        assert_eq!(config.settle_time, Duration::from_secs(2));
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert!(config.session_limit.is_none());
        assert_eq!(config.helper_match, HelperMatch::FileStem);
    }

    #[test]
    fn test_to_config_overrides() {
        let config = parse(&[
            "--helper",
            "/opt/tuner/Tuner",
            "--helper-name",
            "tune",
            "--settle-secs",
            "0.5",
            "--poll-secs",
            "1",
            "--session-limit-secs",
            "3600",
        ])
        .to_config();

        assert_eq!(config.helper_path, PathBuf::from("/opt/tuner/Tuner"));
        assert_eq!(config.helper_match, HelperMatch::Fragment("tune".to_string()));
        assert_eq!(config.settle_time, Duration::from_millis(500));
        assert_eq!(config.poll_interval, Duration::from_secs(1));
        assert_eq!(config.session_limit, Some(Duration::from_secs(3600)));
    }

    #[test]
    fn test_empty_helper_name_disables_sweep() {
        let config = parse(&["--helper-name="]).to_config();
        assert_eq!(config.helper_match, HelperMatch::Disabled);
    }

    #[test]
    fn test_negative_seconds_rejected() {
        assert!(Args::try_parse_from(["gamewrap", "--poll-secs", "-1"]).is_err());
        assert!(Args::try_parse_from(["gamewrap", "--poll-secs", "soon"]).is_err());
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        assert!(Args::try_parse_from(["gamewrap", "--poll-secs", "0"]).is_err());
        let config = parse(&["--settle-secs", "0"]).to_config();
        assert!(config.settle_time.is_zero());
    }
}
