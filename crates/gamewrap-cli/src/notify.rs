//! User-facing wording for launch results.

use gamewrap_core::{LaunchOutcome, LaunchReport, SupervisorError};

pub const GAME_NOT_FOUND: &str = "Game not found in config.";

/// One-line summary of a finished session.
pub fn describe_report(report: &LaunchReport) -> String {
    let helpers = match report.stopped_helpers.len() {
        0 => "no helper processes stopped".to_string(),
        1 => "helper stopped".to_string(),
        n => format!("{} helper processes stopped", n),
    };

    match report.outcome {
        LaunchOutcome::TargetExited { code: Some(code) } => {
            format!("{} exited with code {}; {}.", report.game, code, helpers)
        }
        LaunchOutcome::TargetExited { code: None } => {
            format!("{} exited; {}.", report.game, helpers)
        }
        LaunchOutcome::Cancelled => {
            format!("Stopped supervising {}; {}.", report.game, helpers)
        }
        LaunchOutcome::TimedOut => format!(
            "Session limit reached for {} after {}s; {}.",
            report.game,
            report.elapsed.as_secs(),
            helpers
        ),
    }
}

/// Error notification text for a failed launch.
pub fn describe_error(err: &SupervisorError) -> String {
    match err {
        SupervisorError::HelperSpawn { .. } => {
            format!("Error: {}. Check the helper path.", err)
        }
        SupervisorError::TargetSpawn { .. } => {
            format!("Error: {}. Check the game's executable path.", err)
        }
        SupervisorError::Poll { .. } | SupervisorError::WorkerPanicked { .. } => {
            format!("Error: {}. The helper may still be running.", err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    fn report(outcome: LaunchOutcome, stopped: Vec<u32>) -> LaunchReport {
        LaunchReport {
            game: "Chess".to_string(),
            helper_pid: 10,
            target_pid: Some(11),
            outcome,
            stopped_helpers: stopped,
            elapsed: Duration::from_secs(90),
        }
    }

    #[test]
    fn test_describe_exit() {
        let text = describe_report(&report(
            LaunchOutcome::TargetExited { code: Some(0) },
            vec![10],
        ));
        assert_eq!(text, "Chess exited with code 0; helper stopped.");
    }

    #[test]
    fn test_describe_timeout() {
        let text = describe_report(&report(LaunchOutcome::TimedOut, vec![10, 12]));
        assert_eq!(
            text,
            "Session limit reached for Chess after 90s; 2 helper processes stopped."
        );
    }

    #[test]
    fn test_describe_error_mentions_path() {
        let err = SupervisorError::TargetSpawn {
            game: "Chess".to_string(),
            path: PathBuf::from("/bin/chess"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        let text = describe_error(&err);
        assert!(text.starts_with("Error: Failed to start Chess from /bin/chess"));
        assert!(text.ends_with("Check the game's executable path."));
    }
}
