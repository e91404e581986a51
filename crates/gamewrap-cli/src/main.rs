//! gamewrap - launch games alongside a helper process.
//!
//! With `--game=<name>` the named game is launched and supervised until it
//! exits. Without it the interactive list editor starts.

use anyhow::{Context, Result};
use clap::Parser;
use gamewrap_cli::{game_mode, ActiveLaunches, Args, Editor};
use gamewrap_core::{platform, GameStore, LaunchSupervisor, LauncherConfig, ShortcutWriter};
use std::io;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> ExitCode {
    let args = Args::parse();

    // Logs go to stderr; stdout carries the editor and user messages.
    let log_level = if args.debug { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(io::stderr)
        .compact()
        .init();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    let config = args.to_config();
    info!(
        "Starting gamewrap on {} (list: {}, helper: {})",
        platform::current_platform(),
        config.config_path.display(),
        config.helper_path.display()
    );

    let store = GameStore::open(&config.config_path)
        .with_context(|| format!("failed to load {}", config.config_path.display()))?;

    match args.game {
        Some(ref name) => run_game(store, config, name),
        None => run_editor(store, config),
    }
}

fn run_game(store: GameStore, config: LauncherConfig, name: &str) -> Result<ExitCode> {
    let supervisor = LaunchSupervisor::new(config);
    let mut stdout = io::stdout();

    let outcome = game_mode::run(&store, &supervisor, name, &mut stdout, |handle| {
        let token = handle.token();
        if let Err(e) = ctrlc::set_handler(move || {
            info!("Interrupt received, stopping helper");
            token.cancel();
        }) {
            warn!("Failed to install Ctrl-C handler: {}", e);
        }
    })?;

    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn run_editor(store: GameStore, config: LauncherConfig) -> Result<ExitCode> {
    let shortcuts =
        ShortcutWriter::new(&config).context("shortcut support is unavailable on this system")?;
    let supervisor = LaunchSupervisor::new(config);
    let launches = ActiveLaunches::new();

    let interrupted = launches.clone();
    ctrlc::set_handler(move || {
        info!("Interrupt received, stopping running games' helpers");
        interrupted.cancel_all();
        interrupted.wait_idle(Duration::from_millis(50));
        std::process::exit(130);
    })
    .context("failed to install Ctrl-C handler")?;

    let stdin = io::stdin();
    let mut editor = Editor::new(
        store,
        supervisor,
        shortcuts,
        launches,
        stdin.lock(),
        io::stdout(),
    );
    editor.run()?;

    Ok(ExitCode::SUCCESS)
}
