//! gamewrap core - launch games alongside a helper process.
//!
//! The library keeps a JSON list of games, runs the helper/game lifecycle on
//! a worker thread, and writes desktop shortcuts that launch a single game.
//! It has no user interface; the `gamewrap` binary drives it.
//!
//! # Example
//!
//! ```rust,no_run
//! use gamewrap_core::{GameStore, LaunchSupervisor, LauncherConfig};
//!
//! fn main() -> gamewrap_core::Result<()> {
//!     let config = LauncherConfig::default().with_helper_path("/usr/bin/gamemoded");
//!     let mut store = GameStore::open(&config.config_path)?;
//!     store.add("Chess", "/usr/games/chess")?;
//!
//!     let supervisor = LaunchSupervisor::new(config);
//!     if let Some(entry) = store.get("Chess") {
//!         let handle = supervisor.launch(&entry.name, &entry.executable)?;
//!         let report = handle.join();
//!         println!("{:?}", report.map(|r| r.outcome));
//!     }
//!     Ok(())
//! }
//! ```

pub mod cancel;
pub mod config;
pub mod error;
pub mod platform;
pub mod shortcut;
pub mod store;
pub mod supervisor;

pub use cancel::CancellationToken;
pub use config::{AppConfig, HelperMatch, LauncherConfig, SupervisorDefaults};
pub use error::{LauncherError, Result, SupervisorError};
pub use shortcut::ShortcutWriter;
pub use store::{GameEntry, GameMap, GameStore};
pub use supervisor::{
    LaunchHandle, LaunchOutcome, LaunchReport, LaunchSupervisor, ProcessExit, ProcessHost,
    SpawnedProcess, SystemProcessHost,
};
