//! Launch supervision.
//!
//! A launch starts the helper, waits for it to settle, starts the game, then
//! polls the game until it exits and stops the helper afterwards. Each launch
//! runs on its own worker thread and is controlled through a `LaunchHandle`.
//!
//! # Helper shutdown
//!
//! After the session the helper that was spawned is stopped by pid. If the
//! config names a helper fragment, every process whose name contains it is
//! stopped as well; this catches helpers that re-launch themselves (for
//! example to gain elevated rights) under a different pid.
//!
//! Concurrent launches are independent: two launches start two helpers, and
//! whichever session ends first sweeps helpers by name for both.

mod host;
mod launch;

pub use host::{ProcessExit, ProcessHost, SpawnedProcess, SystemProcess, SystemProcessHost};
pub use launch::{LaunchHandle, LaunchOutcome, LaunchReport, LaunchSupervisor};
