//! Desktop shortcut creation.
//!
//! A shortcut runs the launcher with `--game=<name>` from the directory that
//! holds the game list, so it resolves the same list as an interactive run.
//!
//! - Linux and other Unix: freedesktop `.desktop` entry
//! - Windows: `.lnk` shell link
//! - macOS: executable `.command` script

mod desktop_entry;
mod writer;

pub use desktop_entry::{DesktopEntry, DesktopEntryBuilder};
pub use writer::{file_stem_for, game_argument, ShortcutWriter};
