//! Front end for gamewrap: argument parsing, the interactive editor, and the
//! non-interactive `--game` launch.

pub mod cli;
pub mod editor;
pub mod game_mode;
pub mod launches;
pub mod notify;

pub use cli::Args;
pub use editor::Editor;
pub use game_mode::GameRun;
pub use launches::ActiveLaunches;
