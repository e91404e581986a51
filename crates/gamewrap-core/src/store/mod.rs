//! Persistent game list.
//!
//! The list is a flat JSON object mapping game name to executable path:
//!
//! ```json
//! {
//!   "Chess": "/bin/chess"
//! }
//! ```
//!
//! It is rewritten wholesale on every add. Paths are stored as given and
//! only checked when a launch tries to spawn them.

mod atomic;

pub use atomic::{read_json, write_json};

use crate::error::Result;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Mapping from game name to executable path.
pub type GameMap = BTreeMap<String, String>;

/// A single game list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameEntry {
    /// Unique display name.
    pub name: String,
    /// Executable path.
    pub executable: PathBuf,
}

/// Load the game list at `path`, or an empty list if none was saved yet.
pub fn load(path: &Path) -> Result<GameMap> {
    let games = read_json::<GameMap>(path)?.unwrap_or_default();
    debug!("Loaded {} games from {}", games.len(), path.display());
    Ok(games)
}

/// Replace the game list at `path` with `games`.
pub fn save(path: &Path, games: &GameMap) -> Result<()> {
    write_json(path, games)?;
    debug!("Saved {} games to {}", games.len(), path.display());
    Ok(())
}

/// In-memory game list bound to its file.
#[derive(Debug, Clone)]
pub struct GameStore {
    path: PathBuf,
    games: GameMap,
}

impl GameStore {
    /// Open the store at `path`, loading any saved entries.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let games = load(&path)?;
        Ok(Self { path, games })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the backing file, discarding in-memory state.
    pub fn reload(&mut self) -> Result<()> {
        self.games = load(&self.path)?;
        Ok(())
    }

    /// Write the current entries to the backing file.
    pub fn save(&self) -> Result<()> {
        save(&self.path, &self.games)
    }

    /// Add or replace a game and persist immediately.
    ///
    /// Returns the previous path when `name` was already present.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        executable: impl Into<String>,
    ) -> Result<Option<String>> {
        let name = name.into();
        let executable = executable.into();
        let previous = self.games.insert(name.clone(), executable.clone());
        self.save()?;

        match &previous {
            Some(old) => info!("Updated {}: {} -> {}", name, old, executable),
            None => info!("Added {} -> {}", name, executable),
        }

        Ok(previous)
    }

    /// Look up a game's executable.
    pub fn get(&self, name: &str) -> Option<GameEntry> {
        self.games.get(name).map(|path| GameEntry {
            name: name.to_string(),
            executable: PathBuf::from(path),
        })
    }

    /// All entries, ordered by name.
    pub fn entries(&self) -> Vec<GameEntry> {
        self.games
            .iter()
            .map(|(name, path)| GameEntry {
                name: name.clone(),
                executable: PathBuf::from(path),
            })
            .collect()
    }

    /// Raw name-to-path mapping.
    pub fn games(&self) -> &GameMap {
        &self.games
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}
