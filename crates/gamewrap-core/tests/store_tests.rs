//! Integration tests for the persisted game list.

use gamewrap_core::store::{self, GameMap};
use gamewrap_core::{GameStore, LauncherError};
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_add_save_reload_scenario() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("games_config.json");

    let mut store = GameStore::open(&path).unwrap();
    assert!(store.is_empty());

    store.add("Chess", "/bin/chess").unwrap();
    store.save().unwrap();

    let reloaded = store::load(&path).unwrap();
    let mut expected = GameMap::new();
    expected.insert("Chess".to_string(), "/bin/chess".to_string());
    assert_eq!(reloaded, expected);
}

#[test]
fn test_round_trip_many_entries() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("games_config.json");

    let games: GameMap = (0..50)
        .map(|i| (format!("Game {i}"), format!("/opt/games/{i}/run")))
        .collect();

    store::save(&path, &games).unwrap();
    assert_eq!(store::load(&path).unwrap(), games);

    // Saving again replaces the record wholesale.
    let mut fewer = GameMap::new();
    fewer.insert("Only".to_string(), "/bin/only".to_string());
    store::save(&path, &fewer).unwrap();
    assert_eq!(store::load(&path).unwrap(), fewer);
}

#[test]
fn test_duplicate_add_keeps_other_entries() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("games_config.json");

    let mut store = GameStore::open(&path).unwrap();
    store.add("Chess", "/bin/chess").unwrap();
    store.add("Go", "/bin/go").unwrap();
    store.add("Chess", "/bin/chess2").unwrap();

    let reloaded = GameStore::open(&path).unwrap();
    assert_eq!(reloaded.len(), 2);
    assert_eq!(
        reloaded.get("Chess").unwrap().executable,
        PathBuf::from("/bin/chess2")
    );
    assert_eq!(reloaded.get("Go").unwrap().executable, PathBuf::from("/bin/go"));
}

#[test]
fn test_reads_file_written_by_hand() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("games_config.json");
    std::fs::write(
        &path,
        "{\n    \"Doom\": \"C:\\\\Games\\\\doom.exe\",\n    \"Chess\": \"/bin/chess\"\n}",
    )
    .unwrap();

    let store = GameStore::open(&path).unwrap();
    assert_eq!(
        store.get("Doom").unwrap().executable,
        PathBuf::from("C:\\Games\\doom.exe")
    );
    assert_eq!(store.len(), 2);
}

#[test]
fn test_non_object_record_is_json_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("games_config.json");
    std::fs::write(&path, "[\"Chess\"]").unwrap();

    let result = GameStore::open(&path);
    assert!(matches!(result, Err(LauncherError::Json { .. })));
}
