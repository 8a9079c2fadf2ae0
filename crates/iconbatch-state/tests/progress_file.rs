use std::fs;

use chrono::{DateTime, Utc};
use iconbatch_state::{JsonFileStore, Progress, ProgressRecord, ProgressStore};
use tempfile::TempDir;

fn store_in(dir: &TempDir) -> JsonFileStore {
    JsonFileStore::open(dir.path().join("progress.json"))
}

#[test]
fn fresh_store_then_single_update() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    assert!(store.load().is_empty());

    let before = Utc::now();
    store.update("urlA", 10, 3, true);

    let progress = store.load();
    assert_eq!(progress.len(), 1);
    let record = progress.get("urlA").unwrap();
    assert_eq!(record.processed, 3);
    assert_eq!(record.total, 10);
    assert!(record.success);
    assert!(record.last_attempt() >= before - chrono::Duration::milliseconds(1));

    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
    let stamp = raw["urlA"]["lastAttempt"].as_str().unwrap();
    assert!(stamp.ends_with('Z'));
    assert!(DateTime::parse_from_rfc3339(stamp).is_ok());
}

#[test]
fn save_then_load_roundtrips() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    let cases = [
        ("urlA", 10, 3, true),
        ("urlB", 0, 0, false),
        ("https://example.com/icons/set?page=2", 250, 250, true),
        ("urlC", 7, 6, false),
    ];

    for (key, total, processed, success) in cases {
        let mut progress = store.load();
        let record = ProgressRecord::stamped(processed, total, success);
        progress.insert(key, record.clone());
        store.save(&progress);

        assert_eq!(store.load().get(key), Some(&record), "key {key}");
    }

    assert_eq!(store.load().len(), cases.len());
}

#[test]
fn corrupt_file_loads_empty_and_is_backed_up() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    fs::write(store.path(), "{\"urlA\": {\"processed\": 3").unwrap();

    assert!(store.load().is_empty());
    assert_eq!(
        fs::read_to_string(store.backup_path()).unwrap(),
        "{\"urlA\": {\"processed\": 3"
    );

    // The next update replaces the unreadable file.
    store.update("urlB", 5, 1, true);
    assert_eq!(store.load().len(), 1);
}

#[test]
fn structurally_invalid_file_loads_empty() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    fs::write(store.path(), r#"{"urlA": 40, "urlB": 100}"#).unwrap();

    assert_eq!(store.load(), Progress::new());
    assert!(store.backup_path().exists());
}

#[test]
fn file_written_by_other_tooling_is_readable() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    fs::write(
        store.path(),
        r#"{
  "urlA": {
    "processed": 40,
    "total": 100,
    "success": false,
    "lastAttempt": "2024-03-01T08:30:12.345Z"
  }
}"#,
    )
    .unwrap();

    let progress = store.load();
    assert_eq!(progress.resume_offset("urlA"), 40);
    assert_eq!(
        progress.get("urlA").unwrap().last_attempt().to_rfc3339(),
        "2024-03-01T08:30:12.345+00:00"
    );
}

#[test]
fn mistyped_record_does_not_discard_the_others() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    fs::write(
        store.path(),
        r#"{
  "urlA": {"processed": 40, "total": 100, "success": false, "lastAttempt": "2024-03-01T08:30:12.345Z"},
  "urlB": {"processed": 7, "total": 10, "success": true, "lastAttempt": "2024-03-01 08:30:12"}
}"#,
    )
    .unwrap();

    let progress = store.load();
    assert_eq!(progress.len(), 2);
    assert_eq!(progress.resume_offset("urlA"), 40);
    assert_eq!(progress.resume_offset("urlB"), 7);
    assert!(!store.backup_path().exists());

    store.update("urlC", 5, 1, true);

    let reloaded = store.load();
    assert_eq!(reloaded.len(), 3);
    assert_eq!(reloaded.resume_offset("urlA"), 40);
    assert_eq!(reloaded.resume_offset("urlB"), 7);
    assert_eq!(
        reloaded.get("urlB").unwrap().last_attempt().to_rfc3339(),
        "2024-03-01T08:30:12+00:00"
    );
}

#[test]
fn high_precision_stamp_from_disk_roundtrips() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    fs::write(
        store.path(),
        r#"{"urlA": {"processed": 1, "total": 2, "success": true, "lastAttempt": "2024-03-01T08:30:12.345678Z"}}"#,
    )
    .unwrap();

    let loaded = store.load();
    store.save(&loaded);
    assert_eq!(store.load(), loaded);
    assert!(fs::read_to_string(store.path())
        .unwrap()
        .contains("2024-03-01T08:30:12.345Z"));
}
