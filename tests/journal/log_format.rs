//! Persisted log format: a pretty-JSON array of journal entries that loads
//! back identically.

use groundwork::journal::read_log;
use groundwork::logging::JsonlSink;
use groundwork::types::ApplyMode;
use groundwork::SetupEngine;
use serde_json::Value;

use crate::common::{file_ensure, with_temp_root};

#[test]
fn log_is_pretty_json_array_with_operation_and_snapshots() {
    let td = with_temp_root();
    let root = td.path();
    std::fs::write(root.join("f.txt"), "before").unwrap();
    let engine = SetupEngine::new(JsonlSink, JsonlSink, root);

    let ops = vec![file_ensure("file-1", "f.txt", "after")];
    let plan = engine.plan(&ops, &engine.analyze(&ops));
    let result = engine.apply(&plan, ApplyMode::Commit);
    let log_path = result.log_path.expect("log written");
    assert!(log_path
        .file_name()
        .unwrap()
        .to_str()
        .unwrap()
        .ends_with("-setup-log.json"));

    let text = std::fs::read_to_string(&log_path).unwrap();
    assert!(text.ends_with('\n'));
    let doc: Value = serde_json::from_str(&text).unwrap();
    let entries = doc.as_array().expect("array of entries");
    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    assert!(entry.get("timestamp").is_some());
    assert_eq!(
        entry.pointer("/operation/metadata/id"),
        Some(&Value::from("file-1"))
    );
    assert_eq!(entry.pointer("/before/content"), Some(&Value::from("before")));
    assert_eq!(entry.pointer("/after/content"), Some(&Value::from("after")));
    assert!(entry.get("backupPath").is_some(), "backup recorded");
}

#[test]
fn persisted_log_loads_back_identically() {
    let td = with_temp_root();
    let root = td.path();
    let engine = SetupEngine::new(JsonlSink, JsonlSink, root);

    let ops = vec![file_ensure("file-1", ".kb/demo.txt", "demo")];
    let plan = engine.plan(&ops, &engine.analyze(&ops));
    let result = engine.apply(&plan, ApplyMode::Commit);
    let log_path = result.log_path.unwrap();

    let entries = read_log(&log_path).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].operation.metadata.id, "file-1");
    assert!(!entries[0].before.exists, "file did not pre-exist");
    assert!(entries[0].after.as_ref().unwrap().exists);
    assert_eq!(entries[0].backup_path, None);

    // Round-trip: write the loaded entries again and re-load.
    let copy = root.join("copy-log.json");
    groundwork::journal::write_log(&copy, &entries).unwrap();
    assert_eq!(read_log(&copy).unwrap(), entries);
}

#[test]
fn backup_exists_iff_entry_records_backup_path() {
    let td = with_temp_root();
    let root = td.path();
    std::fs::write(root.join("mutated.txt"), "old").unwrap();
    let engine = SetupEngine::new(JsonlSink, JsonlSink, root);

    let ops = vec![
        file_ensure("fresh", "fresh.txt", "x"),
        file_ensure("mutated", "mutated.txt", "new"),
    ];
    let plan = engine.plan(&ops, &engine.analyze(&ops));
    let result = engine.apply(&plan, ApplyMode::Commit);

    let entries = read_log(&result.log_path.unwrap()).unwrap();
    for entry in &entries {
        match &entry.backup_path {
            Some(p) => assert!(p.exists(), "recorded backup exists on disk"),
            None => assert_eq!(entry.operation.metadata.id, "fresh"),
        }
    }
}
