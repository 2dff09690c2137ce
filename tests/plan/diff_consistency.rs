//! Diff ↔ apply consistency: created means it did not exist before, deleted
//! means it does not exist after, modified preview matches post-run bytes.

use groundwork::logging::JsonlSink;
use groundwork::types::{ApplyMode, FileStatus};
use groundwork::SetupEngine;
use serde_json::json;

use crate::common::{config_set, file_delete, file_ensure, with_temp_root};

#[test]
fn file_statuses_match_apply_outcomes() {
    let td = with_temp_root();
    let root = td.path();
    std::fs::write(root.join("existing.txt"), "old").unwrap();
    std::fs::write(root.join("doomed.txt"), "bye").unwrap();
    let engine = SetupEngine::new(JsonlSink, JsonlSink, root);

    let ops = vec![
        file_ensure("create", "fresh.txt", "hello"),
        file_ensure("modify", "existing.txt", "new"),
        file_delete("remove", "doomed.txt"),
    ];
    let analysis = engine.analyze(&ops);
    let plan = engine.plan(&ops, &analysis);

    let status_of = |path: &str| {
        plan.diff
            .files
            .iter()
            .find(|f| f.path == path)
            .map(|f| f.status)
            .unwrap()
    };
    assert!(!root.join("fresh.txt").exists());
    assert_eq!(status_of("fresh.txt"), FileStatus::Created);
    assert_eq!(status_of("existing.txt"), FileStatus::Modified);
    assert_eq!(status_of("doomed.txt"), FileStatus::Deleted);
    assert_eq!(plan.diff.summary.created, 1);
    assert_eq!(plan.diff.summary.modified, 1);
    assert_eq!(plan.diff.summary.deleted, 1);

    let result = engine.apply(&plan, ApplyMode::Commit);
    assert!(result.success);
    assert!(!root.join("doomed.txt").exists(), "deleted after apply");
    let modified = plan
        .diff
        .files
        .iter()
        .find(|f| f.path == "existing.txt")
        .unwrap();
    let preview_after = modified.preview.as_ref().unwrap().after.as_deref().unwrap();
    assert_eq!(
        std::fs::read_to_string(root.join("existing.txt")).unwrap(),
        preview_after
    );
}

#[test]
fn modified_preview_carries_before_content() {
    let td = with_temp_root();
    let root = td.path();
    std::fs::write(root.join("f.txt"), "old").unwrap();
    let engine = SetupEngine::new(JsonlSink, JsonlSink, root);

    let ops = vec![file_ensure("m", "f.txt", "new")];
    let plan = engine.plan(&ops, &engine.analyze(&ops));
    let preview = plan.diff.files[0].preview.as_ref().unwrap();
    assert_eq!(preview.before.as_deref(), Some("old"));
    assert_eq!(preview.after.as_deref(), Some("new"));
}

#[test]
fn config_diff_carries_before_and_after_values() {
    let td = with_temp_root();
    let root = td.path();
    std::fs::write(root.join("cfg.json"), r#"{"a":{"b":1}}"#).unwrap();
    let engine = SetupEngine::new(JsonlSink, JsonlSink, root);

    let ops = vec![config_set("c", "cfg.json", "/a/b", json!(2))];
    let plan = engine.plan(&ops, &engine.analyze(&ops));
    let diff = &plan.diff.configs[0];
    assert_eq!(diff.pointer, "/a/b");
    assert_eq!(diff.before, Some(json!(1)));
    assert_eq!(diff.after, Some(json!(2)));
    assert_eq!(plan.diff.summary.modified, 1);
}
