//! End-to-end: a deep config merge whose value is already a subset of the
//! current document is a no-op.

use groundwork::logging::JsonlSink;
use groundwork::types::ApplyMode;
use groundwork::SetupEngine;
use serde_json::json;

use crate::common::{config_merge, with_temp_root};

#[test]
fn subset_merge_is_not_needed_and_writes_nothing() {
    let td = with_temp_root();
    let root = td.path();
    std::fs::create_dir_all(root.join(".kb")).unwrap();
    std::fs::write(
        root.join(".kb/kb-labs.config.json"),
        serde_json::to_string_pretty(
            &json!({"plugins": {"demo": {"enabled": true, "level": "strict"}}}),
        )
        .unwrap(),
    )
    .unwrap();
    let before_bytes = std::fs::read(root.join(".kb/kb-labs.config.json")).unwrap();
    let engine = SetupEngine::new(JsonlSink, JsonlSink, root);

    let ops = vec![config_merge(
        "config-1",
        ".kb/kb-labs.config.json",
        "/plugins/demo",
        json!({"enabled": true}),
    )];
    let analysis = engine.analyze(&ops);
    assert!(!analysis["config-1"].needed, "subset match");

    let plan = engine.plan(&ops, &analysis);
    let result = engine.apply(&plan, ApplyMode::Commit);
    assert!(result.success);
    assert!(result.applied.is_empty());
    assert!(result.artifacts.backups.is_empty());
    assert_eq!(
        std::fs::read(root.join(".kb/kb-labs.config.json")).unwrap(),
        before_bytes,
        "no write"
    );
}

#[test]
fn superset_merge_applies_and_preserves_existing_keys() {
    let td = with_temp_root();
    let root = td.path();
    std::fs::create_dir_all(root.join(".kb")).unwrap();
    std::fs::write(
        root.join(".kb/kb-labs.config.json"),
        r#"{"plugins":{"demo":{"enabled":true}}}"#,
    )
    .unwrap();
    let engine = SetupEngine::new(JsonlSink, JsonlSink, root);

    let ops = vec![config_merge(
        "config-1",
        ".kb/kb-labs.config.json",
        "/plugins/demo",
        json!({"level": "strict"}),
    )];
    let analysis = engine.analyze(&ops);
    assert!(analysis["config-1"].needed);

    let plan = engine.plan(&ops, &analysis);
    let result = engine.apply(&plan, ApplyMode::Commit);
    assert!(result.success);
    assert_eq!(result.applied.len(), 1);
    assert_eq!(result.artifacts.backups.len(), 1, "existing file backed up");

    let doc: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(root.join(".kb/kb-labs.config.json")).unwrap())
            .unwrap();
    assert_eq!(
        doc,
        json!({"plugins": {"demo": {"enabled": true, "level": "strict"}}})
    );
}
