//! End-to-end: declared dependencies force stage ordering.

use groundwork::logging::JsonlSink;
use groundwork::types::ApplyMode;
use groundwork::SetupEngine;
use serde_json::json;

use crate::common::{config_set, file_ensure, with_deps, with_temp_root};

#[test]
fn dependent_config_lands_in_second_stage() {
    let td = with_temp_root();
    let root = td.path();
    let engine = SetupEngine::new(JsonlSink, JsonlSink, root);

    let ops = vec![
        file_ensure("file-1", ".kb/demo.txt", "demo"),
        with_deps(
            config_set("config-1", ".kb/kb-labs.config.json", "/demo/path", json!(".kb/demo.txt")),
            &["file-1"],
        ),
    ];
    let analysis = engine.analyze(&ops);
    let plan = engine.plan(&ops, &analysis);

    assert_eq!(plan.stages.len(), 2);
    assert_eq!(plan.stages[0].operations[0].id(), "file-1");
    assert_eq!(plan.stages[1].operations.len(), 1);
    assert_eq!(plan.stages[1].operations[0].id(), "config-1");
    assert!(!plan.stages[1].parallel);

    let result = engine.apply(&plan, ApplyMode::Commit);
    assert!(result.success);
    assert_eq!(
        result.applied.iter().map(|o| o.id()).collect::<Vec<_>>(),
        vec!["file-1", "config-1"]
    );
}
