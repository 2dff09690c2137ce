//! Operations whose paths escape the workspace root fail without touching
//! any file.

use groundwork::logging::JsonlSink;
use groundwork::types::ApplyMode;
use groundwork::SetupEngine;

use crate::common::{file_ensure, with_temp_root};

#[test]
fn dotdot_path_fails_and_touches_nothing() {
    let outer = with_temp_root();
    let root_dir = outer.path().join("ws");
    std::fs::create_dir_all(&root_dir).unwrap();
    let root = root_dir.as_path();
    let engine = SetupEngine::new(JsonlSink, JsonlSink, root);

    let ops = vec![file_ensure("file-1", "../escape.txt", "nope")];
    let analysis = engine.analyze(&ops);
    assert_eq!(analysis["file-1"].risk, groundwork::types::Risk::High);

    let plan = engine.plan(&ops, &analysis);
    let result = engine.apply(&plan, ApplyMode::Commit);
    assert!(!result.success);
    assert!(result.failed[0].error.contains("escapes workspace"));
    assert!(!outer.path().join("escape.txt").exists());
}

#[test]
fn escape_after_successful_op_rolls_the_run_back() {
    use crate::common::with_deps;

    let outer = with_temp_root();
    let root_dir = outer.path().join("ws");
    std::fs::create_dir_all(&root_dir).unwrap();
    let root = root_dir.as_path();
    let engine = SetupEngine::new(JsonlSink, JsonlSink, root);

    let ops = vec![
        file_ensure("good", "inside.txt", "ok"),
        with_deps(file_ensure("bad", "../../escape.txt", "nope"), &["good"]),
    ];
    let analysis = engine.analyze(&ops);
    let plan = engine.plan(&ops, &analysis);
    let result = engine.apply(&plan, ApplyMode::Commit);

    assert!(!result.success);
    assert!(!root.join("inside.txt").exists(), "rolled back");
    assert!(!outer.path().join("escape.txt").exists());
}
