//! End-to-end: create a new file in an empty workspace.

use groundwork::logging::JsonlSink;
use groundwork::types::{ApplyMode, FileStatus};
use groundwork::SetupEngine;

use crate::common::{file_ensure, with_temp_root};

#[test]
fn create_new_file_in_empty_workspace() {
    let td = with_temp_root();
    let root = td.path();
    let engine = SetupEngine::new(JsonlSink, JsonlSink, root);

    let ops = vec![file_ensure("file-1", ".kb/demo.txt", "demo")];
    let analysis = engine.analyze(&ops);
    assert!(analysis["file-1"].needed);

    let plan = engine.plan(&ops, &analysis);
    assert_eq!(plan.stages.len(), 1);
    assert_eq!(plan.diff.files.len(), 1);
    assert_eq!(plan.diff.files[0].status, FileStatus::Created);
    assert_eq!(plan.diff.summary.created, 1);

    let result = engine.apply(&plan, ApplyMode::Commit);
    assert!(result.success);
    assert_eq!(result.applied.len(), 1);
    assert_eq!(
        std::fs::read_to_string(root.join(".kb/demo.txt")).unwrap(),
        "demo"
    );
    assert!(result.artifacts.backups.is_empty(), "no backup for a new file");
    let log = result.log_path.expect("log file written");
    assert!(log.exists());
    assert_eq!(result.artifacts.logs, vec![log]);
}
