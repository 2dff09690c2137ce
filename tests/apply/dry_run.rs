//! Dry runs resolve content and report, but never touch disk.

use groundwork::journal::{Journal, MemoryJournal};
use groundwork::logging::JsonlSink;
use groundwork::types::{ApplyMode, ProgressStatus};
use groundwork::SetupEngine;

use crate::common::{file_ensure, with_temp_root};

#[test]
fn dry_run_mutates_nothing_and_reports_skipped() {
    let td = with_temp_root();
    let root = td.path();
    let engine = SetupEngine::new(JsonlSink, JsonlSink, root);

    let ops = vec![file_ensure("file-1", ".kb/demo.txt", "demo")];
    let analysis = engine.analyze(&ops);
    let plan = engine.plan(&ops, &analysis);

    let mut journal = MemoryJournal::new();
    let result = engine.apply_with_journal(&plan, &mut journal, ApplyMode::DryRun);

    assert!(result.success);
    assert!(result.applied.is_empty());
    assert!(!result.rollback_available);
    assert_eq!(result.log_path, None);
    assert!(!root.join(".kb/demo.txt").exists(), "dry run wrote a file");
    assert!(journal.entries().is_empty(), "dry run must not journal");
}

#[test]
fn dry_run_fails_on_unresolvable_content() {
    use groundwork::types::{FileAction, FileOp, Operation, OperationMetadata, PlannedOperation};

    let td = with_temp_root();
    let engine = SetupEngine::new(JsonlSink, JsonlSink, td.path());
    // No content, no annotation, no template.
    let ops = vec![PlannedOperation::new(
        Operation::File(FileOp {
            action: FileAction::Ensure,
            path: "empty.txt".into(),
            content: None,
            template: None,
            encoding: None,
            mode: None,
            checksum: None,
        }),
        OperationMetadata::new("file-1", "no content"),
    )];
    let analysis = engine.analyze(&ops);
    let plan = engine.plan(&ops, &analysis);
    let result = engine.apply(&plan, ApplyMode::DryRun);
    assert!(!result.success);
    assert!(result.failed[0].error.contains("no content"));
}

#[test]
fn progress_stream_is_pending_then_skipped_in_dry_run() {
    use groundwork::exec::Executor;
    use std::sync::Mutex;

    let td = with_temp_root();
    let engine = SetupEngine::new(JsonlSink, JsonlSink, td.path());
    let ops = vec![file_ensure("file-1", "f.txt", "x")];
    let plan = engine.plan(&ops, &engine.analyze(&ops));

    let seen: Mutex<Vec<ProgressStatus>> = Mutex::new(Vec::new());
    let on_progress = |ev: &groundwork::types::ProgressEvent| {
        seen.lock().unwrap().push(ev.status);
    };
    let executor = Executor::new(td.path()).with_progress(&on_progress);
    let mut journal = MemoryJournal::new();
    executor.execute(&plan, &mut journal, ApplyMode::DryRun);

    assert_eq!(
        *seen.lock().unwrap(),
        vec![ProgressStatus::Pending, ProgressStatus::Skipped]
    );
}
