//! Registry overrides: custom analyzers, diff builders, and executors take
//! precedence over built-ins and can claim the `code` kind.

use groundwork::logging::JsonlSink;
use groundwork::registry::{ExecOutcome, OperationRegistry};
use groundwork::types::{
    AnalysisResult, ApplyMode, ConfigDiff, DiffEntry, Risk,
};
use groundwork::SetupEngine;
use serde_json::json;

use crate::common::{code_op, file_ensure, with_temp_root};

#[test]
fn custom_analyzer_claims_the_code_kind() {
    let td = with_temp_root();
    let mut registry = OperationRegistry::new();
    registry.register_analyzer(
        "code",
        Box::new(|_op: &groundwork::types::PlannedOperation, _ctx: &groundwork::registry::HandlerCtx<'_>| {
            AnalysisResult::needed(Risk::High).with_note("custom code analyzer")
        }),
    );
    let engine = SetupEngine::new(JsonlSink, JsonlSink, td.path()).with_registry(registry);

    let ops = vec![code_op("code-1", "src/a.ts")];
    let analysis = engine.analyze(&ops);
    assert_eq!(analysis["code-1"].risk, Risk::High);
    assert_eq!(analysis["code-1"].notes, vec!["custom code analyzer"]);
}

#[test]
fn unregistered_code_kind_analyzes_moderate_with_note() {
    let td = with_temp_root();
    let engine = SetupEngine::new(JsonlSink, JsonlSink, td.path());

    let ops = vec![code_op("code-1", "src/a.ts")];
    let analysis = engine.analyze(&ops);
    assert!(analysis["code-1"].needed);
    assert_eq!(analysis["code-1"].risk, Risk::Moderate);
    assert!(analysis["code-1"].notes[0].contains("code"));
}

#[test]
fn custom_executor_makes_code_ops_apply() {
    let td = with_temp_root();
    let mut registry = OperationRegistry::new();
    registry.register_executor(
        "code",
        Box::new(
            |op: &groundwork::types::PlannedOperation,
             ctx: &groundwork::registry::ExecCtx<'_>|
             -> groundwork::types::Result<ExecOutcome> {
                let target = ctx.workspace_root.join(op.operation.target_path());
                if let Some(parent) = target.parent() {
                    std::fs::create_dir_all(parent).unwrap();
                }
                std::fs::write(&target, b"patched").unwrap();
                Ok(ExecOutcome::changed(None))
            },
        ),
    );
    let engine = SetupEngine::new(JsonlSink, JsonlSink, td.path()).with_registry(registry);

    let ops = vec![code_op("code-1", "src/a.ts")];
    let plan = engine.plan(&ops, &engine.analyze(&ops));
    let result = engine.apply(&plan, ApplyMode::Commit);
    assert!(result.success);
    assert_eq!(result.applied.len(), 1);
    assert_eq!(
        std::fs::read(td.path().join("src/a.ts")).unwrap(),
        b"patched"
    );
}

#[test]
fn custom_diff_builder_overrides_builtin_shape() {
    let td = with_temp_root();
    let mut registry = OperationRegistry::new();
    registry.register_diff_builder(
        "file",
        Box::new(
            |op: &groundwork::types::PlannedOperation,
             _analysis: Option<&AnalysisResult>,
             _ctx: &groundwork::registry::HandlerCtx<'_>| {
                Some(DiffEntry::Config(ConfigDiff {
                    path: op.operation.target_path().to_string(),
                    pointer: String::new(),
                    before: None,
                    after: Some(json!("custom")),
                }))
            },
        ),
    );
    let engine = SetupEngine::new(JsonlSink, JsonlSink, td.path()).with_registry(registry);

    let ops = vec![file_ensure("file-1", "f.txt", "x")];
    let plan = engine.plan(&ops, &engine.analyze(&ops));
    assert!(plan.diff.files.is_empty(), "builtin file diff suppressed");
    assert_eq!(plan.diff.configs.len(), 1);
    assert_eq!(plan.diff.configs[0].after, Some(json!("custom")));
    assert_eq!(plan.diff.summary.created, 1);
}
