//! Facts stream shape: stage events, envelope fields, dry-run redaction.

use groundwork::logging::{redact_event, JsonlSink, TS_ZERO};
use groundwork::types::ApplyMode;
use groundwork::SetupEngine;
use serde_json::Value;

use crate::common::{file_ensure, TestAudit, TestEmitter, with_temp_root};

#[test]
fn commit_emits_attempt_and_result_facts_with_envelope() {
    let td = with_temp_root();
    let facts = TestEmitter::default();
    let engine = SetupEngine::new(facts.clone(), TestAudit, td.path());

    let ops = vec![file_ensure("file-1", ".kb/demo.txt", "demo")];
    let plan = engine.plan(&ops, &engine.analyze(&ops));
    let result = engine.apply(&plan, ApplyMode::Commit);
    assert!(result.success);

    let events = facts.events.lock().unwrap();
    assert!(events
        .iter()
        .any(|(_, ev, dec, _)| ev == "apply.attempt" && dec == "success"));
    let (_, _, _, fields) = events
        .iter()
        .find(|(_, ev, _, f)| {
            ev == "apply.result" && f.get("operation_id") == Some(&Value::from("file-1"))
        })
        .expect("per-operation apply.result");
    assert_eq!(fields.get("stage_id"), Some(&Value::from("stage-1")));
    assert!(fields.get("plan_id").is_some());
    assert!(fields.get("run_id").is_some());
    assert!(fields.get("seq").is_some());
    assert_eq!(fields.get("dry_run"), Some(&Value::from(false)));
}

#[test]
fn dry_run_facts_are_redacted_to_zero_timestamps() {
    let td = with_temp_root();
    let facts = TestEmitter::default();
    let engine = SetupEngine::new(facts.clone(), JsonlSink, td.path());

    let ops = vec![file_ensure("file-1", ".kb/demo.txt", "demo")];
    let plan = engine.plan(&ops, &engine.analyze(&ops));
    engine.apply(&plan, ApplyMode::DryRun);

    let events = facts.events.lock().unwrap();
    for (_, ev, _, fields) in events.iter() {
        if ev.starts_with("apply") {
            assert_eq!(
                fields.get("ts").and_then(Value::as_str),
                Some(TS_ZERO),
                "dry-run {ev} fact must carry the zero timestamp"
            );
        }
    }
}

#[test]
fn failed_apply_emits_rollback_facts() {
    use crate::common::{code_op, with_deps};

    let td = with_temp_root();
    let facts = TestEmitter::default();
    let engine = SetupEngine::new(facts.clone(), JsonlSink, td.path());

    let ops = vec![
        file_ensure("file-1", ".kb/demo.txt", "demo"),
        with_deps(code_op("code-1", "src/x.ts"), &["file-1"]),
    ];
    let plan = engine.plan(&ops, &engine.analyze(&ops));
    let result = engine.apply(&plan, ApplyMode::Commit);
    assert!(!result.success);

    let events = facts.events.lock().unwrap();
    assert!(events.iter().any(|(_, ev, dec, f)| {
        ev == "rollback"
            && dec == "success"
            && f.get("operation_id") == Some(&Value::from("file-1"))
    }));
    assert!(events
        .iter()
        .any(|(_, ev, _, _)| ev == "rollback.summary"));
}

#[test]
fn redact_event_normalizes_volatile_fields() {
    let redacted = redact_event(serde_json::json!({
        "ts": "2026-08-02T10:00:00Z",
        "duration_ms": 5,
        "path": "f.txt",
    }));
    assert_eq!(redacted.get("ts").and_then(Value::as_str), Some(TS_ZERO));
    assert!(redacted.get("duration_ms").is_none());
}
