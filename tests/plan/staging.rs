//! Staging behavior through the public facade: cycles, duplicates, and
//! risk rollup.

use groundwork::logging::JsonlSink;
use groundwork::types::Risk;
use groundwork::SetupEngine;

use crate::common::{code_op, file_ensure, with_deps, with_temp_root};

#[test]
fn cycle_warns_and_degrades_to_sequential_stages() {
    let td = with_temp_root();
    let engine = SetupEngine::new(JsonlSink, JsonlSink, td.path());

    let ops = vec![
        with_deps(file_ensure("a", "a.txt", "x"), &["b"]),
        with_deps(file_ensure("b", "b.txt", "x"), &["a"]),
    ];
    let plan = engine.plan(&ops, &engine.analyze(&ops));

    assert!(plan.warnings.iter().any(|w| w.contains("cycle")));
    assert_eq!(plan.stages.len(), 2);
    assert!(plan.stages.iter().all(|s| s.operations.len() == 1));
    // Declaration order preserved in the fallback.
    assert_eq!(plan.stages[0].operations[0].id(), "a");
    assert_eq!(plan.stages[1].operations[0].id(), "b");
}

#[test]
fn overall_risk_tracks_riskiest_operation() {
    let td = with_temp_root();
    let root = td.path();
    // An existing file makes delete moderate; the code op is moderate too;
    // a fresh create stays safe.
    std::fs::write(root.join("victim.txt"), "bytes").unwrap();
    let engine = SetupEngine::new(JsonlSink, JsonlSink, root);

    let ops = vec![
        file_ensure("create", "new.txt", "x"),
        crate::common::file_delete("remove", "victim.txt"),
        code_op("patch", "src/a.ts"),
    ];
    let analysis = engine.analyze(&ops);
    assert_eq!(analysis["create"].risk, Risk::Safe);
    assert_eq!(analysis["remove"].risk, Risk::Moderate);

    let plan = engine.plan(&ops, &analysis);
    assert_eq!(plan.risks.overall, Risk::Moderate);
    assert_eq!(
        plan.risks.overall,
        plan.risks.by_operation.values().copied().max().unwrap()
    );
}

#[test]
fn single_parallel_stage_for_independent_ops() {
    let td = with_temp_root();
    let engine = SetupEngine::new(JsonlSink, JsonlSink, td.path());

    let ops = vec![
        file_ensure("a", "a.txt", "x"),
        file_ensure("b", "b.txt", "x"),
        file_ensure("c", "c.txt", "x"),
    ];
    let plan = engine.plan(&ops, &engine.analyze(&ops));
    assert_eq!(plan.stages.len(), 1);
    assert!(plan.stages[0].parallel, "advisory flag set for >= 2 ops");
}
