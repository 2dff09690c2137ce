//! Built-in analysis for `script` operations (manifest `scripts` entries).

use std::path::Path;

use serde_json::{json, Value};

use crate::fs::jsonio;
use crate::types::analysis::{AnalysisResult, Conflict, ConflictKind, Risk};
use crate::types::op::{ScriptAction, ScriptOp};
use crate::types::safepath::SafePath;

pub(crate) fn analyze_script(op: &ScriptOp, workspace_root: &Path) -> AnalysisResult {
    let manifest = match SafePath::from_rooted(workspace_root, Path::new(&op.file)) {
        Ok(sp) => sp.as_path(),
        Err(e) => {
            return AnalysisResult::needed(Risk::High).with_conflict(
                Conflict::new(ConflictKind::Permission, &op.file)
                    .with_actual(json!(e.to_string()))
                    .with_suggestion("use a path inside the workspace root"),
            )
        }
    };

    let doc = match jsonio::read_json(&manifest) {
        Ok(Some(doc)) => doc,
        Ok(None) => {
            return if op.action == ScriptAction::Delete {
                AnalysisResult::not_needed()
            } else {
                AnalysisResult::needed(Risk::Safe).with_conflict(
                    Conflict::new(ConflictKind::Missing, &op.file)
                        .with_suggestion(format!("create {} first", op.file)),
                )
            };
        }
        Err(_) => {
            return AnalysisResult::needed(Risk::Moderate).with_conflict(
                Conflict::new(ConflictKind::Incompatible, &op.file)
                    .with_actual(json!("invalid-json")),
            )
        }
    };

    let current = doc
        .get("scripts")
        .and_then(Value::as_object)
        .and_then(|s| s.get(&op.name))
        .cloned();

    let needed = match op.action {
        ScriptAction::Delete => current.is_some(),
        ScriptAction::Ensure | ScriptAction::Update => {
            current.as_ref().and_then(Value::as_str) != op.command.as_deref()
        }
    };

    let mut result = if needed {
        AnalysisResult::needed(Risk::Safe)
    } else {
        AnalysisResult::not_needed()
    };
    if let Some(cur) = current {
        result = result.with_current(cur);
    }
    result
}
