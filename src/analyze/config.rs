//! Built-in analysis for `config` operations.

use std::path::Path;

use serde_json::{json, Value};

use crate::fs::jsonio;
use crate::json::merge::is_deep_subset;
use crate::json::pointer;
use crate::types::analysis::{AnalysisResult, Conflict, ConflictKind, Risk};
use crate::types::op::{ConfigAction, ConfigOp};
use crate::types::safepath::SafePath;

pub(crate) fn analyze_config(op: &ConfigOp, workspace_root: &Path) -> AnalysisResult {
    let target = match SafePath::from_rooted(workspace_root, Path::new(&op.path)) {
        Ok(sp) => sp.as_path(),
        Err(e) => {
            return AnalysisResult::needed(Risk::High).with_conflict(
                Conflict::new(ConflictKind::Permission, &op.path)
                    .with_actual(json!(e.to_string()))
                    .with_suggestion("use a path inside the workspace root"),
            )
        }
    };

    let doc = match jsonio::read_json(&target) {
        Ok(Some(doc)) => doc,
        Ok(None) => {
            // Missing file: nothing to unset; everything else creates it.
            return if op.action == ConfigAction::Unset {
                AnalysisResult::not_needed()
            } else {
                AnalysisResult::needed(Risk::Safe)
            };
        }
        Err(_) => {
            return AnalysisResult::needed(Risk::Moderate).with_conflict(
                Conflict::new(ConflictKind::Incompatible, &op.path)
                    .with_actual(json!("invalid-json")),
            )
        }
    };

    let tokens = match pointer::decode_pointer(&op.pointer) {
        Ok(t) => t,
        Err(e) => {
            return AnalysisResult::needed(Risk::Moderate).with_conflict(
                Conflict::new(ConflictKind::Incompatible, &op.path)
                    .with_actual(json!(e.to_string())),
            )
        }
    };
    let current = pointer::lookup(&doc, &tokens).cloned();

    let needed = match op.action {
        ConfigAction::Unset => current.is_some(),
        ConfigAction::Set => current.as_ref() != op.value.as_ref(),
        ConfigAction::Merge => match &op.value {
            Some(v) if v.is_object() => match &current {
                Some(cur) => !is_deep_subset(v, cur),
                None => true,
            },
            // Non-object merge behaves like set.
            other => current.as_ref() != other.as_ref(),
        },
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
