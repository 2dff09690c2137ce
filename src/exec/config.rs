//! Config applier: JSON-Pointer merge/set/unset against a JSON document,
//! written back pretty-printed with a trailing newline.

use std::path::Path;

use serde_json::Value;

use crate::fs::backup::create_backup;
use crate::fs::jsonio;
use crate::json::merge::merge;
use crate::json::pointer::decode_pointer;
use crate::registry::{ExecCtx, ExecOutcome};
use crate::types::errors::{Error, Result};
use crate::types::op::{ConfigAction, ConfigOp, OperationMetadata};
use crate::types::safepath::SafePath;

use super::rollback::MutationLog;

pub(crate) fn apply_config(
    op: &ConfigOp,
    metadata: &OperationMetadata,
    ctx: &ExecCtx<'_>,
    mutations: &mut MutationLog,
) -> Result<ExecOutcome> {
    let safe = SafePath::from_rooted(ctx.workspace_root, Path::new(&op.path))?;
    let target = safe.as_path();
    let existed = target.exists();

    let before = jsonio::read_json_or_empty(&target)?;
    let tokens = decode_pointer(&op.pointer)?;
    let after = apply_value(&before, &tokens, op)?;

    if after == before {
        return Ok(ExecOutcome::unchanged());
    }

    let backup = if existed {
        Some(
            create_backup(&target, ctx.backup_dir, &metadata.id, safe.rel())
                .map_err(|e| Error::io(&target, &e))?,
        )
    } else {
        None
    };
    jsonio::write_json_pretty(&target, &after)?;
    mutations.record(target, backup.clone(), existed);
    Ok(ExecOutcome::changed(backup))
}

/// Pure document transform for one config operation.
fn apply_value(doc: &Value, tokens: &[String], op: &ConfigOp) -> Result<Value> {
    if tokens.is_empty() {
        // Root set/unset are no-ops (surfaced as plan warnings); a root merge
        // with an object merges into the whole document.
        return match (op.action, &op.value) {
            (ConfigAction::Merge, Some(v)) if v.is_object() => {
                Ok(merge(doc, v, op.strategy))
            }
            _ => Ok(doc.clone()),
        };
    }

    let mut next = doc.clone();
    let (last, parents) = tokens.split_last().expect("tokens non-empty");

    let mut cursor = &mut next;
    for seg in parents {
        if op.action == ConfigAction::Unset {
            // Unset never creates structure; a missing parent means nothing
            // to remove.
            match cursor.get_mut(seg) {
                Some(child) if child.is_object() => cursor = child,
                _ => return Ok(doc.clone()),
            }
            continue;
        }
        let map = ensure_object(cursor);
        let child = map
            .entry(seg.clone())
            .or_insert_with(|| Value::Object(serde_json::Map::new()));
        cursor = child;
    }

    match op.action {
        ConfigAction::Unset => {
            if let Some(map) = cursor.as_object_mut() {
                map.remove(last);
            }
        }
        ConfigAction::Set => {
            let value = op.value.clone().unwrap_or(Value::Null);
            ensure_object(cursor).insert(last.clone(), value);
        }
        ConfigAction::Merge => {
            let incoming = op.value.clone().unwrap_or(Value::Null);
            let map = ensure_object(cursor);
            let merged = match map.get(last) {
                Some(existing) => merge(existing, &incoming, op.strategy),
                None => incoming,
            };
            map.insert(last.clone(), merged);
        }
    }
    Ok(next)
}

/// Make `cursor` an object, replacing a scalar or array in place when a
/// write walks through it.
fn ensure_object(cursor: &mut Value) -> &mut serde_json::Map<String, Value> {
    if !cursor.is_object() {
        *cursor = Value::Object(serde_json::Map::new());
    }
    cursor.as_object_mut().expect("just ensured object")
}
