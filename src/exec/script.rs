//! Script applier: edits one entry of the `scripts` table in a JSON manifest.
//! Never executes anything.

use std::path::Path;

use serde_json::Value;

use crate::fs::backup::create_backup;
use crate::fs::jsonio;
use crate::registry::{ExecCtx, ExecOutcome};
use crate::types::errors::{Error, ErrorKind, Result};
use crate::types::op::{OperationMetadata, ScriptAction, ScriptConflictResolution, ScriptOp};
use crate::types::safepath::SafePath;

use super::rollback::MutationLog;

pub(crate) fn apply_script(
    op: &ScriptOp,
    metadata: &OperationMetadata,
    ctx: &ExecCtx<'_>,
    mutations: &mut MutationLog,
) -> Result<ExecOutcome> {
    let safe = SafePath::from_rooted(ctx.workspace_root, Path::new(&op.file))?;
    let target = safe.as_path();
    let existed = target.exists();

    let before = jsonio::read_json_or_empty(&target)?;
    let after = apply_entry(&before, op, ctx.auto_confirm)?;

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

fn apply_entry(doc: &Value, op: &ScriptOp, auto_confirm: bool) -> Result<Value> {
    let mut next = doc.clone();
    if !next.is_object() {
        return Err(Error::new(
            ErrorKind::InvalidJson,
            format!("{} is not a JSON object manifest", op.file),
        ));
    }

    if op.action == ScriptAction::Delete {
        if let Some(scripts) = next.get_mut("scripts").and_then(Value::as_object_mut) {
            scripts.remove(&op.name);
        }
        return Ok(next);
    }

    let command = op.command.as_deref().ok_or_else(|| {
        Error::new(
            ErrorKind::MissingContent,
            format!("script operation '{}' declares no command", op.name),
        )
    })?;

    let root = next.as_object_mut().expect("checked object above");
    let scripts = root
        .entry("scripts")
        .or_insert_with(|| Value::Object(serde_json::Map::new()));
    let scripts = match scripts.as_object_mut() {
        Some(s) => s,
        None => {
            return Err(Error::new(
                ErrorKind::InvalidJson,
                format!("'scripts' in {} is not an object", op.file),
            ))
        }
    };

    match scripts.get(&op.name).and_then(Value::as_str) {
        Some(existing) if existing != command => match op.conflict_resolution {
            ScriptConflictResolution::Keep => return Ok(doc.clone()),
            ScriptConflictResolution::Replace => {}
            ScriptConflictResolution::Prompt if auto_confirm => {}
            ScriptConflictResolution::Prompt => {
                return Err(Error::new(
                    ErrorKind::ScriptConflict,
                    format!(
                        "script '{}' already set to '{existing}'; re-run with auto-confirm or set conflictResolution to 'replace' or 'keep'",
                        op.name
                    ),
                ))
            }
        },
        _ => {}
    }

    scripts.insert(op.name.clone(), Value::String(command.to_string()));
    Ok(next)
}
