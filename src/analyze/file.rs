//! Built-in analysis for `file` operations.

use std::path::Path;

use base64::Engine as _;
use serde_json::json;

use crate::fs::meta::{sha256_hex, stat_file};
use crate::types::analysis::{AnalysisResult, Conflict, ConflictKind, Risk};
use crate::types::op::{Encoding, FileAction, FileOp};
use crate::types::safepath::SafePath;

pub(crate) fn analyze_file(op: &FileOp, workspace_root: &Path) -> AnalysisResult {
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

    let stat = match stat_file(&target) {
        Some(st) => st,
        None => {
            return if op.action == FileAction::Delete {
                AnalysisResult::not_needed().with_note("already removed")
            } else {
                AnalysisResult::needed(Risk::Safe).with_current(json!({"exists": false}))
            };
        }
    };

    let bytes = match std::fs::read(&target) {
        Ok(b) => b,
        Err(e) => {
            return AnalysisResult::needed(Risk::Moderate).with_conflict(
                Conflict::new(ConflictKind::Unknown, &op.path).with_actual(json!(e.to_string())),
            )
        }
    };

    let encoding = op.encoding.unwrap_or_default();
    let current = json!({
        "exists": true,
        "size": stat.size,
        "mode": stat.mode,
        "mtime": stat.mtime,
        "content": render_content(&bytes, encoding),
    });

    if op.action == FileAction::Delete {
        return AnalysisResult::needed(Risk::Moderate).with_current(current);
    }

    // ensure / update
    if let Some(content) = &op.content {
        let declared = decode_declared(content, encoding);
        let mode_ok = op.mode.map_or(true, |m| m & 0o777 == stat.mode);
        if declared.as_deref() == Some(bytes.as_slice()) && mode_ok {
            return AnalysisResult::not_needed().with_current(current);
        }
    } else if let Some(checksum) = &op.checksum {
        if sha256_hex(&bytes).eq_ignore_ascii_case(checksum) {
            return AnalysisResult::not_needed().with_current(current);
        }
    }

    let mut result = AnalysisResult::needed(Risk::Moderate).with_current(current);
    if op.template.is_some() && op.content.is_none() {
        result = result.with_note("template content cannot be fully analyzed without rendering");
    }
    result
}

/// Decoded view of on-disk bytes under the declared encoding, for
/// `current.content`.
fn render_content(bytes: &[u8], encoding: Encoding) -> String {
    match encoding {
        Encoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
        Encoding::Base64 => base64::engine::general_purpose::STANDARD.encode(bytes),
    }
}

/// Bytes the operation declares, under its encoding. `None` when the inline
/// content is not decodable (a later apply would fail the same way).
fn decode_declared(content: &str, encoding: Encoding) -> Option<Vec<u8>> {
    match encoding {
        Encoding::Utf8 => Some(content.as_bytes().to_vec()),
        Encoding::Base64 => base64::engine::general_purpose::STANDARD
            .decode(content)
            .ok(),
    }
}
