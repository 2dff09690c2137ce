//! Content resolution for file operations.
//!
//! Resolution order: inline `content` under the declared encoding, then the
//! `rawContentBase64` annotation, then a rendered template. No source at all
//! is a `MissingContent` error.

use std::path::Path;

use base64::Engine as _;
use serde_json::Value;

use crate::types::errors::{Error, ErrorKind, Result};
use crate::types::op::{Encoding, FileOp, OperationMetadata, TemplateSpec, RAW_CONTENT_ANNOTATION};

pub(crate) fn resolve_file_bytes(
    op: &FileOp,
    metadata: &OperationMetadata,
    workspace_root: &Path,
) -> Result<Vec<u8>> {
    if let Some(content) = &op.content {
        return decode_content(content, op.encoding.unwrap_or_default());
    }
    if let Some(raw) = metadata
        .annotations
        .get(RAW_CONTENT_ANNOTATION)
        .and_then(Value::as_str)
    {
        return base64::engine::general_purpose::STANDARD
            .decode(raw)
            .map_err(|e| {
                Error::new(
                    ErrorKind::MissingContent,
                    format!("{RAW_CONTENT_ANNOTATION} annotation is not valid base64: {e}"),
                )
            });
    }
    if let Some(template) = &op.template {
        return render_template(template, workspace_root).map(String::into_bytes);
    }
    Err(Error::new(
        ErrorKind::MissingContent,
        format!(
            "file operation for '{}' declares no content, raw bytes, or template",
            op.path
        ),
    ))
}

fn decode_content(content: &str, encoding: Encoding) -> Result<Vec<u8>> {
    match encoding {
        Encoding::Utf8 => Ok(content.as_bytes().to_vec()),
        Encoding::Base64 => base64::engine::general_purpose::STANDARD
            .decode(content)
            .map_err(|e| {
                Error::new(
                    ErrorKind::MissingContent,
                    format!("inline content is not valid base64: {e}"),
                )
            }),
    }
}

/// Read the template source (absolute, or relative to the workspace root) and
/// substitute each `{{ key }}` occurrence. Unknown keys are left verbatim.
fn render_template(template: &TemplateSpec, workspace_root: &Path) -> Result<String> {
    let source = Path::new(&template.source);
    let source = if source.is_absolute() {
        source.to_path_buf()
    } else {
        workspace_root.join(source)
    };
    let text = std::fs::read_to_string(&source).map_err(|e| {
        Error::new(
            ErrorKind::MissingContent,
            format!("template source {}: {e}", source.display()),
        )
    })?;
    Ok(substitute(&text, template))
}

fn substitute(text: &str, template: &TemplateSpec) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];
        match after_open.find("}}") {
            Some(end) => {
                let key = after_open[..end].trim();
                match template.variables.get(key) {
                    Some(value) => out.push_str(&variable_text(value)),
                    None => out.push_str(&rest[start..start + 2 + end + 2]),
                }
                rest = &after_open[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                return out;
            }
        }
    }
    out.push_str(rest);
    out
}

fn variable_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
