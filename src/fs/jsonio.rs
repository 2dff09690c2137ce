//! JSON document I/O with the engine's canonical on-disk form:
//! pretty-printed, trailing newline.

use std::path::Path;

use serde_json::Value;

use crate::types::errors::{Error, ErrorKind, Result};

/// Read a JSON document. A missing file yields `None`; an empty or
/// whitespace-only file yields `Some({})`; a parse failure is an
/// `InvalidJson` error naming the file.
pub fn read_json(path: &Path) -> Result<Option<Value>> {
    let raw = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(Error::io(path, &e)),
    };
    if raw.trim().is_empty() {
        return Ok(Some(Value::Object(serde_json::Map::new())));
    }
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|e| Error::new(ErrorKind::InvalidJson, format!("{}: {e}", path.display())))
}

/// Read a JSON document, treating a missing file as an empty object.
pub fn read_json_or_empty(path: &Path) -> Result<Value> {
    Ok(read_json(path)?.unwrap_or_else(|| Value::Object(serde_json::Map::new())))
}

/// Serialize `doc` pretty-printed with a trailing newline, creating parent
/// directories as needed.
pub fn write_json_pretty(path: &Path, doc: &Value) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, &e))?;
    }
    let mut text = serde_json::to_string_pretty(doc)
        .map_err(|e| Error::new(ErrorKind::InvalidJson, e.to_string()))?;
    text.push('\n');
    std::fs::write(path, text).map_err(|e| Error::io(path, &e))
}
