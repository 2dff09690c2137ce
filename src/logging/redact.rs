use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::types::plan::ApplyMode;

pub const TS_ZERO: &str = "1970-01-01T00:00:00Z";

pub fn now_iso() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| TS_ZERO.to_string())
}

/// Timestamp for facts emission: constant zero in dry-run so event streams
/// are byte-comparable, real time in commit.
pub fn ts_for_mode(mode: ApplyMode) -> String {
    match mode {
        ApplyMode::DryRun => TS_ZERO.to_string(),
        ApplyMode::Commit => now_iso(),
    }
}

/// Redact a fact for deterministic comparison: zero the timestamp, drop
/// volatile timings, mask artifact paths that embed wall-clock millis.
pub fn redact_event(mut v: Value) -> Value {
    if let Some(obj) = v.as_object_mut() {
        obj.insert("ts".into(), Value::String(TS_ZERO.to_string()));
        obj.remove("duration_ms");
        if obj.contains_key("backup_path") {
            obj.insert("backup_path".into(), Value::String("***".into()));
        }
        if obj.contains_key("log_path") {
            obj.insert("log_path".into(), Value::String("***".into()));
        }
    }
    v
}
