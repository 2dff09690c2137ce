use log::Level;
use serde_json::Value;

/// Receives one structured fact per pipeline event.
pub trait FactsEmitter: std::fmt::Debug {
    fn emit(&self, subsystem: &str, event: &str, decision: &str, fields: Value);
}

/// Plain human-readable audit line sink.
pub trait AuditSink {
    fn log(&self, level: Level, msg: &str);
}

/// No-op sink; the default for embedders that bring their own telemetry.
#[derive(Default, Debug, Copy, Clone)]
pub struct JsonlSink;

impl FactsEmitter for JsonlSink {
    fn emit(&self, _subsystem: &str, _event: &str, _decision: &str, _fields: Value) {}
}

impl AuditSink for JsonlSink {
    fn log(&self, _level: Level, _msg: &str) {}
}
