//! Structured facts and audit logging for the setup pipeline.

pub mod audit;
pub mod facts;
pub mod redact;

pub use audit::StageLogger;
pub use facts::{AuditSink, FactsEmitter, JsonlSink};
pub use redact::{now_iso, redact_event, ts_for_mode, TS_ZERO};
