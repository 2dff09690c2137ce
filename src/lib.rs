#![forbid(unsafe_code)]
//! Groundwork: declarative, transactional workspace setup.
//!
//! Pipeline highlights:
//! - Operations (file / config / script) are analyzed against current disk state,
//!   staged by dependency order, and applied with per-operation backups.
//! - Every mutation is recorded in a change journal; the first failure triggers a
//!   reverse-order rollback that restores pre-run bytes.
//! - All mutating paths resolve through `SafePath`; anything escaping the
//!   workspace root is rejected before I/O.

pub mod constants;
pub mod analyze;
pub mod api;
pub mod exec;
pub mod fs;
pub mod json;
pub mod journal;
pub mod logging;
pub mod plan;
pub mod registry;
pub mod types;

pub use api::*;
