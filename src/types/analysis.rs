//! Analysis results: per-operation inspection of current workspace state.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Risk level of applying an operation. Ordered `Safe < Moderate < High`
/// so plan rollup can take a max.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Risk {
    #[default]
    Safe,
    Moderate,
    High,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictKind {
    Modified,
    Missing,
    Incompatible,
    Permission,
    Unknown,
}

/// A diagnosed mismatch between declared intent and observed state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    #[serde(rename = "type")]
    pub kind: ConflictKind,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Conflict {
    pub fn new(kind: ConflictKind, path: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            expected: None,
            actual: None,
            suggestion: None,
        }
    }

    pub fn with_actual(mut self, actual: Value) -> Self {
        self.actual = Some(actual);
        self
    }

    pub fn with_expected(mut self, expected: Value) -> Self {
        self.expected = Some(expected);
        self
    }

    pub fn with_suggestion(mut self, s: impl Into<String>) -> Self {
        self.suggestion = Some(s.into());
        self
    }
}

/// Outcome of analyzing one operation against the workspace.
///
/// `current` is a JSON representation of observed state: for files an
/// `{exists, size?, mode?, mtime?, content?}` object, for config the value at
/// the pointer, for scripts the current command.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub needed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conflicts: Vec<Conflict>,
    pub risk: Risk,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl AnalysisResult {
    /// Nothing to do; observed state already matches the declared target.
    pub fn not_needed() -> Self {
        Self {
            needed: false,
            risk: Risk::Safe,
            ..Self::default()
        }
    }

    pub fn needed(risk: Risk) -> Self {
        Self {
            needed: true,
            risk,
            ..Self::default()
        }
    }

    pub fn with_current(mut self, current: Value) -> Self {
        self.current = Some(current);
        self
    }

    pub fn with_conflict(mut self, conflict: Conflict) -> Self {
        self.conflicts.push(conflict);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}
