//! Operation model: the declarative inputs to the setup pipeline.
//!
//! Operations are immutable once handed to the analyzer. The serialized form
//! is internally tagged by `kind` and uses camelCase field names so the
//! persisted journal log and any external tooling share one wire shape.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Annotation key carrying raw file bytes, base64-encoded, as an alternative
/// to inline `content`.
pub const RAW_CONTENT_ANNOTATION: &str = "rawContentBase64";

/// One declarative mutation of the workspace.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Operation {
    File(FileOp),
    Config(ConfigOp),
    Script(ScriptOp),
    /// Declared for completeness; the built-in executor rejects it as
    /// unsupported. A registry executor may claim it.
    Code(CodeOp),
}

impl Operation {
    /// The `kind` tag, as serialized.
    pub fn kind(&self) -> &'static str {
        match self {
            Operation::File(_) => "file",
            Operation::Config(_) => "config",
            Operation::Script(_) => "script",
            Operation::Code(_) => "code",
        }
    }

    /// Workspace-relative path this operation targets.
    pub fn target_path(&self) -> &str {
        match self {
            Operation::File(f) => &f.path,
            Operation::Config(c) => &c.path,
            Operation::Script(s) => &s.file,
            Operation::Code(c) => &c.path,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileAction {
    Ensure,
    Update,
    Delete,
}

/// Content encodings accepted for inline file content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Encoding {
    #[default]
    #[serde(rename = "utf-8", alias = "utf8")]
    Utf8,
    #[serde(rename = "base64")]
    Base64,
}

/// `{{ var }}` template reference: a source file plus substitution variables.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateSpec {
    /// Template file, absolute or workspace-relative.
    pub source: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub variables: BTreeMap<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileOp {
    pub action: FileAction,
    /// Workspace-relative target path.
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<TemplateSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<Encoding>,
    /// POSIX permission bits, masked to 0o777 on apply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<u32>,
    /// Expected sha-256 of the target content, lowercase hex.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigAction {
    Merge,
    Set,
    Unset,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeStrategy {
    Shallow,
    #[default]
    Deep,
    Replace,
}

/// Declared resolution preference for config conflicts. Carried on the
/// operation for callers and custom handlers; the built-in applier resolves
/// purely via `strategy`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigConflictResolution {
    Ours,
    #[default]
    Theirs,
    Prompt,
    Fail,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOp {
    pub action: ConfigAction,
    /// Workspace-relative path of a JSON document.
    pub path: String,
    /// RFC-6901 pointer into the document.
    pub pointer: String,
    /// Any JSON for merge/set; absent for unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default)]
    pub strategy: MergeStrategy,
    #[serde(default)]
    pub conflict_resolution: ConfigConflictResolution,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptAction {
    Ensure,
    Update,
    Delete,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptConflictResolution {
    Keep,
    #[default]
    Replace,
    Prompt,
}

/// Edits one entry of the `scripts` table in a JSON manifest
/// (typically `package.json`). Never runs anything.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptOp {
    pub action: ScriptAction,
    /// Workspace-relative manifest path.
    pub file: String,
    /// Script entry name.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default)]
    pub conflict_resolution: ScriptConflictResolution,
}

/// Source-code patch request. Present in the type system only; the core
/// executor fails it as unsupported.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeOp {
    pub path: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub patch: Value,
}

/// Per-operation metadata, always paired with the operation itself.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationMetadata {
    /// Unique within a single run.
    pub id: String,
    pub description: String,
    pub idempotent: bool,
    pub reversible: bool,
    /// Ids of operations that must run first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, Value>,
}

impl OperationMetadata {
    /// Minimal metadata: idempotent, reversible, no dependencies.
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            idempotent: true,
            reversible: true,
            dependencies: Vec::new(),
            tags: Vec::new(),
            annotations: BTreeMap::new(),
        }
    }

    pub fn with_dependencies(mut self, deps: Vec<String>) -> Self {
        self.dependencies = deps;
        self
    }
}

/// An operation paired with its metadata; the unit that flows through
/// analysis, staging, execution, and the journal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlannedOperation {
    pub operation: Operation,
    pub metadata: OperationMetadata,
}

impl PlannedOperation {
    pub fn new(operation: Operation, metadata: OperationMetadata) -> Self {
        Self {
            operation,
            metadata,
        }
    }

    pub fn id(&self) -> &str {
        &self.metadata.id
    }
}
