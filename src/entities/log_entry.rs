//! Operation log entry entity

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::core::identity::LogId;
use crate::entities::category::Category;

/// The fixed set of logged operation kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Add,
    Edit,
    Delete,
    Toggle,
    Import,
    Export,
    Sort,
    Clear,
    Undo,
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationKind::Add => write!(f, "add"),
            OperationKind::Edit => write!(f, "edit"),
            OperationKind::Delete => write!(f, "delete"),
            OperationKind::Toggle => write!(f, "toggle"),
            OperationKind::Import => write!(f, "import"),
            OperationKind::Export => write!(f, "export"),
            OperationKind::Sort => write!(f, "sort"),
            OperationKind::Clear => write!(f, "clear"),
            OperationKind::Undo => write!(f, "undo"),
        }
    }
}

impl std::str::FromStr for OperationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "add" => Ok(OperationKind::Add),
            "edit" => Ok(OperationKind::Edit),
            "delete" => Ok(OperationKind::Delete),
            "toggle" => Ok(OperationKind::Toggle),
            "import" => Ok(OperationKind::Import),
            "export" => Ok(OperationKind::Export),
            "sort" => Ok(OperationKind::Sort),
            "clear" => Ok(OperationKind::Clear),
            "undo" => Ok(OperationKind::Undo),
            _ => Err(format!("Unknown operation kind: {}", s)),
        }
    }
}

/// One audit-trail entry
///
/// Entries are immutable once appended, except for the `undone` flag which
/// flips exactly once when an undo consumes the entry. `before_state` holds a
/// full snapshot of the category collection taken immediately before the
/// mutating operation; only entries carrying one can actually be undone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: LogId,

    pub timestamp: DateTime<Utc>,

    #[serde(rename = "type")]
    pub kind: OperationKind,

    /// Human-readable description of what happened
    pub action: String,

    /// Free-form structured payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<JsonValue>,

    /// Snapshot of the category collection before the mutation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before_state: Option<Vec<Category>>,

    pub undoable: bool,

    #[serde(default)]
    pub undone: bool,
}

impl LogEntry {
    /// Whether an undo could consume this entry right now
    pub fn is_undoable_now(&self) -> bool {
        self.undoable && !self.undone && self.before_state.is_some()
    }
}

/// Loose wire form for entries persisted by older versions
///
/// Early versions logged without `undoable`/`undone`/`beforeState`; on load
/// those entries are normalized: `undoable` defaults to whether a snapshot is
/// present, `undone` to false.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLogEntry {
    pub id: LogId,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: OperationKind,
    pub action: String,
    #[serde(default)]
    pub details: Option<JsonValue>,
    #[serde(default)]
    pub before_state: Option<Vec<Category>>,
    #[serde(default)]
    pub undoable: Option<bool>,
    #[serde(default)]
    pub undone: Option<bool>,
}

impl From<RawLogEntry> for LogEntry {
    fn from(raw: RawLogEntry) -> Self {
        let undoable = raw.undoable.unwrap_or(raw.before_state.is_some());
        Self {
            id: raw.id,
            timestamp: raw.timestamp,
            kind: raw.kind,
            action: raw.action,
            details: raw.details,
            before_state: raw.before_state,
            undoable,
            undone: raw.undone.unwrap_or(false),
        }
    }
}
