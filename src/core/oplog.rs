//! Append-only, bounded, persisted operation log
//!
//! Entries are kept newest-first, capped at [`MAX_LOG_ENTRIES`], and written
//! through the storage backend on every append. The log is also the undo
//! source: entries carrying a `beforeState` snapshot can be consumed once by
//! an undo, which flips their `undone` flag.
//!
//! A failure to persist the log itself is never fatal: the entry stays in
//! memory and a warning is recorded for the caller to display.

use chrono::Utc;
use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::core::identity::LogId;
use crate::entities::category::Category;
use crate::entities::log_entry::{LogEntry, OperationKind, RawLogEntry};
use crate::storage::{keys, StorageBackend, StorageError};

/// Only the most recent entries are retained
pub const MAX_LOG_ENTRIES: usize = 500;

/// Errors raised by log-store operations
#[derive(Debug, Error)]
pub enum OplogError {
    #[error("no log entries to export")]
    Empty,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// The persisted action journal
pub struct OperationLogStore<B: StorageBackend> {
    logs: Vec<LogEntry>,
    backend: B,
    warnings: Vec<String>,
}

impl<B: StorageBackend> OperationLogStore<B> {
    /// Load the log from storage
    ///
    /// A missing blob yields an empty log; an unparsable blob yields an
    /// empty log plus a warning string (accepted data-loss path, never
    /// silent). Entries persisted by older versions are normalized on the
    /// way in.
    pub fn load(backend: B) -> (Self, Option<String>) {
        let (logs, warning) = match backend.get(keys::OPERATION_LOG) {
            Ok(Some(blob)) => match serde_json::from_str::<Vec<RawLogEntry>>(&blob) {
                Ok(raw) => (raw.into_iter().map(LogEntry::from).collect(), None),
                Err(e) => (
                    Vec::new(),
                    Some(format!("operation log is corrupt and was reset: {}", e)),
                ),
            },
            Ok(None) => (Vec::new(), None),
            Err(e) => (
                Vec::new(),
                Some(format!("operation log could not be read: {}", e)),
            ),
        };

        (
            Self {
                logs,
                backend,
                warnings: Vec::new(),
            },
            warning,
        )
    }

    /// Append an entry at the head, truncate to the cap, persist
    pub fn log(
        &mut self,
        kind: OperationKind,
        action: impl Into<String>,
        details: Option<JsonValue>,
        before_state: Option<Vec<Category>>,
        undoable: bool,
    ) -> LogId {
        let entry = LogEntry {
            id: LogId::generate(),
            timestamp: Utc::now(),
            kind,
            action: action.into(),
            details,
            before_state,
            undoable,
            undone: false,
        };
        let id = entry.id.clone();

        self.logs.insert(0, entry);
        self.logs.truncate(MAX_LOG_ENTRIES);
        self.persist();
        id
    }

    /// All entries, newest first
    pub fn entries(&self) -> &[LogEntry] {
        &self.logs
    }

    /// Find an entry by id
    pub fn get(&self, id: &LogId) -> Option<&LogEntry> {
        self.logs.iter().find(|l| &l.id == id)
    }

    /// Number of entries
    pub fn log_count(&self) -> usize {
        self.logs.len()
    }

    /// Number of entries an undo could consume right now
    pub fn undoable_count(&self) -> usize {
        self.logs.iter().filter(|l| l.is_undoable_now()).count()
    }

    /// Newest entry that an undo could consume, if any
    pub fn get_latest_undoable_log(&self) -> Option<&LogEntry> {
        self.logs.iter().find(|l| l.is_undoable_now())
    }

    /// Flip the `undone` flag on a located entry and re-persist
    ///
    /// Returns false when no entry has the given id.
    pub fn mark_as_undone(&mut self, id: &LogId) -> bool {
        match self.logs.iter_mut().find(|l| &l.id == id) {
            Some(entry) => {
                entry.undone = true;
                self.persist();
                true
            }
            None => false,
        }
    }

    /// Empty the list and remove the persisted blob
    pub fn clear_logs(&mut self) -> Result<(), OplogError> {
        self.logs.clear();
        self.backend.remove(keys::OPERATION_LOG)?;
        Ok(())
    }

    /// Serialize the full list for export, then log the export itself
    ///
    /// The export entry is appended after serialization, so it is not part
    /// of the exported document.
    pub fn export_logs(&mut self) -> Result<String, OplogError> {
        if self.logs.is_empty() {
            return Err(OplogError::Empty);
        }
        let json = serde_json::to_string_pretty(&self.logs)
            .expect("log entries always serialize");
        let count = self.logs.len();
        self.log(
            OperationKind::Export,
            "Exported operation log",
            Some(serde_json::json!({ "count": count })),
            None,
            true,
        );
        Ok(json)
    }

    /// Warnings accumulated from non-fatal persistence failures
    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }

    fn persist(&mut self) {
        let json =
            serde_json::to_string(&self.logs).expect("log entries always serialize");
        if let Err(e) = self.backend.set(keys::OPERATION_LOG, &json) {
            self.warnings
                .push(format!("operation log could not be saved: {}", e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryBackend;

    fn empty_store() -> OperationLogStore<MemoryBackend> {
        OperationLogStore::load(MemoryBackend::new()).0
    }

    #[test]
    fn test_log_prepends_newest_first() {
        let mut store = empty_store();
        store.log(OperationKind::Add, "first", None, None, true);
        store.log(OperationKind::Add, "second", None, None, true);
        assert_eq!(store.entries()[0].action, "second");
        assert_eq!(store.entries()[1].action, "first");
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let mut store = empty_store();
        for i in 0..=MAX_LOG_ENTRIES {
            store.log(OperationKind::Add, format!("entry {}", i), None, None, true);
        }
        assert_eq!(store.log_count(), MAX_LOG_ENTRIES);
        // Newest survives, the very first entry was evicted
        assert_eq!(store.entries()[0].action, format!("entry {}", MAX_LOG_ENTRIES));
        assert!(store.entries().iter().all(|l| l.action != "entry 0"));
    }

    #[test]
    fn test_persisted_on_every_append() {
        let backend = MemoryBackend::new();
        let (mut store, _) = OperationLogStore::load(backend.clone());
        store.log(OperationKind::Add, "x", None, None, true);

        let blob = backend.get(keys::OPERATION_LOG).unwrap().unwrap();
        let reloaded: Vec<LogEntry> = serde_json::from_str::<Vec<RawLogEntry>>(&blob)
            .unwrap()
            .into_iter()
            .map(LogEntry::from)
            .collect();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded[0].action, "x");
    }

    #[test]
    fn test_reload_roundtrip() {
        let backend = MemoryBackend::new();
        let (mut store, _) = OperationLogStore::load(backend.clone());
        store.log(OperationKind::Delete, "Deleted category", None, Some(Vec::new()), true);

        let (reloaded, warning) = OperationLogStore::load(backend);
        assert!(warning.is_none());
        assert_eq!(reloaded.log_count(), 1);
        assert!(reloaded.entries()[0].is_undoable_now());
    }

    #[test]
    fn test_corrupt_blob_resets_with_warning() {
        let backend = MemoryBackend::new();
        backend.set(keys::OPERATION_LOG, "not json").unwrap();

        let (store, warning) = OperationLogStore::load(backend);
        assert_eq!(store.log_count(), 0);
        assert!(warning.unwrap().contains("corrupt"));
    }

    #[test]
    fn test_latest_undoable_skips_undone_and_snapshotless() {
        let mut store = empty_store();
        store.log(OperationKind::Add, "with snapshot", None, Some(Vec::new()), true);
        let undone = store.log(OperationKind::Add, "already undone", None, Some(Vec::new()), true);
        store.log(OperationKind::Export, "no snapshot", None, None, true);
        assert!(store.mark_as_undone(&undone));

        let latest = store.get_latest_undoable_log().unwrap();
        assert_eq!(latest.action, "with snapshot");
        assert_eq!(store.undoable_count(), 1);
    }

    #[test]
    fn test_mark_as_undone_unknown_id() {
        let mut store = empty_store();
        assert!(!store.mark_as_undone(&LogId::from_raw("LOG-MISSING")));
    }

    #[test]
    fn test_export_empty_fails() {
        let mut store = empty_store();
        assert!(matches!(store.export_logs(), Err(OplogError::Empty)));
    }

    #[test]
    fn test_export_excludes_its_own_entry_and_logs_it() {
        let mut store = empty_store();
        store.log(OperationKind::Add, "x", None, None, true);

        let json = store.export_logs().unwrap();
        assert!(!json.contains("Exported operation log"));
        assert_eq!(store.entries()[0].kind, OperationKind::Export);
    }

    #[test]
    fn test_clear_removes_blob() {
        let backend = MemoryBackend::new();
        let (mut store, _) = OperationLogStore::load(backend.clone());
        store.log(OperationKind::Add, "x", None, None, true);
        store.clear_logs().unwrap();

        assert_eq!(store.log_count(), 0);
        assert!(backend.get(keys::OPERATION_LOG).unwrap().is_none());
    }

    #[test]
    fn test_persist_failure_is_nonfatal_warning() {
        let backend = MemoryBackend::with_capacity(4);
        let (mut store, _) = OperationLogStore::load(backend);
        store.log(OperationKind::Add, "a long enough action", None, None, true);

        // Entry is in memory even though the write was rejected
        assert_eq!(store.log_count(), 1);
        let warnings = store.take_warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("could not be saved"));
    }
}
