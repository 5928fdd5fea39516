//! The equipment store: category/item CRUD, undo, import, persistence
//!
//! The store exclusively owns the in-memory category collection. Every
//! mutating operation validates its input first, then appends one operation
//! log entry carrying a pre-mutation snapshot, applies the mutation, and
//! persists the full collection. Validation and not-found failures return
//! before anything is touched, so a failed operation leaves no trace.
//!
//! Undo is the snapshot-log variant: any log entry still carrying its
//! `beforeState` snapshot can be undone selectively, not just the most
//! recent one. Undoing restores the whole collection from the snapshot,
//! marks the entry consumed, and appends a non-undoable `undo` entry
//! referencing it.
//!
//! A storage failure during persistence is surfaced to the caller but the
//! in-memory mutation stays applied; there is no rollback and no retry.

use serde_json::{json, Value as JsonValue};
use std::collections::HashSet;
use thiserror::Error;

use crate::core::identity::{CategoryId, ItemId, LogId};
use crate::core::migrate::{
    fix_duplicate_item_ids, indices_are_contiguous, migrate_categories, reindex_items,
    MigrationReport, RawCategory,
};
use crate::core::oplog::OperationLogStore;
use crate::entities::category::{default_categories, Category};
use crate::entities::item::{Item, ItemDraft};
use crate::entities::log_entry::OperationKind;
use crate::entities::summary::Summary;
use crate::storage::{keys, StorageBackend, StorageError};

/// Errors raised by store operations
///
/// Validation and not-found variants are returned before any mutation;
/// `Storage` is returned after the mutation was applied in memory.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("category not found: {0}")]
    CategoryNotFound(CategoryId),

    #[error("item not found: {0}")]
    ItemNotFound(ItemId),

    #[error("value is unchanged")]
    Unchanged,

    #[error("new order must contain every existing category exactly once")]
    InvalidOrder,

    #[error("import payload must be a JSON array of categories: {0}")]
    InvalidImport(String),

    #[error("log entry not found: {0}")]
    LogNotFound(LogId),

    #[error("log entry cannot be undone: {0}")]
    NotUndoable(LogId),

    #[error("log entry was already undone: {0}")]
    AlreadyUndone(LogId),

    #[error("log entry has no state snapshot to restore: {0}")]
    MissingSnapshot(LogId),

    #[error("nothing to undo")]
    NothingToUndo,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// What an import replaced and repaired
#[derive(Debug)]
pub struct ImportOutcome {
    pub category_count: usize,
    pub item_count: usize,
    pub report: MigrationReport,
}

/// The equipment checklist store
pub struct EquipmentStore<B: StorageBackend> {
    categories: Vec<Category>,
    backend: B,
    oplog: OperationLogStore<B>,
}

impl<B: StorageBackend> EquipmentStore<B> {
    /// Load the checklist from storage, migrating it to the current schema
    ///
    /// Runs exactly once per process. A missing blob seeds the fixed default
    /// categories and persists them immediately; a corrupt blob resets to an
    /// empty collection with a warning in the report; a repaired blob is
    /// re-persisted right away.
    pub fn load(backend: B, oplog: OperationLogStore<B>) -> (Self, MigrationReport) {
        let mut report = MigrationReport::default();
        let mut persist_now = false;

        let categories = match backend.get(keys::CHECKLIST) {
            Ok(Some(blob)) => match serde_json::from_str::<Vec<RawCategory>>(&blob) {
                Ok(raw) => {
                    let (categories, migration) = migrate_categories(raw);
                    persist_now = migration.repaired();
                    report = migration;
                    categories
                }
                Err(e) => {
                    report
                        .warnings
                        .push(format!("checklist data is corrupt and was reset: {}", e));
                    Vec::new()
                }
            },
            Ok(None) => {
                persist_now = true;
                default_categories()
            }
            Err(e) => {
                report
                    .warnings
                    .push(format!("checklist data could not be read: {}", e));
                Vec::new()
            }
        };

        let mut store = Self {
            categories,
            backend,
            oplog,
        };
        if persist_now {
            if let Err(e) = store.persist() {
                report
                    .warnings
                    .push(format!("checklist data could not be saved: {}", e));
            }
        }
        (store, report)
    }

    /// The category collection in display order
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Aggregate totals over the current collection
    pub fn summary(&self) -> Summary {
        Summary::compute(&self.categories)
    }

    /// The operation log this store appends to
    pub fn oplog(&self) -> &OperationLogStore<B> {
        &self.oplog
    }

    /// Mutable access to the operation log (clear, export, warnings)
    pub fn oplog_mut(&mut self) -> &mut OperationLogStore<B> {
        &mut self.oplog
    }

    /// Find a category by id
    pub fn find_category(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| &c.id == id)
    }

    /// Find a category by exact name
    pub fn find_category_by_name(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    // ----- category operations ------------------------------------------

    /// Add a category with a fresh id and no items
    pub fn add_category(&mut self, name: &str, icon: &str) -> Result<CategoryId, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }

        let category = Category::new(name, icon);
        let id = category.id.clone();
        self.log_mutation(
            OperationKind::Add,
            format!("Added category: {}", name),
            json!({ "category": name }),
        );
        self.categories.push(category);
        self.persist()?;
        Ok(id)
    }

    /// Rename a category
    pub fn edit_category_name(
        &mut self,
        id: &CategoryId,
        new_name: &str,
    ) -> Result<(), StoreError> {
        let category = self
            .find_category(id)
            .ok_or_else(|| StoreError::CategoryNotFound(id.clone()))?;
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(StoreError::EmptyName);
        }
        if new_name == category.name {
            return Err(StoreError::Unchanged);
        }

        let old_name = category.name.clone();
        self.log_mutation(
            OperationKind::Edit,
            format!("Renamed category: {} → {}", old_name, new_name),
            json!({ "oldName": old_name, "newName": new_name }),
        );
        if let Some(category) = self.find_category_mut(id) {
            category.name = new_name.to_string();
        }
        self.persist()?;
        Ok(())
    }

    /// Change a category's icon
    pub fn edit_category_icon(
        &mut self,
        id: &CategoryId,
        new_icon: &str,
    ) -> Result<(), StoreError> {
        let category = self
            .find_category(id)
            .ok_or_else(|| StoreError::CategoryNotFound(id.clone()))?;
        let new_icon = new_icon.trim();
        if new_icon == category.icon {
            return Err(StoreError::Unchanged);
        }

        let old_icon = category.icon.clone();
        let name = category.name.clone();
        self.log_mutation(
            OperationKind::Edit,
            format!("Changed icon of category: {}", name),
            json!({ "category": name, "oldIcon": old_icon, "newIcon": new_icon }),
        );
        if let Some(category) = self.find_category_mut(id) {
            category.icon = new_icon.to_string();
        }
        self.persist()?;
        Ok(())
    }

    /// Remove a category and all of its items, returning the removed category
    pub fn delete_category(&mut self, id: &CategoryId) -> Result<Category, StoreError> {
        let position = self
            .categories
            .iter()
            .position(|c| &c.id == id)
            .ok_or_else(|| StoreError::CategoryNotFound(id.clone()))?;

        let name = self.categories[position].name.clone();
        let item_count = self.categories[position].items.len();
        self.log_mutation(
            OperationKind::Delete,
            format!("Deleted category: {}", name),
            json!({ "category": name, "itemCount": item_count }),
        );
        let removed = self.categories.remove(position);
        self.persist()?;
        Ok(removed)
    }

    /// Flip a category's collapsed flag; pure UI state, never logged
    pub fn toggle_category_collapse(&mut self, id: &CategoryId) -> Result<bool, StoreError> {
        let category = self
            .find_category_mut(id)
            .ok_or_else(|| StoreError::CategoryNotFound(id.clone()))?;
        category.collapsed = !category.collapsed;
        let collapsed = category.collapsed;
        self.persist()?;
        Ok(collapsed)
    }

    /// Replace the display order with the given permutation of category ids
    pub fn update_categories_order(&mut self, order: &[CategoryId]) -> Result<(), StoreError> {
        if order.len() != self.categories.len() {
            return Err(StoreError::InvalidOrder);
        }
        let mut seen = HashSet::new();
        for id in order {
            if !seen.insert(id) || self.find_category(id).is_none() {
                return Err(StoreError::InvalidOrder);
            }
        }

        let names: Vec<String> = order
            .iter()
            .filter_map(|id| self.find_category(id).map(|c| c.name.clone()))
            .collect();
        self.log_mutation(
            OperationKind::Sort,
            "Reordered categories",
            json!({ "categories": names.join("、") }),
        );

        let mut remaining = std::mem::take(&mut self.categories);
        let mut reordered = Vec::with_capacity(remaining.len());
        for id in order {
            // Validated above; every id locates exactly one category
            if let Some(position) = remaining.iter().position(|c| &c.id == id) {
                reordered.push(remaining.remove(position));
            }
        }
        self.categories = reordered;
        self.persist()?;
        Ok(())
    }

    /// Find a category by name, creating (and logging) it when absent
    pub fn get_or_create_category(
        &mut self,
        name: &str,
        icon: &str,
    ) -> Result<CategoryId, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }
        if let Some(category) = self.find_category_by_name(name) {
            return Ok(category.id.clone());
        }

        let category = Category::new(name, icon);
        let id = category.id.clone();
        self.log_mutation(
            OperationKind::Add,
            format!("Created category automatically: {}", name),
            json!({ "category": name }),
        );
        self.categories.push(category);
        self.persist()?;
        Ok(id)
    }

    // ----- item operations ----------------------------------------------

    /// Append an item to a category, assigning the next free index
    pub fn add_item(
        &mut self,
        category_id: &CategoryId,
        draft: ItemDraft,
    ) -> Result<ItemId, StoreError> {
        let category = self
            .find_category(category_id)
            .ok_or_else(|| StoreError::CategoryNotFound(category_id.clone()))?;
        if draft.name.trim().is_empty() {
            return Err(StoreError::EmptyName);
        }

        let category_name = category.name.clone();
        let item = Item::from_draft(draft, category.max_index() + 1);
        let id = item.id.clone();
        self.log_mutation(
            OperationKind::Add,
            format!("Added item #{}: {}", item.index, item.name),
            json!({
                "category": category_name,
                "item": item.name,
                "index": item.index,
                "quantity": format!("{}{}", item.quantity, item.quantity_unit),
                "weight": format!("{}{}", item.weight, item.weight_unit),
                "price": format!("{}{}", item.price, item.price_unit),
            }),
        );
        if let Some(category) = self.find_category_mut(category_id) {
            category.items.push(item);
        }
        self.persist()?;
        Ok(id)
    }

    /// Overwrite an item's mutable fields, preserving its id and index
    pub fn edit_item(
        &mut self,
        category_id: &CategoryId,
        item_id: &ItemId,
        draft: ItemDraft,
    ) -> Result<(), StoreError> {
        let category = self
            .find_category(category_id)
            .ok_or_else(|| StoreError::CategoryNotFound(category_id.clone()))?;
        let item = category
            .find_item(item_id)
            .ok_or_else(|| StoreError::ItemNotFound(item_id.clone()))?;
        if draft.name.trim().is_empty() {
            return Err(StoreError::EmptyName);
        }

        let category_name = category.name.clone();
        let old_name = item.name.clone();
        let new_name = draft.name.trim().to_string();
        self.log_mutation(
            OperationKind::Edit,
            format!("Edited item: {} → {}", old_name, new_name),
            json!({ "category": category_name, "oldName": old_name, "newName": new_name }),
        );
        if let Some(item) = self
            .find_category_mut(category_id)
            .and_then(|c| c.find_item_mut(item_id))
        {
            item.apply_draft(draft);
        }
        self.persist()?;
        Ok(())
    }

    /// Remove an item and close the index gap it leaves
    pub fn delete_item(
        &mut self,
        category_id: &CategoryId,
        item_id: &ItemId,
    ) -> Result<Item, StoreError> {
        let category = self
            .find_category(category_id)
            .ok_or_else(|| StoreError::CategoryNotFound(category_id.clone()))?;
        let item = category
            .find_item(item_id)
            .ok_or_else(|| StoreError::ItemNotFound(item_id.clone()))?;

        let category_name = category.name.clone();
        let action = format!("Deleted item #{}: {}", item.index, item.name);
        let details = json!({
            "category": category_name,
            "item": item.name,
            "index": item.index,
        });
        self.log_mutation(OperationKind::Delete, action, details);

        let mut removed = None;
        if let Some(category) = self.find_category_mut(category_id) {
            if let Some(position) = category.items.iter().position(|i| &i.id == item_id) {
                removed = Some(category.items.remove(position));
            }
            reindex_items(category);
        }
        self.persist()?;
        removed.ok_or_else(|| StoreError::ItemNotFound(item_id.clone()))
    }

    /// Flip an item's completed flag, returning the new state
    pub fn toggle_item(
        &mut self,
        category_id: &CategoryId,
        item_id: &ItemId,
    ) -> Result<bool, StoreError> {
        let category = self
            .find_category(category_id)
            .ok_or_else(|| StoreError::CategoryNotFound(category_id.clone()))?;
        let item = category
            .find_item(item_id)
            .ok_or_else(|| StoreError::ItemNotFound(item_id.clone()))?;

        let completed = !item.completed;
        let category_name = category.name.clone();
        let item_name = item.name.clone();
        self.log_mutation(
            OperationKind::Toggle,
            format!(
                "{}: {}",
                if completed {
                    "Marked as packed"
                } else {
                    "Marked as unpacked"
                },
                item_name
            ),
            json!({ "category": category_name, "item": item_name, "completed": completed }),
        );
        if let Some(item) = self
            .find_category_mut(category_id)
            .and_then(|c| c.find_item_mut(item_id))
        {
            item.completed = completed;
        }
        self.persist()?;
        Ok(completed)
    }

    // ----- whole-collection operations ----------------------------------

    /// Replace the collection with an imported payload
    ///
    /// The payload must be a JSON array of category-shaped records; it is
    /// normalized by the migration engine, so foreign, partial, or
    /// duplicate-id data comes out satisfying every invariant.
    pub fn import_data(&mut self, payload: JsonValue) -> Result<ImportOutcome, StoreError> {
        if !payload.is_array() {
            return Err(StoreError::InvalidImport(
                "payload is not an array".to_string(),
            ));
        }
        let raw: Vec<RawCategory> = serde_json::from_value(payload)
            .map_err(|e| StoreError::InvalidImport(e.to_string()))?;

        let (categories, report) = migrate_categories(raw);
        let old_count = self.categories.len();
        let item_count: usize = categories.iter().map(|c| c.items.len()).sum();
        self.log_mutation(
            OperationKind::Import,
            "Imported checklist data",
            json!({
                "oldCategories": old_count,
                "newCategories": categories.len(),
                "totalItems": item_count,
            }),
        );
        let category_count = categories.len();
        self.categories = categories;
        self.persist()?;
        Ok(ImportOutcome {
            category_count,
            item_count,
            report,
        })
    }

    /// Remove every category and item, returning the removed counts
    pub fn clear_all_data(&mut self) -> Result<(usize, usize), StoreError> {
        let category_count = self.categories.len();
        let item_count: usize = self.categories.iter().map(|c| c.items.len()).sum();
        self.log_mutation(
            OperationKind::Clear,
            "Cleared all checklist data",
            json!({ "deletedCategories": category_count, "deletedItems": item_count }),
        );
        self.categories.clear();
        self.persist()?;
        Ok((category_count, item_count))
    }

    // ----- standalone repairs -------------------------------------------

    /// Rebuild a category's indices from current item order
    pub fn reindex_category(&mut self, id: &CategoryId) -> Result<(), StoreError> {
        let category = self
            .find_category_mut(id)
            .ok_or_else(|| StoreError::CategoryNotFound(id.clone()))?;
        reindex_items(category);
        self.persist()?;
        Ok(())
    }

    /// Re-mint duplicate item ids within a category, returning the fix count
    pub fn fix_duplicate_ids(&mut self, id: &CategoryId) -> Result<usize, StoreError> {
        let category = self
            .find_category_mut(id)
            .ok_or_else(|| StoreError::CategoryNotFound(id.clone()))?;
        let mut warnings = Vec::new();
        let fixed = fix_duplicate_item_ids(category, &mut warnings);
        if fixed > 0 {
            self.persist()?;
        }
        Ok(fixed)
    }

    /// Re-apply re-indexing and duplicate-id repair across every category
    pub fn repair_all(&mut self) -> Result<MigrationReport, StoreError> {
        let mut report = MigrationReport::default();
        for category in &mut self.categories {
            if !indices_are_contiguous(&category.items) {
                reindex_items(category);
                report.reindexed_categories += 1;
            }
            report.duplicate_ids_fixed += fix_duplicate_item_ids(category, &mut report.warnings);
        }
        if report.repaired() {
            self.persist()?;
        }
        Ok(report)
    }

    // ----- undo ----------------------------------------------------------

    /// Whether any operation can currently be undone
    pub fn can_undo(&self) -> bool {
        self.oplog.get_latest_undoable_log().is_some()
    }

    /// Restore the collection from a specific log entry's snapshot
    ///
    /// Marks the entry consumed and appends a non-undoable `undo` entry
    /// referencing it. Returns the undone entry's action description.
    pub fn undo(&mut self, log_id: &LogId) -> Result<String, StoreError> {
        let entry = self
            .oplog
            .get(log_id)
            .ok_or_else(|| StoreError::LogNotFound(log_id.clone()))?;
        if !entry.undoable {
            return Err(StoreError::NotUndoable(log_id.clone()));
        }
        if entry.undone {
            return Err(StoreError::AlreadyUndone(log_id.clone()));
        }
        let snapshot = entry
            .before_state
            .clone()
            .ok_or_else(|| StoreError::MissingSnapshot(log_id.clone()))?;
        let action = entry.action.clone();

        self.categories = snapshot;
        self.persist()?;
        self.oplog.mark_as_undone(log_id);
        self.oplog.log(
            OperationKind::Undo,
            format!("Undid operation: {}", action),
            Some(json!({ "logId": log_id.as_str(), "action": action })),
            None,
            false,
        );
        Ok(action)
    }

    /// Undo the most recent eligible operation
    pub fn quick_undo(&mut self) -> Result<String, StoreError> {
        let log_id = self
            .oplog
            .get_latest_undoable_log()
            .map(|entry| entry.id.clone())
            .ok_or(StoreError::NothingToUndo)?;
        self.undo(&log_id)
    }

    // ----- internals ------------------------------------------------------

    fn find_category_mut(&mut self, id: &CategoryId) -> Option<&mut Category> {
        self.categories.iter_mut().find(|c| &c.id == id)
    }

    /// Append a log entry carrying a pre-mutation snapshot
    fn log_mutation(&mut self, kind: OperationKind, action: impl Into<String>, details: JsonValue) {
        let before = self.categories.clone();
        self.oplog.log(kind, action, Some(details), Some(before), true);
    }

    fn persist(&self) -> Result<(), StorageError> {
        let json =
            serde_json::to_string(&self.categories).expect("categories always serialize");
        self.backend.set(keys::CHECKLIST, &json)
    }
}
