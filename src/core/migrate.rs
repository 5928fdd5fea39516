//! Migration and repair of persisted category collections
//!
//! Persisted blobs may predate the current schema, come from hand-edited
//! files, or carry duplicate item ids from an upstream bug. This module is
//! the validated-input boundary: loosely-typed raw records go in, a
//! collection satisfying every model invariant comes out, together with a
//! report of what had to be repaired. Repair never raises an error; the
//! caller decides whether to surface the report's warnings and whether to
//! re-persist.

use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::core::identity::{CategoryId, ItemId};
use crate::entities::category::{Category, PLACEHOLDER_ICON};
use crate::entities::item::{Item, Priority, DEFAULT_QUANTITY_UNIT};
use crate::entities::units::{PriceUnit, WeightUnit};

/// Loose wire form of a category
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCategory {
    /// May be missing or a non-string value in legacy data
    #[serde(default)]
    pub id: JsonValue,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub items: Vec<RawItem>,
    #[serde(default)]
    pub collapsed: bool,
}

/// Loose wire form of an item
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawItem {
    /// Legacy data used numeric ids; anything non-string is re-minted
    #[serde(default)]
    pub id: JsonValue,
    /// Missing or invalid indices trigger a re-index of the whole category
    #[serde(default)]
    pub index: JsonValue,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub quantity_unit: Option<String>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub weight_unit: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub price_unit: Option<String>,
    #[serde(default)]
    pub is_recommended: bool,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
}

/// What a migration pass had to repair
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MigrationReport {
    /// Categories whose item indices were rebuilt from array positions
    pub reindexed_categories: usize,
    /// Item ids re-minted because of a duplicate within their category
    pub duplicate_ids_fixed: usize,
    /// Ids minted for records that had none (or a non-string one)
    pub minted_ids: usize,
    /// Missing price/priceUnit fields filled with defaults
    pub defaulted_fields: usize,
    /// Warning-level diagnostics, for display by the caller
    pub warnings: Vec<String>,
}

impl MigrationReport {
    /// Whether anything was changed and the collection should be re-persisted
    pub fn repaired(&self) -> bool {
        self.reindexed_categories > 0
            || self.duplicate_ids_fixed > 0
            || self.minted_ids > 0
            || self.defaulted_fields > 0
    }
}

/// Normalize a raw collection into one satisfying every model invariant
pub fn migrate_categories(raw: Vec<RawCategory>) -> (Vec<Category>, MigrationReport) {
    let mut report = MigrationReport::default();

    let mut categories: Vec<Category> = raw
        .into_iter()
        .map(|rc| normalize_category(rc, &mut report))
        .collect();

    for category in &mut categories {
        if !indices_are_contiguous(&category.items) {
            reindex_items(category);
            report.reindexed_categories += 1;
        }
        let fixed = fix_duplicate_item_ids(category, &mut report.warnings);
        report.duplicate_ids_fixed += fixed;
    }

    (categories, report)
}

/// Assign `index = position + 1` over the current item order
pub fn reindex_items(category: &mut Category) {
    for (position, item) in category.items.iter_mut().enumerate() {
        item.index = position as u32 + 1;
    }
}

/// Whether item indices are exactly `[1..N]` in array order
pub fn indices_are_contiguous(items: &[Item]) -> bool {
    items
        .iter()
        .enumerate()
        .all(|(position, item)| item.index == position as u32 + 1)
}

/// Re-mint the id of every later duplicate within the category
///
/// Returns the number of ids repaired; one warning per repair is pushed to
/// `warnings`.
pub fn fix_duplicate_item_ids(category: &mut Category, warnings: &mut Vec<String>) -> usize {
    let mut seen = std::collections::HashSet::new();
    let mut fixed = 0;
    for item in &mut category.items {
        if !seen.insert(item.id.clone()) {
            let old = item.id.clone();
            item.id = ItemId::generate();
            seen.insert(item.id.clone());
            warnings.push(format!(
                "duplicate item id {} in category \"{}\" replaced with {} (item: {})",
                old, category.name, item.id, item.name
            ));
            fixed += 1;
        }
    }
    fixed
}

fn normalize_category(raw: RawCategory, report: &mut MigrationReport) -> Category {
    let id = match raw.id {
        JsonValue::String(s) if !s.trim().is_empty() => CategoryId::from_raw(s),
        _ => {
            report.minted_ids += 1;
            CategoryId::generate()
        }
    };

    let icon = match raw.icon {
        Some(icon) if !icon.trim().is_empty() => icon,
        _ => PLACEHOLDER_ICON.to_string(),
    };

    let items = raw
        .items
        .into_iter()
        .map(|ri| normalize_item(ri, report))
        .collect();

    Category {
        id,
        name: raw.name,
        icon,
        items,
        collapsed: raw.collapsed,
    }
}

fn normalize_item(raw: RawItem, report: &mut MigrationReport) -> Item {
    let id = match raw.id {
        JsonValue::String(s) if !s.trim().is_empty() => ItemId::from_raw(s),
        _ => {
            report.minted_ids += 1;
            ItemId::generate()
        }
    };

    // 0 marks an invalid index; the contiguity pass rebuilds the sequence
    let index = raw
        .index
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .filter(|&n| n >= 1)
        .unwrap_or(0);

    if raw.price.is_none() {
        report.defaulted_fields += 1;
    }
    if raw.price_unit.is_none() {
        report.defaulted_fields += 1;
    }

    Item {
        id,
        index,
        name: raw.name,
        completed: raw.completed,
        quantity: raw.quantity.unwrap_or(1.0),
        quantity_unit: raw
            .quantity_unit
            .unwrap_or_else(|| DEFAULT_QUANTITY_UNIT.to_string()),
        weight: raw.weight.unwrap_or(0.0),
        weight_unit: raw.weight_unit.map(WeightUnit::from).unwrap_or_default(),
        price: raw.price.unwrap_or(0.0),
        price_unit: raw.price_unit.map(PriceUnit::from).unwrap_or_default(),
        is_recommended: raw.is_recommended,
        notes: raw.notes.unwrap_or_default(),
        priority: raw.priority.unwrap_or_default(),
    }
}
