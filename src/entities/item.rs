//! Equipment item entity

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::core::identity::ItemId;
use crate::entities::units::{PriceUnit, WeightUnit};

/// Default quantity unit for new items
pub const DEFAULT_QUANTITY_UNIT: &str = "个";

/// Item priority
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ValueEnum, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(format!("Unknown priority: {}", s)),
        }
    }
}

/// A piece of equipment inside a category
///
/// `index` is the 1-based display position; the store keeps indices dense and
/// contiguous within each category, re-assigning them after every structural
/// removal. Wire format is camelCase to stay compatible with blobs written by
/// earlier versions of the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Unique identifier, assigned at creation, immutable
    pub id: ItemId,

    /// 1-based position within the parent category
    pub index: u32,

    /// Item name, never empty
    pub name: String,

    /// Whether the item has been packed / prepared
    #[serde(default)]
    pub completed: bool,

    /// How many to bring
    pub quantity: f64,

    /// Unit label for the quantity (free-form, e.g. `个`, `双`)
    pub quantity_unit: String,

    /// Weight of a single unit
    pub weight: f64,

    /// Unit tag the weight is expressed in
    pub weight_unit: WeightUnit,

    /// Price of a single unit
    pub price: f64,

    /// Currency tag the price is expressed in
    pub price_unit: PriceUnit,

    /// Marked as a recommended piece of gear
    #[serde(default)]
    pub is_recommended: bool,

    /// Free-form notes
    #[serde(default)]
    pub notes: String,

    /// Packing priority
    #[serde(default)]
    pub priority: Priority,
}

impl Item {
    /// Build an item from a draft, minting a fresh id and applying defaults
    ///
    /// The caller supplies the index; the draft's name is stored trimmed.
    pub fn from_draft(draft: ItemDraft, index: u32) -> Self {
        Self {
            id: ItemId::generate(),
            index,
            name: draft.name.trim().to_string(),
            completed: draft.completed,
            quantity: draft.quantity.unwrap_or(1.0),
            quantity_unit: draft
                .quantity_unit
                .unwrap_or_else(|| DEFAULT_QUANTITY_UNIT.to_string()),
            weight: draft.weight.unwrap_or(0.0),
            weight_unit: draft.weight_unit.unwrap_or_default(),
            price: draft.price.unwrap_or(0.0),
            price_unit: draft.price_unit.unwrap_or_default(),
            is_recommended: draft.is_recommended,
            notes: draft.notes.unwrap_or_default(),
            priority: draft.priority.unwrap_or_default(),
        }
    }

    /// Overwrite the mutable fields from a draft, preserving id and index
    pub fn apply_draft(&mut self, draft: ItemDraft) {
        self.name = draft.name.trim().to_string();
        self.completed = draft.completed;
        self.quantity = draft.quantity.unwrap_or(1.0);
        self.quantity_unit = draft
            .quantity_unit
            .unwrap_or_else(|| DEFAULT_QUANTITY_UNIT.to_string());
        self.weight = draft.weight.unwrap_or(0.0);
        self.weight_unit = draft.weight_unit.unwrap_or_default();
        self.price = draft.price.unwrap_or(0.0);
        self.price_unit = draft.price_unit.unwrap_or_default();
        self.is_recommended = draft.is_recommended;
        self.notes = draft.notes.unwrap_or_default();
        self.priority = draft.priority.unwrap_or_default();
    }

    /// This item's total weight contribution in grams
    pub fn weight_in_grams(&self) -> f64 {
        self.weight_unit.to_grams(self.weight) * self.quantity
    }

    /// This item's total price contribution in the base currency
    pub fn price_in_base(&self) -> f64 {
        self.price_unit.to_base(self.price) * self.quantity
    }
}

/// Input payload for creating or editing an item
///
/// Absent fields take the model defaults: quantity 1 `个`, weight 0 g,
/// price 0 in the base currency. Editing with a partial draft therefore
/// resets unspecified fields to their defaults rather than merging.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDraft {
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
    pub weight_unit: Option<WeightUnit>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub price_unit: Option<PriceUnit>,
    #[serde(default)]
    pub is_recommended: bool,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
}

impl ItemDraft {
    /// Draft with just a name, everything else defaulted
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}
