//! Equipment category entity and the default category set

use serde::{Deserialize, Serialize};

use crate::core::identity::{CategoryId, ItemId};
use crate::entities::item::Item;

/// Icon used when a category has none
pub const PLACEHOLDER_ICON: &str = "✨";

/// The default checklist created on first run: (name, icon) pairs
pub const DEFAULT_CATEGORIES: &[(&str, &str)] = &[
    ("背负系统", "🎒"),
    ("睡眠系统", "😴"),
    ("服装系统", "👕"),
    ("必备工具", "🛠️"),
    ("餐厨锅具", "🍳"),
    ("路餐食材", "🍎"),
    ("求生系统", "🆘"),
    ("洗漱工具", "🛁"),
];

/// A named group of equipment items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Unique identifier, assigned at creation, immutable
    pub id: CategoryId,

    /// Category name, never empty
    pub name: String,

    /// Short pictogram label
    #[serde(default = "default_icon")]
    pub icon: String,

    /// Items in display order
    #[serde(default)]
    pub items: Vec<Item>,

    /// Collapsed in list views; pure UI state, never logged
    #[serde(default)]
    pub collapsed: bool,
}

fn default_icon() -> String {
    PLACEHOLDER_ICON.to_string()
}

impl Category {
    /// Create an empty category with a fresh id
    ///
    /// The name is stored trimmed; a blank icon falls back to the
    /// placeholder glyph.
    pub fn new(name: &str, icon: &str) -> Self {
        let icon = icon.trim();
        Self {
            id: CategoryId::generate(),
            name: name.trim().to_string(),
            icon: if icon.is_empty() {
                PLACEHOLDER_ICON.to_string()
            } else {
                icon.to_string()
            },
            items: Vec::new(),
            collapsed: false,
        }
    }

    /// Find an item by id
    pub fn find_item(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|i| &i.id == id)
    }

    /// Find an item by id, mutably
    pub fn find_item_mut(&mut self, id: &ItemId) -> Option<&mut Item> {
        self.items.iter_mut().find(|i| &i.id == id)
    }

    /// Highest index currently in use, 0 for an empty category
    pub fn max_index(&self) -> u32 {
        self.items.iter().map(|i| i.index).max().unwrap_or(0)
    }
}

/// Build the fixed default category list with empty item lists
pub fn default_categories() -> Vec<Category> {
    DEFAULT_CATEGORIES
        .iter()
        .map(|(name, icon)| Category::new(name, icon))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::item::ItemDraft;

    #[test]
    fn test_new_trims_and_defaults_icon() {
        let cat = Category::new("  露营装备  ", "  ");
        assert_eq!(cat.name, "露营装备");
        assert_eq!(cat.icon, PLACEHOLDER_ICON);
        assert!(cat.items.is_empty());
        assert!(!cat.collapsed);
    }

    #[test]
    fn test_default_categories_shape() {
        let cats = default_categories();
        assert_eq!(cats.len(), 8);
        assert_eq!(cats[0].name, "背负系统");
        assert_eq!(cats[0].icon, "🎒");
        assert!(cats.iter().all(|c| c.items.is_empty()));
    }

    #[test]
    fn test_max_index() {
        let mut cat = Category::new("测试", "✨");
        assert_eq!(cat.max_index(), 0);
        cat.items.push(Item::from_draft(ItemDraft::named("a"), 1));
        cat.items.push(Item::from_draft(ItemDraft::named("b"), 2));
        assert_eq!(cat.max_index(), 2);
    }

    #[test]
    fn test_icon_defaults_when_missing_on_wire() {
        let json = r#"{"id":"CAT-X","name":"临时","items":[]}"#;
        let cat: Category = serde_json::from_str(json).unwrap();
        assert_eq!(cat.icon, PLACEHOLDER_ICON);
    }
}
