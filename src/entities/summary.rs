//! Aggregate computations over the category collection
//!
//! All functions are pure: two calls without an intervening mutation return
//! identical results. Totals convert through the fixed unit tables and are
//! rendered with two decimal digits and a unit suffix; stored values are
//! never modified by aggregation.

use serde::Serialize;

use crate::entities::category::Category;
use crate::entities::units::BASE_CURRENCY;

/// Number of categories
pub fn total_categories(categories: &[Category]) -> usize {
    categories.len()
}

/// Number of items across all categories
pub fn total_items(categories: &[Category]) -> usize {
    categories.iter().map(|c| c.items.len()).sum()
}

/// Number of completed items across all categories
pub fn completed_items(categories: &[Category]) -> usize {
    categories
        .iter()
        .map(|c| c.items.iter().filter(|i| i.completed).count())
        .sum()
}

/// Number of items still to prepare
pub fn remaining_items(categories: &[Category]) -> usize {
    total_items(categories) - completed_items(categories)
}

/// Total weight in kilograms, formatted as `X.XXkg`
pub fn total_weight(categories: &[Category]) -> String {
    let grams: f64 = categories
        .iter()
        .flat_map(|c| c.items.iter())
        .map(|i| i.weight_in_grams())
        .sum();
    format!("{:.2}kg", grams / 1000.0)
}

/// Total price in the base currency, formatted as `X.XX人民币`
pub fn total_price(categories: &[Category]) -> String {
    let base: f64 = categories
        .iter()
        .flat_map(|c| c.items.iter())
        .map(|i| i.price_in_base())
        .sum();
    format!("{:.2}{}", base, BASE_CURRENCY)
}

/// All aggregates in one place, for display
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_categories: usize,
    pub total_items: usize,
    pub completed_items: usize,
    pub remaining_items: usize,
    pub total_weight: String,
    pub total_price: String,
}

impl Summary {
    /// Compute all aggregates for the given collection
    pub fn compute(categories: &[Category]) -> Self {
        Self {
            total_categories: total_categories(categories),
            total_items: total_items(categories),
            completed_items: completed_items(categories),
            remaining_items: remaining_items(categories),
            total_weight: total_weight(categories),
            total_price: total_price(categories),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::item::{Item, ItemDraft};
    use crate::entities::units::{PriceUnit, WeightUnit};

    fn category_with(items: Vec<Item>) -> Category {
        let mut cat = Category::new("露营装备", "🏕️");
        cat.items = items;
        cat
    }

    fn item(name: &str, qty: f64, weight: f64, wu: WeightUnit, price: f64) -> Item {
        let draft = ItemDraft {
            name: name.to_string(),
            quantity: Some(qty),
            weight: Some(weight),
            weight_unit: Some(wu),
            price: Some(price),
            ..ItemDraft::default()
        };
        Item::from_draft(draft, 1)
    }

    #[test]
    fn test_empty_collection_totals() {
        let cats: Vec<Category> = Vec::new();
        assert_eq!(total_categories(&cats), 0);
        assert_eq!(total_items(&cats), 0);
        assert_eq!(total_weight(&cats), "0.00kg");
        assert_eq!(total_price(&cats), "0.00人民币");
    }

    #[test]
    fn test_tent_scenario() {
        // One 2000 g tent at 500 base-currency units
        let cats = vec![category_with(vec![item(
            "帐篷",
            1.0,
            2000.0,
            WeightUnit::Grams,
            500.0,
        )])];
        assert_eq!(total_items(&cats), 1);
        assert_eq!(total_weight(&cats), "2.00kg");
        assert_eq!(total_price(&cats), "500.00人民币");
    }

    #[test]
    fn test_jin_converts_at_500_grams() {
        let cats = vec![category_with(vec![item(
            "米",
            1.0,
            5.0,
            WeightUnit::Jin,
            0.0,
        )])];
        assert_eq!(total_weight(&cats), "2.50kg");
    }

    #[test]
    fn test_quantity_multiplies_weight_and_price() {
        let mut gas = item("气罐", 3.0, 0.45, WeightUnit::Kilograms, 30.0);
        gas.price_unit = PriceUnit::Usd;
        let cats = vec![category_with(vec![gas])];
        assert_eq!(total_weight(&cats), "1.35kg");
        // 3 × 30 USD × 7
        assert_eq!(total_price(&cats), "630.00人民币");
    }

    #[test]
    fn test_completed_and_remaining_counts() {
        let mut a = item("a", 1.0, 0.0, WeightUnit::Grams, 0.0);
        a.completed = true;
        let b = item("b", 1.0, 0.0, WeightUnit::Grams, 0.0);
        let cats = vec![category_with(vec![a, b])];
        assert_eq!(completed_items(&cats), 1);
        assert_eq!(remaining_items(&cats), 1);
    }

    #[test]
    fn test_aggregates_are_idempotent() {
        let cats = vec![category_with(vec![item(
            "帐篷",
            1.0,
            2.0,
            WeightUnit::Kilograms,
            500.0,
        )])];
        assert_eq!(total_weight(&cats), total_weight(&cats));
        assert_eq!(total_price(&cats), total_price(&cats));
        assert_eq!(Summary::compute(&cats), Summary::compute(&cats));
    }
}
