//! Weight and price unit tags with fixed conversion factors
//!
//! Tags are stored verbatim on the wire. Unknown tags are preserved and
//! convert as identity (grams / base currency) so aggregate totals never
//! reject data they merely don't recognize.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unit tag attached to an item's weight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WeightUnit {
    /// `g`
    Grams,
    /// `kg`: 1000 g
    Kilograms,
    /// `斤`: 500 g
    Jin,
    /// `磅`: 453.592 g
    Pound,
    /// Any unrecognized tag, treated as grams
    Other(String),
}

impl WeightUnit {
    /// The tag string stored on the wire
    pub fn as_str(&self) -> &str {
        match self {
            WeightUnit::Grams => "g",
            WeightUnit::Kilograms => "kg",
            WeightUnit::Jin => "斤",
            WeightUnit::Pound => "磅",
            WeightUnit::Other(tag) => tag,
        }
    }

    /// Convert an amount in this unit to grams
    pub fn to_grams(&self, amount: f64) -> f64 {
        match self {
            WeightUnit::Grams => amount,
            WeightUnit::Kilograms => amount * 1000.0,
            WeightUnit::Jin => amount * 500.0,
            WeightUnit::Pound => amount * 453.592,
            WeightUnit::Other(_) => amount,
        }
    }
}

impl Default for WeightUnit {
    fn default() -> Self {
        WeightUnit::Grams
    }
}

impl From<String> for WeightUnit {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "g" => WeightUnit::Grams,
            "kg" => WeightUnit::Kilograms,
            "斤" => WeightUnit::Jin,
            "磅" => WeightUnit::Pound,
            _ => WeightUnit::Other(tag),
        }
    }
}

impl From<&str> for WeightUnit {
    fn from(tag: &str) -> Self {
        WeightUnit::from(tag.to_string())
    }
}

impl From<WeightUnit> for String {
    fn from(unit: WeightUnit) -> Self {
        unit.as_str().to_string()
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Currency tag attached to an item's price
///
/// The multipliers are fixed display-conversion rates; they apply only when
/// computing aggregate totals and never mutate stored prices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PriceUnit {
    /// `人民币`: base currency
    Cny,
    /// `美元`: ×7
    Usd,
    /// `英镑`: ×9
    Gbp,
    /// `日元`: ×0.05
    Jpy,
    /// Any unrecognized tag, treated as base currency
    Other(String),
}

/// Tag of the base currency all totals are rendered in
pub const BASE_CURRENCY: &str = "人民币";

impl PriceUnit {
    /// The tag string stored on the wire
    pub fn as_str(&self) -> &str {
        match self {
            PriceUnit::Cny => BASE_CURRENCY,
            PriceUnit::Usd => "美元",
            PriceUnit::Gbp => "英镑",
            PriceUnit::Jpy => "日元",
            PriceUnit::Other(tag) => tag,
        }
    }

    /// Convert an amount in this currency to the base currency
    pub fn to_base(&self, amount: f64) -> f64 {
        match self {
            PriceUnit::Cny => amount,
            PriceUnit::Usd => amount * 7.0,
            PriceUnit::Gbp => amount * 9.0,
            PriceUnit::Jpy => amount * 0.05,
            PriceUnit::Other(_) => amount,
        }
    }
}

impl Default for PriceUnit {
    fn default() -> Self {
        PriceUnit::Cny
    }
}

impl From<String> for PriceUnit {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "人民币" => PriceUnit::Cny,
            "美元" => PriceUnit::Usd,
            "英镑" => PriceUnit::Gbp,
            "日元" => PriceUnit::Jpy,
            _ => PriceUnit::Other(tag),
        }
    }
}

impl From<&str> for PriceUnit {
    fn from(tag: &str) -> Self {
        PriceUnit::from(tag.to_string())
    }
}

impl From<PriceUnit> for String {
    fn from(unit: PriceUnit) -> Self {
        unit.as_str().to_string()
    }
}

impl fmt::Display for PriceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_conversions() {
        assert_eq!(WeightUnit::Grams.to_grams(250.0), 250.0);
        assert_eq!(WeightUnit::Kilograms.to_grams(2.0), 2000.0);
        assert_eq!(WeightUnit::Jin.to_grams(5.0), 2500.0);
        assert!((WeightUnit::Pound.to_grams(1.0) - 453.592).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_weight_unit_is_identity() {
        let unit = WeightUnit::from("oz");
        assert_eq!(unit, WeightUnit::Other("oz".to_string()));
        assert_eq!(unit.to_grams(12.0), 12.0);
    }

    #[test]
    fn test_price_conversions() {
        assert_eq!(PriceUnit::Cny.to_base(500.0), 500.0);
        assert_eq!(PriceUnit::Usd.to_base(10.0), 70.0);
        assert_eq!(PriceUnit::Gbp.to_base(10.0), 90.0);
        assert_eq!(PriceUnit::Jpy.to_base(1000.0), 50.0);
    }

    #[test]
    fn test_unknown_price_unit_is_identity() {
        assert_eq!(PriceUnit::from("欧元").to_base(9.0), 9.0);
    }

    #[test]
    fn test_wire_tags_roundtrip() {
        for tag in ["g", "kg", "斤", "磅", "oz"] {
            let unit = WeightUnit::from(tag);
            let json = serde_json::to_string(&unit).unwrap();
            assert_eq!(json, format!("\"{}\"", tag));
            let back: WeightUnit = serde_json::from_str(&json).unwrap();
            assert_eq!(back, unit);
        }
        for tag in ["人民币", "美元", "英镑", "日元", "欧元"] {
            let unit = PriceUnit::from(tag);
            let json = serde_json::to_string(&unit).unwrap();
            assert_eq!(json, format!("\"{}\"", tag));
            let back: PriceUnit = serde_json::from_str(&json).unwrap();
            assert_eq!(back, unit);
        }
    }
}
