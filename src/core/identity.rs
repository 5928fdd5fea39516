//! Identifier minting using type-prefixed ULIDs
//!
//! Freshly created categories, items, and log entries get a `CAT-`/`ITEM-`/
//! `LOG-` prefixed ULID. Identifiers loaded from storage or supplied by an
//! import payload are opaque: any non-empty string is accepted and preserved
//! verbatim, so data produced by other tools keeps its ids across round
//! trips. Only missing, non-string, or duplicate ids are ever re-minted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

/// Entity kind prefixes for freshly minted identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdPrefix {
    /// Equipment category
    Cat,
    /// Equipment item
    Item,
    /// Operation log entry
    Log,
}

impl IdPrefix {
    /// Get the string representation of the prefix
    pub fn as_str(&self) -> &'static str {
        match self {
            IdPrefix::Cat => "CAT",
            IdPrefix::Item => "ITEM",
            IdPrefix::Log => "LOG",
        }
    }

    /// Mint a fresh prefixed identifier string
    pub fn mint(&self) -> String {
        format!("{}-{}", self.as_str(), Ulid::new())
    }
}

impl fmt::Display for IdPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

macro_rules! opaque_id {
    ($(#[$doc:meta])* $name:ident, $prefix:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Mint a fresh identifier
            pub fn generate() -> Self {
                Self($prefix.mint())
            }

            /// Wrap an existing identifier string verbatim
            pub fn from_raw(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            /// View the identifier as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.to_string()))
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

opaque_id!(
    /// Identifier of an equipment category
    CategoryId,
    IdPrefix::Cat
);

opaque_id!(
    /// Identifier of an equipment item
    ItemId,
    IdPrefix::Item
);

opaque_id!(
    /// Identifier of an operation log entry
    LogId,
    IdPrefix::Log
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_minted_ids_carry_prefix() {
        assert!(CategoryId::generate().as_str().starts_with("CAT-"));
        assert!(ItemId::generate().as_str().starts_with("ITEM-"));
        assert!(LogId::generate().as_str().starts_with("LOG-"));
    }

    #[test]
    fn test_minted_id_length() {
        // CAT- (4) + ULID (26)
        assert_eq!(CategoryId::generate().as_str().len(), 30);
    }

    #[test]
    fn test_minted_ids_are_unique() {
        let ids: HashSet<String> = (0..1000)
            .map(|_| ItemId::generate().as_str().to_string())
            .collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_foreign_id_preserved_verbatim() {
        let id = ItemId::from_raw("0b9df0c2-4d88-4a38-9f3e-2f6f0a9d7e11");
        assert_eq!(id.as_str(), "0b9df0c2-4d88-4a38-9f3e-2f6f0a9d7e11");
    }

    #[test]
    fn test_serde_is_transparent() {
        let id = CategoryId::from_raw("CAT-01JTEST");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"CAT-01JTEST\"");
        let back: CategoryId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
