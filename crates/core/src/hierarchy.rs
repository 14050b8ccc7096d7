//! The revenue classification tree: category, origin, species.
//!
//! The catalog fixes which codes are visited and in what order. Line items
//! are not listed; they are discovered in the data under each species.

use serde::{Deserialize, Serialize};

/// Category `1`, current revenue. The composition report breaks it down.
pub const CURRENT_REVENUE: &str = "1";

const REVENUE_TREE: &[(&str, &[&str])] = &[
    ("1", &["11", "12", "13", "14", "15", "16", "17", "19"]),
    ("2", &["21", "22", "23", "24", "27", "29"]),
    ("7", &["71", "72", "73", "74", "75", "76", "77", "79"]),
    ("9", &[]),
];

/// Ordered classification tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyCatalog {
    /// Top-level categories in visiting order.
    pub categories: Vec<CategoryNode>,
}

/// A category and its origins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryNode {
    /// Category code.
    pub code: String,
    /// Origins in visiting order.
    pub origins: Vec<OriginNode>,
}

/// An origin and its species.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginNode {
    /// Origin code.
    pub code: String,
    /// Species codes in visiting order.
    pub species: Vec<String>,
}

impl CategoryNode {
    /// Creates a category node.
    pub fn new(code: impl Into<String>, origins: Vec<OriginNode>) -> Self {
        Self {
            code: code.into(),
            origins,
        }
    }
}

impl OriginNode {
    /// Creates an origin node.
    pub fn new<S: Into<String>>(code: impl Into<String>, species: impl IntoIterator<Item = S>) -> Self {
        Self {
            code: code.into(),
            species: species.into_iter().map(Into::into).collect(),
        }
    }

    /// Origin whose species are its code followed by each digit 1 to 9.
    #[must_use]
    pub fn with_digit_species(code: &str) -> Self {
        Self::new(code, (1..=9).map(|d| format!("{code}{d}")))
    }
}

impl HierarchyCatalog {
    /// Creates a catalog from explicit nodes.
    #[must_use]
    pub const fn new(categories: Vec<CategoryNode>) -> Self {
        Self { categories }
    }

    /// The standard public-budget revenue tree.
    #[must_use]
    pub fn revenue() -> Self {
        let categories = REVENUE_TREE
            .iter()
            .map(|(code, origins)| {
                CategoryNode::new(
                    *code,
                    origins
                        .iter()
                        .map(|o| OriginNode::with_digit_species(o))
                        .collect(),
                )
            })
            .collect();
        Self { categories }
    }

    /// Looks up a category by code.
    #[must_use]
    pub fn category(&self, code: &str) -> Option<&CategoryNode> {
        self.categories.iter().find(|c| c.code == code)
    }
}

impl Default for HierarchyCatalog {
    fn default() -> Self {
        Self::revenue()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revenue_tree_shape() {
        let catalog = HierarchyCatalog::revenue();
        let codes: Vec<&str> = catalog.categories.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["1", "2", "7", "9"]);

        let current = catalog.category(CURRENT_REVENUE).unwrap();
        assert_eq!(current.origins.len(), 8);
        assert_eq!(current.origins[0].code, "11");
        assert_eq!(current.origins[0].species.first().map(String::as_str), Some("111"));
        assert_eq!(current.origins[0].species.last().map(String::as_str), Some("119"));

        assert!(catalog.category("9").unwrap().origins.is_empty());
        assert!(catalog.category("8").is_none());
    }

    #[test]
    fn test_capital_revenue_skips_unused_origins() {
        let catalog = HierarchyCatalog::revenue();
        let origins: Vec<&str> = catalog
            .category("2")
            .unwrap()
            .origins
            .iter()
            .map(|o| o.code.as_str())
            .collect();
        assert_eq!(origins, vec!["21", "22", "23", "24", "27", "29"]);
    }
}
