//! Code to display-name lookup tables.
//!
//! Names are taken from the first record carrying each code. Later records
//! with a different spelling for the same code are ignored.

use std::collections::HashMap;

use crate::dataset::{ExpenditureColumn, ExpenditureDataset, RevenueColumn, RevenueDataset};

/// Lookup from code to display name. First occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameMap {
    names: HashMap<String, String>,
}

impl NameMap {
    /// Builds a map from `(code, name)` pairs, keeping the first name per code.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut names = HashMap::new();
        for (code, name) in pairs {
            names
                .entry(code.to_string())
                .or_insert_with(|| name.to_string());
        }
        Self { names }
    }

    /// Returns the name for a code. A code whose first record had a blank
    /// name resolves to `None`.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&str> {
        self.names
            .get(code)
            .map(String::as_str)
            .filter(|n| !n.is_empty())
    }

    /// Number of codes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if no codes are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Name tables for the four revenue levels.
#[derive(Debug, Clone, Default)]
pub struct RevenueNames {
    /// Category names.
    pub category: NameMap,
    /// Origin names.
    pub origin: NameMap,
    /// Species names.
    pub species: NameMap,
    /// Line-item names.
    pub line_item: NameMap,
}

impl RevenueNames {
    /// Builds every table from a dataset. A table is empty when either its
    /// code or name column is missing.
    #[must_use]
    pub fn build(dataset: &RevenueDataset) -> Self {
        let present = |code, name| dataset.has_column(code) && dataset.has_column(name);
        let records = dataset.records.as_slice();

        Self {
            category: table(
                present(RevenueColumn::Category, RevenueColumn::CategoryName),
                records,
                |r| (r.category.as_str(), r.category_name.as_str()),
            ),
            origin: table(
                present(RevenueColumn::Origin, RevenueColumn::OriginName),
                records,
                |r| (r.origin.as_str(), r.origin_name.as_str()),
            ),
            species: table(
                present(RevenueColumn::Species, RevenueColumn::SpeciesName),
                records,
                |r| (r.species.as_str(), r.species_name.as_str()),
            ),
            line_item: table(
                present(RevenueColumn::LineItem, RevenueColumn::LineItemName),
                records,
                |r| (r.line_item.as_str(), r.line_item_name.as_str()),
            ),
        }
    }
}

/// Name tables for the expenditure classifications.
#[derive(Debug, Clone, Default)]
pub struct ExpenditureNames {
    /// Economic category names.
    pub category: NameMap,
    /// Expense group names.
    pub group: NameMap,
    /// Application modality names.
    pub modality: NameMap,
    /// Expense element names.
    pub element: NameMap,
}

impl ExpenditureNames {
    /// Builds every table from a dataset.
    #[must_use]
    pub fn build(dataset: &ExpenditureDataset) -> Self {
        let present = |code, name| dataset.has_column(code) && dataset.has_column(name);
        let records = dataset.records.as_slice();

        Self {
            category: table(
                present(ExpenditureColumn::Category, ExpenditureColumn::CategoryName),
                records,
                |r| (r.category.as_str(), r.category_name.as_str()),
            ),
            group: table(
                present(ExpenditureColumn::Group, ExpenditureColumn::GroupName),
                records,
                |r| (r.group.as_str(), r.group_name.as_str()),
            ),
            modality: table(
                present(ExpenditureColumn::Modality, ExpenditureColumn::ModalityName),
                records,
                |r| (r.modality.as_str(), r.modality_name.as_str()),
            ),
            element: table(
                present(ExpenditureColumn::Element, ExpenditureColumn::ElementName),
                records,
                |r| (r.element.as_str(), r.element_name.as_str()),
            ),
        }
    }
}

fn table<'a, R>(
    present: bool,
    records: &'a [R],
    pick: impl Fn(&'a R) -> (&'a str, &'a str),
) -> NameMap {
    if present {
        NameMap::from_pairs(records.iter().map(pick))
    } else {
        NameMap::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::RevenueRecord;

    fn record(category: &str, name: &str) -> RevenueRecord {
        RevenueRecord {
            category: category.to_string(),
            category_name: name.to_string(),
            ..RevenueRecord::default()
        }
    }

    #[test]
    fn test_first_occurrence_wins() {
        let dataset = RevenueDataset::new(vec![
            record("1", "Receitas Correntes"),
            record("1", "RECEITAS CORRENTES (grafia antiga)"),
            record("2", "Receitas de Capital"),
        ]);
        let names = RevenueNames::build(&dataset);

        assert_eq!(names.category.get("1"), Some("Receitas Correntes"));
        assert_eq!(names.category.get("2"), Some("Receitas de Capital"));
        assert_eq!(names.category.get("7"), None);
    }

    #[test]
    fn test_missing_name_column_gives_empty_table() {
        let dataset = RevenueDataset::new(vec![record("1", "Receitas Correntes")])
            .without_column(RevenueColumn::CategoryName);
        let names = RevenueNames::build(&dataset);
        assert!(names.category.is_empty());
    }

    #[test]
    fn test_blank_first_name_resolves_to_none() {
        let map = NameMap::from_pairs([("1", ""), ("1", "Receitas Correntes")]);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("1"), None);
    }
}
