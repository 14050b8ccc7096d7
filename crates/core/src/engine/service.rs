//! Hierarchical aggregation over revenue records.

use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;

use rust_decimal::Decimal;
use tracing::debug;

use super::types::{
    AggregatedNode, Aggregation, AggregationRequest, AppropriationTotals, HierarchyDepth,
    MeasureSpec, RowLevel,
};
use crate::dataset::{ExpenditureRecord, RevenueDataset, RevenueRecord, UnitFilter};
use crate::hierarchy::{CategoryNode, HierarchyCatalog, OriginNode};
use crate::names::{NameMap, RevenueNames};

type Rows<'a> = Vec<&'a RevenueRecord>;

/// Walks the classification tree over one unit's records.
///
/// Records are indexed by code once, on construction, and every
/// [`aggregate`](Self::aggregate) call reuses the index. Name tables come
/// from the whole dataset, so a unit's rows resolve the same names as the
/// consolidated view.
pub struct AggregationEngine<'a> {
    catalog: &'a HierarchyCatalog,
    names: RevenueNames,
    records: Rows<'a>,
    by_category: HashMap<&'a str, Rows<'a>>,
    by_line_item: BTreeMap<&'a str, Rows<'a>>,
}

impl<'a> AggregationEngine<'a> {
    /// Indexes the records that pass `unit`.
    #[must_use]
    pub fn new(dataset: &'a RevenueDataset, catalog: &'a HierarchyCatalog, unit: &UnitFilter) -> Self {
        let records: Rows<'a> = dataset
            .records
            .iter()
            .filter(|r| unit.matches(&r.unit))
            .collect();

        let mut by_category: HashMap<&'a str, Rows<'a>> = HashMap::new();
        let mut by_line_item: BTreeMap<&'a str, Rows<'a>> = BTreeMap::new();
        for &record in &records {
            if !record.category.is_empty() {
                by_category.entry(record.category.as_str()).or_default().push(record);
            }
            if !record.line_item.is_empty() {
                by_line_item.entry(record.line_item.as_str()).or_default().push(record);
            }
        }

        debug!(
            records = records.len(),
            categories = by_category.len(),
            line_items = by_line_item.len(),
            "Indexed revenue records"
        );

        Self {
            catalog,
            names: RevenueNames::build(dataset),
            records,
            by_category,
            by_line_item,
        }
    }

    /// Name tables in use.
    #[must_use]
    pub const fn names(&self) -> &RevenueNames {
        &self.names
    }

    /// Returns true if any indexed record belongs to the fiscal year.
    #[must_use]
    pub fn has_exercise(&self, exercise: i32) -> bool {
        self.records.iter().any(|r| r.exercise == exercise)
    }

    /// Months present in the fiscal year's records.
    pub fn months(&self, exercise: i32) -> impl Iterator<Item = u8> + '_ {
        self.records
            .iter()
            .filter(move |r| r.exercise == exercise)
            .map(|r| r.month)
    }

    /// Sums `measures` over the records of one origin within a category.
    #[must_use]
    pub fn origin_values(&self, category: &str, origin: &str, measures: &[MeasureSpec]) -> Vec<Decimal> {
        sum_measures(&self.origin_rows(category, origin), measures)
    }

    /// Runs the traversal and returns the emitted nodes in pre-order.
    ///
    /// A node is visited only if its parent was emitted. Totals sum the
    /// emitted top-level nodes.
    #[must_use]
    pub fn aggregate(&self, request: &AggregationRequest) -> Aggregation {
        let mut out = Aggregation {
            nodes: Vec::new(),
            totals: vec![Decimal::ZERO; request.measures.len()],
        };

        for category in &self.catalog.categories {
            let rows = self
                .by_category
                .get(category.code.as_str())
                .map_or(&[][..], Vec::as_slice);
            let Some(values) = emit(
                &mut out.nodes,
                request,
                RowLevel::Level1,
                &category.code,
                &self.names.category,
                rows,
            ) else {
                continue;
            };

            for (total, value) in out.totals.iter_mut().zip(values) {
                *total += value;
            }

            if request.depth >= HierarchyDepth::Origin {
                self.visit_origins(&mut out.nodes, request, category);
            }
        }

        debug!(
            nodes = out.nodes.len(),
            depth = ?request.depth,
            "Aggregated revenue hierarchy"
        );
        out
    }

    fn origin_rows(&self, category: &str, origin: &str) -> Rows<'a> {
        self.by_category
            .get(category)
            .map(|rows| {
                rows.iter()
                    .copied()
                    .filter(|r| r.origin == origin)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn visit_origins(&self, nodes: &mut Vec<AggregatedNode>, request: &AggregationRequest, category: &CategoryNode) {
        for origin in &category.origins {
            let rows = self.origin_rows(&category.code, &origin.code);
            let emitted = emit(
                nodes,
                request,
                RowLevel::Level2,
                &origin.code,
                &self.names.origin,
                &rows,
            );
            if emitted.is_some() && request.depth >= HierarchyDepth::Species {
                self.visit_species(nodes, request, origin, &rows);
            }
        }
    }

    fn visit_species(
        &self,
        nodes: &mut Vec<AggregatedNode>,
        request: &AggregationRequest,
        origin: &OriginNode,
        origin_rows: &[&RevenueRecord],
    ) {
        for species in &origin.species {
            let rows: Rows<'_> = origin_rows
                .iter()
                .copied()
                .filter(|r| r.species == *species)
                .collect();
            let emitted = emit(
                nodes,
                request,
                RowLevel::Level3,
                species,
                &self.names.species,
                &rows,
            );
            if emitted.is_some() && request.depth >= HierarchyDepth::LineItem {
                self.visit_line_items(nodes, request, species);
            }
        }
    }

    /// Line items are the distinct codes starting with the species code,
    /// in ascending order.
    fn visit_line_items(&self, nodes: &mut Vec<AggregatedNode>, request: &AggregationRequest, species: &str) {
        let candidates = self
            .by_line_item
            .range::<str, _>((Bound::Included(species), Bound::Unbounded))
            .take_while(|(code, _)| code.starts_with(species));

        for (code, rows) in candidates {
            emit(
                nodes,
                request,
                RowLevel::Level4,
                code,
                &self.names.line_item,
                rows,
            );
        }
    }
}

fn emit(
    nodes: &mut Vec<AggregatedNode>,
    request: &AggregationRequest,
    level: RowLevel,
    code: &str,
    names: &NameMap,
    rows: &[&RevenueRecord],
) -> Option<Vec<Decimal>> {
    let values = sum_measures(rows, &request.measures);
    if request.suppression.suppresses(&values) {
        return None;
    }

    let name = match names.get(code) {
        Some(name) => name.to_string(),
        None if request.require_name => return None,
        None => code.to_string(),
    };

    nodes.push(AggregatedNode {
        level,
        code: code.to_string(),
        name,
        values: values.clone(),
    });
    Some(values)
}

/// Sums each measure over `rows`.
#[must_use]
pub fn sum_measures(rows: &[&RevenueRecord], measures: &[MeasureSpec]) -> Vec<Decimal> {
    measures
        .iter()
        .map(|m| rows.iter().map(|r| m.value_of(r)).sum())
        .collect()
}

/// Groups expenditure records by a code, summing every measure.
///
/// Records with an empty code are skipped. Groups come out in ascending
/// code order.
pub fn group_appropriations<'r>(
    records: impl IntoIterator<Item = &'r ExpenditureRecord>,
    key: impl Fn(&'r ExpenditureRecord) -> &'r str,
) -> BTreeMap<&'r str, AppropriationTotals> {
    let mut groups: BTreeMap<&'r str, AppropriationTotals> = BTreeMap::new();
    for record in records {
        let code = key(record);
        if code.is_empty() {
            continue;
        }
        *groups.entry(code).or_default() += record;
    }
    groups
}
