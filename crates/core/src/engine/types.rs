//! Aggregation request and result types.

use std::ops::AddAssign;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::dataset::{ExpenditureRecord, RevenueMeasure, RevenueRecord};

/// Position of a row in a hierarchical report.
///
/// For revenue, levels 1 to 4 are category, origin, species and line item.
/// For expenditure, levels 1 and 2 are category and group. Flat reports use
/// level 1 only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RowLevel {
    /// Top-level row.
    #[serde(rename = "level-1")]
    Level1,
    /// Second level.
    #[serde(rename = "level-2")]
    Level2,
    /// Third level.
    #[serde(rename = "level-3")]
    Level3,
    /// Fourth level.
    #[serde(rename = "level-4")]
    Level4,
    /// Grand total.
    #[serde(rename = "total")]
    Total,
}

impl RowLevel {
    /// Nesting depth, 0 for top-level rows and the total.
    #[must_use]
    pub const fn depth(self) -> usize {
        match self {
            Self::Level1 | Self::Total => 0,
            Self::Level2 => 1,
            Self::Level3 => 2,
            Self::Level4 => 3,
        }
    }

    /// Returns true for top-level rows.
    #[must_use]
    pub const fn is_top(self) -> bool {
        matches!(self, Self::Level1)
    }
}

/// How deep the revenue traversal goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HierarchyDepth {
    /// Categories only.
    Category,
    /// Down to origins.
    Origin,
    /// Down to species.
    Species,
    /// Down to line items.
    LineItem,
}

/// Rule deciding whether an aggregated node is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suppression {
    /// Emit when any measure is non-zero.
    AllZero,
    /// Emit when the sum of the measures is positive.
    NonPositiveSum,
    /// Emit when at least one measure is positive.
    NoPositiveValue,
}

impl Suppression {
    /// Returns true if a node with these values is suppressed.
    #[must_use]
    pub fn suppresses(self, values: &[Decimal]) -> bool {
        match self {
            Self::AllZero => values.iter().all(Decimal::is_zero),
            Self::NonPositiveSum => values.iter().sum::<Decimal>() <= Decimal::ZERO,
            Self::NoPositiveValue => values.iter().all(|v| *v <= Decimal::ZERO),
        }
    }
}

/// One summed quantity: a measure restricted to a fiscal year, and
/// optionally to an administration type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeasureSpec {
    /// Column key in the report.
    pub key: &'static str,
    /// Source measure.
    pub measure: RevenueMeasure,
    /// Fiscal year.
    pub exercise: i32,
    /// Administration type code, if restricted.
    pub admin_type: Option<i32>,
}

impl MeasureSpec {
    /// A measure for one fiscal year.
    #[must_use]
    pub const fn new(key: &'static str, measure: RevenueMeasure, exercise: i32) -> Self {
        Self {
            key,
            measure,
            exercise,
            admin_type: None,
        }
    }

    /// Restricts the measure to one administration type.
    #[must_use]
    pub const fn for_admin_type(mut self, code: i32) -> Self {
        self.admin_type = Some(code);
        self
    }

    /// The record's contribution to this measure.
    #[must_use]
    pub fn value_of(&self, record: &RevenueRecord) -> Decimal {
        let matches = record.exercise == self.exercise
            && self.admin_type.is_none_or(|code| record.admin_type == Some(code));
        if matches {
            record.measure(self.measure)
        } else {
            Decimal::ZERO
        }
    }
}

/// Parameters of one revenue aggregation run.
#[derive(Debug, Clone)]
pub struct AggregationRequest {
    /// Measures, in column order.
    pub measures: Vec<MeasureSpec>,
    /// Deepest level visited.
    pub depth: HierarchyDepth,
    /// Emission rule.
    pub suppression: Suppression,
    /// Suppress nodes whose code has no known name.
    pub require_name: bool,
}

impl AggregationRequest {
    /// A request that suppresses all-zero and unnamed nodes.
    #[must_use]
    pub const fn new(measures: Vec<MeasureSpec>, depth: HierarchyDepth) -> Self {
        Self {
            measures,
            depth,
            suppression: Suppression::AllZero,
            require_name: true,
        }
    }

    /// Sets the emission rule.
    #[must_use]
    pub const fn with_suppression(mut self, suppression: Suppression) -> Self {
        self.suppression = suppression;
        self
    }
}

/// An emitted node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregatedNode {
    /// Level in the tree.
    pub level: RowLevel,
    /// Classification code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// One value per requested measure.
    pub values: Vec<Decimal>,
}

/// Output of an aggregation run: nodes in pre-order, plus grand totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Aggregation {
    /// Emitted nodes, parents before children.
    pub nodes: Vec<AggregatedNode>,
    /// Per-measure sums over the emitted top-level nodes.
    pub totals: Vec<Decimal>,
}

impl Aggregation {
    /// Returns true if nothing was emitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Emitted top-level nodes, for downstream analysis.
    pub fn top_level(&self) -> impl Iterator<Item = &AggregatedNode> {
        self.nodes.iter().filter(|n| n.level.is_top())
    }
}

/// Summed expenditure measures for one classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AppropriationTotals {
    /// Initial appropriation.
    pub initial: Decimal,
    /// Additional appropriation.
    pub additional: Decimal,
    /// Appropriation cancellation.
    pub cancellation: Decimal,
    /// Cancellation by reallocation.
    pub cancellation_remanagement: Decimal,
    /// Committed expenditure.
    pub committed: Decimal,
    /// Settled expenditure.
    pub settled: Decimal,
    /// Paid expenditure.
    pub paid: Decimal,
}

impl AppropriationTotals {
    /// Initial plus additional plus both cancellations. Cancellations are
    /// signed in the source, so they are added as given.
    #[must_use]
    pub fn updated_appropriation(&self) -> Decimal {
        self.initial + self.additional + self.cancellation + self.cancellation_remanagement
    }

    /// Updated appropriation not yet committed.
    #[must_use]
    pub fn appropriation_balance(&self) -> Decimal {
        self.updated_appropriation() - self.committed
    }

    /// Returns true if every summed measure is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        [
            self.initial,
            self.additional,
            self.cancellation,
            self.cancellation_remanagement,
            self.committed,
            self.settled,
            self.paid,
        ]
        .iter()
        .all(Decimal::is_zero)
    }
}

impl AddAssign<&ExpenditureRecord> for AppropriationTotals {
    fn add_assign(&mut self, record: &ExpenditureRecord) {
        self.initial += record.initial_appropriation;
        self.additional += record.additional_appropriation;
        self.cancellation += record.cancellation;
        self.cancellation_remanagement += record.cancellation_remanagement;
        self.committed += record.committed;
        self.settled += record.settled;
        self.paid += record.paid;
    }
}

impl AddAssign for AppropriationTotals {
    fn add_assign(&mut self, other: Self) {
        self.initial += other.initial;
        self.additional += other.additional;
        self.cancellation += other.cancellation;
        self.cancellation_remanagement += other.cancellation_remanagement;
        self.committed += other.committed;
        self.settled += other.settled;
        self.paid += other.paid;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cancellations_are_added_with_their_sign() {
        let totals = AppropriationTotals {
            initial: dec!(1000),
            additional: dec!(200),
            cancellation: dec!(-50),
            cancellation_remanagement: dec!(-30),
            committed: dec!(900),
            ..AppropriationTotals::default()
        };

        assert_eq!(totals.updated_appropriation(), dec!(1120));
        assert_eq!(totals.appropriation_balance(), dec!(220));
    }

    #[test]
    fn test_suppression_rules() {
        let mixed = [dec!(-10), dec!(4)];
        assert!(!Suppression::AllZero.suppresses(&mixed));
        assert!(Suppression::NonPositiveSum.suppresses(&mixed));
        assert!(!Suppression::NoPositiveValue.suppresses(&mixed));

        let negative = [dec!(-10), Decimal::ZERO];
        assert!(!Suppression::AllZero.suppresses(&negative));
        assert!(Suppression::NoPositiveValue.suppresses(&negative));
    }

    #[test]
    fn test_record_accumulation() {
        let mut totals = AppropriationTotals::default();
        totals += &ExpenditureRecord {
            initial_appropriation: dec!(10),
            cancellation: dec!(-4),
            ..ExpenditureRecord::default()
        };
        totals += &ExpenditureRecord {
            additional_appropriation: dec!(5),
            committed: dec!(3),
            ..ExpenditureRecord::default()
        };

        assert_eq!(totals.updated_appropriation(), dec!(11));
        assert_eq!(totals.appropriation_balance(), dec!(8));
        assert!(!totals.is_zero());
        assert!(AppropriationTotals::default().is_zero());
    }
}
