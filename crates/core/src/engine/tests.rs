//! Property and scenario tests for the aggregation engine.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::service::{AggregationEngine, group_appropriations};
use super::types::{AggregationRequest, HierarchyDepth, MeasureSpec, RowLevel, Suppression};
use crate::dataset::{ExpenditureRecord, RevenueDataset, RevenueMeasure, RevenueRecord, UnitFilter};
use crate::hierarchy::{CategoryNode, HierarchyCatalog, OriginNode};

fn revenue(
    year: i32,
    path: (&str, &str, &str, &str),
    unit: &str,
    realized: Decimal,
) -> RevenueRecord {
    let (category, origin, species, line_item) = path;
    RevenueRecord {
        exercise: year,
        month: 6,
        category: category.to_string(),
        category_name: format!("Categoria {category}"),
        origin: origin.to_string(),
        origin_name: format!("Origem {origin}"),
        species: species.to_string(),
        species_name: format!("Especie {species}"),
        line_item: line_item.to_string(),
        line_item_name: format!("Alinea {line_item}"),
        unit: unit.to_string(),
        realized,
        ..RevenueRecord::default()
    }
}

fn realized_request(depth: HierarchyDepth) -> AggregationRequest {
    AggregationRequest::new(
        vec![
            MeasureSpec::new("rr_atual", RevenueMeasure::Realized, 2025),
            MeasureSpec::new("rr_anterior", RevenueMeasure::Realized, 2024),
        ],
        depth,
    )
}

/// Category 1 with 500 this year and 400 last year; category 2 only zeros.
#[test]
fn test_zero_category_is_suppressed_and_totals_sum_categories() {
    let dataset = RevenueDataset::new(vec![
        revenue(2025, ("1", "11", "111", "1112"), "A", dec!(500)),
        revenue(2024, ("1", "11", "111", "1112"), "A", dec!(400)),
        revenue(2025, ("2", "21", "211", "2111"), "A", Decimal::ZERO),
        revenue(2024, ("2", "21", "211", "2111"), "A", Decimal::ZERO),
    ]);
    let catalog = HierarchyCatalog::revenue();
    let engine = AggregationEngine::new(&dataset, &catalog, &UnitFilter::All);

    let result = engine.aggregate(&realized_request(HierarchyDepth::Category));

    assert_eq!(result.nodes.len(), 1);
    assert_eq!(result.nodes[0].code, "1");
    assert_eq!(result.nodes[0].values, vec![dec!(500), dec!(400)]);
    assert_eq!(result.totals, vec![dec!(500), dec!(400)]);
}

/// Children only appear directly below an emitted parent.
#[test]
fn test_children_follow_parents_in_pre_order() {
    let dataset = RevenueDataset::new(vec![
        revenue(2025, ("1", "11", "111", "1112"), "A", dec!(10)),
        revenue(2025, ("1", "11", "111", "1111"), "A", dec!(5)),
        revenue(2025, ("1", "13", "131", "1311"), "A", dec!(7)),
    ]);
    let catalog = HierarchyCatalog::revenue();
    let engine = AggregationEngine::new(&dataset, &catalog, &UnitFilter::All);

    let result = engine.aggregate(&realized_request(HierarchyDepth::LineItem));
    let shape: Vec<(RowLevel, &str)> = result
        .nodes
        .iter()
        .map(|n| (n.level, n.code.as_str()))
        .collect();

    assert_eq!(
        shape,
        vec![
            (RowLevel::Level1, "1"),
            (RowLevel::Level2, "11"),
            (RowLevel::Level3, "111"),
            (RowLevel::Level4, "1111"),
            (RowLevel::Level4, "1112"),
            (RowLevel::Level2, "13"),
            (RowLevel::Level3, "131"),
            (RowLevel::Level4, "1311"),
        ]
    );
    assert_eq!(result.totals[0], dec!(22));
}

/// A node whose code has no name is dropped along with its subtree.
#[test]
fn test_unknown_code_is_suppressed() {
    let mut record = revenue(2025, ("1", "11", "111", "1111"), "A", dec!(10));
    record.origin_name = String::new();
    let dataset = RevenueDataset::new(vec![record]);
    let catalog = HierarchyCatalog::revenue();
    let engine = AggregationEngine::new(&dataset, &catalog, &UnitFilter::All);

    let result = engine.aggregate(&realized_request(HierarchyDepth::LineItem));

    assert_eq!(result.nodes.len(), 1);
    assert_eq!(result.nodes[0].level, RowLevel::Level1);
}

#[test]
fn test_unit_filter_restricts_records() {
    let dataset = RevenueDataset::new(vec![
        revenue(2025, ("1", "11", "111", "1111"), "A", dec!(10)),
        revenue(2025, ("1", "11", "111", "1111"), "B", dec!(32)),
    ]);
    let catalog = HierarchyCatalog::revenue();
    let unit = UnitFilter::Unit("B".to_string());
    let engine = AggregationEngine::new(&dataset, &catalog, &unit);

    let result = engine.aggregate(&realized_request(HierarchyDepth::Category));

    assert_eq!(result.totals[0], dec!(32));
    assert!(engine.has_exercise(2025));
    assert!(!engine.has_exercise(2023));
}

#[test]
fn test_admin_type_measures() {
    let mut direct = revenue(2025, ("1", "11", "111", "1111"), "A", Decimal::ZERO);
    direct.initial_forecast = dec!(100);
    direct.admin_type = Some(1);
    let mut fund = direct.clone();
    fund.initial_forecast = dec!(40);
    fund.admin_type = Some(7);
    let dataset = RevenueDataset::new(vec![direct, fund]);
    let catalog = HierarchyCatalog::revenue();
    let engine = AggregationEngine::new(&dataset, &catalog, &UnitFilter::All);

    let request = AggregationRequest::new(
        vec![
            MeasureSpec::new("adm_direta", RevenueMeasure::InitialForecast, 2025).for_admin_type(1),
            MeasureSpec::new("fundos", RevenueMeasure::InitialForecast, 2025).for_admin_type(7),
        ],
        HierarchyDepth::Origin,
    )
    .with_suppression(Suppression::NonPositiveSum);
    let result = engine.aggregate(&request);

    assert_eq!(result.nodes[0].values, vec![dec!(100), dec!(40)]);
}

#[test]
fn test_non_positive_sum_suppression() {
    let dataset = RevenueDataset::new(vec![
        revenue(2025, ("1", "11", "111", "1111"), "A", dec!(-10)),
        revenue(2025, ("2", "21", "211", "2111"), "A", dec!(3)),
    ]);
    let catalog = HierarchyCatalog::revenue();
    let engine = AggregationEngine::new(&dataset, &catalog, &UnitFilter::All);

    let request = AggregationRequest::new(
        vec![MeasureSpec::new("rr", RevenueMeasure::Realized, 2025)],
        HierarchyDepth::Category,
    )
    .with_suppression(Suppression::NonPositiveSum);
    let result = engine.aggregate(&request);

    assert_eq!(result.nodes.len(), 1);
    assert_eq!(result.nodes[0].code, "2");
}

#[test]
fn test_custom_catalog_order_is_respected() {
    let catalog = HierarchyCatalog::new(vec![
        CategoryNode::new("2", vec![OriginNode::new("21", ["211"])]),
        CategoryNode::new("1", vec![OriginNode::new("11", ["111"])]),
    ]);
    let dataset = RevenueDataset::new(vec![
        revenue(2025, ("1", "11", "111", "1111"), "A", dec!(1)),
        revenue(2025, ("2", "21", "211", "2111"), "A", dec!(2)),
    ]);
    let engine = AggregationEngine::new(&dataset, &catalog, &UnitFilter::All);

    let result = engine.aggregate(&realized_request(HierarchyDepth::Category));
    let codes: Vec<&str> = result.nodes.iter().map(|n| n.code.as_str()).collect();

    assert_eq!(codes, vec!["2", "1"]);
}

#[test]
fn test_group_appropriations() {
    let record = |category: &str, initial: Decimal, committed: Decimal| ExpenditureRecord {
        category: category.to_string(),
        initial_appropriation: initial,
        committed,
        ..ExpenditureRecord::default()
    };
    let records = vec![
        record("4", dec!(50), dec!(10)),
        record("3", dec!(100), dec!(20)),
        record("3", dec!(25), dec!(5)),
        record("", dec!(999), dec!(0)),
    ];

    let groups = group_appropriations(&records, |r| r.category.as_str());
    let codes: Vec<&str> = groups.keys().copied().collect();

    assert_eq!(codes, vec!["3", "4"]);
    assert_eq!(groups["3"].initial, dec!(125));
    assert_eq!(groups["3"].appropriation_balance(), dec!(100));
}

proptest! {
    /// Grand totals equal the sum of the emitted top-level nodes.
    #[test]
    fn test_totals_equal_sum_of_top_level(
        values in prop::collection::vec((0usize..4, -1_000i64..1_000_000, 0usize..2), 1..40),
    ) {
        let paths = [
            ("1", "11", "111", "1111"),
            ("1", "12", "121", "1211"),
            ("2", "21", "211", "2111"),
            ("7", "71", "711", "7111"),
        ];
        let records: Vec<RevenueRecord> = values
            .iter()
            .map(|&(p, v, y)| revenue(2024 + i32::try_from(y).unwrap(), paths[p], "A", Decimal::from(v)))
            .collect();
        let dataset = RevenueDataset::new(records);
        let catalog = HierarchyCatalog::revenue();
        let engine = AggregationEngine::new(&dataset, &catalog, &UnitFilter::All);

        let result = engine.aggregate(&realized_request(HierarchyDepth::LineItem));

        for (i, total) in result.totals.iter().enumerate() {
            let expected: Decimal = result.top_level().map(|n| n.values[i]).sum();
            prop_assert_eq!(*total, expected);
        }
    }

    /// Every emitted node has at least one non-zero measure.
    #[test]
    fn test_no_all_zero_rows(
        values in prop::collection::vec((0usize..2, -3i64..3), 1..30),
    ) {
        let paths = [("1", "11", "111", "1111"), ("1", "11", "112", "1121")];
        let records: Vec<RevenueRecord> = values
            .iter()
            .map(|&(p, v)| revenue(2025, paths[p], "A", Decimal::from(v)))
            .collect();
        let dataset = RevenueDataset::new(records);
        let catalog = HierarchyCatalog::revenue();
        let engine = AggregationEngine::new(&dataset, &catalog, &UnitFilter::All);

        let result = engine.aggregate(&realized_request(HierarchyDepth::LineItem));

        for node in &result.nodes {
            prop_assert!(node.values.iter().any(|v| !v.is_zero()));
        }
    }
}
