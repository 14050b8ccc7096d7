//! Revenue reports built on the hierarchical engine.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use super::service::ReportParams;
use super::types::{
    CellFormat, Column, FiscalYears, ReferenceMonth, Report, ReportKind, ReportRow, RowLevel,
    VariationMode,
};
use crate::dataset::{AdministrationType, RevenueColumn, RevenueDataset, RevenueMeasure};
use crate::engine::{
    Aggregation, AggregationEngine, AggregationRequest, HierarchyDepth, MeasureSpec, Suppression,
    YearOverYear, percent_change, share,
};
use crate::hierarchy::{CURRENT_REVENUE, HierarchyCatalog};

const LABEL_HEADER: &str = "RECEITAS";

/// Color of the total slice in the composition chart.
pub const TOTAL_COLOR: &str = "#003366";

/// Chart color for an origin of current revenue.
#[must_use]
pub fn origin_color(origin: &str) -> &'static str {
    match origin {
        "11" => "#2196F3",
        "12" => "#4CAF50",
        "13" => "#FF9800",
        "14" => "#9C27B0",
        "15" => "#F44336",
        "16" => "#00BCD4",
        "17" => "#8BC34A",
        "19" => "#607D8B",
        _ => "#9E9E9E",
    }
}

/// The updated forecast, or the initial one when the source lacks it.
fn updated_measure(dataset: &RevenueDataset) -> RevenueMeasure {
    if dataset.has_column(RevenueColumn::UpdatedForecast) {
        RevenueMeasure::UpdatedForecast
    } else {
        RevenueMeasure::InitialForecast
    }
}

/// Turns engine nodes into rows, appending the total when anything was
/// emitted. `derive` maps a node's measures to the report's columns.
fn rows_from(
    aggregation: &Aggregation,
    columns: &[Column],
    derive: impl Fn(&[Decimal]) -> Vec<Decimal>,
) -> Vec<ReportRow> {
    let mut rows: Vec<ReportRow> = aggregation
        .nodes
        .iter()
        .map(|node| {
            ReportRow::new(
                node.level,
                Some(node.code.clone()),
                node.name.clone(),
                columns,
                &derive(&node.values),
            )
        })
        .collect();

    if !aggregation.is_empty() {
        rows.push(ReportRow::total(columns, &derive(&aggregation.totals)));
    }
    rows
}

fn realized_header(month: ReferenceMonth, year: i32) -> String {
    format!("RECEITA REALIZADA {}/{year}", month.code())
}

pub(crate) fn balance(dataset: &RevenueDataset, catalog: &HierarchyCatalog, params: &ReportParams) -> Report {
    let FiscalYears { current, previous } = params.years;
    let engine = AggregationEngine::new(dataset, catalog, &params.unit);
    let month = ReferenceMonth::latest(engine.months(current));

    let columns = vec![
        Column::new("previsao_inicial", format!("PREVISÃO INICIAL {current}"), CellFormat::Money),
        Column::new("previsao_atualizada", format!("PREVISÃO ATUALIZADA {current}"), CellFormat::Money),
        Column::new("receita_realizada", realized_header(month, current), CellFormat::Money),
        Column::new("receita_anterior", realized_header(month, previous), CellFormat::Money),
        Column::new("saldo", format!("VARIAÇÃO {current} x {previous}"), CellFormat::Money),
        Column::new("variacao_percentual", "Δ%", CellFormat::SignedPercent),
    ];
    let report = Report::new(ReportKind::RevenueBalance, LABEL_HEADER, columns.clone())
        .with_reference_month(month);
    if !engine.has_exercise(current) {
        debug!(year = current, "No revenue records for the current year");
        return report;
    }

    let request = AggregationRequest::new(
        vec![
            MeasureSpec::new("previsao_inicial", RevenueMeasure::InitialForecast, current),
            MeasureSpec::new("previsao_atualizada", updated_measure(dataset), current),
            MeasureSpec::new("receita_realizada", RevenueMeasure::Realized, current),
            MeasureSpec::new("receita_anterior", RevenueMeasure::Realized, previous),
        ],
        HierarchyDepth::LineItem,
    );
    let aggregation = engine.aggregate(&request);

    let rows = rows_from(&aggregation, &columns, |v| {
        let (realized, last_year) = (v[2], v[3]);
        vec![
            v[0],
            v[1],
            realized,
            last_year,
            realized - last_year,
            percent_change(last_year, realized),
        ]
    });
    report.with_rows(rows)
}

pub(crate) fn estimate(dataset: &RevenueDataset, catalog: &HierarchyCatalog, params: &ReportParams) -> Report {
    let FiscalYears { current, previous } = params.years;
    let engine = AggregationEngine::new(dataset, catalog, &params.unit);

    let columns = vec![
        Column::new("previsao_anterior", format!("PREVISÃO {previous}"), CellFormat::Money),
        Column::new("participacao_anterior", format!("% {previous}"), CellFormat::Percent),
        Column::new("previsao_atual", format!("PREVISÃO {current}"), CellFormat::Money),
        Column::new("participacao_atual", format!("% {current}"), CellFormat::Percent),
        Column::new("variacao_percentual", "Δ%", CellFormat::SignedPercent),
    ];
    // Compares both years, so rows of the previous year alone still show.
    let report = Report::new(ReportKind::RevenueEstimate, LABEL_HEADER, columns.clone());

    let request = AggregationRequest::new(
        vec![
            MeasureSpec::new("previsao_anterior", RevenueMeasure::InitialForecast, previous),
            MeasureSpec::new("previsao_atual", RevenueMeasure::InitialForecast, current),
        ],
        HierarchyDepth::Origin,
    );
    let aggregation = engine.aggregate(&request);
    let (total_previous, total_current) = (aggregation.totals[0], aggregation.totals[1]);

    let rows = rows_from(&aggregation, &columns, |v| {
        vec![
            v[0],
            share(v[0], total_previous),
            v[1],
            share(v[1], total_current),
            percent_change(v[0], v[1]),
        ]
    });
    report.with_rows(rows)
}

pub(crate) fn by_administration(
    dataset: &RevenueDataset,
    catalog: &HierarchyCatalog,
    params: &ReportParams,
) -> Report {
    let current = params.years.current;
    let engine = AggregationEngine::new(dataset, catalog, &params.unit);

    let mut columns: Vec<Column> = AdministrationType::ALL
        .iter()
        .map(|t| Column::new(t.key(), t.label(), CellFormat::Money))
        .collect();
    columns.push(Column::new("total", "TOTAL", CellFormat::Money));
    let report = Report::new(ReportKind::RevenueByAdministration, LABEL_HEADER, columns.clone());
    if !engine.has_exercise(current) {
        return report;
    }

    let measures = AdministrationType::ALL
        .iter()
        .map(|t| MeasureSpec::new(t.key(), RevenueMeasure::InitialForecast, current).for_admin_type(t.code()))
        .collect();
    let request = AggregationRequest::new(measures, HierarchyDepth::Origin)
        .with_suppression(Suppression::NonPositiveSum);
    let aggregation = engine.aggregate(&request);

    let rows = rows_from(&aggregation, &columns, |v| {
        let mut out = v.to_vec();
        out.push(v.iter().sum());
        out
    });
    report.with_rows(rows)
}

pub(crate) fn updated_vs_initial(
    dataset: &RevenueDataset,
    catalog: &HierarchyCatalog,
    params: &ReportParams,
) -> Report {
    let current = params.years.current;
    let engine = AggregationEngine::new(dataset, catalog, &params.unit);

    let columns = vec![
        Column::new("previsao_inicial", format!("PREVISÃO INICIAL {current}"), CellFormat::Money),
        Column::new("previsao_atualizada", format!("PREVISÃO ATUALIZADA {current}"), CellFormat::Money),
        Column::new("variacao_percentual", "Δ%", CellFormat::SignedPercent),
    ];
    let report = Report::new(ReportKind::RevenueUpdatedVsInitial, LABEL_HEADER, columns.clone());
    if !engine.has_exercise(current) {
        return report;
    }

    let request = AggregationRequest::new(
        vec![
            MeasureSpec::new("previsao_inicial", RevenueMeasure::InitialForecast, current),
            MeasureSpec::new("previsao_atualizada", updated_measure(dataset), current),
        ],
        HierarchyDepth::Origin,
    );
    let aggregation = engine.aggregate(&request);

    let rows = rows_from(&aggregation, &columns, |v| {
        vec![v[0], v[1], percent_change(v[0], v[1])]
    });
    report.with_rows(rows)
}

/// One slice of the composition chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompositionSlice {
    /// Origin code.
    pub origin: String,
    /// Origin name.
    pub name: String,
    /// Realized revenue.
    pub value: Decimal,
    /// Share of the total, in percent.
    pub share: Decimal,
    /// Slice color.
    pub color: &'static str,
}

/// Chart-ready view of the composition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartData {
    /// Slice labels.
    pub labels: Vec<String>,
    /// Slice values.
    pub values: Vec<Decimal>,
    /// Slice colors.
    pub colors: Vec<&'static str>,
    /// Sum of the slices.
    pub total: Decimal,
    /// Rendered total.
    pub total_display: String,
    /// Color of the total.
    pub total_color: &'static str,
}

/// Current revenue broken down by origin, largest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompositionReport {
    /// Tabular form.
    pub report: Report,
    /// Slices in display order.
    pub slices: Vec<CompositionSlice>,
    /// Chart arrays.
    pub chart: ChartData,
}

pub(crate) fn composition(
    dataset: &RevenueDataset,
    catalog: &HierarchyCatalog,
    params: &ReportParams,
) -> CompositionReport {
    let current = params.years.current;
    let engine = AggregationEngine::new(dataset, catalog, &params.unit);
    let month = ReferenceMonth::latest(engine.months(current));

    let columns = vec![
        Column::new("receita_realizada", realized_header(month, current), CellFormat::Money),
        Column::new("participacao", "PARTICIPAÇÃO", CellFormat::PercentOneDecimal),
    ];
    let measures = [MeasureSpec::new("receita_realizada", RevenueMeasure::Realized, current)];

    let mut slices: Vec<CompositionSlice> = catalog
        .category(CURRENT_REVENUE)
        .map(|category| {
            category
                .origins
                .iter()
                .filter_map(|origin| {
                    let value = engine.origin_values(CURRENT_REVENUE, &origin.code, &measures)[0];
                    let name = engine.names().origin.get(&origin.code)?;
                    (value > Decimal::ZERO).then(|| CompositionSlice {
                        origin: origin.code.clone(),
                        name: name.to_string(),
                        value,
                        share: Decimal::ZERO,
                        color: origin_color(&origin.code),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    slices.sort_by(|a, b| b.value.cmp(&a.value));
    let total: Decimal = slices.iter().map(|s| s.value).sum();
    for slice in &mut slices {
        slice.share = share(slice.value, total);
    }

    let mut rows: Vec<ReportRow> = slices
        .iter()
        .map(|s| {
            ReportRow::new(
                RowLevel::Level1,
                Some(s.origin.clone()),
                s.name.clone(),
                &columns,
                &[s.value, s.share],
            )
        })
        .collect();
    if !slices.is_empty() {
        rows.push(ReportRow::total(&columns, &[total, share(total, total)]));
    }

    let chart = ChartData {
        labels: slices.iter().map(|s| s.name.clone()).collect(),
        values: slices.iter().map(|s| s.value).collect(),
        colors: slices.iter().map(|s| s.color).collect(),
        total,
        total_display: CellFormat::Money.render(total),
        total_color: TOTAL_COLOR,
    };

    CompositionReport {
        report: Report::new(ReportKind::RevenueComposition, "ORIGEM", columns)
            .with_reference_month(month)
            .with_rows(rows),
        slices,
        chart,
    }
}

pub(crate) fn variation(
    dataset: &RevenueDataset,
    catalog: &HierarchyCatalog,
    params: &ReportParams,
    mode: VariationMode,
) -> Report {
    let FiscalYears { current, previous } = params.years;
    let engine = AggregationEngine::new(dataset, catalog, &params.unit);
    let month = ReferenceMonth::latest(engine.months(current));

    let (base_header, current_header) = match mode {
        VariationMode::Annual => (format!("PREVISÃO {previous}"), format!("PREVISÃO {current}")),
        VariationMode::ForecastVsRealized => {
            (format!("PREVISTO {current}"), realized_header(month, current))
        }
    };
    let columns = vec![
        Column::new("valor_base", base_header, CellFormat::Money),
        Column::new("valor_atual", current_header, CellFormat::Money),
        Column::new("variacao_absoluta", "VARIAÇÃO ABSOLUTA", CellFormat::Money),
        Column::new("variacao_percentual", "VARIAÇÃO %", CellFormat::SignedPercent),
    ];
    let report = Report::new(mode.kind(), "ITEM", columns.clone()).with_reference_month(month);

    let comparable = match mode {
        VariationMode::Annual => engine.has_exercise(previous) && engine.has_exercise(current),
        VariationMode::ForecastVsRealized => engine.has_exercise(current),
    };
    if !comparable {
        debug!(?mode, year = current, "Not enough years for variation analysis");
        return report;
    }

    let measures = match mode {
        VariationMode::Annual => vec![
            MeasureSpec::new("valor_base", RevenueMeasure::InitialForecast, previous),
            MeasureSpec::new("valor_atual", RevenueMeasure::InitialForecast, current),
        ],
        VariationMode::ForecastVsRealized => vec![
            MeasureSpec::new("valor_base", RevenueMeasure::InitialForecast, current),
            MeasureSpec::new("valor_atual", RevenueMeasure::Realized, current),
        ],
    };
    let request = AggregationRequest::new(measures, HierarchyDepth::Category)
        .with_suppression(Suppression::NoPositiveValue);

    let rows = engine
        .aggregate(&request)
        .nodes
        .into_iter()
        .map(|node| {
            let yoy = YearOverYear::between(node.values[0], node.values[1]);
            ReportRow::new(
                node.level,
                Some(node.code),
                node.name,
                &columns,
                &[yoy.base, yoy.current, yoy.change, yoy.change_percentage],
            )
        })
        .collect();
    report.with_rows(rows)
}
