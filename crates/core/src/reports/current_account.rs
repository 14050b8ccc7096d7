//! Realized revenue by current-account classification.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::warn;

use super::service::ReportParams;
use super::types::{CellFormat, Column, ReferenceMonth, Report, ReportKind, ReportRow, RowLevel};
use crate::dataset::{RevenueColumn, RevenueDataset};
use crate::names::NameMap;

/// Leading characters of the current-account code that form the
/// classification code.
pub const CLASSIFICATION_CODE_LEN: usize = 8;

/// Label when the classification table could not be loaded.
pub const NAME_UNAVAILABLE: &str = "Nome não encontrado";
/// Label when the table lacks the code.
pub const NAME_NOT_FOUND: &str = "Classificação não encontrada";

/// Classification code of a current-account code.
#[must_use]
pub fn classification_code(current_account: &str) -> String {
    current_account.chars().take(CLASSIFICATION_CODE_LEN).collect()
}

pub(crate) fn by_current_account(
    dataset: &RevenueDataset,
    classification: Option<&NameMap>,
    params: &ReportParams,
) -> Report {
    let current = params.years.current;
    let month = ReferenceMonth::latest(
        dataset
            .filtered(&params.unit)
            .filter(|r| r.exercise == current)
            .map(|r| r.month),
    );

    let columns = vec![Column::new(
        "receita_realizada",
        format!("RECEITA REALIZADA {}/{current}", month.code()),
        CellFormat::Money,
    )];
    let report = Report::new(ReportKind::RevenueByCurrentAccount, "CLASSIFICAÇÃO ORÇAMENTÁRIA", columns.clone())
        .with_code_header("CÓDIGO")
        .with_reference_month(month);

    if !dataset.has_column(RevenueColumn::CurrentAccount) {
        warn!("Revenue source has no current-account column");
        return report;
    }

    let mut sums: BTreeMap<String, Decimal> = BTreeMap::new();
    for record in dataset.filtered(&params.unit).filter(|r| r.exercise == current) {
        if let Some(account) = &record.current_account {
            *sums.entry(classification_code(account)).or_default() += record.realized;
        }
    }

    let mut entries: Vec<(String, Decimal)> = sums.into_iter().filter(|(_, v)| *v > Decimal::ZERO).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));

    let total: Decimal = entries.iter().map(|(_, v)| *v).sum();
    let mut rows: Vec<ReportRow> = entries
        .into_iter()
        .map(|(code, value)| {
            let name = match classification {
                None => NAME_UNAVAILABLE,
                Some(map) => map.get(&code).unwrap_or(NAME_NOT_FOUND),
            };
            ReportRow::new(RowLevel::Level1, Some(code), name, &columns, &[value])
        })
        .collect();
    if !rows.is_empty() {
        rows.push(ReportRow::total(&columns, &[total]));
    }

    report.with_rows(rows)
}
