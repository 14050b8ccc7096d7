//! Expenditure reports.
//!
//! Only current-year records count. Groups whose measures are all zero are
//! dropped, and totals sum the emitted top-level rows.

use rust_decimal::Decimal;

use super::service::ReportParams;
use super::types::{CellFormat, Column, ReferenceMonth, Report, ReportKind, ReportRow, RowLevel};
use crate::dataset::{ExpenditureColumn, ExpenditureDataset, ExpenditureRecord};
use crate::engine::{AppropriationTotals, group_appropriations};
use crate::names::{ExpenditureNames, NameMap};

const LABEL_HEADER: &str = "DESPESAS";

fn current_records<'a>(dataset: &'a ExpenditureDataset, params: &'a ReportParams) -> Vec<&'a ExpenditureRecord> {
    dataset
        .filtered(&params.unit)
        .filter(|r| r.exercise == params.years.current)
        .collect()
}

fn label(names: &NameMap, code: &str) -> String {
    names.get(code).unwrap_or(code).to_string()
}

fn balance_columns() -> Vec<Column> {
    vec![
        Column::new("dotacao_inicial", "DOTAÇÃO INICIAL", CellFormat::Money),
        Column::new("dotacao_atualizada", "DOTAÇÃO ATUALIZADA", CellFormat::Money),
        Column::new("despesa_empenhada", "DESPESAS EMPENHADAS", CellFormat::Money),
        Column::new("despesa_liquidada", "DESPESAS LIQUIDADAS", CellFormat::Money),
        Column::new("despesa_paga", "DESPESAS PAGAS", CellFormat::Money),
        Column::new("saldo_dotacao", "SALDO DA DOTAÇÃO", CellFormat::Money),
    ]
}

fn balance_values(t: &AppropriationTotals) -> [Decimal; 6] {
    [
        t.initial,
        t.updated_appropriation(),
        t.committed,
        t.settled,
        t.paid,
        t.appropriation_balance(),
    ]
}

pub(crate) fn balance(dataset: &ExpenditureDataset, params: &ReportParams) -> Report {
    let records = current_records(dataset, params);
    let month = ReferenceMonth::latest(records.iter().map(|r| r.month));
    let columns = balance_columns();
    let report = Report::new(ReportKind::ExpenditureBalance, LABEL_HEADER, columns.clone())
        .with_reference_month(month);
    if records.is_empty() {
        return report;
    }

    let names = ExpenditureNames::build(dataset);
    let mut rows = Vec::new();
    let mut total = AppropriationTotals::default();

    let categories = group_appropriations(records.iter().copied(), |r| r.category.as_str());
    for (category, sums) in categories {
        if sums.is_zero() {
            continue;
        }
        total += sums;
        rows.push(ReportRow::new(
            RowLevel::Level1,
            Some(category.to_string()),
            label(&names.category, category),
            &columns,
            &balance_values(&sums),
        ));

        let groups = group_appropriations(
            records.iter().copied().filter(|r| r.category == category),
            |r| r.group.as_str(),
        );
        for (group, sums) in groups {
            if sums.is_zero() {
                continue;
            }
            rows.push(ReportRow::new(
                RowLevel::Level2,
                Some(group.to_string()),
                label(&names.group, group),
                &columns,
                &balance_values(&sums),
            ));
        }
    }

    if !rows.is_empty() {
        rows.push(ReportRow::total(&columns, &balance_values(&total)));
    }
    report.with_rows(rows)
}

/// A flat grouping by one classification, with a fixed column set.
fn flat(
    dataset: &ExpenditureDataset,
    params: &ReportParams,
    report: Report,
    code_column: ExpenditureColumn,
    key: fn(&ExpenditureRecord) -> &str,
    names: &NameMap,
    values: fn(&AppropriationTotals) -> Vec<Decimal>,
) -> Report {
    let records = current_records(dataset, params);
    let report = report.with_reference_month(ReferenceMonth::latest(records.iter().map(|r| r.month)));
    if records.is_empty() || !dataset.has_column(code_column) {
        return report;
    }

    let mut rows = Vec::new();
    let mut total = AppropriationTotals::default();
    for (code, sums) in group_appropriations(records.iter().copied(), key) {
        if sums.is_zero() {
            continue;
        }
        total += sums;
        rows.push(ReportRow::new(
            RowLevel::Level1,
            Some(code.to_string()),
            label(names, code),
            &report.columns,
            &values(&sums),
        ));
    }

    if !rows.is_empty() {
        rows.push(ReportRow::total(&report.columns, &values(&total)));
    }
    report.with_rows(rows)
}

pub(crate) fn by_nature(dataset: &ExpenditureDataset, params: &ReportParams) -> Report {
    let columns = vec![
        Column::new("dotacao_inicial", "DOTAÇÃO INICIAL", CellFormat::Money),
        Column::new("dotacao_atualizada", "DOTAÇÃO ATUALIZADA", CellFormat::Money),
        Column::new("despesa_empenhada", "DESPESAS EMPENHADAS", CellFormat::Money),
        Column::new("saldo_dotacao", "SALDO DA DOTAÇÃO", CellFormat::Money),
    ];
    let names = ExpenditureNames::build(dataset);
    flat(
        dataset,
        params,
        Report::new(ReportKind::ExpenditureByNature, "NATUREZA DA DESPESA", columns),
        ExpenditureColumn::Element,
        |r| r.element.as_str(),
        &names.element,
        |t| {
            vec![
                t.initial,
                t.updated_appropriation(),
                t.committed,
                t.appropriation_balance(),
            ]
        },
    )
}

pub(crate) fn by_modality(dataset: &ExpenditureDataset, params: &ReportParams) -> Report {
    let names = ExpenditureNames::build(dataset);
    flat(
        dataset,
        params,
        Report::new(ReportKind::ExpenditureByModality, "MODALIDADE DE APLICAÇÃO", balance_columns()),
        ExpenditureColumn::Modality,
        |r| r.modality.as_str(),
        &names.modality,
        |t| balance_values(t).to_vec(),
    )
}
