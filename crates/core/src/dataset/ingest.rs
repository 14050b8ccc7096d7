//! Spreadsheet ingestion using calamine.
//!
//! The first worksheet of each workbook is read. The first row is the header;
//! columns are matched by name (trimmed, case-insensitive) so their order in
//! the file does not matter.

use std::collections::BTreeMap;
use std::path::Path;

use calamine::{Data, Range, Reader, open_workbook_auto};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use tracing::{debug, warn};

use super::error::IngestError;
use super::types::{
    ExpenditureColumn, ExpenditureDataset, ExpenditureRecord, RevenueColumn, RevenueDataset,
    RevenueRecord,
};
use crate::names::NameMap;

/// Header of the classification code column.
pub const CLASSIFICATION_CODE: &str = "COCLASSEORC";
/// Header of the classification name column.
pub const CLASSIFICATION_NAME: &str = "NOCLASSIFICACAO";

/// Reads the revenue workbook.
pub fn read_revenue(path: &Path) -> Result<RevenueDataset, IngestError> {
    let range = first_sheet(path)?;
    let dataset = revenue_from_rows(range.rows());
    debug!(
        path = %path.display(),
        records = dataset.records.len(),
        "Read revenue workbook"
    );
    Ok(dataset)
}

/// Reads the expenditure workbook.
pub fn read_expenditure(path: &Path) -> Result<ExpenditureDataset, IngestError> {
    let range = first_sheet(path)?;
    let dataset = expenditure_from_rows(range.rows());
    debug!(
        path = %path.display(),
        records = dataset.records.len(),
        "Read expenditure workbook"
    );
    Ok(dataset)
}

/// Reads the budget classification workbook into a code to name map.
pub fn read_classification(path: &Path) -> Result<NameMap, IngestError> {
    let range = first_sheet(path)?;
    let mut rows = range.rows();
    let header = rows.next().unwrap_or(&[]);
    let code_at = position(header, CLASSIFICATION_CODE).ok_or_else(|| IngestError::MissingColumn {
        column: CLASSIFICATION_CODE,
        path: path.to_path_buf(),
    })?;
    let name_at = position(header, CLASSIFICATION_NAME).ok_or_else(|| IngestError::MissingColumn {
        column: CLASSIFICATION_NAME,
        path: path.to_path_buf(),
    })?;

    let pairs: Vec<(String, String)> = rows
        .map(|row| {
            (
                row.get(code_at).map(cell_text).unwrap_or_default(),
                row.get(name_at).map(cell_text).unwrap_or_default(),
            )
        })
        .filter(|(code, _)| !code.is_empty())
        .collect();

    Ok(NameMap::from_pairs(
        pairs.iter().map(|(c, n)| (c.as_str(), n.as_str())),
    ))
}

fn first_sheet(path: &Path) -> Result<Range<Data>, IngestError> {
    if !path.exists() {
        return Err(IngestError::NotFound(path.to_path_buf()));
    }
    let mut workbook = open_workbook_auto(path)?;
    let name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| IngestError::NoSheets(path.to_path_buf()))?;
    Ok(workbook.worksheet_range(&name)?)
}

/// Builds revenue records from raw rows, the first being the header.
pub fn revenue_from_rows<'a>(mut rows: impl Iterator<Item = &'a [Data]>) -> RevenueDataset {
    let header = rows.next().unwrap_or(&[]);
    let index = header_index(header, &RevenueColumn::ALL, RevenueColumn::header);
    warn_missing(&index, &[RevenueColumn::Exercise, RevenueColumn::Category], RevenueColumn::header);

    let records = rows
        .filter(|row| !is_blank(row))
        .map(|row| {
            let row = RowReader { row, index: &index };
            RevenueRecord {
                exercise: row.year(RevenueColumn::Exercise),
                month: row.month(RevenueColumn::Month),
                category: row.text(RevenueColumn::Category),
                category_name: row.text(RevenueColumn::CategoryName),
                origin: row.text(RevenueColumn::Origin),
                origin_name: row.text(RevenueColumn::OriginName),
                species: row.text(RevenueColumn::Species),
                species_name: row.text(RevenueColumn::SpeciesName),
                line_item: row.text(RevenueColumn::LineItem),
                line_item_name: row.text(RevenueColumn::LineItemName),
                unit: row.text(RevenueColumn::Unit),
                admin_type: row
                    .integer(RevenueColumn::AdminType)
                    .and_then(|v| i32::try_from(v).ok()),
                current_account: Some(row.text(RevenueColumn::CurrentAccount))
                    .filter(|s| !s.is_empty()),
                initial_forecast: row.decimal(RevenueColumn::InitialForecast),
                updated_forecast: row.decimal(RevenueColumn::UpdatedForecast),
                realized: row.decimal(RevenueColumn::Realized),
            }
        })
        .collect();

    RevenueDataset {
        records,
        columns: index.keys().copied().collect(),
    }
}

/// Builds expenditure records from raw rows, the first being the header.
pub fn expenditure_from_rows<'a>(mut rows: impl Iterator<Item = &'a [Data]>) -> ExpenditureDataset {
    let header = rows.next().unwrap_or(&[]);
    let index = header_index(header, &ExpenditureColumn::ALL, ExpenditureColumn::header);
    warn_missing(
        &index,
        &[ExpenditureColumn::Exercise, ExpenditureColumn::Category],
        ExpenditureColumn::header,
    );

    let records = rows
        .filter(|row| !is_blank(row))
        .map(|row| {
            let row = RowReader { row, index: &index };
            ExpenditureRecord {
                exercise: row.year(ExpenditureColumn::Exercise),
                month: row.month(ExpenditureColumn::Month),
                unit: row.text(ExpenditureColumn::Unit),
                admin_type: row
                    .integer(ExpenditureColumn::AdminType)
                    .and_then(|v| i32::try_from(v).ok()),
                category: row.text(ExpenditureColumn::Category),
                category_name: row.text(ExpenditureColumn::CategoryName),
                group: row.text(ExpenditureColumn::Group),
                group_name: row.text(ExpenditureColumn::GroupName),
                modality: row.text(ExpenditureColumn::Modality),
                modality_name: row.text(ExpenditureColumn::ModalityName),
                element: row.text(ExpenditureColumn::Element),
                element_name: row.text(ExpenditureColumn::ElementName),
                initial_appropriation: row.decimal(ExpenditureColumn::InitialAppropriation),
                additional_appropriation: row.decimal(ExpenditureColumn::AdditionalAppropriation),
                cancellation: row.decimal(ExpenditureColumn::Cancellation),
                cancellation_remanagement: row
                    .decimal(ExpenditureColumn::CancellationRemanagement),
                committed: row.decimal(ExpenditureColumn::Committed),
                settled: row.decimal(ExpenditureColumn::Settled),
                paid: row.decimal(ExpenditureColumn::Paid),
            }
        })
        .collect();

    ExpenditureDataset {
        records,
        columns: index.keys().copied().collect(),
    }
}

fn header_index<C: Copy + Ord>(
    header: &[Data],
    columns: &[C],
    name: fn(C) -> &'static str,
) -> BTreeMap<C, usize> {
    columns
        .iter()
        .filter_map(|&c| position(header, name(c)).map(|at| (c, at)))
        .collect()
}

fn position(header: &[Data], name: &str) -> Option<usize> {
    header
        .iter()
        .position(|cell| cell_text(cell).to_uppercase() == name)
}

fn warn_missing<C: Copy + Ord>(index: &BTreeMap<C, usize>, required: &[C], name: fn(C) -> &'static str) {
    for &column in required {
        if !index.contains_key(&column) {
            warn!(column = name(column), "Source header lacks column; reports will be empty");
        }
    }
}

fn is_blank(row: &[Data]) -> bool {
    row.iter().all(|cell| matches!(cell, Data::Empty))
}

struct RowReader<'r, C> {
    row: &'r [Data],
    index: &'r BTreeMap<C, usize>,
}

impl<C: Ord> RowReader<'_, C> {
    fn cell(&self, column: C) -> Option<&Data> {
        self.index.get(&column).and_then(|&at| self.row.get(at))
    }

    fn text(&self, column: C) -> String {
        self.cell(column).map(cell_text).unwrap_or_default()
    }

    fn decimal(&self, column: C) -> Decimal {
        self.cell(column).and_then(cell_decimal).unwrap_or_default()
    }

    fn integer(&self, column: C) -> Option<i64> {
        self.cell(column).and_then(cell_decimal).and_then(|d| d.trunc().to_i64())
    }

    fn year(&self, column: C) -> i32 {
        self.integer(column)
            .and_then(|v| i32::try_from(v).ok())
            .unwrap_or_default()
    }

    fn month(&self, column: C) -> u8 {
        self.integer(column)
            .and_then(|v| u8::try_from(v).ok())
            .unwrap_or_default()
    }
}

/// Renders a cell as trimmed text. Integral numbers lose their `.0`, so a
/// code typed as a number reads the same as one typed as text.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => Decimal::from_f64(*f)
            .map(|d| d.normalize().to_string())
            .unwrap_or_default(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => Decimal::from_f64(dt.as_f64())
            .map(|d| d.normalize().to_string())
            .unwrap_or_default(),
    }
}

/// Reads a cell as a decimal. Blank or non-numeric cells give `None`.
pub fn cell_decimal(cell: &Data) -> Option<Decimal> {
    match cell {
        Data::Int(i) => Some(Decimal::from(*i)),
        Data::Float(f) => Decimal::from_f64(*f),
        Data::String(s) => s.trim().parse().ok(),
        Data::Bool(b) => Some(Decimal::from(u8::from(*b))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn s(v: &str) -> Data {
        Data::String(v.to_string())
    }

    fn revenue_sheet() -> Vec<Vec<Data>> {
        vec![
            vec![
                s("NOUG"),
                s("coexercicio"),
                s("CATEGORIA"),
                s("NOCATEGORIARECEITA"),
                s("ORIGEM"),
                s("RECEITA LIQUIDA"),
                s("INMES"),
                s("INTIPOADM"),
            ],
            vec![
                s("SEFAZ"),
                Data::Float(2025.0),
                Data::Float(1.0),
                s("Receitas Correntes"),
                s("11"),
                Data::Float(1234.56),
                Data::Int(5),
                Data::Float(3.0),
            ],
            vec![Data::Empty; 8],
            vec![
                s("DETRAN"),
                Data::Int(2024),
                s("2"),
                s(" Receitas de Capital "),
                Data::Empty,
                s("oops"),
                Data::Empty,
                Data::Empty,
            ],
        ]
    }

    #[test]
    fn test_revenue_from_rows_maps_headers_by_name() {
        let sheet = revenue_sheet();
        let dataset = revenue_from_rows(sheet.iter().map(Vec::as_slice));

        assert_eq!(dataset.records.len(), 2);
        let first = &dataset.records[0];
        assert_eq!(first.exercise, 2025);
        assert_eq!(first.month, 5);
        assert_eq!(first.category, "1");
        assert_eq!(first.origin, "11");
        assert_eq!(first.unit, "SEFAZ");
        assert_eq!(first.admin_type, Some(3));
        assert_eq!(first.realized, dec!(1234.56));

        let second = &dataset.records[1];
        assert_eq!(second.category_name, "Receitas de Capital");
        assert_eq!(second.realized, Decimal::ZERO);
        assert_eq!(second.admin_type, None);
    }

    #[test]
    fn test_missing_columns_read_as_zero_and_absent() {
        let sheet = revenue_sheet();
        let dataset = revenue_from_rows(sheet.iter().map(Vec::as_slice));

        assert!(dataset.has_column(RevenueColumn::Realized));
        assert!(!dataset.has_column(RevenueColumn::UpdatedForecast));
        assert!(dataset.records.iter().all(|r| r.initial_forecast.is_zero()));
        assert!(dataset.records.iter().all(|r| r.current_account.is_none()));
    }

    #[test]
    fn test_empty_sheet() {
        let dataset = expenditure_from_rows(std::iter::empty());
        assert!(dataset.records.is_empty());
        assert!(dataset.columns.is_empty());
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&Data::Float(11.0)), "11");
        assert_eq!(cell_text(&Data::Float(1.5)), "1.5");
        assert_eq!(cell_text(&Data::Int(42)), "42");
        assert_eq!(cell_text(&s("  abc ")), "abc");
        assert_eq!(cell_text(&Data::Empty), "");
    }

    #[test]
    fn test_cell_decimal() {
        assert_eq!(cell_decimal(&Data::Float(0.1)), Some(dec!(0.1)));
        assert_eq!(cell_decimal(&s("10.50")), Some(dec!(10.50)));
        assert_eq!(cell_decimal(&s("n/a")), None);
        assert_eq!(cell_decimal(&Data::Empty), None);
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_revenue(Path::new("/nonexistent/RECEITA.xlsx")).unwrap_err();
        assert!(matches!(err, IngestError::NotFound(_)));
    }
}
