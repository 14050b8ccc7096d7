//! Report types.

use orcamento_shared::{Money, Percent, SignedPercent};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use crate::engine::RowLevel;

/// Label of the grand-total row.
pub const TOTAL_LABEL: &str = "TOTAL GERAL";

/// Every report the engine can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    /// Revenue balance: forecasts and realized revenue against last year.
    RevenueBalance,
    /// Initial forecast of the current year against the previous one.
    RevenueEstimate,
    /// Initial forecast split by administration type.
    RevenueByAdministration,
    /// Updated forecast against initial forecast.
    RevenueUpdatedVsInitial,
    /// Composition of current revenue by origin.
    RevenueComposition,
    /// Realized revenue by current-account classification.
    RevenueByCurrentAccount,
    /// Expenditure balance by category and group.
    ExpenditureBalance,
    /// Expenditure by element (nature).
    ExpenditureByNature,
    /// Expenditure by application modality.
    ExpenditureByModality,
    /// Initial forecast per category, previous year against current.
    RevenueAnnualVariation,
    /// Current-year initial forecast against realized revenue per category.
    RevenueForecastVsRealized,
}

impl ReportKind {
    /// Report title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::RevenueBalance => "Balanço Orçamentário da Receita",
            Self::RevenueEstimate => "Receita Estimada",
            Self::RevenueByAdministration => "Receita por Tipo de Administração",
            Self::RevenueUpdatedVsInitial => "Previsão Atualizada x Previsão Inicial",
            Self::RevenueComposition => "Composição da Receita Corrente",
            Self::RevenueByCurrentAccount => "Receita por Conta Corrente",
            Self::ExpenditureBalance => "Balanço Orçamentário da Despesa",
            Self::ExpenditureByNature => "Despesa por Natureza",
            Self::ExpenditureByModality => "Despesa por Modalidade de Aplicação",
            Self::RevenueAnnualVariation => "Análise de Variações: Exercício Anterior x Atual",
            Self::RevenueForecastVsRealized => "Análise de Variações: Previsto x Realizado",
        }
    }
}

/// Comparison made by the variation analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariationMode {
    /// Initial forecast, previous year against current year.
    #[default]
    #[serde(alias = "anual")]
    Annual,
    /// Initial forecast against realized revenue, current year.
    #[serde(alias = "previsao")]
    ForecastVsRealized,
}

impl VariationMode {
    /// Report produced in this mode.
    #[must_use]
    pub const fn kind(self) -> ReportKind {
        match self {
            Self::Annual => ReportKind::RevenueAnnualVariation,
            Self::ForecastVsRealized => ReportKind::RevenueForecastVsRealized,
        }
    }
}

/// How a column's values are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellFormat {
    /// `R$ 1.234,56`
    Money,
    /// `25,00%`
    Percent,
    /// `25,0%`
    PercentOneDecimal,
    /// `+25,00%`
    SignedPercent,
}

impl CellFormat {
    /// Renders a value.
    #[must_use]
    pub fn render(self, value: Decimal) -> String {
        match self {
            Self::Money => Money::new(value).to_string(),
            Self::Percent => Percent::new(value).to_string(),
            Self::PercentOneDecimal => Percent::new(value).with_decimals(1).to_string(),
            Self::SignedPercent => SignedPercent::new(value).to_string(),
        }
    }
}

/// A numeric column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    /// Stable key, also used on each cell.
    pub key: &'static str,
    /// Header shown in tables and exports.
    pub header: String,
    /// Rendering.
    pub format: CellFormat,
}

impl Column {
    /// Creates a column.
    pub fn new(key: &'static str, header: impl Into<String>, format: CellFormat) -> Self {
        Self {
            key,
            header: header.into(),
            format,
        }
    }
}

/// One numeric value of a row, with its rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cell {
    /// Column key.
    pub key: &'static str,
    /// Raw value.
    pub value: Decimal,
    /// Rendered value.
    pub display: String,
}

/// A report row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    /// Level in the hierarchy.
    pub level: RowLevel,
    /// Classification code, absent on the total row.
    pub code: Option<String>,
    /// Name without indentation.
    pub label: String,
    /// Values in column order.
    pub cells: Vec<Cell>,
}

impl ReportRow {
    /// Builds a row, rendering `values` with the matching `columns`.
    #[must_use]
    pub fn new(
        level: RowLevel,
        code: Option<String>,
        label: impl Into<String>,
        columns: &[Column],
        values: &[Decimal],
    ) -> Self {
        let cells = columns
            .iter()
            .zip(values)
            .map(|(column, &value)| Cell {
                key: column.key,
                value,
                display: column.format.render(value),
            })
            .collect();

        Self {
            level,
            code,
            label: label.into(),
            cells,
        }
    }

    /// Builds the grand-total row.
    #[must_use]
    pub fn total(columns: &[Column], values: &[Decimal]) -> Self {
        Self::new(RowLevel::Total, None, TOTAL_LABEL, columns, values)
    }

    /// Raw value of a column.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<Decimal> {
        self.cell(key).map(|c| c.value)
    }

    /// Rendered value of a column.
    #[must_use]
    pub fn display(&self, key: &str) -> Option<&str> {
        self.cell(key).map(|c| c.display.as_str())
    }

    /// Label indented two spaces per nesting level.
    #[must_use]
    pub fn display_label(&self) -> String {
        format!("{}{}", "  ".repeat(self.level.depth()), self.label)
    }

    fn cell(&self, key: &str) -> Option<&Cell> {
        self.cells.iter().find(|c| c.key == key)
    }
}

/// Month of the latest data in the current fiscal year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceMonth(u8);

const MONTH_NAMES: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

impl ReferenceMonth {
    /// December, used when no month is known.
    pub const DECEMBER: Self = Self(12);

    /// Latest valid month among `months`, or December if there is none.
    pub fn latest(months: impl IntoIterator<Item = u8>) -> Self {
        months
            .into_iter()
            .filter(|m| (1..=12).contains(m))
            .max()
            .map_or(Self::DECEMBER, Self)
    }

    /// Month number, 1 to 12.
    #[must_use]
    pub const fn number(self) -> u8 {
        self.0
    }

    /// Two-digit code, as in `05`.
    #[must_use]
    pub fn code(self) -> String {
        format!("{:02}", self.0)
    }

    /// Portuguese month name.
    #[must_use]
    pub fn name(self) -> &'static str {
        MONTH_NAMES[usize::from(self.0.clamp(1, 12)) - 1]
    }
}

/// The fiscal year being reported and the one it is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiscalYears {
    /// Current fiscal year.
    pub current: i32,
    /// Comparison year.
    pub previous: i32,
}

impl FiscalYears {
    /// `current` compared against the year before.
    #[must_use]
    pub const fn new(current: i32) -> Self {
        Self {
            current,
            previous: current - 1,
        }
    }
}

/// Tabular form of a report: one header row and the body, all text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableExport {
    /// Header rows.
    pub head: Vec<Vec<String>>,
    /// Body rows, including the total.
    pub body: Vec<Vec<String>>,
}

/// A rendered report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Which report this is.
    pub kind: ReportKind,
    /// Title.
    pub title: String,
    /// Header of the label column.
    pub label_header: String,
    /// Header of a leading code column, if the export shows codes.
    pub code_header: Option<String>,
    /// Month of the latest data, where relevant.
    pub reference_month: Option<ReferenceMonth>,
    /// Numeric columns.
    pub columns: Vec<Column>,
    /// Rows, total last.
    pub rows: Vec<ReportRow>,
    /// Top-level rows and the total, for charts and summaries.
    pub analysis: Vec<ReportRow>,
}

impl Report {
    /// Creates a report with no rows.
    pub fn new(kind: ReportKind, label_header: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            kind,
            title: kind.title().to_string(),
            label_header: label_header.into(),
            code_header: None,
            reference_month: None,
            columns,
            rows: Vec::new(),
            analysis: Vec::new(),
        }
    }

    /// Sets the rows and derives the analysis subset.
    #[must_use]
    pub fn with_rows(mut self, rows: Vec<ReportRow>) -> Self {
        self.analysis = rows
            .iter()
            .filter(|r| matches!(r.level, RowLevel::Level1 | RowLevel::Total))
            .cloned()
            .collect();
        self.rows = rows;
        self
    }

    /// Sets the reference month.
    #[must_use]
    pub const fn with_reference_month(mut self, month: ReferenceMonth) -> Self {
        self.reference_month = Some(month);
        self
    }

    /// Shows row codes in a leading export column.
    #[must_use]
    pub fn with_code_header(mut self, header: impl Into<String>) -> Self {
        self.code_header = Some(header.into());
        self
    }

    /// Returns true if the report has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The grand-total row, if any.
    #[must_use]
    pub fn total(&self) -> Option<&ReportRow> {
        self.rows.iter().find(|r| r.level == RowLevel::Total)
    }

    /// Looks up a non-total row by code.
    #[must_use]
    pub fn row(&self, code: &str) -> Option<&ReportRow> {
        self.rows.iter().find(|r| r.code.as_deref() == Some(code))
    }

    /// Converts the report to text rows for PDF or spreadsheet export.
    #[must_use]
    pub fn export(&self) -> TableExport {
        let mut header = Vec::with_capacity(self.columns.len() + 2);
        if let Some(code_header) = &self.code_header {
            header.push(code_header.clone());
        }
        header.push(self.label_header.clone());
        header.extend(self.columns.iter().map(|c| c.header.clone()));

        let body = self
            .rows
            .iter()
            .map(|row| {
                let mut line = Vec::with_capacity(header.len());
                if self.code_header.is_some() {
                    line.push(row.code.clone().unwrap_or_default());
                }
                line.push(row.display_label());
                line.extend(row.cells.iter().map(|c| c.display.clone()));
                line
            })
            .collect();

        TableExport {
            head: vec![header],
            body,
        }
    }
}
