//! Typed records for the revenue and expenditure sources.

use std::collections::BTreeSet;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Sentinel that selects every administrative unit.
pub const ALL_UNITS: &str = "todos";

/// Which source a dataset was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    /// Revenue spreadsheet.
    Revenue,
    /// Expenditure spreadsheet.
    Expenditure,
}

impl DatasetKind {
    /// Logical key used when caching snapshots of this source.
    #[must_use]
    pub const fn cache_key(self) -> &'static str {
        match self {
            Self::Revenue => "receita",
            Self::Expenditure => "despesa",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cache_key())
    }
}

/// Columns of the revenue spreadsheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevenueColumn {
    /// `COEXERCICIO`
    Exercise,
    /// `INMES`
    Month,
    /// `CATEGORIA`
    Category,
    /// `NOCATEGORIARECEITA`
    CategoryName,
    /// `ORIGEM`
    Origin,
    /// `NOFONTERECEITA`
    OriginName,
    /// `ESPECIE`
    Species,
    /// `NOSUBFONTERECEITA`
    SpeciesName,
    /// `ALINEA`
    LineItem,
    /// `NOALINEA`
    LineItemName,
    /// `NOUG`
    Unit,
    /// `INTIPOADM`
    AdminType,
    /// `COCONTACORRENTE`
    CurrentAccount,
    /// `PREVISAO INICIAL LIQUIDA`
    InitialForecast,
    /// `PREVISAO ATUALIZADA LIQUIDA`
    UpdatedForecast,
    /// `RECEITA LIQUIDA`
    Realized,
}

impl RevenueColumn {
    /// Every revenue column.
    pub const ALL: [Self; 16] = [
        Self::Exercise,
        Self::Month,
        Self::Category,
        Self::CategoryName,
        Self::Origin,
        Self::OriginName,
        Self::Species,
        Self::SpeciesName,
        Self::LineItem,
        Self::LineItemName,
        Self::Unit,
        Self::AdminType,
        Self::CurrentAccount,
        Self::InitialForecast,
        Self::UpdatedForecast,
        Self::Realized,
    ];

    /// Header text in the source spreadsheet.
    #[must_use]
    pub const fn header(self) -> &'static str {
        match self {
            Self::Exercise => "COEXERCICIO",
            Self::Month => "INMES",
            Self::Category => "CATEGORIA",
            Self::CategoryName => "NOCATEGORIARECEITA",
            Self::Origin => "ORIGEM",
            Self::OriginName => "NOFONTERECEITA",
            Self::Species => "ESPECIE",
            Self::SpeciesName => "NOSUBFONTERECEITA",
            Self::LineItem => "ALINEA",
            Self::LineItemName => "NOALINEA",
            Self::Unit => "NOUG",
            Self::AdminType => "INTIPOADM",
            Self::CurrentAccount => "COCONTACORRENTE",
            Self::InitialForecast => "PREVISAO INICIAL LIQUIDA",
            Self::UpdatedForecast => "PREVISAO ATUALIZADA LIQUIDA",
            Self::Realized => "RECEITA LIQUIDA",
        }
    }
}

/// Columns of the expenditure spreadsheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenditureColumn {
    /// `COEXERCICIO`
    Exercise,
    /// `INMES`
    Month,
    /// `NOUG`
    Unit,
    /// `INTIPOADM`
    AdminType,
    /// `CATEGORIA`
    Category,
    /// `NOCATEGORIA`
    CategoryName,
    /// `GRUPO`
    Group,
    /// `NOGRUPO`
    GroupName,
    /// `MODALIDADE`
    Modality,
    /// `NOMODALIDADE`
    ModalityName,
    /// `ELEMENTO`
    Element,
    /// `NOELEMENTO`
    ElementName,
    /// `DOTACAO INICIAL`
    InitialAppropriation,
    /// `DOTACAO ADICIONAL`
    AdditionalAppropriation,
    /// `CANCELAMENTO DE DOTACAO`
    Cancellation,
    /// `CANCEL-REMANEJA DOTACAO`
    CancellationRemanagement,
    /// `DESPESA EMPENHADA`
    Committed,
    /// `DESPESA LIQUIDADA`
    Settled,
    /// `DESPESA PAGA`
    Paid,
}

impl ExpenditureColumn {
    /// Every expenditure column.
    pub const ALL: [Self; 19] = [
        Self::Exercise,
        Self::Month,
        Self::Unit,
        Self::AdminType,
        Self::Category,
        Self::CategoryName,
        Self::Group,
        Self::GroupName,
        Self::Modality,
        Self::ModalityName,
        Self::Element,
        Self::ElementName,
        Self::InitialAppropriation,
        Self::AdditionalAppropriation,
        Self::Cancellation,
        Self::CancellationRemanagement,
        Self::Committed,
        Self::Settled,
        Self::Paid,
    ];

    /// Header text in the source spreadsheet.
    #[must_use]
    pub const fn header(self) -> &'static str {
        match self {
            Self::Exercise => "COEXERCICIO",
            Self::Month => "INMES",
            Self::Unit => "NOUG",
            Self::AdminType => "INTIPOADM",
            Self::Category => "CATEGORIA",
            Self::CategoryName => "NOCATEGORIA",
            Self::Group => "GRUPO",
            Self::GroupName => "NOGRUPO",
            Self::Modality => "MODALIDADE",
            Self::ModalityName => "NOMODALIDADE",
            Self::Element => "ELEMENTO",
            Self::ElementName => "NOELEMENTO",
            Self::InitialAppropriation => "DOTACAO INICIAL",
            Self::AdditionalAppropriation => "DOTACAO ADICIONAL",
            Self::Cancellation => "CANCELAMENTO DE DOTACAO",
            Self::CancellationRemanagement => "CANCEL-REMANEJA DOTACAO",
            Self::Committed => "DESPESA EMPENHADA",
            Self::Settled => "DESPESA LIQUIDADA",
            Self::Paid => "DESPESA PAGA",
        }
    }
}

/// Monetary measures carried by a revenue record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevenueMeasure {
    /// Initial net forecast.
    InitialForecast,
    /// Updated net forecast.
    UpdatedForecast,
    /// Realized net revenue.
    Realized,
}

/// One row of the revenue spreadsheet.
///
/// Text fields are empty when the source cell (or column) is blank.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RevenueRecord {
    /// Fiscal year.
    pub exercise: i32,
    /// Month number, 1 to 12 (0 when absent).
    pub month: u8,
    /// Category code, e.g. `1`.
    pub category: String,
    /// Category name.
    pub category_name: String,
    /// Origin code, e.g. `11`.
    pub origin: String,
    /// Origin name.
    pub origin_name: String,
    /// Species code, e.g. `111`.
    pub species: String,
    /// Species name.
    pub species_name: String,
    /// Line-item code, e.g. `1112`.
    pub line_item: String,
    /// Line-item name.
    pub line_item_name: String,
    /// Administrative unit name.
    pub unit: String,
    /// Administration type code.
    pub admin_type: Option<i32>,
    /// Current-account code.
    pub current_account: Option<String>,
    /// Initial net forecast.
    pub initial_forecast: Decimal,
    /// Updated net forecast.
    pub updated_forecast: Decimal,
    /// Realized net revenue.
    pub realized: Decimal,
}

impl RevenueRecord {
    /// Returns the value of one measure.
    #[must_use]
    pub const fn measure(&self, measure: RevenueMeasure) -> Decimal {
        match measure {
            RevenueMeasure::InitialForecast => self.initial_forecast,
            RevenueMeasure::UpdatedForecast => self.updated_forecast,
            RevenueMeasure::Realized => self.realized,
        }
    }
}

/// One row of the expenditure spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExpenditureRecord {
    /// Fiscal year.
    pub exercise: i32,
    /// Month number, 1 to 12 (0 when absent).
    pub month: u8,
    /// Administrative unit name.
    pub unit: String,
    /// Administration type code (`INTIPOADM`), if present.
    pub admin_type: Option<i32>,
    /// Economic category code.
    pub category: String,
    /// Economic category name.
    pub category_name: String,
    /// Expense group code.
    pub group: String,
    /// Expense group name.
    pub group_name: String,
    /// Application modality code.
    pub modality: String,
    /// Application modality name.
    pub modality_name: String,
    /// Expense element code.
    pub element: String,
    /// Expense element name.
    pub element_name: String,
    /// Initial appropriation.
    pub initial_appropriation: Decimal,
    /// Additional appropriation.
    pub additional_appropriation: Decimal,
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

/// Selects which administrative units are aggregated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UnitFilter {
    /// Every unit.
    #[default]
    All,
    /// A single unit by name.
    Unit(String),
}

impl UnitFilter {
    /// Parses a request parameter. Missing, blank or `todos` selects every unit.
    #[must_use]
    pub fn from_query(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => Self::All,
            Some(v) if v.eq_ignore_ascii_case(ALL_UNITS) => Self::All,
            Some(v) => Self::Unit(v.to_string()),
        }
    }

    /// Returns true if the given unit passes the filter.
    #[must_use]
    pub fn matches(&self, unit: &str) -> bool {
        match self {
            Self::All => true,
            Self::Unit(name) => name == unit,
        }
    }
}

/// Administration types used by the revenue-by-administration report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdministrationType {
    /// Direct administration.
    Direct,
    /// Autarchies.
    Autarchies,
    /// Public foundations.
    Foundations,
    /// State-owned companies.
    Companies,
    /// Special funds.
    Funds,
}

impl AdministrationType {
    /// Every administration type in report order.
    pub const ALL: [Self; 5] = [
        Self::Direct,
        Self::Autarchies,
        Self::Foundations,
        Self::Companies,
        Self::Funds,
    ];

    /// Code in the `INTIPOADM` column.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Direct => 1,
            Self::Autarchies => 3,
            Self::Foundations => 4,
            Self::Companies => 5,
            Self::Funds => 7,
        }
    }

    /// Column key in report rows.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Direct => "adm_direta",
            Self::Autarchies => "autarquias",
            Self::Foundations => "fundacoes",
            Self::Companies => "empresas",
            Self::Funds => "fundos",
        }
    }

    /// Column header.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Direct => "ADMINISTRAÇÃO DIRETA",
            Self::Autarchies => "AUTARQUIAS",
            Self::Foundations => "FUNDAÇÕES",
            Self::Companies => "EMPRESAS",
            Self::Funds => "FUNDOS",
        }
    }
}

/// The revenue source as read from disk.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RevenueDataset {
    /// Rows in source order.
    pub records: Vec<RevenueRecord>,
    /// Columns present in the source header.
    pub columns: BTreeSet<RevenueColumn>,
}

impl RevenueDataset {
    /// Creates a dataset that reports every column as present.
    #[must_use]
    pub fn new(records: Vec<RevenueRecord>) -> Self {
        Self {
            records,
            columns: RevenueColumn::ALL.into_iter().collect(),
        }
    }

    /// Drops a column from the header, as if the source lacked it.
    #[must_use]
    pub fn without_column(mut self, column: RevenueColumn) -> Self {
        self.columns.remove(&column);
        self
    }

    /// Returns true if the source header had the column.
    #[must_use]
    pub fn has_column(&self, column: RevenueColumn) -> bool {
        self.columns.contains(&column)
    }

    /// Records that pass the unit filter.
    pub fn filtered<'a>(
        &'a self,
        unit: &'a UnitFilter,
    ) -> impl Iterator<Item = &'a RevenueRecord> + 'a {
        self.records.iter().filter(move |r| unit.matches(&r.unit))
    }

    /// Distinct non-empty unit names, sorted.
    #[must_use]
    pub fn units(&self) -> Vec<String> {
        distinct_units(self.records.iter().map(|r| r.unit.as_str()))
    }
}

/// The expenditure source as read from disk.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExpenditureDataset {
    /// Rows in source order.
    pub records: Vec<ExpenditureRecord>,
    /// Columns present in the source header.
    pub columns: BTreeSet<ExpenditureColumn>,
}

impl ExpenditureDataset {
    /// Creates a dataset that reports every column as present.
    #[must_use]
    pub fn new(records: Vec<ExpenditureRecord>) -> Self {
        Self {
            records,
            columns: ExpenditureColumn::ALL.into_iter().collect(),
        }
    }

    /// Drops a column from the header, as if the source lacked it.
    #[must_use]
    pub fn without_column(mut self, column: ExpenditureColumn) -> Self {
        self.columns.remove(&column);
        self
    }

    /// Returns true if the source header had the column.
    #[must_use]
    pub fn has_column(&self, column: ExpenditureColumn) -> bool {
        self.columns.contains(&column)
    }

    /// Records that pass the unit filter.
    pub fn filtered<'a>(
        &'a self,
        unit: &'a UnitFilter,
    ) -> impl Iterator<Item = &'a ExpenditureRecord> + 'a {
        self.records.iter().filter(move |r| unit.matches(&r.unit))
    }

    /// Distinct non-empty unit names, sorted.
    #[must_use]
    pub fn units(&self) -> Vec<String> {
        distinct_units(self.records.iter().map(|r| r.unit.as_str()))
    }
}

/// A loaded snapshot of either source. This is what the cache stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Dataset {
    /// Revenue rows.
    Revenue(RevenueDataset),
    /// Expenditure rows.
    Expenditure(ExpenditureDataset),
}

impl Dataset {
    /// Source kind.
    #[must_use]
    pub const fn kind(&self) -> DatasetKind {
        match self {
            Self::Revenue(_) => DatasetKind::Revenue,
            Self::Expenditure(_) => DatasetKind::Expenditure,
        }
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Revenue(d) => d.records.len(),
            Self::Expenditure(d) => d.records.len(),
        }
    }

    /// Returns true if there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The revenue rows, if this is a revenue snapshot.
    #[must_use]
    pub const fn as_revenue(&self) -> Option<&RevenueDataset> {
        match self {
            Self::Revenue(d) => Some(d),
            Self::Expenditure(_) => None,
        }
    }

    /// The expenditure rows, if this is an expenditure snapshot.
    #[must_use]
    pub const fn as_expenditure(&self) -> Option<&ExpenditureDataset> {
        match self {
            Self::Expenditure(d) => Some(d),
            Self::Revenue(_) => None,
        }
    }

    /// Distinct unit names, sorted.
    #[must_use]
    pub fn units(&self) -> Vec<String> {
        match self {
            Self::Revenue(d) => d.units(),
            Self::Expenditure(d) => d.units(),
        }
    }
}

fn distinct_units<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    names
        .filter(|n| !n.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(unit: &str) -> RevenueRecord {
        RevenueRecord {
            unit: unit.to_string(),
            ..RevenueRecord::default()
        }
    }

    #[test]
    fn test_unit_filter_from_query() {
        assert_eq!(UnitFilter::from_query(None), UnitFilter::All);
        assert_eq!(UnitFilter::from_query(Some("todos")), UnitFilter::All);
        assert_eq!(UnitFilter::from_query(Some("  ")), UnitFilter::All);
        assert_eq!(
            UnitFilter::from_query(Some("SEFAZ")),
            UnitFilter::Unit("SEFAZ".to_string())
        );
    }

    #[test]
    fn test_units_are_distinct_and_sorted() {
        let dataset = RevenueDataset::new(vec![
            record("SEFAZ"),
            record("DETRAN"),
            record(""),
            record("SEFAZ"),
        ]);
        assert_eq!(dataset.units(), vec!["DETRAN", "SEFAZ"]);
    }

    #[test]
    fn test_filtered_by_unit() {
        let dataset = RevenueDataset::new(vec![record("A"), record("B"), record("A")]);
        let unit = UnitFilter::Unit("A".to_string());
        assert_eq!(dataset.filtered(&unit).count(), 2);
        assert_eq!(dataset.filtered(&UnitFilter::All).count(), 3);
    }

    #[test]
    fn test_without_column() {
        let dataset = RevenueDataset::new(Vec::new()).without_column(RevenueColumn::UpdatedForecast);
        assert!(!dataset.has_column(RevenueColumn::UpdatedForecast));
        assert!(dataset.has_column(RevenueColumn::InitialForecast));
    }

    #[test]
    fn test_dataset_kind() {
        let dataset = Dataset::Expenditure(ExpenditureDataset::default());
        assert_eq!(dataset.kind(), DatasetKind::Expenditure);
        assert!(dataset.as_revenue().is_none());
        assert!(dataset.is_empty());
        assert_eq!(DatasetKind::Revenue.cache_key(), "receita");
    }
}
