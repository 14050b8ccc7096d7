//! Report generation service.

use crate::dataset::{Dataset, DatasetKind, ExpenditureDataset, RevenueDataset, UnitFilter};
use crate::hierarchy::HierarchyCatalog;
use crate::names::NameMap;

use super::error::ReportError;
use super::revenue::CompositionReport;
use super::types::{FiscalYears, Report, VariationMode};
use super::{current_account, expenditure, revenue};

/// Parameters shared by every report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportParams {
    /// Units to include.
    pub unit: UnitFilter,
    /// Current and comparison years.
    pub years: FiscalYears,
}

impl ReportParams {
    /// Parameters for `current_year` compared against the year before.
    #[must_use]
    pub const fn new(unit: UnitFilter, current_year: i32) -> Self {
        Self {
            unit,
            years: FiscalYears::new(current_year),
        }
    }
}

/// Service for generating budget reports.
pub struct ReportService;

impl ReportService {
    /// Revenue rows of a snapshot.
    pub fn revenue(dataset: &Dataset) -> Result<&RevenueDataset, ReportError> {
        dataset.as_revenue().ok_or(ReportError::DatasetMismatch {
            expected: DatasetKind::Revenue,
            actual: dataset.kind(),
        })
    }

    /// Expenditure rows of a snapshot.
    pub fn expenditure(dataset: &Dataset) -> Result<&ExpenditureDataset, ReportError> {
        dataset.as_expenditure().ok_or(ReportError::DatasetMismatch {
            expected: DatasetKind::Expenditure,
            actual: dataset.kind(),
        })
    }

    /// Revenue balance down to line items: initial and updated forecast,
    /// realized revenue in both years, the difference and its percentage.
    #[must_use]
    pub fn generate_revenue_balance(
        dataset: &RevenueDataset,
        catalog: &HierarchyCatalog,
        params: &ReportParams,
    ) -> Report {
        revenue::balance(dataset, catalog, params)
    }

    /// Initial forecast of both years by origin, with each row's share of
    /// the total.
    #[must_use]
    pub fn generate_revenue_estimate(
        dataset: &RevenueDataset,
        catalog: &HierarchyCatalog,
        params: &ReportParams,
    ) -> Report {
        revenue::estimate(dataset, catalog, params)
    }

    /// Current-year initial forecast split across administration types.
    #[must_use]
    pub fn generate_revenue_by_administration(
        dataset: &RevenueDataset,
        catalog: &HierarchyCatalog,
        params: &ReportParams,
    ) -> Report {
        revenue::by_administration(dataset, catalog, params)
    }

    /// Updated against initial forecast by origin.
    #[must_use]
    pub fn generate_revenue_updated_vs_initial(
        dataset: &RevenueDataset,
        catalog: &HierarchyCatalog,
        params: &ReportParams,
    ) -> Report {
        revenue::updated_vs_initial(dataset, catalog, params)
    }

    /// Current revenue by origin, largest first, with chart data.
    #[must_use]
    pub fn generate_revenue_composition(
        dataset: &RevenueDataset,
        catalog: &HierarchyCatalog,
        params: &ReportParams,
    ) -> CompositionReport {
        revenue::composition(dataset, catalog, params)
    }

    /// Realized revenue grouped by classification code. `classification`
    /// is `None` when the name table could not be loaded.
    #[must_use]
    pub fn generate_revenue_by_current_account(
        dataset: &RevenueDataset,
        classification: Option<&NameMap>,
        params: &ReportParams,
    ) -> Report {
        current_account::by_current_account(dataset, classification, params)
    }

    /// Per-category variation: previous against current initial forecast,
    /// or current forecast against realized revenue, depending on `mode`.
    #[must_use]
    pub fn generate_revenue_variation(
        dataset: &RevenueDataset,
        catalog: &HierarchyCatalog,
        params: &ReportParams,
        mode: VariationMode,
    ) -> Report {
        revenue::variation(dataset, catalog, params, mode)
    }

    /// Expenditure by category, then group.
    #[must_use]
    pub fn generate_expenditure_balance(dataset: &ExpenditureDataset, params: &ReportParams) -> Report {
        expenditure::balance(dataset, params)
    }

    /// Expenditure by element.
    #[must_use]
    pub fn generate_expenditure_by_nature(dataset: &ExpenditureDataset, params: &ReportParams) -> Report {
        expenditure::by_nature(dataset, params)
    }

    /// Expenditure by application modality.
    #[must_use]
    pub fn generate_expenditure_by_modality(dataset: &ExpenditureDataset, params: &ReportParams) -> Report {
        expenditure::by_modality(dataset, params)
    }
}
