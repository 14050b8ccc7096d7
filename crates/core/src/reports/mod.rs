//! Budget report generation.
//!
//! Revenue:
//! - Balance (forecasts and realized revenue against last year)
//! - Estimate (initial forecast, year against year)
//! - By administration type
//! - Updated against initial forecast
//! - Composition of current revenue
//! - By current account
//! - Variation analysis (year against year, forecast against realized)
//!
//! Expenditure:
//! - Balance (category and group)
//! - By nature
//! - By modality

mod current_account;
pub mod error;
mod expenditure;
pub mod revenue;
pub mod service;
pub mod types;


pub use current_account::{NAME_NOT_FOUND, NAME_UNAVAILABLE, classification_code};
pub use error::ReportError;
pub use revenue::{ChartData, CompositionReport, CompositionSlice, origin_color};
pub use service::{ReportParams, ReportService};
pub use types::*;
