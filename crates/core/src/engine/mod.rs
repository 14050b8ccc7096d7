//! Aggregation engine.
//!
//! Revenue records are summed along the classification tree
//! (category, origin, species, line item). Expenditure records are summed
//! by flat code groupings with derived appropriation measures.

pub mod service;
pub mod types;
pub mod variance;

#[cfg(test)]
mod tests;

pub use service::{AggregationEngine, group_appropriations, sum_measures};
pub use types::*;
pub use variance::{ChangeDirection, YearOverYear, percent_change, share};
