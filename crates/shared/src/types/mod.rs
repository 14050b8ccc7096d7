//! Common display types used across the application.

pub mod money;
pub mod percent;

pub use money::Money;
pub use percent::{Percent, SignedPercent};
