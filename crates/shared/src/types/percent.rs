//! Percentage display types.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::money::format_decimal;

/// A share or ratio shown as `5,23%`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Percent {
    /// Percentage value (already multiplied by 100).
    pub value: Decimal,
    /// Number of decimal places to show.
    pub decimals: u32,
}

/// A variation shown with an explicit sign, as in `+5,23%`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedPercent {
    /// Percentage value (already multiplied by 100).
    pub value: Decimal,
    /// Number of decimal places to show.
    pub decimals: u32,
}

impl Percent {
    /// Creates a percentage with two decimal places.
    #[must_use]
    pub const fn new(value: Decimal) -> Self {
        Self { value, decimals: 2 }
    }

    /// Sets the number of decimal places.
    #[must_use]
    pub const fn with_decimals(mut self, decimals: u32) -> Self {
        self.decimals = decimals;
        self
    }
}

impl SignedPercent {
    /// Creates a signed percentage with two decimal places.
    #[must_use]
    pub const fn new(value: Decimal) -> Self {
        Self { value, decimals: 2 }
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", format_decimal(self.value, self.decimals, false))
    }
}

impl fmt::Display for SignedPercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = format_decimal(self.value, self.decimals, false);
        if body.starts_with('-') {
            write!(f, "{body}%")
        } else {
            write!(f, "+{body}%")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(5.234), "5,23%")]
    #[case(dec!(100), "100,00%")]
    #[case(dec!(0), "0,00%")]
    fn test_percent_display(#[case] value: Decimal, #[case] expected: &str) {
        assert_eq!(Percent::new(value).to_string(), expected);
    }

    #[rstest]
    #[case(dec!(5.234), "+5,23%")]
    #[case(dec!(-12.5), "-12,50%")]
    #[case(dec!(0), "+0,00%")]
    #[case(dec!(-0.001), "+0,00%")]
    fn test_signed_percent_display(#[case] value: Decimal, #[case] expected: &str) {
        assert_eq!(SignedPercent::new(value).to_string(), expected);
    }

    #[test]
    fn test_percent_custom_decimals() {
        assert_eq!(Percent::new(dec!(33.333)).with_decimals(1).to_string(), "33,3%");
    }
}
