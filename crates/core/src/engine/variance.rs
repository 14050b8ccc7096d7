//! Year-over-year variation and share calculations.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of a change between two periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeDirection {
    /// Current value is higher.
    Increase,
    /// Current value is lower.
    Decrease,
    /// No change.
    None,
}

/// Comparison of a value against its base period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearOverYear {
    /// Base period value.
    pub base: Decimal,
    /// Current period value.
    pub current: Decimal,
    /// `current - base`.
    pub change: Decimal,
    /// Percentage change, see [`percent_change`].
    pub change_percentage: Decimal,
    /// Direction of the change.
    pub direction: ChangeDirection,
}

impl YearOverYear {
    /// Compares `current` against `base`.
    #[must_use]
    pub fn between(base: Decimal, current: Decimal) -> Self {
        let change = current - base;
        let direction = if change.is_zero() {
            ChangeDirection::None
        } else if change.is_sign_positive() {
            ChangeDirection::Increase
        } else {
            ChangeDirection::Decrease
        };

        Self {
            base,
            current,
            change,
            change_percentage: percent_change(base, current),
            direction,
        }
    }
}

/// Percentage change from `base` to `current`, rounded to 2 places.
///
/// With a non-positive base the result is 100 if `current` is positive and
/// 0 otherwise.
#[must_use]
pub fn percent_change(base: Decimal, current: Decimal) -> Decimal {
    if base > Decimal::ZERO {
        ((current - base) / base * Decimal::ONE_HUNDRED).round_dp(2)
    } else if current > Decimal::ZERO {
        Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    }
}

/// `part` as a percentage of `whole`; 0 when `whole` is not positive.
#[must_use]
pub fn share(part: Decimal, whole: Decimal) -> Decimal {
    if whole > Decimal::ZERO {
        part / whole * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(100), dec!(110), dec!(10.00))]
    #[case(dec!(500), dec!(400), dec!(-20.00))]
    #[case(dec!(3), dec!(4), dec!(33.33))]
    #[case(dec!(200), dec!(200), dec!(0))]
    fn test_percent_change_positive_base(
        #[case] base: Decimal,
        #[case] current: Decimal,
        #[case] expected: Decimal,
    ) {
        assert_eq!(percent_change(base, current), expected);
    }

    #[test]
    fn test_percent_change_zero_base() {
        assert_eq!(percent_change(Decimal::ZERO, dec!(50)), dec!(100));
        assert_eq!(percent_change(Decimal::ZERO, Decimal::ZERO), Decimal::ZERO);
        assert_eq!(percent_change(dec!(-10), dec!(-5)), Decimal::ZERO);
    }

    #[test]
    fn test_share() {
        assert_eq!(share(dec!(25), dec!(100)), dec!(25));
        assert_eq!(share(dec!(25), Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_year_over_year() {
        let yoy = YearOverYear::between(dec!(400), dec!(500));
        assert_eq!(yoy.change, dec!(100));
        assert_eq!(yoy.change_percentage, dec!(25.00));
        assert_eq!(yoy.direction, ChangeDirection::Increase);

        let flat = YearOverYear::between(dec!(10), dec!(10));
        assert_eq!(flat.direction, ChangeDirection::None);
    }
}
