//! Budget predicates.
//!
//! Spend accounting pauses a campaign only once a total goes strictly past its
//! limit; the periodic sweep pauses as soon as a total reaches its limit.
//! Both comparisons are kept as-is.

use crate::types::BudgetLimits;
use rust_decimal::Decimal;

/// Either total strictly greater than its limit. Used inline by spend accounting.
pub fn exceeds_budget(daily: Decimal, monthly: Decimal, limits: &BudgetLimits) -> bool {
    daily > limits.daily || monthly > limits.monthly
}

/// Either total at or above its limit. Used by the enforcement sweep.
pub fn at_or_over_budget(daily: Decimal, monthly: Decimal, limits: &BudgetLimits) -> bool {
    daily >= limits.daily || monthly >= limits.monthly
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const LIMITS: BudgetLimits = BudgetLimits {
        daily: dec!(100.00),
        monthly: dec!(1000.00),
    };

    #[test]
    fn below_limits() {
        assert!(!exceeds_budget(dec!(50), dec!(500), &LIMITS));
        assert!(!at_or_over_budget(dec!(50), dec!(500), &LIMITS));
    }

    #[test]
    fn exactly_at_limits() {
        assert!(!exceeds_budget(dec!(100.00), dec!(1000.00), &LIMITS));
        assert!(at_or_over_budget(dec!(100.00), dec!(1000.00), &LIMITS));
        assert!(at_or_over_budget(dec!(100.00), dec!(0), &LIMITS));
        assert!(at_or_over_budget(dec!(0), dec!(1000), &LIMITS));
    }

    #[test]
    fn above_either_limit() {
        assert!(exceeds_budget(dec!(100.01), dec!(0), &LIMITS));
        assert!(exceeds_budget(dec!(0), dec!(1200), &LIMITS));
        assert!(at_or_over_budget(dec!(150), dec!(1200), &LIMITS));
    }

    #[test]
    fn zero_limit_pauses_sweep_immediately() {
        let zero = BudgetLimits {
            daily: Decimal::ZERO,
            monthly: dec!(10),
        };
        assert!(at_or_over_budget(Decimal::ZERO, Decimal::ZERO, &zero));
        assert!(!exceeds_budget(Decimal::ZERO, Decimal::ZERO, &zero));
    }
}
