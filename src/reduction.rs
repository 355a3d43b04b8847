use crate::models::{CategoryAmounts, PeriodTotals};

/// Percentage decrease from `previous` to `current`; positive means less
/// waste. Unclamped.
///
/// A zero baseline yields 0 when `current` is also zero and -100 otherwise.
pub fn reduction(previous: f64, current: f64) -> f64 {
    if previous == 0.0 {
        return if current == 0.0 { 0.0 } else { -100.0 };
    }
    (previous - current) / previous * 100.0
}

/// Per-category reductions between two periods.
pub fn category_reductions(previous: &PeriodTotals, current: &PeriodTotals) -> CategoryAmounts {
    let (prev, curr) = (&previous.amounts, &current.amounts);
    CategoryAmounts::new(
        reduction(prev.plastic, curr.plastic),
        reduction(prev.organic, curr.organic),
        reduction(prev.paper, curr.paper),
        reduction(prev.glass, curr.glass),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_baseline_policy() {
        assert_eq!(reduction(0.0, 0.0), 0.0);
        assert_eq!(reduction(0.0, 0.1), -100.0);
        assert_eq!(reduction(0.0, 42.0), -100.0);
    }

    #[test]
    fn standard_cases() {
        assert_eq!(reduction(10.0, 5.0), 50.0);
        assert_eq!(reduction(10.0, 20.0), -100.0);
        assert_eq!(reduction(10.0, 0.0), 100.0);
    }

    #[test]
    fn increases_are_not_clamped() {
        assert_eq!(reduction(2.0, 10.0), -400.0);
    }

    #[test]
    fn per_category_uses_matching_fields() {
        let previous = PeriodTotals {
            amounts: CategoryAmounts::new(10.0, 4.0, 0.0, 5.0),
            entry_count: 3,
        };
        let current = PeriodTotals {
            amounts: CategoryAmounts::new(5.0, 4.0, 1.0, 0.0),
            entry_count: 3,
        };
        let r = category_reductions(&previous, &current);
        assert_eq!(r, CategoryAmounts::new(50.0, 0.0, -100.0, 100.0));
    }
}
