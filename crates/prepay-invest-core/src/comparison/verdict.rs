use serde::{Deserialize, Serialize};

use crate::types::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Invest,
    Prepay,
}

/// Investing wins only when its future value strictly exceeds the interest
/// saved by prepaying; ties go to prepaying.
pub fn compare(interest_saved: Money, future_value: Money) -> Verdict {
    if future_value > interest_saved {
        Verdict::Invest
    } else {
        Verdict::Prepay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_invest_when_value_exceeds_savings() {
        assert_eq!(compare(dec!(53_426), dec!(408_348)), Verdict::Invest);
    }

    #[test]
    fn test_prepay_when_savings_exceed_value() {
        assert_eq!(compare(dec!(90_000), dec!(75_000)), Verdict::Prepay);
    }

    #[test]
    fn test_tie_goes_to_prepay() {
        assert_eq!(compare(dec!(1000), dec!(1000)), Verdict::Prepay);
    }
}
