use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::PrepayInvestError;
use crate::types::{Money, Months, Percent, Rate};
use crate::PrepayInvestResult;

/// Months per year times the percent scale.
const PERCENT_TO_MONTHLY: Decimal = dec!(1200);

/// Decimal places kept before taking a ceiling on a period count, so that
/// an exact count computed through `ln` is not pushed up by rounding noise.
const PERIOD_COUNT_DP: u32 = 6;

/// Convert an annual percentage (10 = 10%) into a monthly fractional rate.
pub fn periodic_rate(annual_percent: Percent) -> Rate {
    annual_percent / PERCENT_TO_MONTHLY
}

/// (1 + r)^n with an overflow check.
pub fn compound_factor(rate: Rate, periods: Months) -> PrepayInvestResult<Decimal> {
    (Decimal::ONE + rate)
        .checked_powu(u64::from(periods))
        .ok_or_else(|| PrepayInvestError::overflow("compound factor (1 + r)^n"))
}

/// ((1 + r)^n − 1) / r, the accumulation factor of an ordinary annuity.
/// Collapses to n when r = 0.
pub fn annuity_accumulation_factor(rate: Rate, periods: Months) -> PrepayInvestResult<Decimal> {
    if rate.is_zero() {
        return Ok(Decimal::from(periods));
    }
    let factor = compound_factor(rate, periods)?;
    Ok((factor - Decimal::ONE) / rate)
}

/// Number of whole installments needed to retire `balance` with a level
/// `installment` at periodic rate `rate`.
///
/// Inverts the amortization formula: n = ceil(ln(E / (E − B·r)) / ln(1 + r)).
/// When the installment does not exceed one period of interest the balance
/// can never be repaid and `NonConvergentAmortization` is returned.
pub fn installments_to_repay(balance: Money, rate: Rate, installment: Money) -> PrepayInvestResult<Months> {
    if installment <= Decimal::ZERO {
        return Err(PrepayInvestError::invalid(
            "installment",
            "Installment must be positive",
        ));
    }
    if balance <= Decimal::ZERO {
        return Ok(0);
    }

    let raw = if rate.is_zero() {
        balance / installment
    } else {
        let interest = balance * rate;
        if installment <= interest {
            return Err(PrepayInvestError::NonConvergentAmortization {
                installment,
                balance,
                interest,
            });
        }
        let ratio = installment / (installment - interest);
        let numerator = ratio
            .checked_ln()
            .ok_or_else(|| PrepayInvestError::overflow("ln(E / (E − B·r))"))?;
        let denominator = (Decimal::ONE + rate)
            .checked_ln()
            .ok_or_else(|| PrepayInvestError::overflow("ln(1 + r)"))?;
        numerator / denominator
    };

    let count = raw
        .round_dp(PERIOD_COUNT_DP)
        .ceil()
        .to_u32()
        .ok_or_else(|| PrepayInvestError::overflow("remaining installment count"))?;
    // Any positive balance takes at least one installment.
    Ok(count.max(1))
}

/// Calendar date `months` installments after `start`.
pub fn date_after_months(start: NaiveDate, months: Months) -> Option<NaiveDate> {
    start.checked_add_months(chrono::Months::new(months))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_periodic_rate() {
        assert_eq!(periodic_rate(dec!(12)), dec!(0.01));
        assert_eq!(periodic_rate(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_compound_factor_basic() {
        let f = compound_factor(dec!(0.01), 2).unwrap();
        assert_eq!(f, dec!(1.0201));
        assert_eq!(compound_factor(dec!(0.05), 0).unwrap(), Decimal::ONE);
    }

    #[test]
    fn test_compound_factor_overflow_reported() {
        assert!(compound_factor(dec!(10), 480).is_err());
    }

    #[test]
    fn test_accumulation_factor_zero_rate() {
        assert_eq!(annuity_accumulation_factor(Decimal::ZERO, 36).unwrap(), dec!(36));
    }

    #[test]
    fn test_installments_to_repay_zero_rate_rounds_up() {
        assert_eq!(installments_to_repay(dec!(1000), Decimal::ZERO, dec!(300)).unwrap(), 4);
        assert_eq!(installments_to_repay(dec!(900), Decimal::ZERO, dec!(300)).unwrap(), 3);
    }

    #[test]
    fn test_installments_to_repay_non_convergent() {
        // 1% of 100_000 is 1_000 of interest; a 900 installment never catches up.
        let err = installments_to_repay(dec!(100_000), dec!(0.01), dec!(900)).unwrap_err();
        assert!(matches!(err, PrepayInvestError::NonConvergentAmortization { .. }));

        let err = installments_to_repay(dec!(100_000), dec!(0.01), dec!(1000)).unwrap_err();
        assert!(matches!(err, PrepayInvestError::NonConvergentAmortization { .. }));
    }

    #[test]
    fn test_date_after_months_clamps_month_end() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(
            date_after_months(start, 1),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert_eq!(
            date_after_months(start, 60),
            NaiveDate::from_ymd_opt(2029, 1, 31)
        );
    }

    #[test]
    fn test_installments_to_repay_settled_balance() {
        assert_eq!(installments_to_repay(Decimal::ZERO, dec!(0.01), dec!(500)).unwrap(), 0);
    }
}
