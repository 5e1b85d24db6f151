//! Baseline loan summary: total cost of the original schedule and how heavy
//! the interest burden is relative to the amount borrowed.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::emi::{calculate_emi, LoanTerms};
use crate::time_value::date_after_months;
use crate::types::{with_metadata, ComputationOutput, Money, Months, Rate};
use crate::PrepayInvestResult;

/// Interest/principal ratio below which the burden is light.
pub const LIGHT_BURDEN_CEILING: Decimal = dec!(0.25);

/// Interest/principal ratio below which the burden is heavy rather than suffocating.
pub const HEAVY_BURDEN_CEILING: Decimal = dec!(0.6);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BurdenBand {
    Light,
    Heavy,
    Suffocating,
}

impl BurdenBand {
    pub fn classify(burden_ratio: Decimal) -> Self {
        if burden_ratio < LIGHT_BURDEN_CEILING {
            BurdenBand::Light
        } else if burden_ratio < HEAVY_BURDEN_CEILING {
            BurdenBand::Heavy
        } else {
            BurdenBand::Suffocating
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanSummary {
    pub monthly_installment: Money,
    pub total_installments: Months,
    pub periodic_rate: Rate,
    pub total_payment: Money,
    pub total_interest: Money,
    /// Total interest divided by principal.
    pub burden_ratio: Decimal,
    pub burden_band: BurdenBand,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payoff_date: Option<NaiveDate>,
}

/// Summarise the original schedule of a loan.
pub fn summarize_loan(terms: &LoanTerms) -> PrepayInvestResult<ComputationOutput<LoanSummary>> {
    let start = Instant::now();
    let (summary, warnings) = compute_summary(terms)?;
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-payment amortization (EMI)",
        terms,
        warnings,
        elapsed,
        summary,
    ))
}

pub(crate) fn compute_summary(terms: &LoanTerms) -> PrepayInvestResult<(LoanSummary, Vec<String>)> {
    let mut warnings: Vec<String> = Vec::new();

    let emi = calculate_emi(terms)?;
    if emi.periodic_rate.is_zero() {
        warnings.push("Zero interest rate: installments are straight-line principal".into());
    }

    let total_payment = emi.monthly_installment * Decimal::from(emi.total_installments);
    let total_interest = total_payment - terms.principal;
    let burden_ratio = total_interest / terms.principal;

    let summary = LoanSummary {
        monthly_installment: emi.monthly_installment,
        total_installments: emi.total_installments,
        periodic_rate: emi.periodic_rate,
        total_payment,
        total_interest,
        burden_ratio,
        burden_band: BurdenBand::classify(burden_ratio),
        payoff_date: terms
            .start_date
            .and_then(|d| date_after_months(d, emi.total_installments - 1)),
    };

    Ok((summary, warnings))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_thresholds() {
        assert_eq!(BurdenBand::classify(dec!(0.1)), BurdenBand::Light);
        assert_eq!(BurdenBand::classify(dec!(0.25)), BurdenBand::Heavy);
        assert_eq!(BurdenBand::classify(dec!(0.59)), BurdenBand::Heavy);
        assert_eq!(BurdenBand::classify(dec!(0.6)), BurdenBand::Suffocating);
        assert_eq!(BurdenBand::classify(dec!(1.4)), BurdenBand::Suffocating);
    }

    #[test]
    fn test_summary_reference_loan() {
        let out = summarize_loan(&LoanTerms::new(dec!(500_000), dec!(10), 5)).unwrap();
        let s = out.result;
        assert_eq!(s.total_installments, 60);
        assert_eq!(s.total_interest, s.total_payment - dec!(500_000));
        // ~137,411 of interest on 500,000 is just past the light band.
        assert!((s.total_interest - dec!(137_411.34)).abs() < dec!(0.5));
        assert_eq!(s.burden_band, BurdenBand::Heavy);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_summary_long_mortgage_is_suffocating() {
        let s = summarize_loan(&LoanTerms::new(dec!(5_000_000), dec!(9), 30))
            .unwrap()
            .result;
        assert!(s.burden_ratio > dec!(1.5));
        assert_eq!(s.burden_band, BurdenBand::Suffocating);
    }

    #[test]
    fn test_summary_zero_rate_warns() {
        let out = summarize_loan(&LoanTerms::new(dec!(60_000), Decimal::ZERO, 5)).unwrap();
        assert_eq!(out.result.total_interest, Decimal::ZERO);
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_payoff_date_is_last_installment() {
        let mut terms = LoanTerms::new(dec!(100_000), dec!(10), 2);
        terms.start_date = NaiveDate::from_ymd_opt(2025, 3, 1);
        let s = summarize_loan(&terms).unwrap().result;
        assert_eq!(s.payoff_date, NaiveDate::from_ymd_opt(2027, 2, 1));
    }
}
