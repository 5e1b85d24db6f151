//! Prepay vs invest: what the same surplus cash achieves against the loan
//! versus in an investment at an assumed return.

use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::emi::LoanTerms;
use crate::amortization::summary::{compute_summary, LoanSummary};
use crate::comparison::verdict::{compare, Verdict};
use crate::config::SimulationConfig;
use crate::error::{ensure_non_negative, PrepayInvestError};
use crate::investment::projection::{compute_projection, ContributionMode, InvestmentInput, InvestmentProjection};
use crate::prepayment::analysis::{compute_one_time, compute_recurring};
use crate::prepayment::lump_sum::LumpSumClosure;
use crate::prepayment::simulator::SimulationState;
use crate::types::{with_metadata, ComputationOutput, Money, Months, Percent};
use crate::PrepayInvestResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepayVsInvestInput {
    pub loan: LoanTerms,
    /// Surplus available every month.
    pub extra_monthly: Money,
    pub expected_return_percent: Percent,
    #[serde(default)]
    pub config: SimulationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LumpSumVsInvestInput {
    pub loan: LoanTerms,
    /// One-time surplus.
    pub amount: Money,
    /// Installments already paid when the surplus becomes available.
    pub after_months: Months,
    pub expected_return_percent: Percent,
    #[serde(default)]
    pub config: SimulationConfig,
}

/// The prepayment side of a comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepayOption {
    pub months_to_payoff: Months,
    pub months_reduced: Months,
    pub years_saved: Decimal,
    pub interest_saved: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debt_free_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonOutput {
    pub loan: LoanSummary,
    pub prepay: PrepayOption,
    pub invest: InvestmentProjection,
    /// Months the investment is held.
    pub horizon_months: Months,
    /// The figure the interest saved is weighed against.
    pub compared_value: Money,
    /// `|compared_value − interest_saved|`.
    pub margin: Money,
    pub verdict: Verdict,
}

// ---------------------------------------------------------------------------
// Recurring surplus
// ---------------------------------------------------------------------------

/// Compare paying `extra_monthly` into the loan every month against
/// investing it for the loan's original term.
pub fn compare_prepay_vs_invest(
    input: &PrepayVsInvestInput,
) -> PrepayInvestResult<ComputationOutput<ComparisonOutput>> {
    let start = Instant::now();
    ensure_non_negative("expected_return_percent", input.expected_return_percent)?;

    let (loan, mut warnings) = compute_summary(&input.loan)?;
    let (prepaid, prepay_warnings) =
        compute_recurring(&input.loan, input.extra_monthly, &input.config)?;
    warnings.extend(prepay_warnings);

    if prepaid.status == SimulationState::IterationCapReached {
        let remaining_balance = prepaid
            .schedule
            .last()
            .map(|row| row.closing_balance)
            .unwrap_or(input.loan.principal);
        return Err(PrepayInvestError::IterationCapReached {
            cap: input.config.iteration_cap,
            remaining_balance,
        });
    }

    let horizon_months = loan.total_installments;
    let invest = compute_projection(&InvestmentInput {
        contribution: input.extra_monthly,
        annual_return_percent: input.expected_return_percent,
        horizon_months,
        mode: ContributionMode::Monthly,
    })?;

    warn_on_return_spread(&input.loan, input.expected_return_percent, &mut warnings);

    let verdict = compare(prepaid.interest_saved, invest.future_value);
    debug!(
        "interest saved {} vs future value {} => {:?}",
        prepaid.interest_saved, invest.future_value, verdict
    );

    let output = ComparisonOutput {
        prepay: PrepayOption {
            months_to_payoff: prepaid.months_to_payoff,
            months_reduced: prepaid.months_reduced,
            years_saved: prepaid.years_saved,
            interest_saved: prepaid.interest_saved,
            debt_free_date: prepaid.payoff_date,
        },
        horizon_months,
        compared_value: invest.future_value,
        margin: (invest.future_value - prepaid.interest_saved).abs(),
        invest,
        verdict,
        loan,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Interest saved by recurring prepayment vs future value of monthly investment",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// One-time surplus
// ---------------------------------------------------------------------------

/// Compare applying a one-time `amount` to the loan against investing it
/// for the rest of the original term.
///
/// The lump sum itself is recovered either way (as principal no longer owed,
/// or as the invested capital), so interest saved is weighed against the
/// investment's growth rather than its full future value.
pub fn compare_lump_sum_vs_invest(
    input: &LumpSumVsInvestInput,
) -> PrepayInvestResult<ComputationOutput<ComparisonOutput>> {
    let start = Instant::now();
    ensure_non_negative("expected_return_percent", input.expected_return_percent)?;

    let (loan, mut warnings) = compute_summary(&input.loan)?;
    let (prepaid, prepay_warnings) =
        compute_one_time(&input.loan, input.amount, input.after_months, &input.config)?;
    warnings.extend(prepay_warnings);

    // Only the part of the surplus the loan can absorb is weighed; the rest
    // sits idle under either choice.
    let horizon_months = loan.total_installments - input.after_months;
    let invest = compute_projection(&InvestmentInput {
        contribution: prepaid.lump_sum_applied,
        annual_return_percent: input.expected_return_percent,
        horizon_months,
        mode: ContributionMode::LumpSum,
    })?;

    warn_on_return_spread(&input.loan, input.expected_return_percent, &mut warnings);
    if prepaid.closure == LumpSumClosure::ClosedAtPrepayment {
        warnings.push(format!(
            "The lump sum closes the loan outright; both options are compared on the {} it takes to close it",
            prepaid.lump_sum_applied.round_dp(2)
        ));
    }

    let verdict = compare(prepaid.interest_saved, invest.growth);

    let output = ComparisonOutput {
        prepay: PrepayOption {
            months_to_payoff: prepaid.months_to_payoff,
            months_reduced: prepaid.months_reduced,
            years_saved: Decimal::from(prepaid.months_reduced) / Decimal::from(12),
            interest_saved: prepaid.interest_saved,
            debt_free_date: prepaid.payoff_date,
        },
        horizon_months,
        compared_value: invest.growth,
        margin: (invest.growth - prepaid.interest_saved).abs(),
        invest,
        verdict,
        loan,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Interest saved by lump-sum prepayment vs growth of a one-time investment",
        input,
        warnings,
        elapsed,
        output,
    ))
}

fn warn_on_return_spread(loan: &LoanTerms, expected_return_percent: Percent, warnings: &mut Vec<String>) {
    if expected_return_percent < loan.annual_rate_percent {
        warnings.push(format!(
            "Expected return {}% is below the loan rate {}%: prepaying earns a guaranteed return at the loan rate",
            expected_return_percent, loan.annual_rate_percent
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn reference_input() -> PrepayVsInvestInput {
        PrepayVsInvestInput {
            loan: LoanTerms::new(dec!(500_000), dec!(10), 5),
            extra_monthly: dec!(5000),
            expected_return_percent: dec!(12),
            config: SimulationConfig::default(),
        }
    }

    #[test]
    fn test_reference_scenario_favours_investing() {
        let out = compare_prepay_vs_invest(&reference_input()).unwrap();
        let r = out.result;
        assert_eq!(r.verdict, Verdict::Invest);
        assert_eq!(r.horizon_months, 60);
        assert_eq!(r.prepay.months_to_payoff, 38);
        assert!((r.invest.future_value - dec!(408_348.35)).abs() < dec!(0.01));
        assert_eq!(r.compared_value, r.invest.future_value);
        assert_eq!(r.margin, r.invest.future_value - r.prepay.interest_saved);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_zero_return_small_surplus_on_long_loan_favours_prepaying() {
        // 2_000 extra on a 20-year 12% loan saves more interest than the
        // 480_000 of uninvested contributions.
        let input = PrepayVsInvestInput {
            loan: LoanTerms::new(dec!(3_000_000), dec!(12), 20),
            extra_monthly: dec!(2000),
            expected_return_percent: Decimal::ZERO,
            config: SimulationConfig::default(),
        };
        let out = compare_prepay_vs_invest(&input).unwrap();
        assert_eq!(out.result.invest.future_value, dec!(480_000));
        assert!(out.result.prepay.interest_saved > dec!(480_000));
        assert_eq!(out.result.verdict, Verdict::Prepay);
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_cap_is_an_error_not_a_verdict() {
        let mut input = reference_input();
        input.config = SimulationConfig::default().with_iteration_cap(10);
        let err = compare_prepay_vs_invest(&input).unwrap_err();
        match err {
            PrepayInvestError::IterationCapReached {
                cap,
                remaining_balance,
            } => {
                assert_eq!(cap, 10);
                assert!(remaining_balance > Decimal::ZERO);
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_idempotent() {
        let a = compare_prepay_vs_invest(&reference_input()).unwrap().result;
        let b = compare_prepay_vs_invest(&reference_input()).unwrap().result;
        assert_eq!(a.prepay.interest_saved, b.prepay.interest_saved);
        assert_eq!(a.invest, b.invest);
        assert_eq!(a.verdict, b.verdict);
    }

    #[test]
    fn test_lump_sum_uses_growth_and_remaining_horizon() {
        let input = LumpSumVsInvestInput {
            loan: LoanTerms::new(dec!(500_000), dec!(10), 5),
            amount: dec!(100_000),
            after_months: 12,
            expected_return_percent: dec!(12),
            config: SimulationConfig::default(),
        };
        let r = compare_lump_sum_vs_invest(&input).unwrap().result;
        assert_eq!(r.horizon_months, 48);
        assert_eq!(r.invest.total_contributed, dec!(100_000));
        assert_eq!(r.compared_value, r.invest.growth);
        assert_eq!(r.verdict, compare(r.prepay.interest_saved, r.invest.growth));
    }

    #[test]
    fn test_oversized_lump_sum_invests_only_the_amount_applied() {
        let loan = LoanTerms::new(dec!(500_000), dec!(10), 5);
        let input = LumpSumVsInvestInput {
            loan: loan.clone(),
            amount: dec!(400_000),
            after_months: 40,
            expected_return_percent: dec!(12),
            config: SimulationConfig::default(),
        };
        let (prepaid, _) =
            compute_one_time(&loan, dec!(400_000), 40, &SimulationConfig::default()).unwrap();
        assert_eq!(prepaid.closure, LumpSumClosure::ClosedAtPrepayment);

        let out = compare_lump_sum_vs_invest(&input).unwrap();
        let r = out.result;
        assert_eq!(r.invest.total_contributed, prepaid.lump_sum_applied);
        assert!(r.invest.total_contributed < dec!(400_000));
        assert_eq!(r.horizon_months, 20);
        assert!(out.warnings.iter().any(|w| w.contains("closes the loan outright")));
    }

    #[test]
    fn test_lump_sum_low_return_favours_prepaying() {
        let input = LumpSumVsInvestInput {
            loan: LoanTerms::new(dec!(500_000), dec!(14), 10),
            amount: dec!(100_000),
            after_months: 0,
            expected_return_percent: dec!(4),
            config: SimulationConfig::default(),
        };
        let out = compare_lump_sum_vs_invest(&input).unwrap();
        assert_eq!(out.result.verdict, Verdict::Prepay);
        assert!(!out.warnings.is_empty());
    }
}
