//! Prepayment scenario analysis: recurring extra principal or a one-time
//! lump sum, each measured against the original schedule.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::emi::{calculate_emi, AmortizationResult, LoanTerms};
use crate::config::SimulationConfig;
use crate::error::{ensure_non_negative, PrepayInvestError};
use crate::prepayment::lump_sum::{project_lump_sum, LumpSumClosure};
use crate::prepayment::simulator::{simulate_prepayment, ScheduleRow, SimulationState};
use crate::time_value::date_after_months;
use crate::types::{with_metadata, ComputationOutput, Money, Months};
use crate::PrepayInvestResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// How surplus cash is applied to the loan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PrepaymentPlan {
    /// Extra principal paid on top of every installment.
    Recurring { extra_monthly: Money },
    /// A single payment made after `after_months` installments.
    OneTime { amount: Money, after_months: Months },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepaymentInput {
    pub loan: LoanTerms,
    pub plan: PrepaymentPlan,
    #[serde(default)]
    pub config: SimulationConfig,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Recurring extra-payment result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringPrepaymentOutput {
    pub monthly_installment: Money,
    pub extra_monthly: Money,
    pub original_months: Months,
    pub months_to_payoff: Months,
    pub months_reduced: Months,
    /// `(original_months − months_to_payoff) / 12`; negative if the cap
    /// stopped the simulation beyond the original term.
    pub years_saved: Decimal,
    pub baseline_interest: Money,
    pub interest_paid: Money,
    pub interest_saved: Money,
    pub total_paid: Money,
    pub status: SimulationState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payoff_date: Option<NaiveDate>,
    pub schedule: Vec<ScheduleRow>,
}

/// One-time lump-sum result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LumpSumPrepaymentOutput {
    pub monthly_installment: Money,
    pub original_months: Months,
    pub closure: LumpSumClosure,
    pub prepayment_month: Months,
    pub balance_before_prepayment: Money,
    pub lump_sum_applied: Money,
    pub balance_after_prepayment: Money,
    /// New remaining tenure after the prepayment month.
    pub remaining_installments: Months,
    pub months_to_payoff: Months,
    pub months_reduced: Months,
    pub final_installment: Money,
    pub baseline_interest: Money,
    pub interest_paid: Money,
    pub interest_saved: Money,
    pub total_paid: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payoff_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PrepaymentOutput {
    Recurring(RecurringPrepaymentOutput),
    OneTime(LumpSumPrepaymentOutput),
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Analyse a prepayment plan against the original schedule.
pub fn analyze_prepayment(
    input: &PrepaymentInput,
) -> PrepayInvestResult<ComputationOutput<PrepaymentOutput>> {
    let start = Instant::now();

    let (output, methodology, warnings) = match &input.plan {
        PrepaymentPlan::Recurring { extra_monthly } => {
            let (out, w) = compute_recurring(&input.loan, *extra_monthly, &input.config)?;
            (
                PrepaymentOutput::Recurring(out),
                "Month-by-month amortization with recurring prepayment",
                w,
            )
        }
        PrepaymentPlan::OneTime {
            amount,
            after_months,
        } => {
            let (out, w) = compute_one_time(&input.loan, *amount, *after_months, &input.config)?;
            (
                PrepaymentOutput::OneTime(out),
                "Closed-form remaining tenure after lump-sum prepayment",
                w,
            )
        }
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(methodology, input, warnings, elapsed, output))
}

// ---------------------------------------------------------------------------
// Recurring
// ---------------------------------------------------------------------------

pub(crate) fn compute_recurring(
    loan: &LoanTerms,
    extra_monthly: Money,
    config: &SimulationConfig,
) -> PrepayInvestResult<(RecurringPrepaymentOutput, Vec<String>)> {
    let mut warnings: Vec<String> = Vec::new();
    ensure_non_negative("extra_monthly", extra_monthly)?;

    let emi = calculate_emi(loan)?;
    let baseline_interest = baseline_interest(loan, &emi);

    let outcome = simulate_prepayment(
        loan.principal,
        emi.periodic_rate,
        emi.monthly_installment,
        extra_monthly,
        config,
    )?;

    if outcome.status == SimulationState::IterationCapReached {
        warnings.push(format!(
            "Loan not repaid within the {}-month iteration cap; {} remains outstanding",
            config.iteration_cap, outcome.final_balance
        ));
    }
    if emi.periodic_rate.is_zero() && extra_monthly > Decimal::ZERO {
        warnings.push("Zero interest rate: prepaying shortens the loan but saves no interest".into());
    }

    let n = emi.total_installments;
    let months = outcome.months_to_payoff;
    let payoff_date = if outcome.is_paid_off() {
        loan.start_date.and_then(|d| date_after_months(d, months - 1))
    } else {
        None
    };

    Ok((
        RecurringPrepaymentOutput {
            monthly_installment: emi.monthly_installment,
            extra_monthly,
            original_months: n,
            months_to_payoff: months,
            months_reduced: n.saturating_sub(months),
            years_saved: (Decimal::from(n) - Decimal::from(months)) / MONTHS_PER_YEAR,
            baseline_interest,
            interest_paid: outcome.interest_paid,
            interest_saved: baseline_interest - outcome.interest_paid,
            total_paid: outcome.total_paid,
            status: outcome.status,
            payoff_date,
            schedule: outcome.schedule,
        },
        warnings,
    ))
}

// ---------------------------------------------------------------------------
// One-time
// ---------------------------------------------------------------------------

pub(crate) fn compute_one_time(
    loan: &LoanTerms,
    amount: Money,
    after_months: Months,
    config: &SimulationConfig,
) -> PrepayInvestResult<(LumpSumPrepaymentOutput, Vec<String>)> {
    let mut warnings: Vec<String> = Vec::new();
    config.validate()?;
    ensure_non_negative("amount", amount)?;
    if amount > loan.principal {
        return Err(PrepayInvestError::invalid(
            "amount",
            "Lump sum cannot exceed the loan principal",
        ));
    }

    let emi = calculate_emi(loan)?;
    let n = emi.total_installments;
    if after_months > n {
        return Err(PrepayInvestError::invalid(
            "after_months",
            format!("Prepayment month {after_months} is beyond the {n}-month term"),
        ));
    }

    let outcome = project_lump_sum(
        loan.principal,
        emi.periodic_rate,
        emi.monthly_installment,
        amount,
        after_months,
        config.settlement_tolerance,
    )?;

    if outcome.closure == LumpSumClosure::ClosedAtPrepayment && outcome.lump_sum_applied < amount {
        warnings.push(format!(
            "Only {} of the {} lump sum is needed to close the loan",
            outcome.lump_sum_applied.round_dp(2),
            amount
        ));
    }

    let baseline_interest = baseline_interest(loan, &emi);
    let months = outcome.months_to_payoff;
    // Closing at month 0 means no installment is ever paid.
    let payoff_date = loan
        .start_date
        .and_then(|d| date_after_months(d, months.saturating_sub(1)));

    Ok((
        LumpSumPrepaymentOutput {
            monthly_installment: emi.monthly_installment,
            original_months: n,
            closure: outcome.closure,
            prepayment_month: outcome.prepayment_month,
            balance_before_prepayment: outcome.balance_before_prepayment,
            lump_sum_applied: outcome.lump_sum_applied,
            balance_after_prepayment: outcome.balance_after_prepayment,
            remaining_installments: outcome.remaining_installments,
            months_to_payoff: months,
            months_reduced: n.saturating_sub(months),
            final_installment: outcome.final_installment,
            baseline_interest,
            interest_paid: outcome.interest_paid,
            interest_saved: baseline_interest - outcome.interest_paid,
            total_paid: outcome.total_paid,
            payoff_date,
        },
        warnings,
    ))
}

/// Interest over the original schedule: `E·n − P`.
fn baseline_interest(loan: &LoanTerms, emi: &AmortizationResult) -> Money {
    emi.monthly_installment * Decimal::from(emi.total_installments) - loan.principal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PrepayInvestError;

    fn reference_loan() -> LoanTerms {
        LoanTerms::new(dec!(500_000), dec!(10), 5)
    }

    fn recurring(extra: Money) -> RecurringPrepaymentOutput {
        compute_recurring(&reference_loan(), extra, &SimulationConfig::default())
            .unwrap()
            .0
    }

    #[test]
    fn test_recurring_reference_scenario() {
        let out = recurring(dec!(5000));
        assert_eq!(out.original_months, 60);
        assert_eq!(out.months_to_payoff, 38);
        assert_eq!(out.months_reduced, 22);
        assert!((out.years_saved - dec!(1.8333)).abs() < dec!(0.001));
        assert!((out.interest_saved - dec!(53_426.35)).abs() < dec!(0.05));
        assert_eq!(out.status, SimulationState::PaidOff);
    }

    #[test]
    fn test_recurring_zero_extra_saves_nothing() {
        let out = recurring(Decimal::ZERO);
        assert_eq!(out.months_to_payoff, 60);
        assert_eq!(out.months_reduced, 0);
        assert!(out.interest_saved.abs() < dec!(0.02));
    }

    #[test]
    fn test_recurring_monotonic_in_extra() {
        let extras = [dec!(500), dec!(2000), dec!(5000), dec!(10_000)];
        let outs: Vec<_> = extras.iter().map(|e| recurring(*e)).collect();
        for pair in outs.windows(2) {
            assert!(pair[1].months_to_payoff < pair[0].months_to_payoff);
            assert!(pair[1].interest_saved > pair[0].interest_saved);
        }
    }

    #[test]
    fn test_recurring_cap_reported_as_status_with_warning() {
        let cfg = SimulationConfig::default().with_iteration_cap(24);
        let (out, warnings) = compute_recurring(&reference_loan(), dec!(1000), &cfg).unwrap();
        assert_eq!(out.status, SimulationState::IterationCapReached);
        assert_eq!(out.payoff_date, None);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_recurring_payoff_date() {
        let mut loan = reference_loan();
        loan.start_date = NaiveDate::from_ymd_opt(2025, 1, 5);
        let (out, _) = compute_recurring(&loan, dec!(5000), &SimulationConfig::default()).unwrap();
        // 38th installment.
        assert_eq!(out.payoff_date, NaiveDate::from_ymd_opt(2028, 2, 5));
    }

    #[test]
    fn test_one_time_reduces_tenure_and_interest() {
        let (out, warnings) =
            compute_one_time(&reference_loan(), dec!(100_000), 12, &SimulationConfig::default())
                .unwrap();
        assert_eq!(out.closure, LumpSumClosure::Continues);
        assert!(out.months_to_payoff < 60);
        assert_eq!(out.months_reduced, 60 - out.months_to_payoff);
        assert_eq!(
            out.months_to_payoff,
            out.prepayment_month + out.remaining_installments
        );
        assert!(out.interest_saved > Decimal::ZERO);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_one_time_oversized_lump_sum_warns() {
        let (out, warnings) =
            compute_one_time(&reference_loan(), dec!(400_000), 40, &SimulationConfig::default())
                .unwrap();
        assert_eq!(out.closure, LumpSumClosure::ClosedAtPrepayment);
        assert_eq!(out.months_to_payoff, 40);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_one_time_beyond_term_rejected() {
        let err = compute_one_time(&reference_loan(), dec!(1000), 61, &SimulationConfig::default())
            .unwrap_err();
        assert!(matches!(err, PrepayInvestError::InvalidInput { ref field, .. } if field == "after_months"));
    }

    #[test]
    fn test_one_time_above_principal_rejected() {
        assert!(
            compute_one_time(&reference_loan(), dec!(600_000), 0, &SimulationConfig::default())
                .is_err()
        );
    }

    #[test]
    fn test_analyze_prepayment_dispatch() {
        let input = PrepaymentInput {
            loan: reference_loan(),
            plan: PrepaymentPlan::OneTime {
                amount: dec!(50_000),
                after_months: 24,
            },
            config: SimulationConfig::default(),
        };
        let out = analyze_prepayment(&input).unwrap();
        assert!(matches!(out.result, PrepaymentOutput::OneTime(_)));
        assert_eq!(
            out.methodology,
            "Closed-form remaining tenure after lump-sum prepayment"
        );
        assert_eq!(out.assumptions["plan"]["OneTime"]["after_months"], 24);
    }

    #[test]
    fn test_plan_deserializes_without_config() {
        let input: PrepaymentInput = serde_json::from_str(
            r#"{
                "loan": {"principal": "500000", "annual_rate_percent": "10", "term_years": 5},
                "plan": {"Recurring": {"extra_monthly": "5000"}}
            }"#,
        )
        .unwrap();
        assert_eq!(input.config, SimulationConfig::default());
    }
}
