//! Month-by-month amortization with optional recurring extra principal.
//!
//! Each run owns its own [`Amortizer`]; nothing is shared between calls.
//! The loop stops on payoff or when the configured iteration cap is hit,
//! so a payment that cannot keep up with accruing interest still terminates.

use log::{debug, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::emi::{calculate_emi, LoanTerms};
use crate::config::SimulationConfig;
use crate::error::{ensure_non_negative, PrepayInvestError};
use crate::types::{with_metadata, ComputationOutput, Money, Months, Rate};
use crate::PrepayInvestResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimulationState {
    Running,
    PaidOff,
    IterationCapReached,
}

/// One month of the simulated schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub month: Months,
    pub opening_balance: Money,
    pub interest: Money,
    pub principal: Money,
    pub payment: Money,
    pub closing_balance: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationOutcome {
    /// Months simulated: the payoff month, or the cap when not repaid.
    pub months_to_payoff: Months,
    pub total_paid: Money,
    /// `total_paid − principal`.
    pub interest_paid: Money,
    /// `PaidOff` or `IterationCapReached`.
    pub status: SimulationState,
    /// Zero when paid off; the unpaid balance when the cap was hit (the last
    /// representable balance if it grew past `Decimal::MAX` first).
    pub final_balance: Money,
    pub schedule: Vec<ScheduleRow>,
}

/// Input for the plain (no prepayment) schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleInput {
    pub loan: LoanTerms,
    #[serde(default)]
    pub config: SimulationConfig,
}

impl SimulationOutcome {
    pub fn is_paid_off(&self) -> bool {
        self.status == SimulationState::PaidOff
    }
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

struct Amortizer {
    rate: Rate,
    scheduled_payment: Money,
    settlement_tolerance: Money,
    iteration_cap: Months,
    balance: Money,
    month: Months,
    total_paid: Money,
    state: SimulationState,
    /// Set once a payment fails to cover the month's interest. From then on
    /// the balance can only grow.
    diverging: bool,
}

impl Amortizer {
    fn new(principal: Money, rate: Rate, scheduled_payment: Money, config: &SimulationConfig) -> Self {
        Amortizer {
            rate,
            scheduled_payment,
            settlement_tolerance: config.settlement_tolerance,
            iteration_cap: config.iteration_cap,
            balance: principal,
            month: 0,
            total_paid: Decimal::ZERO,
            state: SimulationState::Running,
            diverging: false,
        }
    }

    /// Advance one month. Only valid while `Running`.
    ///
    /// Returns `None` when a diverging balance outgrows `Decimal`: the run
    /// is then fast-forwarded to the iteration cap without further rows.
    fn step(&mut self) -> PrepayInvestResult<Option<ScheduleRow>> {
        let opening = self.balance;
        let accrued = opening
            .checked_mul(self.rate)
            .and_then(|interest| opening.checked_add(interest).map(|due| (interest, due)));
        let (interest, due) = match accrued {
            Some(pair) => pair,
            None if self.diverging => {
                self.fast_forward_to_cap();
                return Ok(None);
            }
            None => return Err(PrepayInvestError::overflow("balance plus interest")),
        };

        // Final month: never pay more than what is owed.
        let (mut payment, mut principal) = if self.scheduled_payment >= due {
            (due, opening)
        } else {
            (self.scheduled_payment, self.scheduled_payment - interest)
        };
        if principal <= Decimal::ZERO && opening > Decimal::ZERO {
            self.diverging = true;
        }
        self.balance = opening
            .checked_sub(principal)
            .ok_or_else(|| PrepayInvestError::overflow("closing balance"))?;

        // Sub-tolerance residue from decimal rounding settles with this payment.
        if self.balance > Decimal::ZERO && self.balance <= self.settlement_tolerance {
            payment += self.balance;
            principal += self.balance;
            self.balance = Decimal::ZERO;
        }

        self.total_paid += payment;
        self.month += 1;

        if self.balance <= Decimal::ZERO {
            self.state = SimulationState::PaidOff;
        } else if self.month >= self.iteration_cap {
            self.state = SimulationState::IterationCapReached;
        }

        Ok(Some(ScheduleRow {
            month: self.month,
            opening_balance: opening,
            interest,
            principal,
            payment,
            closing_balance: self.balance,
        }))
    }

    /// The remaining months each pay the scheduled amount in full; the
    /// balance stays at its last representable value.
    fn fast_forward_to_cap(&mut self) {
        let skipped = self.iteration_cap.saturating_sub(self.month);
        self.total_paid += self.scheduled_payment * Decimal::from(skipped);
        debug!(
            "balance {} no longer representable at month {}; skipping {skipped} months to the cap",
            self.balance, self.month
        );
        self.month = self.iteration_cap;
        self.state = SimulationState::IterationCapReached;
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Simulate repayment of `principal` with a level `installment` plus
/// `extra_monthly` of additional principal each month.
///
/// With `extra_monthly = 0` and the loan's own EMI this reproduces the
/// original schedule exactly.
pub fn simulate_prepayment(
    principal: Money,
    periodic_rate: Rate,
    installment: Money,
    extra_monthly: Money,
    config: &SimulationConfig,
) -> PrepayInvestResult<SimulationOutcome> {
    if principal <= Decimal::ZERO {
        return Err(PrepayInvestError::invalid(
            "principal",
            "Principal must be positive",
        ));
    }
    ensure_non_negative("periodic_rate", periodic_rate)?;
    ensure_non_negative("installment", installment)?;
    ensure_non_negative("extra_monthly", extra_monthly)?;
    config.validate()?;

    let scheduled_payment = installment + extra_monthly;
    debug!(
        "simulating payoff of {principal} at {periodic_rate}/month paying {scheduled_payment}/month (cap {})",
        config.iteration_cap
    );

    let mut sim = Amortizer::new(principal, periodic_rate, scheduled_payment, config);
    let mut schedule = Vec::new();

    while sim.state == SimulationState::Running {
        if let Some(row) = sim.step()? {
            schedule.push(row);
        }
    }

    if sim.state == SimulationState::IterationCapReached {
        warn!(
            "prepayment simulation hit the {}-month cap with {} still outstanding",
            sim.iteration_cap, sim.balance
        );
    } else {
        debug!("loan paid off in {} months, total paid {}", sim.month, sim.total_paid);
    }

    Ok(SimulationOutcome {
        months_to_payoff: sim.month,
        total_paid: sim.total_paid,
        interest_paid: sim.total_paid - principal,
        status: sim.state,
        final_balance: sim.balance.max(Decimal::ZERO),
        schedule,
    })
}

/// Month-by-month schedule of the original loan (no prepayment).
pub fn build_schedule(
    input: &ScheduleInput,
) -> PrepayInvestResult<ComputationOutput<SimulationOutcome>> {
    let start = Instant::now();
    let emi = calculate_emi(&input.loan)?;

    let outcome = simulate_prepayment(
        input.loan.principal,
        emi.periodic_rate,
        emi.monthly_installment,
        Decimal::ZERO,
        &input.config,
    )?;

    let mut warnings = Vec::new();
    if !outcome.is_paid_off() {
        warnings.push(format!(
            "Schedule truncated at the {}-month iteration cap",
            input.config.iteration_cap
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-payment amortization schedule",
        input,
        warnings,
        elapsed,
        outcome,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn reference_loan() -> (Money, Rate, Money, Months) {
        let emi = calculate_emi(&LoanTerms::new(dec!(500_000), dec!(10), 5)).unwrap();
        (
            dec!(500_000),
            emi.periodic_rate,
            emi.monthly_installment,
            emi.total_installments,
        )
    }

    #[test]
    fn test_zero_extra_reproduces_original_schedule() {
        let (p, r, e, n) = reference_loan();
        let out = simulate_prepayment(p, r, e, Decimal::ZERO, &SimulationConfig::default()).unwrap();

        assert_eq!(out.status, SimulationState::PaidOff);
        assert_eq!(out.months_to_payoff, n);
        assert_eq!(out.schedule.len(), n as usize);
        assert!((out.total_paid - e * Decimal::from(n)).abs() < dec!(0.02));
        assert_eq!(out.final_balance, Decimal::ZERO);
    }

    #[test]
    fn test_extra_payment_shortens_loan() {
        let (p, r, e, n) = reference_loan();
        let out = simulate_prepayment(p, r, e, dec!(5000), &SimulationConfig::default()).unwrap();

        assert!(out.is_paid_off());
        assert!(out.months_to_payoff < n);
        let baseline_interest = e * Decimal::from(n) - p;
        assert!(out.interest_paid < baseline_interest);
    }

    #[test]
    fn test_final_payment_is_clipped() {
        let (p, r, e, _) = reference_loan();
        let out = simulate_prepayment(p, r, e, dec!(5000), &SimulationConfig::default()).unwrap();

        let last = out.schedule.last().unwrap();
        assert!(last.payment <= e + dec!(5000));
        assert_eq!(last.closing_balance, Decimal::ZERO);
        assert_eq!(last.payment, last.opening_balance + last.interest);
    }

    #[test]
    fn test_schedule_rows_are_consistent() {
        let (p, r, e, _) = reference_loan();
        let out = simulate_prepayment(p, r, e, dec!(1500), &SimulationConfig::default()).unwrap();

        let tol = dec!(0.000001);
        let mut expected_opening = p;
        for (i, row) in out.schedule.iter().enumerate() {
            assert_eq!(row.month as usize, i + 1);
            assert_eq!(row.opening_balance, expected_opening);
            assert!((row.payment - (row.interest + row.principal)).abs() < tol);
            assert!((row.closing_balance - (row.opening_balance - row.principal)).abs() < tol);
            expected_opening = row.closing_balance;
        }
        let paid: Money = out.schedule.iter().map(|r| r.payment).sum();
        assert_eq!(paid, out.total_paid);
    }

    #[test]
    fn test_negative_amortization_hits_cap() {
        // 1% monthly on 100_000 accrues 1_000; paying 900 never catches up.
        let cfg = SimulationConfig::default();
        let out = simulate_prepayment(dec!(100_000), dec!(0.01), dec!(900), Decimal::ZERO, &cfg).unwrap();

        assert_eq!(out.status, SimulationState::IterationCapReached);
        assert_eq!(out.months_to_payoff, cfg.iteration_cap);
        assert!(out.final_balance > dec!(100_000));
    }

    #[test]
    fn test_runaway_balance_still_ends_at_cap() {
        // 10% a month on 1_000_000 against a 1_000 payment outgrows Decimal
        // long before month 1000.
        let cfg = SimulationConfig::default();
        let out = simulate_prepayment(dec!(1_000_000), dec!(0.1), dec!(1000), Decimal::ZERO, &cfg)
            .unwrap();

        assert_eq!(out.status, SimulationState::IterationCapReached);
        assert_eq!(out.months_to_payoff, 1000);
        assert!(out.schedule.len() < 1000);
        assert!(out.final_balance > dec!(1_000_000_000_000_000_000_000));
        assert_eq!(out.total_paid, dec!(1_000_000));
    }

    #[test]
    fn test_configured_cap_is_respected() {
        let (p, r, e, _) = reference_loan();
        let cfg = SimulationConfig::default().with_iteration_cap(12);
        let out = simulate_prepayment(p, r, e, Decimal::ZERO, &cfg).unwrap();

        assert_eq!(out.status, SimulationState::IterationCapReached);
        assert_eq!(out.months_to_payoff, 12);
        assert_eq!(out.schedule.len(), 12);
        assert!(out.final_balance > Decimal::ZERO);
    }

    #[test]
    fn test_zero_rate_straight_line() {
        let out = simulate_prepayment(
            dec!(12_000),
            Decimal::ZERO,
            dec!(1000),
            dec!(500),
            &SimulationConfig::default(),
        )
        .unwrap();
        assert_eq!(out.months_to_payoff, 8);
        assert_eq!(out.total_paid, dec!(12_000));
        assert_eq!(out.interest_paid, Decimal::ZERO);
    }

    #[test]
    fn test_validation_negative_extra() {
        let (p, r, e, _) = reference_loan();
        assert!(simulate_prepayment(p, r, e, dec!(-1), &SimulationConfig::default()).is_err());
    }

    #[test]
    fn test_build_schedule_envelope() {
        let out = build_schedule(&ScheduleInput {
            loan: LoanTerms::new(dec!(500_000), dec!(10), 5),
            config: SimulationConfig::default(),
        })
        .unwrap();
        assert_eq!(out.result.months_to_payoff, 60);
        assert!(out.warnings.is_empty());
        assert_eq!(out.methodology, "Level-payment amortization schedule");
    }
}
