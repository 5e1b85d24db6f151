//! One-time lump-sum prepayment.
//!
//! The installment stays the same after the prepayment; the tenure shrinks.
//! The new tenure comes from inverting the amortization formula rather than
//! from simulating month by month.

use log::{debug, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amortization::balance::remaining_balance;
use crate::error::{ensure_non_negative, PrepayInvestError};
use crate::time_value::installments_to_repay;
use crate::types::{Money, Months, Rate};
use crate::PrepayInvestResult;

/// Whether the lump sum retired the loan outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LumpSumClosure {
    /// Balance at the prepayment month was fully covered.
    ClosedAtPrepayment,
    /// Installments continue for `remaining_installments` more months.
    Continues,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LumpSumOutcome {
    pub closure: LumpSumClosure,
    /// Installments paid before the lump sum.
    pub prepayment_month: Months,
    pub balance_before_prepayment: Money,
    /// Portion of the lump sum used: never above the lump sum nor the balance
    /// owed. A remainder within the settlement tolerance is counted in
    /// `total_paid` only.
    pub lump_sum_applied: Money,
    pub balance_after_prepayment: Money,
    /// New remaining tenure after the prepayment.
    pub remaining_installments: Months,
    /// Total tenure: prepayment month plus remaining installments.
    pub months_to_payoff: Months,
    /// Last (partial) installment; zero when closed at prepayment.
    pub final_installment: Money,
    pub total_paid: Money,
    pub interest_paid: Money,
}

/// Apply `lump_sum` after `after_months` level installments of `installment`.
///
/// Fails with `NonConvergentAmortization` when the installment no longer
/// exceeds one month of interest on the reduced balance.
pub fn project_lump_sum(
    principal: Money,
    periodic_rate: Rate,
    installment: Money,
    lump_sum: Money,
    after_months: Months,
    settlement_tolerance: Money,
) -> PrepayInvestResult<LumpSumOutcome> {
    if principal <= Decimal::ZERO {
        return Err(PrepayInvestError::invalid(
            "principal",
            "Principal must be positive",
        ));
    }
    ensure_non_negative("lump_sum", lump_sum)?;
    ensure_non_negative("periodic_rate", periodic_rate)?;

    let paid_before = installment * Decimal::from(after_months);
    let balance_before = remaining_balance(principal, periodic_rate, installment, after_months)?;
    let balance_after = balance_before - lump_sum;

    if balance_after <= settlement_tolerance {
        // A sub-tolerance remainder above the lump sum is settled with it.
        let settled = balance_before.max(Decimal::ZERO);
        let applied = lump_sum.min(settled);
        let total_paid = paid_before + settled;
        debug!("lump sum {lump_sum} closes the loan at month {after_months}");
        return Ok(LumpSumOutcome {
            closure: LumpSumClosure::ClosedAtPrepayment,
            prepayment_month: after_months,
            balance_before_prepayment: balance_before,
            lump_sum_applied: applied,
            balance_after_prepayment: Decimal::ZERO,
            remaining_installments: 0,
            months_to_payoff: after_months,
            final_installment: Decimal::ZERO,
            total_paid,
            interest_paid: total_paid - principal,
        });
    }

    let remaining = installments_to_repay(balance_after, periodic_rate, installment).map_err(|e| {
        if matches!(e, PrepayInvestError::NonConvergentAmortization { .. }) {
            warn!("installment {installment} cannot amortize {balance_after} after prepayment");
        }
        e
    })?;

    // Every installment but the last is paid in full; the last clears what is left.
    let full_installments = remaining - 1;
    let balance_before_final =
        remaining_balance(balance_after, periodic_rate, installment, full_installments)?;
    let final_installment = balance_before_final * (Decimal::ONE + periodic_rate);

    let total_paid = paid_before
        + lump_sum
        + installment * Decimal::from(full_installments)
        + final_installment;

    debug!(
        "lump sum {lump_sum} at month {after_months} leaves {balance_after}, repaid in {remaining} more installments"
    );

    Ok(LumpSumOutcome {
        closure: LumpSumClosure::Continues,
        prepayment_month: after_months,
        balance_before_prepayment: balance_before,
        lump_sum_applied: lump_sum,
        balance_after_prepayment: balance_after,
        remaining_installments: remaining,
        months_to_payoff: after_months + remaining,
        final_installment,
        total_paid,
        interest_paid: total_paid - principal,
    })
}
