use rust_decimal::Decimal;

use crate::time_value::compound_factor;
use crate::types::{Money, Months, Rate};
use crate::PrepayInvestResult;

/// Outstanding principal after `elapsed` level installments.
///
/// `B(k) = P·(1+r)^k − E·((1+r)^k − 1)/r`. At a zero rate the exact
/// straight-line form `P − E·k` is used instead of dividing by `r`.
/// The result is not floored: a negative value means the installments
/// have already overpaid the loan.
pub fn remaining_balance(
    principal: Money,
    periodic_rate: Rate,
    installment: Money,
    elapsed: Months,
) -> PrepayInvestResult<Money> {
    if periodic_rate.is_zero() {
        return Ok(principal - installment * Decimal::from(elapsed));
    }
    let factor = compound_factor(periodic_rate, elapsed)?;
    Ok(principal * factor - installment * (factor - Decimal::ONE) / periodic_rate)
}
