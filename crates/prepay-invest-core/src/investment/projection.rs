//! Deterministic investment growth under constant monthly compounding.
//!
//! Monthly contributions are treated as an ordinary annuity (paid at the end
//! of each month, no withdrawals). Returns are point assumptions; there is no
//! volatility model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::ensure_non_negative;
use crate::time_value::{annuity_accumulation_factor, compound_factor, periodic_rate};
use crate::types::{with_metadata, ComputationOutput, Money, Months, Percent};
use crate::PrepayInvestResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContributionMode {
    /// The same amount every month.
    #[default]
    Monthly,
    /// A single amount invested at the start of the horizon.
    LumpSum,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestmentInput {
    pub contribution: Money,
    pub annual_return_percent: Percent,
    pub horizon_months: Months,
    #[serde(default)]
    pub mode: ContributionMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentProjection {
    pub future_value: Money,
    pub total_contributed: Money,
    /// `future_value − total_contributed`.
    pub growth: Money,
}

// ---------------------------------------------------------------------------
// Formulas
// ---------------------------------------------------------------------------

/// Future value of `contribution` invested every month for `months` months.
///
/// `FV = C·((1+r)^m − 1)/r`, or exactly `C·m` at a zero return.
pub fn future_value_of_contributions(
    contribution: Money,
    annual_return_percent: Percent,
    months: Months,
) -> PrepayInvestResult<Money> {
    ensure_non_negative("contribution", contribution)?;
    ensure_non_negative("annual_return_percent", annual_return_percent)?;
    let r = periodic_rate(annual_return_percent);
    Ok(contribution * annuity_accumulation_factor(r, months)?)
}

/// Future value of a single `amount` left to compound for `months` months.
pub fn future_value_of_lump_sum(
    amount: Money,
    annual_return_percent: Percent,
    months: Months,
) -> PrepayInvestResult<Money> {
    ensure_non_negative("amount", amount)?;
    ensure_non_negative("annual_return_percent", annual_return_percent)?;
    let r = periodic_rate(annual_return_percent);
    Ok(amount * compound_factor(r, months)?)
}

pub(crate) fn compute_projection(input: &InvestmentInput) -> PrepayInvestResult<InvestmentProjection> {
    let (future_value, total_contributed) = match input.mode {
        ContributionMode::Monthly => (
            future_value_of_contributions(
                input.contribution,
                input.annual_return_percent,
                input.horizon_months,
            )?,
            input.contribution * Decimal::from(input.horizon_months),
        ),
        ContributionMode::LumpSum => (
            future_value_of_lump_sum(
                input.contribution,
                input.annual_return_percent,
                input.horizon_months,
            )?,
            input.contribution,
        ),
    };

    Ok(InvestmentProjection {
        future_value,
        total_contributed,
        growth: future_value - total_contributed,
    })
}

/// Project the value of investing instead of prepaying.
pub fn project_investment(
    input: &InvestmentInput,
) -> PrepayInvestResult<ComputationOutput<InvestmentProjection>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let projection = compute_projection(input)?;
    if input.horizon_months == 0 {
        warnings.push("Zero-month horizon: nothing is invested".into());
    }

    let methodology = match input.mode {
        ContributionMode::Monthly => "Future value of an ordinary annuity, monthly compounding",
        ContributionMode::LumpSum => "Compound growth of a single investment, monthly compounding",
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(methodology, input, warnings, elapsed, projection))
}
