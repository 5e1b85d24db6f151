//! Equated monthly installment (EMI) for a fixed-rate loan.
//!
//! `E = P·r·(1+r)^n / ((1+r)^n − 1)` with `r = A/1200` and `n = 12·Y`;
//! a zero rate degenerates to the straight-line `P / n`.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::PrepayInvestError;
use crate::time_value::{compound_factor, periodic_rate};
use crate::types::{Money, Months, Percent, Rate};
use crate::PrepayInvestResult;

const MONTHS_PER_YEAR: u32 = 12;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Terms of a fixed-rate installment loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Outstanding principal.
    pub principal: Money,
    /// Annual interest rate in percent (10 = 10% p.a.).
    pub annual_rate_percent: Percent,
    /// Remaining term in whole years.
    pub term_years: u32,
    /// First installment date, used only for calendar payoff dates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
}

/// Derived installment data for a set of loan terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmortizationResult {
    pub monthly_installment: Money,
    pub total_installments: Months,
    pub periodic_rate: Rate,
}

impl LoanTerms {
    pub fn new(principal: Money, annual_rate_percent: Percent, term_years: u32) -> Self {
        LoanTerms {
            principal,
            annual_rate_percent,
            term_years,
            start_date: None,
        }
    }

    pub fn validate(&self) -> PrepayInvestResult<()> {
        if self.principal <= Decimal::ZERO {
            return Err(PrepayInvestError::invalid(
                "principal",
                "Principal must be positive",
            ));
        }
        if self.annual_rate_percent < Decimal::ZERO {
            return Err(PrepayInvestError::invalid(
                "annual_rate_percent",
                "Interest rate cannot be negative",
            ));
        }
        if self.term_years == 0 {
            return Err(PrepayInvestError::invalid(
                "term_years",
                "Term must be at least one year",
            ));
        }
        self.total_installments()?;
        Ok(())
    }

    pub fn total_installments(&self) -> PrepayInvestResult<Months> {
        self.term_years
            .checked_mul(MONTHS_PER_YEAR)
            .ok_or_else(|| PrepayInvestError::invalid("term_years", "Term is too long"))
    }

    pub fn periodic_rate(&self) -> Rate {
        periodic_rate(self.annual_rate_percent)
    }
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Compute the level monthly installment, installment count and periodic rate.
pub fn calculate_emi(terms: &LoanTerms) -> PrepayInvestResult<AmortizationResult> {
    terms.validate()?;

    let n = terms.total_installments()?;
    let r = terms.periodic_rate();

    let installment = if r.is_zero() {
        terms.principal / Decimal::from(n)
    } else {
        let factor = compound_factor(r, n)?;
        terms.principal * r * factor / (factor - Decimal::ONE)
    };

    Ok(AmortizationResult {
        monthly_installment: installment,
        total_installments: n,
        periodic_rate: r,
    })
}
