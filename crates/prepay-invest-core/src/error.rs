use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::{Money, Months};

#[derive(Debug, Error)]
pub enum PrepayInvestError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error(
        "Non-convergent amortization: an installment of {installment} can never pay off a \
         balance of {balance} (monthly interest {interest})"
    )]
    NonConvergentAmortization {
        installment: Money,
        balance: Money,
        interest: Money,
    },

    #[error("Iteration cap reached: loan not repaid after {cap} months (remaining balance {remaining_balance})")]
    IterationCapReached { cap: Months, remaining_balance: Money },

    #[error("Arithmetic overflow in {context}")]
    Overflow { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl PrepayInvestError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        PrepayInvestError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn overflow(context: &str) -> Self {
        PrepayInvestError::Overflow {
            context: context.into(),
        }
    }
}

impl From<serde_json::Error> for PrepayInvestError {
    fn from(e: serde_json::Error) -> Self {
        PrepayInvestError::SerializationError(e.to_string())
    }
}

/// Guard shared by every entry point that takes a money amount.
pub(crate) fn ensure_non_negative(field: &str, value: Decimal) -> Result<(), PrepayInvestError> {
    if value < Decimal::ZERO {
        return Err(PrepayInvestError::invalid(field, format!("{field} cannot be negative")));
    }
    Ok(())
}
