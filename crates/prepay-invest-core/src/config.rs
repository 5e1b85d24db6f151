//! Simulation configuration.
//!
//! Embedded as an optional `config` field in every simulation input so that
//! JSON/YAML documents may omit it entirely and pick up the defaults.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::PrepayInvestError;
use crate::types::{Money, Months};
use crate::PrepayInvestResult;

/// Upper bound on simulated months before the loop gives up.
pub const DEFAULT_ITERATION_CAP: Months = 1000;

/// Residual balance at or below which a loan is considered settled.
pub const DEFAULT_SETTLEMENT_TOLERANCE: Money = dec!(0.01);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Maximum number of monthly steps the prepayment simulator will run.
    #[serde(default = "default_iteration_cap")]
    pub iteration_cap: Months,
    /// Residual balance folded into the final payment instead of rolling
    /// into another month.
    #[serde(default = "default_settlement_tolerance")]
    pub settlement_tolerance: Money,
}

fn default_iteration_cap() -> Months {
    DEFAULT_ITERATION_CAP
}

fn default_settlement_tolerance() -> Money {
    DEFAULT_SETTLEMENT_TOLERANCE
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            iteration_cap: DEFAULT_ITERATION_CAP,
            settlement_tolerance: DEFAULT_SETTLEMENT_TOLERANCE,
        }
    }
}

impl SimulationConfig {
    pub fn with_iteration_cap(mut self, cap: Months) -> Self {
        self.iteration_cap = cap;
        self
    }

    pub fn validate(&self) -> PrepayInvestResult<()> {
        if self.iteration_cap == 0 {
            return Err(PrepayInvestError::invalid(
                "iteration_cap",
                "Iteration cap must be at least one month",
            ));
        }
        if self.settlement_tolerance < Decimal::ZERO {
            return Err(PrepayInvestError::invalid(
                "settlement_tolerance",
                "Settlement tolerance cannot be negative",
            ));
        }
        Ok(())
    }
}
