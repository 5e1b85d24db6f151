use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use prepay_invest_core::amortization::emi::LoanTerms;
use prepay_invest_core::config::SimulationConfig;

use crate::input;

/// Smallest loan the CLI accepts.
const MIN_PRINCIPAL: Decimal = dec!(1000);

/// Smallest one-time prepayment the CLI accepts.
const MIN_LUMP_SUM: Decimal = dec!(1000);

/// Loan terms supplied as individual flags.
#[derive(Args, Debug, Clone)]
pub struct LoanArgs {
    /// Outstanding loan amount
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 10 for 10%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Remaining tenure in years (1-40)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=40))]
    pub years: Option<u32>,

    /// Date of the first installment (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,
}

impl LoanArgs {
    pub fn to_terms(&self) -> Result<LoanTerms, Box<dyn std::error::Error>> {
        let principal = self
            .principal
            .ok_or("--principal is required (or provide --input)")?;
        if principal < MIN_PRINCIPAL {
            return Err(format!("--principal must be at least {MIN_PRINCIPAL}").into());
        }
        let rate = self.rate.ok_or("--rate is required (or provide --input)")?;
        if rate < Decimal::ZERO {
            return Err("--rate cannot be negative".into());
        }
        let years = self.years.ok_or("--years is required (or provide --input)")?;

        Ok(LoanTerms {
            principal,
            annual_rate_percent: rate,
            term_years: years,
            start_date: self.start_date,
        })
    }
}

/// Range check for a one-time amount given on the command line.
pub fn check_lump_sum(amount: Decimal, principal: Decimal) -> Result<Decimal, Box<dyn std::error::Error>> {
    if amount < MIN_LUMP_SUM {
        return Err(format!("--amount must be at least {MIN_LUMP_SUM}").into());
    }
    if amount > principal {
        return Err("--amount cannot exceed the principal".into());
    }
    Ok(amount)
}

/// Simulation settings shared by every command that runs the simulator.
#[derive(Args, Debug, Clone)]
pub struct SimulationArgs {
    /// Simulation config file (JSON or YAML)
    #[arg(long)]
    pub config: Option<String>,

    /// Maximum months to simulate before giving up (overrides --config)
    #[arg(long)]
    pub iteration_cap: Option<u32>,
}

impl SimulationArgs {
    pub fn resolve(&self) -> Result<SimulationConfig, Box<dyn std::error::Error>> {
        let mut cfg = match self.config {
            Some(ref path) => input::file::read_document(path)?,
            None => SimulationConfig::default(),
        };
        if let Some(cap) = self.iteration_cap {
            cfg = cfg.with_iteration_cap(cap);
        }
        cfg.validate()?;
        Ok(cfg)
    }

    /// Apply flag overrides on top of a config that came with an input document.
    pub fn overlay(&self, base: SimulationConfig) -> Result<SimulationConfig, Box<dyn std::error::Error>> {
        if self.config.is_none() && self.iteration_cap.is_none() {
            return Ok(base);
        }
        let mut cfg = match self.config {
            Some(_) => self.resolve()?,
            None => base,
        };
        if let Some(cap) = self.iteration_cap {
            cfg = cfg.with_iteration_cap(cap);
        }
        Ok(cfg)
    }
}
