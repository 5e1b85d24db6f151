use clap::Args;
use serde_json::Value;

use prepay_invest_core::amortization::emi::LoanTerms;
use prepay_invest_core::amortization::summary;
use prepay_invest_core::prepayment::simulator::{self, ScheduleInput};

use crate::commands::common::{LoanArgs, SimulationArgs};
use crate::input;

/// Arguments for the loan summary
#[derive(Args)]
pub struct EmiArgs {
    /// Path to a JSON/YAML loan document (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub loan: LoanArgs,
}

pub fn run_emi(args: EmiArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms: LoanTerms = match input::load_document(args.input.as_deref())? {
        Some(terms) => terms,
        None => args.loan.to_terms()?,
    };
    let result = summary::summarize_loan(&terms)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for the amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    /// Path to a JSON/YAML schedule document ({"loan": ..., "config": ...})
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub loan: LoanArgs,

    #[command(flatten)]
    pub simulation: SimulationArgs,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let schedule_input = match input::load_document::<ScheduleInput>(args.input.as_deref())? {
        Some(mut doc) => {
            doc.config = args.simulation.overlay(doc.config)?;
            doc
        }
        None => ScheduleInput {
            loan: args.loan.to_terms()?,
            config: args.simulation.resolve()?,
        },
    };
    let result = simulator::build_schedule(&schedule_input)?;
    Ok(serde_json::to_value(result)?)
}
