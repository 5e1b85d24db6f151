use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use prepay_invest_core::comparison::analysis::{self, LumpSumVsInvestInput, PrepayVsInvestInput};

use crate::commands::common::{check_lump_sum, LoanArgs, SimulationArgs};
use crate::commands::prepayment::prepayment_month;
use crate::input;

/// Arguments for prepay vs invest with a monthly surplus
#[derive(Args)]
pub struct CompareArgs {
    /// Path to a JSON/YAML comparison document (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub loan: LoanArgs,

    /// Surplus available every month
    #[arg(long)]
    pub extra_monthly: Option<Decimal>,

    /// Expected annual investment return in percent
    #[arg(long)]
    pub expected_return: Option<Decimal>,

    #[command(flatten)]
    pub simulation: SimulationArgs,
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let cmp_input = match input::load_document::<PrepayVsInvestInput>(args.input.as_deref())? {
        Some(mut doc) => {
            doc.config = args.simulation.overlay(doc.config)?;
            doc
        }
        None => PrepayVsInvestInput {
            loan: args.loan.to_terms()?,
            extra_monthly: args
                .extra_monthly
                .ok_or("--extra-monthly is required (or provide --input)")?,
            expected_return_percent: args
                .expected_return
                .ok_or("--expected-return is required (or provide --input)")?,
            config: args.simulation.resolve()?,
        },
    };

    let result = analysis::compare_prepay_vs_invest(&cmp_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for prepay vs invest with a one-time surplus
#[derive(Args)]
pub struct CompareLumpSumArgs {
    /// Path to a JSON/YAML comparison document (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub loan: LoanArgs,

    /// One-time surplus
    #[arg(long)]
    pub amount: Option<Decimal>,

    /// Installments paid before the surplus is available
    #[arg(long, conflicts_with = "after_year")]
    pub after_months: Option<u32>,

    /// Whole years of installments paid before the surplus is available
    #[arg(long)]
    pub after_year: Option<u32>,

    /// Expected annual investment return in percent
    #[arg(long)]
    pub expected_return: Option<Decimal>,

    #[command(flatten)]
    pub simulation: SimulationArgs,
}

pub fn run_compare_lump_sum(args: CompareLumpSumArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let cmp_input = match input::load_document::<LumpSumVsInvestInput>(args.input.as_deref())? {
        Some(mut doc) => {
            doc.config = args.simulation.overlay(doc.config)?;
            doc
        }
        None => {
            let loan = args.loan.to_terms()?;
            let amount = args
                .amount
                .ok_or("--amount is required (or provide --input)")?;
            LumpSumVsInvestInput {
                amount: check_lump_sum(amount, loan.principal)?,
                after_months: prepayment_month(args.after_months, args.after_year)?,
                expected_return_percent: args
                    .expected_return
                    .ok_or("--expected-return is required (or provide --input)")?,
                config: args.simulation.resolve()?,
                loan,
            }
        }
    };

    let result = analysis::compare_lump_sum_vs_invest(&cmp_input)?;
    Ok(serde_json::to_value(result)?)
}
