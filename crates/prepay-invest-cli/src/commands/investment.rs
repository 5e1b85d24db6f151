use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use prepay_invest_core::investment::projection::{self, ContributionMode, InvestmentInput};

use crate::input;

/// Arguments for an investment projection
#[derive(Args)]
pub struct InvestArgs {
    /// Path to a JSON/YAML investment document (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount invested (per month, or once with --lump-sum)
    #[arg(long)]
    pub contribution: Option<Decimal>,

    /// Expected annual return in percent
    #[arg(long)]
    pub expected_return: Option<Decimal>,

    /// Investment horizon in months
    #[arg(long, conflicts_with = "years")]
    pub months: Option<u32>,

    /// Investment horizon in years
    #[arg(long)]
    pub years: Option<u32>,

    /// Invest the contribution once instead of every month
    #[arg(long)]
    pub lump_sum: bool,
}

pub fn run_invest(args: InvestArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let inv_input = match input::load_document::<InvestmentInput>(args.input.as_deref())? {
        Some(doc) => doc,
        None => {
            let contribution = args
                .contribution
                .ok_or("--contribution is required (or provide --input)")?;
            let annual_return_percent = args
                .expected_return
                .ok_or("--expected-return is required (or provide --input)")?;
            let horizon_months = match (args.months, args.years) {
                (Some(m), _) => m,
                (None, Some(y)) => y.checked_mul(12).ok_or("--years is too large")?,
                (None, None) => return Err("--months or --years is required".into()),
            };
            InvestmentInput {
                contribution,
                annual_return_percent,
                horizon_months,
                mode: if args.lump_sum {
                    ContributionMode::LumpSum
                } else {
                    ContributionMode::Monthly
                },
            }
        }
    };

    let result = projection::project_investment(&inv_input)?;
    Ok(serde_json::to_value(result)?)
}
