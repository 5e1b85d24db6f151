use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use prepay_invest_core::prepayment::analysis::{self, PrepaymentInput, PrepaymentPlan};

use crate::commands::common::{check_lump_sum, LoanArgs, SimulationArgs};
use crate::input;

/// Arguments for a recurring extra-payment simulation
#[derive(Args)]
pub struct PrepayArgs {
    /// Path to a JSON/YAML prepayment document (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub loan: LoanArgs,

    /// Extra amount paid every month on top of the EMI
    #[arg(long)]
    pub extra_monthly: Option<Decimal>,

    /// Drop the month-by-month schedule from the output
    #[arg(long)]
    pub summary_only: bool,

    #[command(flatten)]
    pub simulation: SimulationArgs,
}

pub fn run_prepay(args: PrepayArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let pp_input = match input::load_document::<PrepaymentInput>(args.input.as_deref())? {
        Some(mut doc) => {
            doc.config = args.simulation.overlay(doc.config)?;
            doc
        }
        None => {
            let extra_monthly = args
                .extra_monthly
                .ok_or("--extra-monthly is required (or provide --input)")?;
            PrepaymentInput {
                loan: args.loan.to_terms()?,
                plan: PrepaymentPlan::Recurring { extra_monthly },
                config: args.simulation.resolve()?,
            }
        }
    };

    let result = analysis::analyze_prepayment(&pp_input)?;
    let mut value = serde_json::to_value(result)?;
    if args.summary_only {
        strip_schedule(&mut value);
    }
    Ok(value)
}

/// Arguments for a one-time lump-sum prepayment
#[derive(Args)]
pub struct LumpSumArgs {
    /// Path to a JSON/YAML prepayment document (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub loan: LoanArgs,

    /// One-time prepayment amount
    #[arg(long)]
    pub amount: Option<Decimal>,

    /// Installments paid before the prepayment
    #[arg(long, conflicts_with = "after_year")]
    pub after_months: Option<u32>,

    /// Whole years of installments paid before the prepayment
    #[arg(long)]
    pub after_year: Option<u32>,

    #[command(flatten)]
    pub simulation: SimulationArgs,
}

pub fn run_lump_sum(args: LumpSumArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let pp_input = match input::load_document::<PrepaymentInput>(args.input.as_deref())? {
        Some(mut doc) => {
            doc.config = args.simulation.overlay(doc.config)?;
            doc
        }
        None => {
            let loan = args.loan.to_terms()?;
            let amount = args
                .amount
                .ok_or("--amount is required (or provide --input)")?;
            let amount = check_lump_sum(amount, loan.principal)?;
            PrepaymentInput {
                loan,
                plan: PrepaymentPlan::OneTime {
                    amount,
                    after_months: prepayment_month(args.after_months, args.after_year)?,
                },
                config: args.simulation.resolve()?,
            }
        }
    };

    let result = analysis::analyze_prepayment(&pp_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Resolve `--after-months` / `--after-year` into an installment index.
pub fn prepayment_month(
    after_months: Option<u32>,
    after_year: Option<u32>,
) -> Result<u32, Box<dyn std::error::Error>> {
    match (after_months, after_year) {
        (Some(m), _) => Ok(m),
        (None, Some(y)) => y
            .checked_mul(12)
            .ok_or_else(|| "--after-year is too large".into()),
        (None, None) => Err("--after-months or --after-year is required (or provide --input)".into()),
    }
}

fn strip_schedule(value: &mut Value) {
    if let Some(Value::Object(variant)) = value.get_mut("result") {
        for inner in variant.values_mut() {
            if let Value::Object(fields) = inner {
                fields.remove("schedule");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prepayment_month_from_year() {
        assert_eq!(prepayment_month(None, Some(3)).unwrap(), 36);
        assert_eq!(prepayment_month(Some(7), None).unwrap(), 7);
        assert!(prepayment_month(None, None).is_err());
    }

    #[test]
    fn test_strip_schedule() {
        let mut v = json!({
            "result": {"Recurring": {"months_to_payoff": 38, "schedule": [{"month": 1}]}},
            "warnings": []
        });
        strip_schedule(&mut v);
        assert_eq!(v["result"]["Recurring"]["months_to_payoff"], 38);
        assert!(v["result"]["Recurring"].get("schedule").is_none());
    }
}
