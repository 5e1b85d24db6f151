mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::comparison::{CompareArgs, CompareLumpSumArgs};
use commands::investment::InvestArgs;
use commands::loan::{EmiArgs, ScheduleArgs};
use commands::prepayment::{LumpSumArgs, PrepayArgs};

/// Prepay a loan or invest the surplus?
#[derive(Parser)]
#[command(
    name = "pvi",
    version,
    about = "Compare prepaying a loan against investing the same cash",
    long_about = "Computes EMI and amortization schedules for fixed-rate loans, simulates \
                  recurring and one-time prepayments, projects investment growth and \
                  decides which use of surplus cash wins on the numbers alone."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Monthly installment, total interest and burden of a loan
    Emi(EmiArgs),
    /// Month-by-month amortization schedule
    Schedule(ScheduleArgs),
    /// Simulate a recurring extra monthly payment
    Prepay(PrepayArgs),
    /// Apply a one-time lump-sum prepayment
    LumpSum(LumpSumArgs),
    /// Future value of investing a monthly amount or a lump sum
    Invest(InvestArgs),
    /// Prepay vs invest a recurring monthly surplus
    Compare(CompareArgs),
    /// Prepay vs invest a one-time surplus
    CompareLumpSum(CompareLumpSumArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Emi(args) => commands::loan::run_emi(args),
        Commands::Schedule(args) => commands::loan::run_schedule(args),
        Commands::Prepay(args) => commands::prepayment::run_prepay(args),
        Commands::LumpSum(args) => commands::prepayment::run_lump_sum(args),
        Commands::Invest(args) => commands::investment::run_invest(args),
        Commands::Compare(args) => commands::comparison::run_compare(args),
        Commands::CompareLumpSum(args) => commands::comparison::run_compare_lump_sum(args),
        Commands::Version => {
            println!("pvi {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            log::debug!("command failed: {e:?}");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
