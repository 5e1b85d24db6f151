use napi::Result as NapiResult;
use napi_derive::napi;

use prepay_invest_core::{amortization, comparison, investment, prepayment};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Loan
// ---------------------------------------------------------------------------

#[napi]
pub fn summarize_loan(input_json: String) -> NapiResult<String> {
    let input: amortization::emi::LoanTerms =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = amortization::summary::summarize_loan(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn build_schedule(input_json: String) -> NapiResult<String> {
    let input: prepayment::simulator::ScheduleInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = prepayment::simulator::build_schedule(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Prepayment
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_prepayment(input_json: String) -> NapiResult<String> {
    let input: prepayment::analysis::PrepaymentInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = prepayment::analysis::analyze_prepayment(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Investment
// ---------------------------------------------------------------------------

#[napi]
pub fn project_investment(input_json: String) -> NapiResult<String> {
    let input: investment::projection::InvestmentInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = investment::projection::project_investment(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

#[napi]
pub fn compare_prepay_vs_invest(input_json: String) -> NapiResult<String> {
    let input: comparison::analysis::PrepayVsInvestInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        comparison::analysis::compare_prepay_vs_invest(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compare_lump_sum_vs_invest(input_json: String) -> NapiResult<String> {
    let input: comparison::analysis::LumpSumVsInvestInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        comparison::analysis::compare_lump_sum_vs_invest(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
