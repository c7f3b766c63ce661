use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;

use loan_readiness_core::affordability::profile::{self, ProfileInput};
use loan_readiness_core::amortization;
use loan_readiness_core::banks::registry::BankRegistry;
use loan_readiness_core::banks::simulator::{self, BankSimulationInput};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_decimal(field: &str, raw: &str) -> NapiResult<Decimal> {
    raw.parse::<Decimal>()
        .map_err(|e| to_napi_error(format!("{field}: {e}")))
}

/// `banks_json` overrides the built-in table when given.
fn registry_from(banks_json: Option<String>) -> NapiResult<BankRegistry> {
    match banks_json {
        Some(json) => serde_json::from_str(&json).map_err(to_napi_error),
        None => Ok(BankRegistry::default()),
    }
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

/// Decimal strings in and out to keep full precision across the JS boundary.
#[napi]
pub fn installment_to_loan(monthly: String, annual_rate: String, months: i32) -> NapiResult<String> {
    let monthly = parse_decimal("monthly", &monthly)?;
    let rate = parse_decimal("annual_rate", &annual_rate)?;
    Ok(amortization::installment_to_loan(monthly, rate, months).to_string())
}

#[napi]
pub fn loan_to_installment(loan: String, annual_rate: String, months: i32) -> NapiResult<String> {
    let loan = parse_decimal("loan", &loan)?;
    let rate = parse_decimal("annual_rate", &annual_rate)?;
    Ok(amortization::loan_to_installment(loan, rate, months).to_string())
}

// ---------------------------------------------------------------------------
// Affordability
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_profile(input_json: String) -> NapiResult<String> {
    let input: ProfileInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = profile::assess_profile(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Bank simulation
// ---------------------------------------------------------------------------

#[napi]
pub fn simulate_banks(input_json: String, banks_json: Option<String>) -> NapiResult<String> {
    let input: BankSimulationInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let registry = registry_from(banks_json)?;
    let output = simulator::run_bank_simulation(&input, &registry).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn default_bank_profiles() -> NapiResult<String> {
    serde_json::to_string(BankRegistry::default().profiles()).map_err(to_napi_error)
}
