use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::{installment_to_loan, loan_to_installment, months_for_years};
use crate::banks::registry::{BankProfile, BankRegistry};
use crate::borrower::{self, CapacitySummary, CustomerInput, PropertyInput};
use crate::types::*;
use crate::LoanReadinessResult;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankSimulationInput {
    pub customer: CustomerInput,
    pub property: PropertyInput,
    /// Drop banks whose verdict is LOW.
    #[serde(default)]
    pub only_pass: bool,
    /// Order by ascending ratio instead of registry order.
    #[serde(default)]
    pub rank_by_ratio: bool,
}

/// Policy actually applied to one bank, copied so the result stands alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationAssumptions {
    pub tenure_years: Years,
    pub interest_rate: Rate,
    pub dsr_limit: Rate,
    pub max_ltv: Rate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankSimulationResult {
    pub bank_id: String,
    pub bank_name: String,
    /// Income-based lending ceiling.
    pub max_loan_allowed: Money,
    pub max_installment_allowed: Money,
    /// Tighter of the income ceiling and the LTV ceiling. Not capped by the request.
    pub property_loan_allowed: Money,
    /// Installment on the requested loan capped by LTV only.
    pub property_installment: Money,
    pub ratio: Ratio,
    pub verdict: Verdict,
    pub assumptions: SimulationAssumptions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankSimulationOutput {
    pub summary: CapacitySummary,
    pub banks: Vec<BankSimulationResult>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Evaluate the request against every bank, one result per profile in
/// registry order. Numeric edge cases never fail; a borrower without
/// capacity gets an unbounded ratio and a LOW verdict everywhere.
pub fn simulate_banks(
    customer: &CustomerInput,
    property: &PropertyInput,
    registry: &BankRegistry,
) -> Vec<BankSimulationResult> {
    let net_income = borrower::net_income(customer);

    registry
        .iter()
        .map(|bank| simulate_bank(bank, net_income, customer.age, property))
        .collect()
}

/// Keep only banks that did not return a LOW verdict.
pub fn passing(results: Vec<BankSimulationResult>) -> Vec<BankSimulationResult> {
    results.into_iter().filter(|r| r.verdict.is_pass()).collect()
}

/// Most comfortable ratio first, unbounded ratios last. Ties keep their
/// incoming order.
pub fn rank_by_ratio(mut results: Vec<BankSimulationResult>) -> Vec<BankSimulationResult> {
    results.sort_by_key(|r| r.ratio);
    results
}

/// Validate the request, run [`simulate_banks`], apply the requested view
/// and wrap the list in the standard output envelope.
pub fn run_bank_simulation(
    input: &BankSimulationInput,
    registry: &BankRegistry,
) -> LoanReadinessResult<ComputationOutput<BankSimulationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    borrower::validate_customer(&input.customer)?;
    borrower::validate_property(&input.property)?;

    let summary = borrower::capacity_summary(&input.customer);
    if summary.net_income.is_zero() {
        warnings.push("Net income is zero after deductions; no bank can lend.".into());
    }
    for bank in registry {
        if input.property.margin > bank.max_ltv {
            warnings.push(format!(
                "Requested margin {} exceeds {} max LTV {}; installment uses the LTV cap.",
                input.property.margin, bank.name, bank.max_ltv
            ));
        }
    }

    let mut banks = simulate_banks(&input.customer, &input.property, registry);
    if input.only_pass {
        banks = passing(banks);
    }
    if input.rank_by_ratio {
        banks = rank_by_ratio(banks);
    }

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "banks_evaluated": registry.len(),
        "only_pass": input.only_pass,
        "rank_by_ratio": input.rank_by_ratio,
        "requested_margin": input.property.margin.to_string(),
    });

    Ok(with_metadata(
        "Multi-bank Affordability Simulation (DSR, tenure/age, LTV)",
        &assumptions,
        warnings,
        elapsed,
        BankSimulationOutput { summary, banks },
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn simulate_bank(
    bank: &BankProfile,
    net_income: Money,
    age: Years,
    property: &PropertyInput,
) -> BankSimulationResult {
    let rate = bank.typical_interest_rate;
    let max_installment = net_income * bank.dsr_limit;

    let tenure_years = bank_tenure_years(bank, age);
    let months = months_for_years(tenure_years).max(1);

    let max_loan_allowed = round_money(installment_to_loan(max_installment, rate, months));
    let max_loan_by_ltv = round_money(bank.max_ltv * property.spa_price);
    let requested_loan = round_money(property.spa_price * property.margin);

    let property_loan_allowed = max_loan_allowed.min(max_loan_by_ltv);
    let property_installment = round_money(loan_to_installment(
        requested_loan.min(max_loan_by_ltv),
        rate,
        months,
    ));

    let ratio = Ratio::of(property_installment, max_installment).round_dp(3);
    let verdict = Verdict::from_ratio(ratio);

    tracing::debug!(
        bank = %bank.id,
        tenure_years,
        %max_loan_allowed,
        %property_installment,
        %ratio,
        %verdict,
        "bank simulated"
    );

    BankSimulationResult {
        bank_id: bank.id.clone(),
        bank_name: bank.name.clone(),
        max_loan_allowed,
        max_installment_allowed: round_money(max_installment),
        property_loan_allowed,
        property_installment,
        ratio,
        verdict,
        assumptions: SimulationAssumptions {
            tenure_years,
            interest_rate: rate,
            dsr_limit: bank.dsr_limit,
            max_ltv: bank.max_ltv,
        },
    }
}

/// Bank tenure: years until the bank's end age (at least one), capped at the
/// bank's maximum tenure.
fn bank_tenure_years(bank: &BankProfile, age: Years) -> Years {
    bank.max_end_age
        .saturating_sub(age)
        .max(1)
        .min(bank.max_tenure_years)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
