use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::{installment_to_loan, loan_to_installment, months_for_years};
use crate::borrower::{self, CustomerInput, PropertyInput};
use crate::types::*;
use crate::LoanReadinessResult;

/// Flat policy used for the single-customer profile, independent of any bank.
pub const PROFILE_RATE: Rate = dec!(0.045);
pub const PROFILE_DSR: Rate = dec!(0.7);
pub const RETIREMENT_AGE: Years = 70;
pub const MAX_TENURE_YEARS: Years = 35;
pub const MIN_TENURE_YEARS: Years = 1;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileInput {
    pub customer: CustomerInput,
    pub property: PropertyInput,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanResult {
    pub net_income: Money,
    pub max_installment: Money,
    pub max_loan: Money,
    pub property_loan: Money,
    pub property_installment: Money,
    pub tenure_years: Years,
    pub interest_rate: Rate,
    pub dsr_limit: Rate,
    /// round(ratio * 100) clamped to 0..=100; 100 when there is no capacity.
    pub confidence: u32,
    pub status: Verdict,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Affordability of one property for one borrower under the flat policy.
///
/// Never fails: zero income gives an unbounded ratio and a LOW status.
/// Money fields are rounded to whole units on the way out.
pub fn calculate_profile(customer: &CustomerInput, property: &PropertyInput) -> LoanResult {
    let net_income = borrower::net_income(customer);

    let tenure_years = profile_tenure_years(customer.age);
    let months = months_for_years(tenure_years);

    let max_installment = net_income * PROFILE_DSR;
    let max_loan = installment_to_loan(max_installment, PROFILE_RATE, months);

    let property_loan = property.spa_price * property.margin;
    let property_installment = loan_to_installment(property_loan, PROFILE_RATE, months);

    let ratio = Ratio::of(property_installment, max_installment);

    LoanResult {
        net_income: round_money(net_income),
        max_installment: round_money(max_installment),
        max_loan: round_money(max_loan),
        property_loan: round_money(property_loan),
        property_installment: round_money(property_installment),
        tenure_years,
        interest_rate: PROFILE_RATE,
        dsr_limit: PROFILE_DSR,
        confidence: confidence_score(ratio),
        status: Verdict::from_ratio(ratio),
    }
}

/// Validate the request, run [`calculate_profile`] and wrap it in the
/// standard output envelope.
pub fn assess_profile(input: &ProfileInput) -> LoanReadinessResult<ComputationOutput<LoanResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    borrower::validate_customer(&input.customer)?;
    borrower::validate_property(&input.property)?;

    let result = calculate_profile(&input.customer, &input.property);

    if result.net_income.is_zero() {
        warnings.push("Net income is zero after deductions; no installment capacity.".into());
    }
    if input.customer.age >= RETIREMENT_AGE {
        warnings.push(format!(
            "Borrower age {} is at or past retirement age {RETIREMENT_AGE}; tenure floored at {MIN_TENURE_YEARS} year.",
            input.customer.age
        ));
    }

    tracing::debug!(
        tenure_years = result.tenure_years,
        status = %result.status,
        confidence = result.confidence,
        "profile assessed"
    );

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "interest_rate": PROFILE_RATE.to_string(),
        "dsr_limit": PROFILE_DSR.to_string(),
        "retirement_age": RETIREMENT_AGE,
        "max_tenure_years": MAX_TENURE_YEARS,
        "total_deductions": borrower::total_deductions(&input.customer).to_string(),
    });

    Ok(with_metadata(
        "Mortgage Affordability Profile (flat 70% DSR, 4.5% p.a.)",
        &assumptions,
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Years left to retirement, between 1 and the product cap.
fn profile_tenure_years(age: Years) -> Years {
    RETIREMENT_AGE
        .saturating_sub(age)
        .clamp(MIN_TENURE_YEARS, MAX_TENURE_YEARS)
}

fn confidence_score(ratio: Ratio) -> u32 {
    match ratio {
        Ratio::Finite(r) => {
            let pct = match r.checked_mul(dec!(100)) {
                Some(pct) => round_money(pct).clamp(Decimal::ZERO, dec!(100)),
                None => dec!(100),
            };
            pct.to_u32().unwrap_or(100)
        }
        Ratio::Unbounded => 100,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::borrower::Deduction;
    use crate::LoanReadinessError;
    use rust_decimal_macros::dec;

    fn base_input() -> ProfileInput {
        ProfileInput {
            customer: CustomerInput {
                gross_income: dec!(10_000),
                deductions: vec![Deduction {
                    name: "car".into(),
                    amount: dec!(1_000),
                }],
                age: 30,
            },
            property: PropertyInput {
                spa_price: dec!(500_000),
                margin: dec!(0.9),
            },
        }
    }

    #[test]
    fn test_tenure_capped_at_product_limit() {
        assert_eq!(profile_tenure_years(30), 35);
        assert_eq!(profile_tenure_years(35), 35);
    }

    #[test]
    fn test_tenure_limited_by_retirement_age() {
        assert_eq!(profile_tenure_years(50), 20);
    }

    #[test]
    fn test_tenure_floored_at_one_year() {
        assert_eq!(profile_tenure_years(69), 1);
        assert_eq!(profile_tenure_years(70), 1);
        assert_eq!(profile_tenure_years(85), 1);
    }

    #[test]
    fn test_confidence_clamped() {
        assert_eq!(confidence_score(Ratio::Finite(dec!(0.456))), 46);
        assert_eq!(confidence_score(Ratio::Finite(dec!(0.005))), 1);
        assert_eq!(confidence_score(Ratio::Finite(dec!(3.2))), 100);
        assert_eq!(confidence_score(Ratio::Finite(Decimal::ZERO)), 0);
        assert_eq!(confidence_score(Ratio::Unbounded), 100);
        assert_eq!(confidence_score(Ratio::Finite(Decimal::MAX)), 100);
    }

    #[test]
    fn test_vanishing_income_is_low_not_a_panic() {
        let mut input = base_input();
        input.customer.deductions.clear();
        input.customer.gross_income = dec!(0.000000000000000000000000001);
        let out = assess_profile(&input).unwrap();
        assert_eq!(out.result.status, Verdict::Low);
        assert_eq!(out.result.confidence, 100);
        assert_eq!(out.result.max_installment, Decimal::ZERO);
    }

    #[test]
    fn test_example_scenario() {
        let input = base_input();
        let r = calculate_profile(&input.customer, &input.property);
        assert_eq!(r.net_income, dec!(9_000));
        assert_eq!(r.tenure_years, 35);
        assert_eq!(r.max_installment, dec!(6_300));
        assert_eq!(r.property_loan, dec!(450_000));
        assert_eq!(r.interest_rate, dec!(0.045));
        assert_eq!(r.dsr_limit, dec!(0.7));

        let expected_max_loan = round_money(installment_to_loan(dec!(6_300), dec!(0.045), 420));
        assert_eq!(r.max_loan, expected_max_loan);

        // 450k over 420 months at 4.5% is roughly 2,130/month, a ratio near 0.34
        assert!((r.property_installment - dec!(2_130)).abs() < dec!(5));
        assert_eq!(r.status, Verdict::High);
        assert!(r.confidence >= 33 && r.confidence <= 35, "got {}", r.confidence);
    }

    #[test]
    fn test_zero_income_is_low_with_full_confidence() {
        let mut input = base_input();
        input.customer.gross_income = dec!(1_000);
        let r = calculate_profile(&input.customer, &input.property);
        assert_eq!(r.net_income, Decimal::ZERO);
        assert_eq!(r.max_installment, Decimal::ZERO);
        assert_eq!(r.max_loan, Decimal::ZERO);
        assert_eq!(r.status, Verdict::Low);
        assert_eq!(r.confidence, 100);
    }

    #[test]
    fn test_assess_profile_warns_on_zero_income() {
        let mut input = base_input();
        input.customer.deductions[0].amount = dec!(10_000);
        let out = assess_profile(&input).unwrap();
        assert_eq!(out.result.status, Verdict::Low);
        assert!(out.warnings.iter().any(|w| w.contains("Net income is zero")));
        assert_eq!(out.metadata.precision, "rust_decimal_128bit");
    }

    #[test]
    fn test_assess_profile_rejects_bad_margin() {
        let mut input = base_input();
        input.property.margin = dec!(1.2);
        match assess_profile(&input).unwrap_err() {
            LoanReadinessError::InvalidInput { field, .. } => assert_eq!(field, "margin"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }
}
