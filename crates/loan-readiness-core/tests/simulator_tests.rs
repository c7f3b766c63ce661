use loan_readiness_core::banks::registry::{default_profiles, BankProfile, BankRegistry};
use loan_readiness_core::banks::simulator::{
    rank_by_ratio, run_bank_simulation, simulate_banks, BankSimulationInput,
    SimulationAssumptions,
};
use loan_readiness_core::borrower::{CustomerInput, Deduction, PropertyInput};
use loan_readiness_core::{LoanReadinessError, Money, Ratio, Verdict};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Fixtures
// ===========================================================================

fn borrower(gross: Money) -> CustomerInput {
    CustomerInput {
        gross_income: gross,
        deductions: vec![
            Deduction {
                name: "car".into(),
                amount: dec!(800),
            },
            Deduction {
                name: "card".into(),
                amount: dec!(200),
            },
        ],
        age: 30,
    }
}

fn condo() -> PropertyInput {
    PropertyInput {
        spa_price: dec!(500_000),
        margin: dec!(0.9),
    }
}

fn single_bank(edit: impl FnOnce(&mut BankProfile)) -> BankRegistry {
    let mut profile = default_profiles().remove(0);
    edit(&mut profile);
    BankRegistry::new(vec![profile]).unwrap()
}

// ===========================================================================
// Shape
// ===========================================================================

#[test]
fn test_one_result_per_profile_in_registry_order() {
    let mut profiles = default_profiles();
    profiles.reverse();
    let registry = BankRegistry::new(profiles).unwrap();

    let results = simulate_banks(&borrower(dec!(10_000)), &condo(), &registry);
    let ids: Vec<&str> = results.iter().map(|r| r.bank_id.as_str()).collect();
    assert_eq!(ids, vec!["publicbank", "rhb", "hlb", "cimb", "maybank"]);
}

#[test]
fn test_assumptions_snapshot() {
    let registry = BankRegistry::default();
    let results = simulate_banks(&borrower(dec!(10_000)), &condo(), &registry);
    assert_eq!(
        results[2].assumptions,
        SimulationAssumptions {
            tenure_years: 35,
            interest_rate: dec!(0.046),
            dsr_limit: dec!(0.7),
            max_ltv: dec!(0.9),
        }
    );
}

// ===========================================================================
// Policy rules
// ===========================================================================

#[test]
fn test_zero_net_income_is_low_everywhere() {
    let registry = BankRegistry::default();
    let results = simulate_banks(&borrower(dec!(1_000)), &condo(), &registry);
    assert_eq!(results.len(), registry.len());
    for r in results {
        assert_eq!(r.max_installment_allowed, Decimal::ZERO);
        assert_eq!(r.ratio, Ratio::Unbounded);
        assert_eq!(r.verdict, Verdict::Low);
    }
}

#[test]
fn test_ltv_cap_never_exceeded() {
    let registry = single_bank(|p| p.max_ltv = dec!(0.9));
    for gross in [dec!(5_000), dec!(20_000), dec!(100_000), dec!(10_000_000)] {
        let results = simulate_banks(&borrower(gross), &condo(), &registry);
        assert!(results[0].property_loan_allowed <= dec!(450_000));
    }
}

#[test]
fn test_allowed_loan_monotonic_in_income() {
    let registry = BankRegistry::default();
    let mut previous: Option<Vec<Money>> = None;
    for step in 0..40 {
        let gross = dec!(1_000) + Decimal::from(step) * dec!(750);
        let allowed: Vec<Money> = simulate_banks(&borrower(gross), &condo(), &registry)
            .iter()
            .map(|r| r.property_loan_allowed)
            .collect();
        if let Some(prev) = &previous {
            for (before, after) in prev.iter().zip(&allowed) {
                assert!(after >= before, "allowed loan fell from {before} to {after}");
            }
        }
        previous = Some(allowed);
    }
}

#[test]
fn test_allowed_loan_not_capped_by_request() {
    let registry = single_bank(|p| p.max_ltv = dec!(0.9));
    let property = PropertyInput {
        spa_price: dec!(500_000),
        margin: dec!(0.5),
    };
    let results = simulate_banks(&borrower(dec!(50_000)), &property, &registry);
    // Capacity reflects the LTV ceiling, installment reflects the 250k request
    assert_eq!(results[0].property_loan_allowed, dec!(450_000));
    let expected_pmt = loan_readiness_core::round_money(
        loan_readiness_core::amortization::loan_to_installment(dec!(250_000), dec!(0.045), 420),
    );
    assert_eq!(results[0].property_installment, expected_pmt);
}

#[test]
fn test_request_above_ltv_uses_ltv_for_installment() {
    let registry = single_bank(|p| p.max_ltv = dec!(0.8));
    let results = simulate_banks(&borrower(dec!(50_000)), &condo(), &registry);
    let expected_pmt = loan_readiness_core::round_money(
        loan_readiness_core::amortization::loan_to_installment(dec!(400_000), dec!(0.045), 420),
    );
    assert_eq!(results[0].property_installment, expected_pmt);
}

#[test]
fn test_end_age_shortens_tenure() {
    let registry = single_bank(|p| {
        p.max_end_age = 65;
        p.max_tenure_years = 30;
    });
    let mut older = borrower(dec!(10_000));
    older.age = 50;
    let results = simulate_banks(&older, &condo(), &registry);
    assert_eq!(results[0].assumptions.tenure_years, 15);

    older.age = 70;
    let results = simulate_banks(&older, &condo(), &registry);
    assert_eq!(results[0].assumptions.tenure_years, 1);
}

#[test]
fn test_zero_rate_bank() {
    let registry = single_bank(|p| p.typical_interest_rate = Decimal::ZERO);
    let results = simulate_banks(&borrower(dec!(10_000)), &condo(), &registry);
    // 6,300 * 420 months, undiscounted
    assert_eq!(results[0].max_loan_allowed, dec!(2_646_000));
    // 450,000 / 420 = 1,071.43
    assert_eq!(results[0].property_installment, dec!(1_071));
}

#[test]
fn test_verdict_tiers_across_incomes() {
    let registry = single_bank(|_| {});
    let verdict_at = |gross: Money| simulate_banks(&borrower(gross), &condo(), &registry)[0].verdict;
    assert_eq!(verdict_at(dec!(10_000)), Verdict::High);
    assert_eq!(verdict_at(dec!(3_000)), Verdict::Low);
    // ~2,130 installment / 0.7 / 0.95 + 1,000 deductions
    assert_eq!(verdict_at(dec!(4_200)), Verdict::Borderline);
}

// ===========================================================================
// Envelope and configuration
// ===========================================================================

#[test]
fn test_run_bank_simulation_only_pass_and_rank() {
    let input = BankSimulationInput {
        customer: borrower(dec!(4_300)),
        property: condo(),
        only_pass: true,
        rank_by_ratio: true,
    };
    let out = run_bank_simulation(&input, &BankRegistry::default()).unwrap();
    let banks = &out.result.banks;
    assert!(!banks.is_empty());
    assert!(banks.iter().all(|b| b.verdict != Verdict::Low));
    assert_eq!(banks, &rank_by_ratio(banks.clone()));
    assert_eq!(out.result.summary.total_deductions, dec!(1_000));
}

#[test]
fn test_run_bank_simulation_rejects_zero_age() {
    let mut customer = borrower(dec!(10_000));
    customer.age = 0;
    let input = BankSimulationInput {
        customer,
        property: condo(),
        only_pass: false,
        rank_by_ratio: false,
    };
    match run_bank_simulation(&input, &BankRegistry::default()).unwrap_err() {
        LoanReadinessError::InvalidInput { field, .. } => assert_eq!(field, "age"),
        other => panic!("Expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn test_unbounded_ratio_serializes_distinctly() {
    let registry = BankRegistry::default();
    let results = simulate_banks(&borrower(dec!(900)), &condo(), &registry);
    let value = serde_json::to_value(&results[0]).unwrap();
    assert_eq!(value["ratio"], "Infinity");
    assert_eq!(value["verdict"], "LOW");
}

#[test]
fn test_registry_loaded_from_json() {
    let json = r#"[
        {
            "id": "coop",
            "name": "Co-op Bank",
            "dsr_limit": "0.6",
            "max_tenure_years": 30,
            "max_end_age": 65,
            "max_ltv": "0.85",
            "typical_interest_rate": "0.05",
            "cc_treatment_percent": "0.05"
        }
    ]"#;
    let registry: BankRegistry = serde_json::from_str(json).unwrap();
    let results = simulate_banks(&borrower(dec!(10_000)), &condo(), &registry);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].bank_name, "Co-op Bank");
    assert_eq!(results[0].max_installment_allowed, dec!(5_400));
    assert!(results[0].property_loan_allowed <= dec!(425_000));
}

// ===========================================================================
// Extreme magnitudes
// ===========================================================================

#[test]
fn test_vanishing_income_is_low_everywhere() {
    let customer = CustomerInput {
        gross_income: dec!(0.000000000000000000000000001),
        deductions: Vec::new(),
        age: 30,
    };
    let results = simulate_banks(&customer, &condo(), &BankRegistry::default());
    assert_eq!(results.len(), 5);
    for r in results {
        assert_eq!(r.max_installment_allowed, Decimal::ZERO);
        assert_eq!(r.max_loan_allowed, Decimal::ZERO);
        assert_eq!(r.ratio, Ratio::Unbounded);
        assert_eq!(r.verdict, Verdict::Low);
    }
}

#[test]
fn test_huge_income_and_price_stay_in_range() {
    let customer = CustomerInput {
        gross_income: Decimal::MAX,
        deductions: Vec::new(),
        age: 30,
    };
    let property = PropertyInput {
        spa_price: Decimal::MAX,
        margin: Decimal::ONE,
    };
    let results = simulate_banks(&customer, &property, &BankRegistry::default());
    for r in results {
        // Income ceiling saturates, so the LTV ceiling binds
        assert_eq!(r.max_loan_allowed, Decimal::MAX);
        assert!(r.property_loan_allowed < Decimal::MAX);
        assert!(r.property_installment > Decimal::ZERO);
        assert_eq!(r.verdict, Verdict::High);
    }
}

#[test]
fn test_oversized_configured_tenure_rejected_at_load() {
    let mut profile = default_profiles().remove(0);
    profile.max_tenure_years = 200_000_000;
    profile.max_end_age = 300_000_000;
    match BankRegistry::new(vec![profile]).unwrap_err() {
        LoanReadinessError::InvalidConfiguration { bank, .. } => assert_eq!(bank, "maybank"),
        other => panic!("Expected InvalidConfiguration, got {other:?}"),
    }
}

#[test]
fn test_longest_configured_tenure_simulates() {
    let registry = single_bank(|p| {
        p.max_tenure_years = 100;
        p.max_end_age = 150;
    });
    let mut young = borrower(dec!(10_000));
    young.age = 18;
    let results = simulate_banks(&young, &condo(), &registry);
    assert_eq!(results[0].assumptions.tenure_years, 100);
    assert!(results[0].max_loan_allowed > Decimal::ZERO);
    assert_eq!(results[0].verdict, Verdict::High);
}
