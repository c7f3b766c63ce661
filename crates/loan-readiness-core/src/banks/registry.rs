use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::types::{Rate, Years};
use crate::{LoanReadinessError, LoanReadinessResult};

/// Upper bounds accepted for configured tenures and end ages.
pub const MAX_CONFIGURED_TENURE_YEARS: Years = 100;
pub const MAX_CONFIGURED_END_AGE: Years = 150;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Lending policy assumptions for one bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankProfile {
    pub id: String,
    pub name: String,
    /// Maximum share of net income allowed toward installments.
    pub dsr_limit: Rate,
    pub max_tenure_years: Years,
    /// Age by which the loan must be fully repaid.
    pub max_end_age: Years,
    /// Maximum loan-to-value on the SPA price.
    pub max_ltv: Rate,
    pub typical_interest_rate: Rate,
    /// Share of a credit card limit counted as a monthly commitment.
    pub cc_treatment_percent: Rate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_ref: Option<String>,
}

/// Ordered, validated table of bank profiles.
///
/// Order is the default display order of simulation results. Built once and
/// never mutated; pass it by reference into the simulator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BankRegistry {
    profiles: Vec<BankProfile>,
}

impl BankRegistry {
    /// Validate every profile and build the registry.
    pub fn new(profiles: Vec<BankProfile>) -> LoanReadinessResult<Self> {
        if profiles.is_empty() {
            return Err(LoanReadinessError::InvalidConfiguration {
                bank: "<registry>".into(),
                reason: "At least one bank profile is required.".into(),
            });
        }

        let mut seen = HashSet::new();
        for profile in &profiles {
            validate_profile(profile)?;
            if !seen.insert(profile.id.as_str()) {
                return Err(LoanReadinessError::InvalidConfiguration {
                    bank: profile.id.clone(),
                    reason: "Duplicate bank id.".into(),
                });
            }
        }

        tracing::debug!(banks = profiles.len(), "bank registry loaded");
        Ok(Self { profiles })
    }

    pub fn profiles(&self) -> &[BankProfile] {
        &self.profiles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BankProfile> {
        self.profiles.iter()
    }

    pub fn get(&self, id: &str) -> Option<&BankProfile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl Default for BankRegistry {
    /// The built-in Malaysian residential table.
    fn default() -> Self {
        Self {
            profiles: default_profiles(),
        }
    }
}

impl<'de> Deserialize<'de> for BankRegistry {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let profiles = Vec::<BankProfile>::deserialize(deserializer)?;
        BankRegistry::new(profiles).map_err(serde::de::Error::custom)
    }
}

impl<'a> IntoIterator for &'a BankRegistry {
    type Item = &'a BankProfile;
    type IntoIter = std::slice::Iter<'a, BankProfile>;

    fn into_iter(self) -> Self::IntoIter {
        self.profiles.iter()
    }
}

// ---------------------------------------------------------------------------
// Built-in table
// ---------------------------------------------------------------------------

/// Published product limits where available; banks do not publish DSR, so a
/// 70% baseline is assumed throughout.
pub fn default_profiles() -> Vec<BankProfile> {
    vec![
        BankProfile {
            id: "maybank".into(),
            name: "Maybank".into(),
            dsr_limit: dec!(0.7),
            max_tenure_years: 35,
            max_end_age: 70,
            max_ltv: dec!(0.9),
            typical_interest_rate: dec!(0.045),
            cc_treatment_percent: dec!(0.05),
            notes: Some(
                "Calculator shows 35 years or up to age 70. 70% DSR baseline for simulation."
                    .into(),
            ),
            source: Some("Maybank".into()),
            source_ref: Some(
                "https://www.maybank2u.com.my/WebBank/M2UHomeloanCalculator.html".into(),
            ),
        },
        BankProfile {
            id: "cimb".into(),
            name: "CIMB".into(),
            dsr_limit: dec!(0.7),
            max_tenure_years: 35,
            max_end_age: 70,
            max_ltv: dec!(0.95),
            typical_interest_rate: dec!(0.044),
            cc_treatment_percent: dec!(0.05),
            notes: Some(
                "Up to 95% financing on some packages; simulated as the optimistic case.".into(),
            ),
            source: Some("CIMB".into()),
            source_ref: Some(
                "https://www.cimbpreferred.com.my/en/preferred-experience/banking-solutions/financing/home-loan.html"
                    .into(),
            ),
        },
        BankProfile {
            id: "hlb".into(),
            name: "Hong Leong Bank".into(),
            dsr_limit: dec!(0.7),
            max_tenure_years: 35,
            max_end_age: 70,
            max_ltv: dec!(0.9),
            typical_interest_rate: dec!(0.046),
            cc_treatment_percent: dec!(0.05),
            notes: Some(
                "90% residential / 85% non-residential, tenure up to 35 years or age 70.".into(),
            ),
            source: Some("HLB".into()),
            source_ref: Some(
                "https://www.hlb.com.my/en/personal-banking/loans/property-loan/home-loan.html"
                    .into(),
            ),
        },
        BankProfile {
            id: "rhb".into(),
            name: "RHB".into(),
            dsr_limit: dec!(0.7),
            max_tenure_years: 35,
            max_end_age: 70,
            max_ltv: dec!(0.9),
            typical_interest_rate: dec!(0.047),
            cc_treatment_percent: dec!(0.05),
            notes: Some("Up to 90% plus allowances for fees; 90% baseline.".into()),
            source: Some("RHB".into()),
            source_ref: Some(
                "https://www.rhbgroup.com/personal/home-loan/my1-full-flexi-home-loan/index.html"
                    .into(),
            ),
        },
        BankProfile {
            id: "publicbank".into(),
            name: "Public Bank".into(),
            dsr_limit: dec!(0.7),
            max_tenure_years: 35,
            max_end_age: 70,
            max_ltv: dec!(0.9),
            typical_interest_rate: dec!(0.044),
            cc_treatment_percent: dec!(0.05),
            notes: Some("35-year tenures; rates vary by product.".into()),
            source: Some("Public Bank".into()),
            source_ref: Some("https://www.pbebank.com/en/loans/home-loan-financing/".into()),
        },
    ]
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_profile(profile: &BankProfile) -> LoanReadinessResult<()> {
    let invalid = |reason: &str| LoanReadinessError::InvalidConfiguration {
        bank: profile.id.clone(),
        reason: reason.into(),
    };

    if profile.id.trim().is_empty() {
        return Err(invalid("Bank id must not be empty."));
    }
    if profile.dsr_limit <= Decimal::ZERO || profile.dsr_limit > Decimal::ONE {
        return Err(invalid("DSR limit must be in (0, 1]."));
    }
    if profile.max_ltv <= Decimal::ZERO || profile.max_ltv > Decimal::ONE {
        return Err(invalid("Max LTV must be in (0, 1]."));
    }
    if profile.max_tenure_years == 0 || profile.max_tenure_years > MAX_CONFIGURED_TENURE_YEARS {
        return Err(invalid("Max tenure must be between 1 and 100 years."));
    }
    if profile.max_end_age == 0 || profile.max_end_age > MAX_CONFIGURED_END_AGE {
        return Err(invalid("Max end age must be between 1 and 150."));
    }
    if profile.typical_interest_rate < Decimal::ZERO {
        return Err(invalid("Interest rate cannot be negative."));
    }
    if profile.cc_treatment_percent < Decimal::ZERO || profile.cc_treatment_percent > Decimal::ONE {
        return Err(invalid("Credit card treatment must be in [0, 1]."));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
