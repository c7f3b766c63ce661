use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate, Years};
use crate::{LoanReadinessError, LoanReadinessResult};

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// A recurring monthly commitment (car loan, PTPTN, card minimum, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deduction {
    #[serde(default)]
    pub name: String,
    /// A missing amount counts as zero.
    #[serde(default)]
    pub amount: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerInput {
    /// Monthly gross income.
    pub gross_income: Money,
    #[serde(default)]
    pub deductions: Vec<Deduction>,
    pub age: Years,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyInput {
    /// Sale and purchase agreement price.
    pub spa_price: Money,
    /// Requested margin of finance, e.g. 0.9 for 90%.
    pub margin: Rate,
}

/// Gross income and commitments reduced to what a lender assesses against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacitySummary {
    pub gross_income: Money,
    pub total_deductions: Money,
    pub net_income: Money,
}

// ---------------------------------------------------------------------------
// Shared computations
// ---------------------------------------------------------------------------

/// Sum of commitments, saturating at `Decimal::MAX`.
pub fn total_deductions(customer: &CustomerInput) -> Money {
    customer
        .deductions
        .iter()
        .fold(Decimal::ZERO, |acc, d| acc.saturating_add(d.amount))
}

/// Gross income less commitments, floored at zero.
pub fn net_income(customer: &CustomerInput) -> Money {
    (customer.gross_income - total_deductions(customer)).max(Decimal::ZERO)
}

pub fn capacity_summary(customer: &CustomerInput) -> CapacitySummary {
    CapacitySummary {
        gross_income: customer.gross_income,
        total_deductions: total_deductions(customer),
        net_income: net_income(customer),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub fn validate_customer(customer: &CustomerInput) -> LoanReadinessResult<()> {
    if customer.gross_income < Decimal::ZERO {
        return Err(LoanReadinessError::InvalidInput {
            field: "gross_income".into(),
            reason: "Gross income cannot be negative.".into(),
        });
    }
    if customer.age == 0 {
        return Err(LoanReadinessError::InvalidInput {
            field: "age".into(),
            reason: "Age must be a positive number of years.".into(),
        });
    }
    for (i, d) in customer.deductions.iter().enumerate() {
        if d.amount < Decimal::ZERO {
            return Err(LoanReadinessError::InvalidInput {
                field: format!("deductions[{i}].amount"),
                reason: format!("Deduction '{}' cannot be negative.", d.name),
            });
        }
    }
    Ok(())
}

pub fn validate_property(property: &PropertyInput) -> LoanReadinessResult<()> {
    if property.spa_price < Decimal::ZERO {
        return Err(LoanReadinessError::InvalidInput {
            field: "spa_price".into(),
            reason: "SPA price cannot be negative.".into(),
        });
    }
    if property.margin <= Decimal::ZERO || property.margin > Decimal::ONE {
        return Err(LoanReadinessError::InvalidInput {
            field: "margin".into(),
            reason: "Margin of finance must be in (0, 1].".into(),
        });
    }
    Ok(())
}
