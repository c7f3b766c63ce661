use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::types::{Money, Rate, Years};

pub const MONTHS_PER_YEAR: i32 = 12;

/// Term in months for a whole-year tenure, saturating at `i32::MAX`.
pub fn months_for_years(years: Years) -> i32 {
    i32::try_from(years)
        .unwrap_or(i32::MAX)
        .saturating_mul(MONTHS_PER_YEAR)
}

/// Nominal annual rate to the monthly compounding rate.
pub fn monthly_rate(annual_rate: Rate) -> Rate {
    annual_rate / dec!(12)
}

/// Present value of a level monthly installment over `months` periods.
///
/// Returns zero when either the term or the installment is not positive.
/// A zero rate degenerates to the plain sum of installments. Results beyond
/// the decimal range saturate at `Decimal::MAX`.
pub fn installment_to_loan(monthly_installment: Money, annual_rate: Rate, months: i32) -> Money {
    if months <= 0 || monthly_installment <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let r = monthly_rate(annual_rate);
    if r.is_zero() {
        return monthly_installment
            .checked_mul(Decimal::from(months))
            .unwrap_or(Decimal::MAX);
    }

    match annuity_factor(r, months) {
        Some(factor) => monthly_installment
            .checked_mul(factor)
            .unwrap_or(Decimal::MAX),
        None => Decimal::ZERO,
    }
}

/// Level monthly installment that fully repays `loan_principal` over `months`.
///
/// Returns zero when either the term or the principal is not positive.
/// Results beyond the decimal range saturate at `Decimal::MAX`.
pub fn loan_to_installment(loan_principal: Money, annual_rate: Rate, months: i32) -> Money {
    if months <= 0 || loan_principal <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let r = monthly_rate(annual_rate);
    if r.is_zero() {
        return loan_principal / Decimal::from(months);
    }

    match annuity_factor(r, months) {
        Some(factor) => loan_principal
            .checked_div(factor)
            .unwrap_or(Decimal::MAX),
        None => Decimal::ZERO,
    }
}

/// (1 - (1+r)^-n) / r for a non-zero periodic rate and a positive term.
///
/// When (1+r)^n leaves the decimal range the discount term is
/// taken as zero. Returns None for a degenerate factor (1 + r <= 0, or a
/// factor of zero or outside the decimal range).
fn annuity_factor(r: Rate, months: i32) -> Option<Decimal> {
    let one_plus_r = Decimal::ONE + r;
    if one_plus_r <= Decimal::ZERO {
        return None;
    }

    let discount = match one_plus_r.checked_powu(months as u64) {
        Some(growth) => Decimal::ONE.checked_div(growth)?,
        None => Decimal::ZERO,
    };

    let factor = (Decimal::ONE - discount).checked_div(r)?;
    if factor.is_zero() {
        None
    } else {
        Some(factor)
    }
}
