use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use loan_readiness_core::amortization::{installment_to_loan, loan_to_installment};

/// Arguments for the loan -> monthly installment conversion
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct InstallmentArgs {
    /// Loan principal
    #[arg(long)]
    pub loan: Decimal,

    /// Annual interest rate as a decimal (0.045 = 4.5%)
    #[arg(long)]
    pub rate: Decimal,

    /// Term in months
    #[arg(long)]
    pub months: i32,
}

/// Arguments for the monthly installment -> loan conversion
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct LoanArgs {
    /// Monthly installment
    #[arg(long)]
    pub installment: Decimal,

    /// Annual interest rate as a decimal (0.045 = 4.5%)
    #[arg(long)]
    pub rate: Decimal,

    /// Term in months
    #[arg(long)]
    pub months: i32,
}

pub fn run_installment(args: InstallmentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let installment = loan_to_installment(args.loan, args.rate, args.months);
    Ok(json!({
        "result": {
            "loan": args.loan,
            "annual_rate": args.rate,
            "months": args.months,
            "monthly_installment": installment,
        },
        "methodology": "Level annuity payment",
    }))
}

pub fn run_loan(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan = installment_to_loan(args.installment, args.rate, args.months);
    Ok(json!({
        "result": {
            "installment": args.installment,
            "annual_rate": args.rate,
            "months": args.months,
            "loan": loan,
        },
        "methodology": "Present value of a level annuity",
    }))
}
