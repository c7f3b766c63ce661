use clap::Args;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::Value;

use loan_readiness_core::affordability::profile::{self, ProfileInput};
use loan_readiness_core::banks::simulator::{self, BankSimulationInput};
use loan_readiness_core::borrower::{CustomerInput, Deduction, PropertyInput};

use crate::input;

/// Borrower and property flags shared by `profile` and `simulate`
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct BorrowerArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Monthly gross income
    #[arg(long)]
    pub gross_income: Option<Decimal>,

    /// Monthly commitment as name=amount (repeatable)
    #[arg(long = "deduction", value_parser = parse_deduction)]
    pub deductions: Vec<Deduction>,

    /// Borrower age in years
    #[arg(long)]
    pub age: Option<u32>,

    /// Sale and purchase price of the property
    #[arg(long, alias = "spa")]
    pub spa_price: Option<Decimal>,

    /// Requested margin of finance
    #[arg(long, default_value = "0.9")]
    pub margin: Decimal,
}

/// Arguments for the flat-policy affordability profile
#[derive(Args)]
pub struct ProfileArgs {
    #[command(flatten)]
    pub borrower: BorrowerArgs,
}

/// Arguments for the multi-bank simulation
#[derive(Args)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub borrower: BorrowerArgs,

    /// Bank table (JSON or YAML) replacing the built-in profiles
    #[arg(long)]
    pub banks: Option<String>,

    /// Only show banks whose verdict is not LOW
    #[arg(long)]
    pub only_pass: bool,

    /// Sort banks by ascending ratio
    #[arg(long)]
    pub rank: bool,
}

pub fn run_profile(args: ProfileArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let profile_input: ProfileInput = read_request(&args.borrower, |customer, property| {
        ProfileInput { customer, property }
    })?;

    let result = profile::assess_profile(&profile_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_simulate(args: SimulateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let registry = input::file::bank_registry_or_default(args.banks.as_deref())?;

    let mut sim_input: BankSimulationInput =
        read_request(&args.borrower, |customer, property| BankSimulationInput {
            customer,
            property,
            only_pass: false,
            rank_by_ratio: false,
        })?;
    sim_input.only_pass |= args.only_pass;
    sim_input.rank_by_ratio |= args.rank;

    let result = simulator::run_bank_simulation(&sim_input, &registry)?;
    Ok(serde_json::to_value(result)?)
}

/// Input file first, then individual flags, then piped stdin.
fn read_request<T: DeserializeOwned>(
    args: &BorrowerArgs,
    build: impl FnOnce(CustomerInput, PropertyInput) -> T,
) -> Result<T, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return input::file::read_json(path);
    }

    if args.gross_income.is_none() {
        if let Some(data) = input::stdin::read_stdin()? {
            return Ok(data);
        }
    }

    let customer = CustomerInput {
        gross_income: args
            .gross_income
            .ok_or("--gross-income is required (or provide --input)")?,
        deductions: args.deductions.clone(),
        age: args.age.ok_or("--age is required (or provide --input)")?,
    };
    let property = PropertyInput {
        spa_price: args
            .spa_price
            .ok_or("--spa-price is required (or provide --input)")?,
        margin: args.margin,
    };

    Ok(build(customer, property))
}

/// Parse `name=amount`; a bare amount gets an empty name.
fn parse_deduction(raw: &str) -> Result<Deduction, String> {
    let (name, amount) = match raw.rsplit_once('=') {
        Some((name, amount)) => (name.trim().to_string(), amount.trim()),
        None => (String::new(), raw.trim()),
    };
    let amount: Decimal = amount
        .parse()
        .map_err(|e| format!("invalid deduction amount '{amount}': {e}"))?;
    Ok(Deduction { name, amount })
}
