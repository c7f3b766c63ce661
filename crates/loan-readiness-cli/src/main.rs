mod commands;
mod input;
mod logging;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::affordability::{ProfileArgs, SimulateArgs};
use commands::amortization::{InstallmentArgs, LoanArgs};
use commands::banks::BanksArgs;

/// Mortgage affordability and bank approval simulation
#[derive(Parser)]
#[command(
    name = "loanready",
    version,
    about = "Mortgage affordability and bank approval simulation",
    long_about = "Estimate how much a borrower can finance and how each bank's DSR, \
                  tenure/age and LTV policy would treat a property purchase. \
                  All bank parameters are static assumptions, overridable with --banks."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log each computation step to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Affordability profile under the flat 70% DSR / 4.5% policy
    Profile(ProfileArgs),
    /// Simulate approval likelihood across every configured bank
    Simulate(SimulateArgs),
    /// Monthly installment for a loan principal
    Installment(InstallmentArgs),
    /// Loan principal supported by a monthly installment
    Loan(LoanArgs),
    /// List the active bank profiles
    Banks(BanksArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: {}", "warning".yellow().bold(), e);
    }

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Profile(args) => commands::affordability::run_profile(args),
        Commands::Simulate(args) => commands::affordability::run_simulate(args),
        Commands::Installment(args) => commands::amortization::run_installment(args),
        Commands::Loan(args) => commands::amortization::run_loan(args),
        Commands::Banks(args) => commands::banks::run_banks(args),
        Commands::Version => {
            println!("loanready {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
