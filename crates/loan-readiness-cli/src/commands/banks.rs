use clap::Args;
use serde_json::Value;

use crate::input;

/// Arguments for listing the active bank table
#[derive(Args)]
pub struct BanksArgs {
    /// Bank table (JSON or YAML) replacing the built-in profiles
    #[arg(long)]
    pub banks: Option<String>,

    /// Show a single bank by id
    #[arg(long)]
    pub id: Option<String>,
}

pub fn run_banks(args: BanksArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let registry = input::file::bank_registry_or_default(args.banks.as_deref())?;

    match args.id {
        Some(id) => {
            let profile = registry
                .get(&id)
                .ok_or_else(|| format!("Unknown bank id '{id}'"))?;
            Ok(serde_json::json!({ "result": profile }))
        }
        None => Ok(serde_json::to_value(registry.profiles())?),
    }
}
