pub mod affordability;
pub mod amortization;
pub mod banks;
