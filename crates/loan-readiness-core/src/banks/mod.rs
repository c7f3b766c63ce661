pub mod registry;
pub mod simulator;
