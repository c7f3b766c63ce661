pub mod amortization;
pub mod borrower;
pub mod error;
pub mod types;

#[cfg(feature = "affordability")]
pub mod affordability;

#[cfg(feature = "bank_simulation")]
pub mod banks;

pub use error::LoanReadinessError;
pub use types::*;

/// Standard result type for all loan-readiness operations
pub type LoanReadinessResult<T> = Result<T, LoanReadinessError>;
