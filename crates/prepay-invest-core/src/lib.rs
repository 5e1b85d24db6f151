pub mod amortization;
pub mod config;
pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "prepayment")]
pub mod prepayment;

#[cfg(feature = "investment")]
pub mod investment;

#[cfg(feature = "comparison")]
pub mod comparison;

pub use config::SimulationConfig;
pub use error::PrepayInvestError;
pub use types::*;

/// Standard result type for all prepay-invest operations
pub type PrepayInvestResult<T> = Result<T, PrepayInvestError>;
