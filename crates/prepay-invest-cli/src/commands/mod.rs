pub mod common;
pub mod comparison;
pub mod investment;
pub mod loan;
pub mod prepayment;
