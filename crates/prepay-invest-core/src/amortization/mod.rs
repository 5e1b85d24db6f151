pub mod balance;
pub mod emi;
pub mod summary;
