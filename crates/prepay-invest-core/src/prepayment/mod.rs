pub mod analysis;
pub mod lump_sum;
pub mod simulator;
