pub mod analysis;
pub mod verdict;
