pub mod orders;
pub mod statistics;
