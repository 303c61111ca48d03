pub mod cars;
pub mod seed;
