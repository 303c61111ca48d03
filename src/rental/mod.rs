pub mod booking;
pub mod quote;
