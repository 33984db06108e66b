pub mod ratings;
pub mod reports;
pub mod status;
