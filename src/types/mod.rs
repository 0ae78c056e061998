pub mod amount;
pub mod models;
