pub mod api;
pub mod config;
pub mod services;
pub mod types;
