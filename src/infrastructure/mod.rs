pub mod config;
pub mod encoders;
pub mod repositories;
