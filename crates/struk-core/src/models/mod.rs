//! Data models: receipt records, input images, and configuration.

pub mod config;
pub mod receipt;
