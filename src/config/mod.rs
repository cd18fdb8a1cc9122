/// Database configuration and connection management
pub mod database;

/// Ledger seed configuration loading from config.toml
pub mod seed;
