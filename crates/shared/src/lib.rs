//! Shared configuration for Movomint services.
//!
//! This crate owns everything read from the process environment:
//! - Layered application configuration (`config/*` files, `MOVOMINT__*` variables)
//! - Object store credentials (`AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`)

pub mod config;

pub use self::config::{AppConfig, ConfigError, Credentials, StorageSettings};
