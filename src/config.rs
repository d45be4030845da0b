//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.

use std::{num::NonZeroU32, time::Duration};

use serde::Deserialize;

use crate::services::{
    account_service::DEFAULT_RETRY_BACKOFF_MS, number_generator::DEFAULT_ACCOUNT_NUMBER_RANGE,
};

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (required): PostgreSQL connection string
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3030
/// - `DATABASE_MAX_CONNECTIONS` (optional): Pool size, defaults to 5
/// - `STATEMENT_TIMEOUT_MS` (optional): Per-statement timeout, defaults to 5000
/// - `TRANSFER_RETRY_BACKOFF_MS` (optional): Pause before retrying a
///   conflicting transfer, defaults to 50
/// - `ACCOUNT_NUMBER_RANGE` (optional): Exclusive upper bound of generated
///   account numbers, a positive `u32`, defaults to 100000
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_max_connections")]
    pub database_max_connections: u32,

    #[serde(default = "default_statement_timeout_ms")]
    pub statement_timeout_ms: u64,

    #[serde(default = "default_transfer_retry_backoff_ms")]
    pub transfer_retry_backoff_ms: u64,

    #[serde(default = "default_account_number_range")]
    pub account_number_range: NonZeroU32,
}

fn default_port() -> u16 {
    3030
}

fn default_max_connections() -> u32 {
    5
}

fn default_statement_timeout_ms() -> u64 {
    5000
}

fn default_transfer_retry_backoff_ms() -> u64 {
    DEFAULT_RETRY_BACKOFF_MS
}

fn default_account_number_range() -> NonZeroU32 {
    DEFAULT_ACCOUNT_NUMBER_RANGE
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing (e.g., DATABASE_URL)
    /// - Environment variable values cannot be parsed into expected types
    /// - `ACCOUNT_NUMBER_RANGE` is zero, negative or larger than `u32::MAX`
    pub fn from_env() -> Result<Self, envy::Error> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        Self::from_vars(std::env::vars())
    }

    /// Build configuration from explicit key/value pairs (same names as the
    /// environment variables).
    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        // Field names are automatically converted: database_url -> DATABASE_URL
        envy::from_iter::<_, Config>(vars)
    }

    pub fn statement_timeout(&self) -> Duration {
        Duration::from_millis(self.statement_timeout_ms)
    }

    pub fn transfer_retry_backoff(&self) -> Duration {
        Duration::from_millis(self.transfer_retry_backoff_ms)
    }
}
