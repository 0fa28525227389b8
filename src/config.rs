// src/config.rs
//! Typed SDK settings.
//!
//! Settings are layered with the `config` crate:
//! 1. Built-in defaults (see [`Settings::default`])
//! 2. An optional `myid.toml` file in the working directory
//! 3. `MYID_*` environment variables (a `.env` file is loaded first)
//!
//! ## Environment Variables
//! - `MYID_REGISTRY_URL`: base URL of the registry web service
//! - `MYID_LEDGER_URL`: JSON-RPC endpoint of the ledger node
//! - `MYID_NETWORK_ID`: network id carried by every transaction
//! - `MYID_SCORE_ADDRESS`: address of the credential registry score
//! - `MYID_LOG_ENABLE_MYID_LOGGER`: enables the SDK's own log target

use crate::error::{MyIdError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_CONFIG_FILE: &str = "myid";
const ENV_PREFIX: &str = "MYID";

/// Every option the SDK recognises, with its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub project_name: String,
    /// When false the `myid_sdk` log target is silenced.
    pub log_enable_myid_logger: bool,
    pub log_level: String,
    /// Registry web service base URL.
    pub registry_url: String,
    /// Ledger JSON-RPC endpoint.
    pub ledger_url: String,
    pub network_id: u64,
    /// Credential registry score address.
    pub score_address: String,
    /// Fee ceiling carried by every write transaction.
    pub step_limit: u64,
    pub transaction_timeout_ms: u64,
    pub retry_attempts: u32,
    pub retry_backoff_ms: u64,
    pub http_timeout_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            project_name: "myid-sdk".to_string(),
            log_enable_myid_logger: false,
            log_level: "TRACE".to_string(),
            registry_url: "http://localhost:8080".to_string(),
            ledger_url: "http://localhost:9000/api/v3".to_string(),
            network_id: 2,
            score_address: String::new(),
            step_limit: 5_000_000,
            transaction_timeout_ms: 15_000,
            retry_attempts: 5,
            retry_backoff_ms: 2_000,
            http_timeout_ms: 10_000,
        }
    }
}

impl Settings {
    /// Loads settings from `.env`, `myid.toml` and `MYID_*` variables.
    ///
    /// # Errors
    /// Returns [`MyIdError::Config`] if a source cannot be parsed or a value is out of range.
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Loads settings using `file` (without extension) as the optional config file.
    pub fn load_from(file: &str) -> Result<Self> {
        let settings: Settings = config::Config::builder()
            .add_source(config::File::with_name(file).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Rejects settings the retry loop cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.retry_attempts == 0 {
            return Err(MyIdError::Config(config::ConfigError::Message(
                "retry_attempts must be > 0".into(),
            )));
        }
        if self.transaction_timeout_ms == 0 {
            return Err(MyIdError::Config(config::ConfigError::Message(
                "transaction_timeout_ms must be > 0".into(),
            )));
        }
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retry_attempts,
            backoff: Duration::from_millis(self.retry_backoff_ms),
        }
    }

    pub fn transaction_timeout(&self) -> Duration {
        Duration::from_millis(self.transaction_timeout_ms)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http_timeout_ms)
    }
}

/// Bounded retry policy for transaction confirmation.
///
/// `max_attempts` counts every request for the transaction result, including the first;
/// `backoff` is slept between attempts, never after the last one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Settings::default().retry_policy()
    }
}
