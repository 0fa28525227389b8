// src/utils/logging.rs
//! `env_logger` initialisation driven by [`Settings`].
//!
//! The SDK logs under the `myid_sdk` target. It stays silent unless
//! `log_enable_myid_logger` is set, in which case it logs at `log_level`.

use crate::config::Settings;
use log::LevelFilter;
use std::str::FromStr;

/// Log target of every record the SDK emits.
pub const SDK_TARGET: &str = "myid_sdk";

/// Level filter the SDK target should use under `settings`.
pub fn sdk_level(settings: &Settings) -> LevelFilter {
    if !settings.log_enable_myid_logger {
        return LevelFilter::Off;
    }
    LevelFilter::from_str(&settings.log_level).unwrap_or(LevelFilter::Trace)
}

/// Installs the global logger. Safe to call more than once; later calls are ignored.
pub fn init(settings: &Settings) {
    let result = env_logger::Builder::from_default_env()
        .filter_module(SDK_TARGET, sdk_level(settings))
        .try_init();

    if result.is_ok() {
        log::debug!(
            "log_enable_myid_logger is {}; {}: {:?}",
            settings.log_enable_myid_logger,
            settings.project_name,
            settings
        );
    }
}
