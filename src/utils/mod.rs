// src/utils/mod.rs
//! Helper functions shared across the SDK.

pub mod clock;
pub mod crypto;
pub mod logging;
pub mod serialization;
