// src/utils/serialization.rs
//! Serialization utilities for the SDK.
//!
//! Provides serialization and deserialization functions for:
//! - JSON data structures
//! - Base64url segments used by compact JWT/JWE tokens
//! - Standard base64 used by registry key material and transaction signatures

use crate::error::{MyIdError, Result};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

/// Serializes a value to a JSON string.
///
/// # Arguments
/// * `data` - The value to serialize (must implement `Serialize`)
///
/// # Returns
/// - `Ok(String)` with JSON representation on success
/// - `Err(serde_json::Error)` if serialization fails
pub fn serialize<T: Serialize>(data: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(data)
}

/// Encodes bytes as base64url without padding (JOSE segment encoding).
pub fn base64url_encode(data: &[u8]) -> String {
    base64::encode_config(data, base64::URL_SAFE_NO_PAD)
}

/// Decodes a base64url segment, with or without padding.
pub fn base64url_decode(segment: &str) -> Result<Vec<u8>> {
    base64::decode_config(segment.trim_end_matches('='), base64::URL_SAFE_NO_PAD)
        .map_err(|e| MyIdError::InvalidJwt(format!("base64url decoding failed: {}", e)))
}

/// Encodes a JSON-serializable value as a base64url segment.
pub fn encode_segment<T: Serialize>(value: &T) -> Result<String> {
    Ok(base64url_encode(serialize(value)?.as_bytes()))
}

/// Decodes a base64url segment holding JSON.
pub fn decode_segment<T: DeserializeOwned>(segment: &str) -> Result<T> {
    let bytes = base64url_decode(segment)?;
    serde_json::from_slice(&bytes).map_err(Into::into)
}

/// Standard base64 with padding.
pub fn base64_encode(data: &[u8]) -> String {
    base64::encode(data)
}

pub fn base64_decode(data: &str) -> Result<Vec<u8>, base64::DecodeError> {
    base64::decode(data)
}

/// Loose truthiness of a JSON value.
///
/// `null`, `false`, `0`, `""`, `[]` and `{}` are falsy. The registry wire format drops
/// falsy fields, so several DTOs use this to decide what is present.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Renders a JSON value the way it is shown in failure messages: strings bare, the rest as JSON.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
