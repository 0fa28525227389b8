// src/protocol/jwe.rs
//! Compact JWE envelopes.
//!
//! Only the envelope is handled here: splitting the five segments and reading the
//! protected header. Key agreement and content decryption belong to
//! [`EcdhKey`](crate::wallet::ecdh_keys::EcdhKey) implementations.

use crate::error::{MyIdError, Result};
use crate::utils::serialization::decode_segment;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Protected header of a JWE.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JweHeader {
    pub alg: String,
    pub enc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    /// Ephemeral public key of the sender.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epk: Option<Value>,
}

/// A parsed compact JWE: `header.encrypted_key.iv.ciphertext.tag`.
#[derive(Debug, Clone, PartialEq)]
pub struct Jwe {
    header: JweHeader,
    segments: [String; 5],
}

impl Jwe {
    /// # Errors
    /// Returns [`MyIdError::InvalidJwe`] if the token does not have five segments or the
    /// header is not base64url JSON.
    pub fn parse(token: &str) -> Result<Self> {
        let parts: Vec<&str> = token.trim().split('.').collect();
        let [header, encrypted_key, iv, ciphertext, tag] = parts.as_slice() else {
            return Err(MyIdError::InvalidJwe(format!(
                "expected 5 segments, found {}",
                parts.len()
            )));
        };
        let decoded: JweHeader = decode_segment(header)
            .map_err(|e| MyIdError::InvalidJwe(format!("header: {}", e)))?;

        Ok(Self {
            header: decoded,
            segments: [
                header.to_string(),
                encrypted_key.to_string(),
                iv.to_string(),
                ciphertext.to_string(),
                tag.to_string(),
            ],
        })
    }

    pub fn header(&self) -> &JweHeader {
        &self.header
    }

    pub fn kid(&self) -> Option<&str> {
        self.header.kid.as_deref()
    }

    /// Base64url header segment as received; it is the AAD for content decryption.
    pub fn protected_header(&self) -> &str {
        &self.segments[0]
    }

    pub fn encrypted_key(&self) -> &str {
        &self.segments[1]
    }

    pub fn iv(&self) -> &str {
        &self.segments[2]
    }

    pub fn ciphertext(&self) -> &str {
        &self.segments[3]
    }

    pub fn tag(&self) -> &str {
        &self.segments[4]
    }

    pub fn compact(&self) -> String {
        self.segments.join(".")
    }
}
