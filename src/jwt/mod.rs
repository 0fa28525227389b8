// src/jwt/mod.rs
//! Compact JSON Web Tokens.
//!
//! A [`Jwt`] is either built locally (header + payload, unsigned) and handed to a
//! [`DidKeyHolder`](crate::wallet::key_holder::DidKeyHolder) for signing, or decoded
//! from a compact `header.payload.signature` string received from elsewhere.
//!
//! Decoded tokens keep their original `header.payload` text so signatures are checked
//! against exactly the bytes that were signed.

pub mod elements;

pub use elements::{Header, Payload};

use crate::error::{MyIdError, Result};
use crate::utils::crypto::verify_es256k;
use crate::utils::serialization::{base64url_decode, decode_segment, encode_segment};
use k256::ecdsa::VerifyingKey;

/// Outcome of a signature check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyResult {
    pub success: bool,
    pub fail_message: Option<String>,
}

impl VerifyResult {
    pub fn success() -> Self {
        Self {
            success: true,
            fail_message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            fail_message: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Jwt {
    header: Header,
    payload: Payload,
    signing_input: Option<String>,
    signature: Option<String>,
}

impl Jwt {
    /// Creates an unsigned token.
    pub fn new(header: Header, payload: Payload) -> Self {
        Self {
            header,
            payload,
            signing_input: None,
            signature: None,
        }
    }

    /// Decodes a compact token.
    ///
    /// Accepts `header.payload` and `header.payload.signature`; an empty signature
    /// segment is treated as no signature.
    ///
    /// # Errors
    /// Returns [`MyIdError::InvalidJwt`] if the token does not have two or three segments
    /// or a segment is not base64url JSON.
    pub fn decode(token: &str) -> Result<Self> {
        let parts: Vec<&str> = token.trim().split('.').collect();
        if parts.len() != 2 && parts.len() != 3 {
            return Err(MyIdError::InvalidJwt(format!(
                "expected 2 or 3 segments, found {}",
                parts.len()
            )));
        }

        let header: Header = decode_segment(parts[0])
            .map_err(|e| MyIdError::InvalidJwt(format!("header: {}", e)))?;
        let payload: Payload = decode_segment(parts[1])
            .map_err(|e| MyIdError::InvalidJwt(format!("payload: {}", e)))?;
        let signature = parts
            .get(2)
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());

        Ok(Self {
            header,
            payload,
            signing_input: Some(format!("{}.{}", parts[0], parts[1])),
            signature,
        })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Base64url signature segment, if the token is signed.
    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    /// The unsigned `header.payload` form that is signed.
    pub fn encode(&self) -> Result<String> {
        if let Some(input) = &self.signing_input {
            return Ok(input.clone());
        }
        Ok(format!(
            "{}.{}",
            encode_segment(&self.header)?,
            encode_segment(&self.payload)?
        ))
    }

    /// Full compact form, `header.payload.signature`, when signed.
    pub fn compact(&self) -> Result<Option<String>> {
        match &self.signature {
            Some(signature) => Ok(Some(format!("{}.{}", self.encode()?, signature))),
            None => Ok(None),
        }
    }

    /// Verifies the ES256K signature and the `exp` claim against the current time.
    pub fn verify(&self, key: &VerifyingKey) -> VerifyResult {
        self.verify_at(key, chrono::Utc::now().timestamp())
    }

    /// Verifies the ES256K signature and the `exp` claim against `now` (Unix seconds).
    pub fn verify_at(&self, key: &VerifyingKey, now: i64) -> VerifyResult {
        let Some(signature) = &self.signature else {
            return VerifyResult::failure("JWT has no signature");
        };
        let Ok(signature) = base64url_decode(signature) else {
            return VerifyResult::failure("JWT signature is malformed");
        };
        let Ok(input) = self.encode() else {
            return VerifyResult::failure("JWT could not be encoded");
        };

        match verify_es256k(key, input.as_bytes(), &signature) {
            None => return VerifyResult::failure("JWT signature is malformed"),
            Some(false) => return VerifyResult::failure("JWT signature is invalid"),
            Some(true) => {}
        }

        match self.payload.exp() {
            Some(exp) if exp < now => VerifyResult::failure("JWT is expired"),
            _ => VerifyResult::success(),
        }
    }
}
