// src/protocol/claim_request.rs
//! Credential and presentation requests.

use crate::error::{MyIdError, Result};
use crate::jwt::{Jwt, Payload};
use serde_json::{Map, Value};

/// A request sent by a holder (for a credential) or a verifier (for a presentation).
///
/// | field | JWT claim |
/// |---|---|
/// | `did` | `iss` |
/// | `response_id` | `aud` |
/// | `request_types` | `type` |
/// | `claims` | `claim` |
/// | `nonce` | `nonce` |
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimRequest {
    jwt: Jwt,
    did: String,
    response_id: Option<String>,
    request_types: Vec<String>,
    claims: Map<String, Value>,
    nonce: Option<String>,
}

impl ClaimRequest {
    /// # Errors
    /// Returns [`MyIdError::InvalidProtocolMessage`] if the request has no issuer.
    pub fn from_jwt(jwt: Jwt) -> Result<Self> {
        let payload = jwt.payload();
        let did = payload
            .iss()
            .ok_or_else(|| MyIdError::InvalidProtocolMessage("claim request has no issuer".into()))?
            .to_string();
        let request_types = match payload.get(Payload::TYPE) {
            Some(Value::Array(types)) => types
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            Some(Value::String(single)) => vec![single.clone()],
            _ => Vec::new(),
        };
        let claims = payload
            .get(Payload::CLAIM)
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        let response_id = payload.aud().map(str::to_string);
        let nonce = payload.nonce().map(str::to_string);

        Ok(Self {
            jwt,
            did,
            response_id,
            request_types,
            claims,
            nonce,
        })
    }

    pub fn jwt(&self) -> &Jwt {
        &self.jwt
    }

    /// DID of the requester.
    pub fn did(&self) -> &str {
        &self.did
    }

    /// DID the response should be addressed to.
    pub fn response_id(&self) -> Option<&str> {
        self.response_id.as_deref()
    }

    pub fn request_types(&self) -> &[String] {
        &self.request_types
    }

    pub fn claims(&self) -> &Map<String, Value> {
        &self.claims
    }

    pub fn nonce(&self) -> Option<&str> {
        self.nonce.as_deref()
    }
}
