// src/models/did.rs
//! DID Document as served by the registry.
//!
//! Only the parts the SDK needs are modelled: the DID itself and its public keys,
//! each of which may carry a revocation timestamp.
//!
//! ```json
//! {
//!   "id": "did:icon:02:6f8a...",
//!   "created": 1700000000,
//!   "publicKey": {
//!     "key1": {
//!       "id": "key1",
//!       "type": ["Secp256k1VerificationKey2018"],
//!       "publicKeyBase64": "A1b2...",
//!       "created": 1700000000,
//!       "revoked": 0
//!     }
//!   }
//! }
//! ```

use crate::error::{MyIdError, Result};
use crate::utils::crypto::verifying_key_from_sec1;
use crate::utils::serialization::base64_decode;
use k256::ecdsa::VerifyingKey;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// The DID this document describes.
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,

    /// Public keys by key id.
    #[serde(rename = "publicKey", default)]
    pub public_keys: BTreeMap<String, PublicKeyProperty>,
}

impl Document {
    /// Parses a registry result payload.
    pub fn deserialize(value: &Value) -> Result<Self> {
        serde_json::from_value(value.clone()).map_err(Into::into)
    }

    pub fn public_key_property(&self, key_id: &str) -> Option<&PublicKeyProperty> {
        self.public_keys.get(key_id)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyProperty {
    pub id: String,

    #[serde(rename = "type", default)]
    pub key_type: Vec<String>,

    /// SEC1-encoded secp256k1 public key, standard base64.
    #[serde(rename = "publicKeyBase64")]
    pub public_key_base64: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,

    /// Revocation timestamp; zero or absent means the key is active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revoked: Option<i64>,
}

impl PublicKeyProperty {
    pub fn is_revoked(&self) -> bool {
        self.revoked.map_or(false, |at| at > 0)
    }

    /// Decodes the key material.
    ///
    /// # Errors
    /// Returns [`MyIdError::InvalidDid`] if the key is not base64 SEC1 secp256k1.
    pub fn public_key(&self) -> Result<VerifyingKey> {
        let bytes = base64_decode(&self.public_key_base64).map_err(|e| {
            MyIdError::InvalidDid(format!("public key {} is not base64: {}", self.id, e))
        })?;
        verifying_key_from_sec1(&bytes).ok_or_else(|| {
            MyIdError::InvalidDid(format!("public key {} is not a secp256k1 key", self.id))
        })
    }
}
