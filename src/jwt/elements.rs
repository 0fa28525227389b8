// src/jwt/elements.rs
//! JWT header and payload.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// JOSE header of a compact JWT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Signing algorithm name, e.g. `ES256K`.
    pub alg: String,

    /// Key id of the signer, `<did>#<key id>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
}

impl Header {
    pub fn new(alg: impl Into<String>, kid: impl Into<String>) -> Self {
        Self {
            alg: alg.into(),
            kid: Some(kid.into()),
            typ: None,
        }
    }
}

/// JWT claims set.
///
/// Kept as a JSON object so credential-info contents, credentials and presentations
/// share one representation. Keys serialize in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(Map<String, Value>);

impl Payload {
    pub const ISSUER: &'static str = "iss";
    pub const SUBJECT: &'static str = "sub";
    pub const AUDIENCE: &'static str = "aud";
    pub const ISSUED_AT: &'static str = "iat";
    pub const EXPIRATION: &'static str = "exp";
    pub const NONCE: &'static str = "nonce";
    pub const TYPE: &'static str = "type";
    pub const CLAIM: &'static str = "claim";
    pub const VC: &'static str = "vc";
    pub const VP: &'static str = "vp";

    pub fn new(contents: Map<String, Value>) -> Self {
        Self(contents)
    }

    pub fn contents(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn put(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    fn get_i64(&self, key: &str) -> Option<i64> {
        self.0.get(key).and_then(Value::as_i64)
    }

    pub fn iss(&self) -> Option<&str> {
        self.get_str(Self::ISSUER)
    }

    pub fn sub(&self) -> Option<&str> {
        self.get_str(Self::SUBJECT)
    }

    pub fn aud(&self) -> Option<&str> {
        self.get_str(Self::AUDIENCE)
    }

    pub fn iat(&self) -> Option<i64> {
        self.get_i64(Self::ISSUED_AT)
    }

    pub fn exp(&self) -> Option<i64> {
        self.get_i64(Self::EXPIRATION)
    }

    pub fn nonce(&self) -> Option<&str> {
        self.get_str(Self::NONCE)
    }
}

impl From<Map<String, Value>> for Payload {
    fn from(contents: Map<String, Value>) -> Self {
        Self(contents)
    }
}
