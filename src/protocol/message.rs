// src/protocol/message.rs
//! Protocol messages exchanged between holder, issuer and verifier.
//!
//! A message is one of:
//! - an unsigned JWT the local party is about to sign (outbound),
//! - a signed compact JWT received in a `{"type", "message"}` envelope (inbound plain),
//! - a JWE received from the counterparty (inbound protected), which must be decrypted
//!   with [`ProtocolMessage::decrypt_jwe`] before its contents can be read.

use crate::error::{MyIdError, Result};
use crate::jwt::Jwt;
use crate::models::credential::Credential;
use crate::models::presentation::Presentation;
use crate::protocol::claim_request::ClaimRequest;
use crate::protocol::jwe::Jwe;
use crate::wallet::ecdh_keys::EcdhKey;
use crate::wallet::key_holder::DidKeyHolder;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

const TYPE_KEY: &str = "type";
const MESSAGE_KEY: &str = "message";
const PROTECTED_KEY: &str = "protected";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProtocolType {
    #[serde(rename = "REQ_CREDENTIAL")]
    RequestCredential,
    #[serde(rename = "RES_CREDENTIAL")]
    ResponseCredential,
    #[serde(rename = "RES_PROTECTED_CREDENTIAL")]
    ResponseProtectedCredential,
    #[serde(rename = "REQ_PRESENTATION")]
    RequestPresentation,
    #[serde(rename = "RES_PRESENTATION")]
    ResponsePresentation,
    #[serde(rename = "RES_PROTECTED_PRESENTATION")]
    ResponseProtectedPresentation,
}

impl ProtocolType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RequestCredential => "REQ_CREDENTIAL",
            Self::ResponseCredential => "RES_CREDENTIAL",
            Self::ResponseProtectedCredential => "RES_PROTECTED_CREDENTIAL",
            Self::RequestPresentation => "REQ_PRESENTATION",
            Self::ResponsePresentation => "RES_PRESENTATION",
            Self::ResponseProtectedPresentation => "RES_PROTECTED_PRESENTATION",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        [
            Self::RequestCredential,
            Self::ResponseCredential,
            Self::ResponseProtectedCredential,
            Self::RequestPresentation,
            Self::ResponsePresentation,
            Self::ResponseProtectedPresentation,
        ]
        .into_iter()
        .find(|t| t.as_str() == value)
    }
}

impl fmt::Display for ProtocolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of [`ProtocolMessage::sign_encrypt`].
#[derive(Debug, Clone, PartialEq)]
pub struct SignResult {
    pub success: bool,
    /// `{"type", "message"}` (plus `"protected": true` when encrypted) on success.
    pub result: Option<Map<String, Value>>,
    pub fail_message: Option<String>,
}

impl SignResult {
    fn signed(result: Map<String, Value>) -> Self {
        Self {
            success: true,
            result: Some(result),
            fail_message: None,
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            result: None,
            fail_message: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Body {
    Unsigned(Jwt),
    Token(String),
    Encrypted(Jwe),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolMessage {
    kind: ProtocolType,
    body: Body,
}

impl ProtocolMessage {
    /// Outbound message holding `jwt` until it is signed.
    pub fn for_signing(kind: ProtocolType, jwt: Jwt) -> Self {
        Self {
            kind,
            body: Body::Unsigned(jwt),
        }
    }

    /// Inbound protected message.
    pub fn from_jwe(kind: ProtocolType, jwe: Jwe) -> Self {
        Self {
            kind,
            body: Body::Encrypted(jwe),
        }
    }

    /// Parses a `{"type": .., "message": ..}` envelope.
    ///
    /// The message is read as a JWE when `"protected"` is true, as a signed token otherwise.
    ///
    /// # Errors
    /// Returns [`MyIdError::InvalidProtocolMessage`] on an unknown type or missing message.
    pub fn from_json(value: &Value) -> Result<Self> {
        let kind = value
            .get(TYPE_KEY)
            .and_then(Value::as_str)
            .and_then(ProtocolType::parse)
            .ok_or_else(|| MyIdError::InvalidProtocolMessage("unknown message type".into()))?;
        let message = value
            .get(MESSAGE_KEY)
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .ok_or_else(|| MyIdError::InvalidProtocolMessage("message is missing".into()))?;

        let protected = value
            .get(PROTECTED_KEY)
            .and_then(Value::as_bool)
            .unwrap_or(false);
        if protected {
            Ok(Self::from_jwe(kind, Jwe::parse(message)?))
        } else {
            Ok(Self {
                kind,
                body: Body::Token(message.to_string()),
            })
        }
    }

    pub fn kind(&self) -> ProtocolType {
        self.kind
    }

    pub fn is_protected(&self) -> bool {
        matches!(self.body, Body::Encrypted(_))
    }

    /// Key id the sender encrypted to, while the message is still encrypted.
    pub fn jwe_kid(&self) -> Option<&str> {
        match &self.body {
            Body::Encrypted(jwe) => jwe.kid(),
            _ => None,
        }
    }

    /// The signed compact token, once the message is signed or decrypted.
    pub fn message(&self) -> Option<&str> {
        match &self.body {
            Body::Token(token) => Some(token),
            _ => None,
        }
    }

    /// Decrypts the JWE in place; afterwards the message reads as a signed token.
    ///
    /// # Errors
    /// Returns [`MyIdError::InvalidJwe`] if the message is not encrypted or `key` fails.
    pub fn decrypt_jwe(&mut self, key: &dyn EcdhKey) -> Result<()> {
        let Body::Encrypted(jwe) = &self.body else {
            return Err(MyIdError::InvalidJwe("message is not encrypted".into()));
        };
        let plaintext = key.decrypt(jwe)?;
        debug!("decrypted {} message with kid {}", self.kind, key.kid());
        self.body = Body::Token(plaintext);
        Ok(())
    }

    /// Signs the pending JWT with `key_holder`, then encrypts it when `ecdh_key` is given.
    ///
    /// On success the message holds the signed token, so [`credential`](Self::credential)
    /// and friends read the signed form.
    pub fn sign_encrypt(
        &mut self,
        key_holder: &dyn DidKeyHolder,
        ecdh_key: Option<&dyn EcdhKey>,
    ) -> SignResult {
        let Body::Unsigned(jwt) = &self.body else {
            return SignResult::failed("message is already signed");
        };
        let token = match key_holder.sign(jwt) {
            Ok(token) => token,
            Err(e) => return SignResult::failed(e.to_string()),
        };

        let mut result = Map::new();
        result.insert(TYPE_KEY.into(), Value::String(self.kind.as_str().into()));
        match ecdh_key {
            Some(key) => match key.encrypt(&token) {
                Ok(jwe) => {
                    result.insert(MESSAGE_KEY.into(), Value::String(jwe));
                    result.insert(PROTECTED_KEY.into(), Value::Bool(true));
                }
                Err(e) => return SignResult::failed(e.to_string()),
            },
            None => {
                result.insert(MESSAGE_KEY.into(), Value::String(token.clone()));
            }
        }

        self.body = Body::Token(token);
        SignResult::signed(result)
    }

    pub fn claim_request(&self) -> Result<ClaimRequest> {
        ClaimRequest::from_jwt(self.jwt()?)
    }

    pub fn credential(&self) -> Result<Credential> {
        Credential::from_jwt(self.jwt()?)
    }

    pub fn presentation(&self) -> Result<Presentation> {
        Presentation::from_jwt(self.jwt()?)
    }

    fn jwt(&self) -> Result<Jwt> {
        match &self.body {
            Body::Unsigned(jwt) => Ok(jwt.clone()),
            Body::Token(token) => Jwt::decode(token),
            Body::Encrypted(_) => Err(MyIdError::InvalidProtocolMessage(
                "message is still encrypted".into(),
            )),
        }
    }
}
