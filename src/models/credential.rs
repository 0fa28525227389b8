// src/models/credential.rs
//! Verifiable Credential data model.
//!
//! Credentials travel as signed JWTs (W3C VC-JWT). The claims that matter to the
//! registry protocol are read straight from the token:
//!
//! - `did`: the issuer (`iss`)
//! - `key_id`: the issuer key that signed it (fragment of the header `kid`)
//! - `target_did`: the holder the credential was issued to (`sub`, or
//!   `vc.credentialSubject.id` when `sub` is absent)
//! - `signature`: the JWT signature, which content-addresses the credential in the registry

use crate::error::{MyIdError, Result};
use crate::jwt::{Jwt, Payload};
use crate::models::property_name::VERIFIABLE_CREDENTIAL_TYPE;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct Credential {
    jwt: Jwt,
    did: String,
    key_id: String,
}

impl Credential {
    /// Wraps a decoded credential JWT.
    ///
    /// # Errors
    /// Returns [`MyIdError::InvalidJwt`] if the token has no issuer or no key id.
    pub fn from_jwt(jwt: Jwt) -> Result<Self> {
        let did = jwt
            .payload()
            .iss()
            .ok_or_else(|| MyIdError::InvalidJwt("credential has no issuer".into()))?
            .to_string();
        let kid = jwt
            .header()
            .kid
            .as_deref()
            .ok_or_else(|| MyIdError::InvalidJwt("credential has no kid".into()))?;
        let key_id = kid.rsplit_once('#').map_or(kid, |(_, id)| id).to_string();

        Ok(Self { jwt, did, key_id })
    }

    /// Decodes a compact credential JWT.
    pub fn from_encoded(token: &str) -> Result<Self> {
        Self::from_jwt(Jwt::decode(token)?)
    }

    pub fn jwt(&self) -> &Jwt {
        &self.jwt
    }

    /// Issuer DID.
    pub fn did(&self) -> &str {
        &self.did
    }

    /// Issuer key id, without the DID prefix.
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// DID of the holder the credential was issued to.
    pub fn target_did(&self) -> Option<&str> {
        let payload = self.jwt.payload();
        payload.sub().or_else(|| {
            payload
                .get(Payload::VC)
                .and_then(|vc| vc.get("credentialSubject"))
                .and_then(|subject| subject.get("id"))
                .and_then(Value::as_str)
        })
    }

    /// `vc.type`, in token order.
    pub fn types(&self) -> Vec<String> {
        self.jwt
            .payload()
            .get(Payload::VC)
            .and_then(|vc| vc.get("type"))
            .and_then(Value::as_array)
            .map(|types| {
                types
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// First credential type other than the generic `VerifiableCredential` tag.
    pub fn specific_type(&self) -> Option<String> {
        self.types()
            .into_iter()
            .find(|t| t != VERIFIABLE_CREDENTIAL_TYPE)
    }

    pub fn issued_at(&self) -> Option<i64> {
        self.jwt.payload().iat()
    }

    pub fn expiration(&self) -> Option<i64> {
        self.jwt.payload().exp()
    }

    pub fn signature(&self) -> Option<&str> {
        self.jwt.signature()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::Header;
    use crate::utils::serialization::encode_segment;
    use serde_json::json;

    fn token(header: Value, payload: Value, signature: &str) -> String {
        format!(
            "{}.{}.{}",
            encode_segment(&header).unwrap(),
            encode_segment(&payload).unwrap(),
            signature
        )
    }

    #[test]
    fn test_reads_protocol_claims() {
        let credential = Credential::from_encoded(&token(
            json!({"alg": "ES256K", "kid": "did:icon:02:issuer#key1"}),
            json!({
                "iss": "did:icon:02:issuer",
                "sub": "did:icon:02:holder",
                "iat": 1_700_000_000,
                "exp": 1_700_086_400,
                "vc": {"type": ["VerifiableCredential", "PhoneCredential"]}
            }),
            "c2ln",
        ))
        .unwrap();

        assert_eq!(credential.did(), "did:icon:02:issuer");
        assert_eq!(credential.key_id(), "key1");
        assert_eq!(credential.target_did(), Some("did:icon:02:holder"));
        assert_eq!(credential.specific_type().as_deref(), Some("PhoneCredential"));
        assert_eq!(credential.expiration(), Some(1_700_086_400));
        assert_eq!(credential.signature(), Some("c2ln"));
    }

    #[test]
    fn test_target_did_falls_back_to_credential_subject() {
        let credential = Credential::from_encoded(&token(
            json!({"alg": "ES256K", "kid": "key1"}),
            json!({
                "iss": "did:icon:02:issuer",
                "vc": {"type": ["VerifiableCredential"], "credentialSubject": {"id": "did:icon:02:holder"}}
            }),
            "",
        ))
        .unwrap();

        assert_eq!(credential.key_id(), "key1");
        assert_eq!(credential.target_did(), Some("did:icon:02:holder"));
        assert_eq!(credential.specific_type(), None);
        assert_eq!(credential.signature(), None);
    }

    #[test]
    fn test_requires_issuer() {
        let jwt = Jwt::new(Header::new("ES256K", "did:icon:02:issuer#key1"), Default::default());
        assert!(matches!(Credential::from_jwt(jwt), Err(MyIdError::InvalidJwt(_))));
    }
}
