// src/models/presentation.rs
//! Verifiable Presentation received from a holder.

use crate::error::{MyIdError, Result};
use crate::jwt::{Jwt, Payload};
use crate::models::credential::Credential;
use serde_json::Value;

/// A presentation JWT: issued by the holder (`iss`), wrapping credential JWTs in
/// `vp.verifiableCredential`.
#[derive(Debug, Clone, PartialEq)]
pub struct Presentation {
    jwt: Jwt,
    did: String,
}

impl Presentation {
    /// # Errors
    /// Returns [`MyIdError::InvalidJwt`] if the token has no issuer.
    pub fn from_jwt(jwt: Jwt) -> Result<Self> {
        let did = jwt
            .payload()
            .iss()
            .ok_or_else(|| MyIdError::InvalidJwt("presentation has no issuer".into()))?
            .to_string();
        Ok(Self { jwt, did })
    }

    pub fn from_encoded(token: &str) -> Result<Self> {
        Self::from_jwt(Jwt::decode(token)?)
    }

    pub fn jwt(&self) -> &Jwt {
        &self.jwt
    }

    /// Holder DID.
    pub fn did(&self) -> &str {
        &self.did
    }

    pub fn nonce(&self) -> Option<&str> {
        self.jwt.payload().nonce()
    }

    /// The embedded credential tokens, as sent.
    pub fn credential_tokens(&self) -> Vec<&str> {
        self.jwt
            .payload()
            .get(Payload::VP)
            .and_then(|vp| vp.get("verifiableCredential"))
            .and_then(Value::as_array)
            .map(|list| list.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Decodes every embedded credential.
    pub fn credentials(&self) -> Result<Vec<Credential>> {
        self.credential_tokens()
            .into_iter()
            .map(Credential::from_encoded)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::serialization::encode_segment;
    use serde_json::json;

    #[test]
    fn test_decodes_embedded_credentials() {
        let credential = format!(
            "{}.{}.c2ln",
            encode_segment(&json!({"alg": "ES256K", "kid": "did:icon:02:issuer#key1"})).unwrap(),
            encode_segment(&json!({"iss": "did:icon:02:issuer", "sub": "did:icon:02:holder"})).unwrap()
        );
        let token = format!(
            "{}.{}.",
            encode_segment(&json!({"alg": "ES256K", "kid": "did:icon:02:holder#key1"})).unwrap(),
            encode_segment(&json!({
                "iss": "did:icon:02:holder",
                "nonce": "n-1",
                "vp": {"verifiableCredential": [credential]}
            }))
            .unwrap()
        );

        let presentation = Presentation::from_encoded(&token).unwrap();
        assert_eq!(presentation.did(), "did:icon:02:holder");
        assert_eq!(presentation.nonce(), Some("n-1"));

        let credentials = presentation.credentials().unwrap();
        assert_eq!(credentials.len(), 1);
        assert_eq!(credentials[0].target_did(), Some("did:icon:02:holder"));
    }
}
