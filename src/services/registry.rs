// src/services/registry.rs
//! DID registry capability shared by issuer and verifier.
//!
//! Wraps the registry web service's DID endpoints and the plumbing every service needs:
//! the base URL, the HTTP transport and the DID network id conversion.

use crate::error::{MyIdError, Result};
use crate::jwt::Jwt;
use crate::models::did::Document;
use crate::models::requests::{DidRequest, VcRequest};
use crate::services::api_path;
use crate::services::http_transport::{HttpTransport, ResultResponse};
use log::debug;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Key status sent with a DID update.
const KEY_STATUS_ACTIVE: i32 = 1;
const KEY_STATUS_REVOKED: i32 = 0;

/// Client for the registry web service.
#[derive(Clone)]
pub struct RegistryClient {
    /// Registry base URL, without trailing slash
    url: String,
    transport: Arc<dyn HttpTransport>,
}

impl RegistryClient {
    /// # Arguments
    /// * `url` - Registry base URL
    /// * `transport` - HTTP collaborator, shared between services
    pub fn new(url: impl Into<String>, transport: Arc<dyn HttpTransport>) -> Self {
        let url: String = url.into();
        Self {
            url: url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// GETs `path` (with any query already appended) under the registry URL.
    pub async fn get(&self, path: &str) -> ResultResponse {
        let request_url = format!("{}{}", self.url, path);
        let response = self.transport.get(&request_url).await;
        debug!("GET {} -> {}", request_url, response);
        response
    }

    /// POSTs `body` as JSON to `path` under the registry URL.
    pub async fn post<T: Serialize + Sync>(&self, path: &str, body: &T) -> Result<ResultResponse> {
        let request_url = format!("{}{}", self.url, path);
        let body = serde_json::to_value(body)?;
        let response = self.transport.post(&request_url, &body).await;
        debug!("POST {} -> {}", request_url, response);
        Ok(response)
    }

    /// Registers a new DID for the public key.
    ///
    /// # Arguments
    /// * `key_id` - Id of the key inside the new document
    /// * `public_key_base64` - SEC1 public key, base64
    /// * `decimal_nid` - Network id, see [`decimal_nid_from_did`]
    ///
    /// # Returns
    /// The created document, or `None` if the registry refused.
    pub async fn create_did(
        &self,
        key_id: &str,
        public_key_base64: &str,
        decimal_nid: &str,
    ) -> Result<Option<Document>> {
        let request = DidRequest {
            key_id: key_id.to_string(),
            nid: decimal_nid.to_string(),
            public_key: public_key_base64.to_string(),
        };
        debug!("create_did {}", request);
        let response = self.post(api_path::C_DID, &request).await?;
        document_from(response)
    }

    /// Resolves a DID document; `None` if the registry does not know it.
    pub async fn get_did(&self, did: &str) -> Result<Option<Document>> {
        let response = self.get(&format!("{}{}", api_path::R_DID, did)).await;
        document_from(response)
    }

    /// Adds the public key described by `signed_jwt` to its DID.
    pub async fn add_public_key(&self, signed_jwt: &str) -> Result<Option<Document>> {
        self.update_key(signed_jwt, KEY_STATUS_ACTIVE).await
    }

    /// Revokes the public key described by `signed_jwt`.
    pub async fn revoke_key(&self, signed_jwt: &str) -> Result<Option<Document>> {
        self.update_key(signed_jwt, KEY_STATUS_REVOKED).await
    }

    async fn update_key(&self, signed_jwt: &str, status: i32) -> Result<Option<Document>> {
        let jwt = Jwt::decode(signed_jwt)?;
        let kid = jwt
            .header()
            .kid
            .as_deref()
            .ok_or_else(|| MyIdError::InvalidJwt("DID update JWT has no kid".into()))?;
        let request = VcRequest {
            jwt: Some(signed_jwt.to_string()),
            nid: Some(decimal_nid_from_did(kid)?),
            status: Some(status),
            sig: None,
        };
        let response = self.post(api_path::U_DID, &request).await?;
        document_from(response)
    }
}

impl std::fmt::Debug for RegistryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryClient").field("url", &self.url).finish()
    }
}

/// Network id of a DID (`did:<method>:<nid>:<id>`) in decimal, e.g. `"02"` becomes `"2"`.
///
/// # Errors
/// Returns [`MyIdError::InvalidDid`] if the third segment is missing or not a decimal number.
pub fn decimal_nid_from_did(did: &str) -> Result<String> {
    let nid = did
        .split(':')
        .nth(2)
        .ok_or_else(|| MyIdError::InvalidDid(format!("{} has no network id", did)))?;
    nid.parse::<u64>()
        .map(|n| n.to_string())
        .map_err(|_| MyIdError::InvalidDid(format!("{} has a malformed network id", did)))
}

fn document_from(response: ResultResponse) -> Result<Option<Document>> {
    if !response.status || response.result == Value::Null {
        return Ok(None);
    }
    Document::deserialize(&response.result).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::SpyTransport;
    use crate::wallet::key_holder::{DidKeyHolder, Es256kKeyHolder};
    use crate::jwt::{Header, Payload};
    use serde_json::json;

    fn document_json(did: &str) -> Value {
        json!({
            "id": did,
            "publicKey": {
                "key1": {"id": "key1", "publicKeyBase64": "AAAA", "type": ["Secp256k1VerificationKey2018"]}
            }
        })
    }

    #[test]
    fn test_decimal_nid_from_did() {
        assert_eq!(decimal_nid_from_did("did:icon:02:abc").unwrap(), "2");
        assert_eq!(decimal_nid_from_did("did:icon:10:abc#key1").unwrap(), "10");
        assert!(matches!(decimal_nid_from_did("did:icon"), Err(MyIdError::InvalidDid(_))));
        assert!(matches!(decimal_nid_from_did("did:icon:0x2:abc"), Err(MyIdError::InvalidDid(_))));
    }

    #[tokio::test]
    async fn test_get_did_resolves_document() {
        let transport = SpyTransport::new();
        transport.respond("/v1/did/did:icon:02:abc", ResultResponse::success(document_json("did:icon:02:abc")));
        let registry = RegistryClient::new("http://registry/", transport.clone());

        let document = registry.get_did("did:icon:02:abc").await.unwrap().unwrap();
        assert_eq!(document.id, "did:icon:02:abc");
        assert_eq!(transport.requests()[0].url, "http://registry/v1/did/did:icon:02:abc");
    }

    #[tokio::test]
    async fn test_get_did_soft_failure_is_none() {
        let transport = SpyTransport::new();
        transport.respond("/v1/did/", ResultResponse::failure("not found"));
        let registry = RegistryClient::new("http://registry", transport);

        assert!(registry.get_did("did:icon:02:missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_did_posts_did_request() {
        let transport = SpyTransport::new();
        transport.respond("/v1/did/create", ResultResponse::success(document_json("did:icon:02:new")));
        let registry = RegistryClient::new("http://registry", transport.clone());

        let document = registry.create_did("key1", "AAAA", "2").await.unwrap();
        assert!(document.is_some());
        assert_eq!(
            transport.requests()[0].body,
            Some(json!({"keyId": "key1", "nid": "2", "publicKey": "AAAA"}))
        );
    }

    #[tokio::test]
    async fn test_revoke_key_sends_status_zero() {
        let transport = SpyTransport::new();
        transport.respond("/v1/did/update", ResultResponse::success(document_json("did:icon:02:abc")));
        let registry = RegistryClient::new("http://registry", transport.clone());

        let holder = Es256kKeyHolder::generate("did:icon:02:abc", "key1");
        let signed = holder
            .sign(&Jwt::new(Header::new(holder.algorithm(), holder.kid()), Payload::default()))
            .unwrap();

        registry.revoke_key(&signed).await.unwrap();
        registry.add_public_key(&signed).await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].body.as_ref().unwrap()["status"], 0);
        assert_eq!(requests[0].body.as_ref().unwrap()["nid"], "2");
        assert_eq!(requests[1].body.as_ref().unwrap()["status"], 1);
    }
}
