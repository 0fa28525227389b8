// src/services/issuer_service.rs
//! Credential Issuer Service
//!
//! Records issued and revoked credentials with the registry web service and handles
//! the issuer side of the credential protocol:
//! - decoding credential requests from holders (plain or encrypted)
//! - signing (and encrypting) the credential response, which also registers it

use crate::contracts::score_parameter::{credential_info_param, revoke_credential_info_param};
use crate::error::{MyIdError, Result};
use crate::models::credential::Credential;
use crate::models::credential_info::{CredentialInfo, CredentialInfoType};
use crate::models::requests::{IssuedRegRequest, VcRequest};
use crate::models::revoke_credential_info::RevokeCredentialInfo;
use crate::protocol::claim_request::ClaimRequest;
use crate::protocol::jwe::Jwe;
use crate::protocol::message::{ProtocolMessage, ProtocolType};
use crate::services::api_path;
use crate::services::registry::{decimal_nid_from_did, RegistryClient};
use crate::services::service_result::ServiceResult;
use crate::utils::clock::{Clock, SystemClock};
use crate::wallet::ecdh_keys::EcdhKeyStore;
use crate::wallet::key_holder::DidKeyHolder;
use log::{debug, warn};
use serde_json::Value;
use std::sync::Arc;

/// Issuer-side operations.
///
/// Each instance owns its ECDH key store; keys added to one issuer are not visible to
/// another.
pub struct IssuerService {
    /// Registry web service shared with other services
    registry: RegistryClient,
    ecdh_keys: EcdhKeyStore,
    clock: Arc<dyn Clock>,
}

impl IssuerService {
    /// Creates an issuer service on top of `registry`.
    pub fn new(registry: RegistryClient) -> Self {
        Self {
            registry,
            ecdh_keys: EcdhKeyStore::new(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the clock issue and revoke dates are taken from.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// DID operations shared with the verifier.
    pub fn registry(&self) -> &RegistryClient {
        &self.registry
    }

    pub fn ecdh_keys(&self) -> &EcdhKeyStore {
        &self.ecdh_keys
    }

    /// Reads the claim request from a plain `{"type", "message"}` envelope.
    pub fn decode_protocol_message(&self, message: &str) -> Result<ClaimRequest> {
        let envelope: Value = serde_json::from_str(message)?;
        ProtocolMessage::from_json(&envelope)?.claim_request()
    }

    /// Decrypts a protected credential request and reads its claim request.
    ///
    /// # Errors
    /// - [`MyIdError::InvalidJwe`] if the token is not a JWE
    /// - [`MyIdError::MissingEcdhKey`] if no key is registered for the JWE's kid
    pub fn decode_request_credential(&self, jwe_token: &str) -> Result<ClaimRequest> {
        let mut message =
            ProtocolMessage::from_jwe(ProtocolType::RequestCredential, Jwe::parse(jwe_token)?);
        let kid = message.jwe_kid().unwrap_or_default().to_string();
        let key = self
            .ecdh_keys
            .get(&kid)
            .ok_or(MyIdError::MissingEcdhKey(kid))?;
        message.decrypt_jwe(key.as_ref())?;
        message.claim_request()
    }

    /// Encodes and signs `credential_info` into a registry request.
    ///
    /// # Returns
    /// A [`VcRequest`] carrying the signed JWT and the signer's decimal network id.
    pub fn get_request(
        &self,
        credential_info: &CredentialInfo,
        key_holder: &dyn DidKeyHolder,
    ) -> Result<VcRequest> {
        let jwt = credential_info_param(key_holder, credential_info);
        Ok(VcRequest {
            jwt: Some(key_holder.sign(&jwt)?),
            nid: Some(decimal_nid_from_did(key_holder.did())?),
            status: None,
            sig: None,
        })
    }

    /// Reads the registry state of a credential.
    ///
    /// # Errors
    /// Returns [`MyIdError::Rpc`] if the registry answers with a failure.
    pub async fn get_vc(&self, issuer_did: &str, signature: &str) -> Result<CredentialInfo> {
        let request = VcRequest {
            nid: Some(decimal_nid_from_did(issuer_did)?),
            sig: Some(signature.to_string()),
            ..Default::default()
        };
        let response = self
            .registry
            .get(&format!("{}{}", api_path::GET_VC, request.to_query_param()))
            .await;
        if !response.is_success() {
            return Err(MyIdError::Rpc(response.get_result_string().unwrap_or_default()));
        }
        CredentialInfo::from_json(&response.result)
    }

    /// Registers a freshly issued credential.
    ///
    /// The issue date is now; the expiry date is the credential's `exp`. On success an
    /// issuance log entry is posted too; its outcome does not change the result.
    ///
    /// # Errors
    /// - [`MyIdError::EmptySignature`] if the credential is not signed
    /// - [`MyIdError::InvalidCredentialInfo`] if the credential has no expiration
    pub async fn register_vc(
        &self,
        credential: &Credential,
        issuer_key_holder: &dyn DidKeyHolder,
    ) -> Result<ServiceResult> {
        let signature = credential
            .signature()
            .filter(|s| !s.is_empty())
            .ok_or(MyIdError::EmptySignature)?;

        let mut builder =
            CredentialInfo::builder(CredentialInfoType::Register, credential.did(), signature)
                .issue_date(self.clock.unix_seconds())
                .expiry_date(credential.expiration().unwrap_or(0));
        if let Some(holder_did) = credential.target_did() {
            builder = builder.holder_did(holder_did);
        }
        let credential_info = builder.build()?;

        let request = self.get_request(&credential_info, issuer_key_holder)?;
        let response = self.registry.post(api_path::REG_VC, &request).await?;
        if response.is_success() {
            self.log_issued(credential, signature).await;
        }
        Ok(ServiceResult::from_result(response))
    }

    async fn log_issued(&self, credential: &Credential, signature: &str) {
        let payload = credential.jwt().payload();
        let log_request = IssuedRegRequest {
            vc_sig: signature.to_string(),
            vc_type: credential.specific_type().map(|t| vec![t]),
            issuer_did: payload.iss().map(str::to_string),
            holder_did: payload.sub().map(str::to_string),
            issue_date: payload.iat(),
            expiry_date: payload.exp(),
        };
        debug!("issued credential log: {}", log_request);
        match self.registry.post(api_path::ISS_VC_LOG, &log_request).await {
            Ok(response) if response.is_success() => {}
            Ok(response) => warn!("issuance log was rejected: {}", response),
            Err(e) => warn!("issuance log could not be sent: {}", e),
        }
    }

    /// Revokes `credential`, identified by its signature.
    pub async fn revoke_vc(
        &self,
        credential: &Credential,
        issuer_key_holder: &dyn DidKeyHolder,
    ) -> Result<ServiceResult> {
        let signature = credential.signature().unwrap_or_default();
        self.revoke_vc_with_signature(signature, credential.did(), issuer_key_holder)
            .await
    }

    /// Revokes the credential with `signature`, dated now.
    pub async fn revoke_vc_with_signature(
        &self,
        signature: &str,
        issuer_did: &str,
        issuer_key_holder: &dyn DidKeyHolder,
    ) -> Result<ServiceResult> {
        if signature.is_empty() {
            return Err(MyIdError::EmptySignature);
        }
        let revoke_info = RevokeCredentialInfo::new(
            CredentialInfoType::Revoke,
            issuer_did,
            signature,
            self.clock.unix_seconds(),
        );
        let jwt = revoke_credential_info_param(issuer_key_holder, &revoke_info);
        let request = VcRequest {
            jwt: Some(issuer_key_holder.sign(&jwt)?),
            nid: Some(decimal_nid_from_did(issuer_key_holder.did())?),
            ..Default::default()
        };
        let response = self.registry.post(api_path::REV_VC, &request).await?;
        Ok(ServiceResult::from_result(response))
    }

    /// Signs the credential response, encrypting it with the ECDH key for `kid` when one
    /// is registered, then registers the signed credential.
    ///
    /// The registration outcome is logged but does not change the returned result.
    pub async fn sign_encrypt_credential(
        &self,
        protocol_message: &mut ProtocolMessage,
        issuer_key_holder: &dyn DidKeyHolder,
        kid: &str,
    ) -> ServiceResult {
        let ecdh_key = self.ecdh_keys.get(kid);
        let sign_result = protocol_message.sign_encrypt(issuer_key_holder, ecdh_key.as_deref());

        if sign_result.success {
            match protocol_message.credential() {
                Ok(credential) => match self.register_vc(&credential, issuer_key_holder).await {
                    Ok(result) if !result.success() => {
                        warn!("signed credential was not registered: {:?}", result.fail_message())
                    }
                    Ok(_) => {}
                    Err(e) => warn!("signed credential was not registered: {}", e),
                },
                Err(e) => warn!("signed message is not a credential: {}", e),
            }
        }
        ServiceResult::from_signed_object(sign_result)
    }
}

impl std::fmt::Debug for IssuerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuerService")
            .field("registry", &self.registry)
            .field("ecdh_keys", &self.ecdh_keys)
            .finish()
    }
}
