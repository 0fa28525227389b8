// src/services/verifier_service.rs
//! Credential Verifier Service
//!
//! Verifies credentials and presentations against the issuer's DID document and the
//! registry. The checks run in a fixed order and stop at the first failure:
//! 1. Resolve the issuer DID document and find the signing key
//! 2. Reject a revoked issuer key
//! 3. Verify the JWT signature and expiry
//! 4. Match the holder DID against the credential's target DID
//! 5. Ask the registry whether the credential is still valid
//!
//! Only the last step asks the registry about the credential itself, so a revoked key
//! or a holder mismatch never reaches it.

use crate::error::{MyIdError, Result};
use crate::models::credential::Credential;
use crate::models::presentation::Presentation;
use crate::models::requests::VcRequest;
use crate::protocol::jwe::Jwe;
use crate::protocol::message::{ProtocolMessage, ProtocolType};
use crate::services::api_path;
use crate::services::registry::{decimal_nid_from_did, RegistryClient};
use crate::services::service_result::ServiceResult;
use crate::utils::clock::{Clock, SystemClock};
use crate::wallet::ecdh_keys::EcdhKeyStore;
use crate::wallet::key_holder::DidKeyHolder;
use log::{debug, info};
use std::sync::Arc;

pub const ISSUER_REVOKED: &str = "issuer DID is revoked";
pub const HOLDER_MISMATCH: &str = "holder DID does not match target DID";
pub const ISSUER_UNRESOLVED: &str = "issuer DID document could not be resolved";

/// Verifier-side operations.
pub struct VerifierService {
    registry: RegistryClient,
    ecdh_keys: EcdhKeyStore,
    /// Time source for the JWT expiry check
    clock: Arc<dyn Clock>,
}

impl VerifierService {
    pub fn new(registry: RegistryClient) -> Self {
        Self {
            registry,
            ecdh_keys: EcdhKeyStore::new(),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn registry(&self) -> &RegistryClient {
        &self.registry
    }

    pub fn ecdh_keys(&self) -> &EcdhKeyStore {
        &self.ecdh_keys
    }

    /// Decrypts a protected presentation response.
    ///
    /// # Arguments
    /// * `jwe_token` - Compact JWE whose header names the verifier's ECDH key
    ///
    /// # Errors
    /// - [`MyIdError::InvalidJwe`] if the token is not a JWE or decryption fails
    /// - [`MyIdError::MissingEcdhKey`] if no key is registered for the JWE's kid
    pub fn decrypt_presentation(&self, jwe_token: &str) -> Result<Presentation> {
        let mut message = ProtocolMessage::from_jwe(
            ProtocolType::ResponseProtectedPresentation,
            Jwe::parse(jwe_token)?,
        );
        let kid = message.jwe_kid().unwrap_or_default().to_string();
        let key = self
            .ecdh_keys
            .get(&kid)
            .ok_or(MyIdError::MissingEcdhKey(kid))?;
        message.decrypt_jwe(key.as_ref())?;
        message.presentation()
    }

    /// Runs the verification sequence for `credential` presented by `holder_did`.
    ///
    /// # Returns
    /// A failed [`ServiceResult`] naming the first check that did not pass, or the
    /// registry's validity answer when every local check passed.
    ///
    /// # Errors
    /// Only transport-level problems are errors, e.g. a DID document whose key material
    /// cannot be decoded.
    pub async fn verify_credential(
        &self,
        credential: &Credential,
        holder_did: &str,
    ) -> Result<ServiceResult> {
        let Some(document) = self.registry.get_did(credential.did()).await? else {
            return Ok(ServiceResult::from_fail_message(ISSUER_UNRESOLVED));
        };
        let Some(key_property) = document.public_key_property(credential.key_id()) else {
            return Ok(ServiceResult::from_fail_message(format!(
                "issuer public key {} not found",
                credential.key_id()
            )));
        };
        if key_property.is_revoked() {
            info!("{} rejected: key {} is revoked", credential.did(), credential.key_id());
            return Ok(ServiceResult::from_fail_message(ISSUER_REVOKED));
        }

        let verify_result = credential
            .jwt()
            .verify_at(&key_property.public_key()?, self.clock.unix_seconds());
        if !verify_result.success {
            return Ok(ServiceResult::from_verify_result(verify_result));
        }

        if credential.target_did() != Some(holder_did) {
            return Ok(ServiceResult::from_fail_message(HOLDER_MISMATCH));
        }

        let request = VcRequest {
            nid: Some(decimal_nid_from_did(credential.did())?),
            sig: credential.signature().map(str::to_string),
            ..Default::default()
        };
        let response = self
            .registry
            .get(&format!("{}{}", api_path::IS_VALID_VC, request.to_query_param()))
            .await;
        debug!("validity of credential from {}: {}", credential.did(), response);
        Ok(ServiceResult::from_result(response))
    }

    /// Verifies every credential embedded in `presentation`, with the presentation's
    /// signer as the holder.
    ///
    /// Stops at the first credential that fails and returns its result.
    pub async fn verify_presentation(&self, presentation: &Presentation) -> Result<ServiceResult> {
        let credentials = presentation.credentials()?;
        if credentials.is_empty() {
            return Ok(ServiceResult::from_fail_message(
                "presentation carries no credentials",
            ));
        }

        let mut last = None;
        for credential in &credentials {
            let result = self.verify_credential(credential, presentation.did()).await?;
            if !result.success() {
                return Ok(result);
            }
            last = Some(result);
        }
        Ok(last.unwrap_or_else(|| ServiceResult::from_fail_message("nothing verified")))
    }

    /// Signs a presentation request. Requests are never encrypted.
    pub fn sign_encrypt_request_presentation(
        &self,
        protocol_message: &mut ProtocolMessage,
        verifier_key_holder: &dyn DidKeyHolder,
    ) -> ServiceResult {
        ServiceResult::from_signed_object(protocol_message.sign_encrypt(verifier_key_holder, None))
    }
}

impl std::fmt::Debug for VerifierService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerifierService")
            .field("registry", &self.registry)
            .field("ecdh_keys", &self.ecdh_keys)
            .finish()
    }
}
