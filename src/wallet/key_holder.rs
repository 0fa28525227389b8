// src/wallet/key_holder.rs
//! DID key holders.
//!
//! A key holder is the signing identity bound to one key of a DID document. Services take
//! `&dyn DidKeyHolder` so callers can plug in an HSM or remote signer; [`Es256kKeyHolder`]
//! keeps a secp256k1 key in memory.

use crate::error::{MyIdError, Result};
use crate::jwt::Jwt;
use crate::utils::crypto::{sign_es256k, verifying_key_to_sec1, ES256K};
use crate::utils::serialization::{base64_encode, base64url_encode};
use k256::ecdsa::{SigningKey, VerifyingKey};
use k256::SecretKey;

/// Signing identity of a DID key.
pub trait DidKeyHolder: Send + Sync {
    fn did(&self) -> &str;

    /// Key id within the DID document.
    fn key_id(&self) -> &str;

    /// JWT `kid`: `<did>#<key id>`.
    fn kid(&self) -> String {
        format!("{}#{}", self.did(), self.key_id())
    }

    fn algorithm(&self) -> &str;

    /// Signs `jwt` and returns the compact `header.payload.signature` token.
    ///
    /// # Errors
    /// Returns [`MyIdError::Signing`] if the key cannot sign or the JWT cannot be encoded.
    fn sign(&self, jwt: &Jwt) -> Result<String>;
}

/// In-memory ES256K key holder.
///
/// # Security Notes
/// - The secret key is never exposed
/// - Signatures are deterministic (RFC 6979)
#[derive(Clone)]
pub struct Es256kKeyHolder {
    did: String,
    key_id: String,
    signing_key: SigningKey,
}

impl Es256kKeyHolder {
    /// Wraps an existing secp256k1 key.
    pub fn new(did: impl Into<String>, key_id: impl Into<String>, secret_key: SecretKey) -> Self {
        Self {
            did: did.into(),
            key_id: key_id.into(),
            signing_key: SigningKey::from(secret_key),
        }
    }

    /// Generates a fresh key from the system RNG.
    pub fn generate(did: impl Into<String>, key_id: impl Into<String>) -> Self {
        Self::new(did, key_id, SecretKey::random(&mut rand::thread_rng()))
    }

    pub fn public_key(&self) -> &VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// Compressed SEC1 public key, base64, as registered in the DID document.
    pub fn public_key_base64(&self) -> String {
        base64_encode(&verifying_key_to_sec1(self.public_key()))
    }
}

impl std::fmt::Debug for Es256kKeyHolder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Es256kKeyHolder")
            .field("did", &self.did)
            .field("key_id", &self.key_id)
            .finish_non_exhaustive()
    }
}

impl DidKeyHolder for Es256kKeyHolder {
    fn did(&self) -> &str {
        &self.did
    }

    fn key_id(&self) -> &str {
        &self.key_id
    }

    fn algorithm(&self) -> &str {
        ES256K
    }

    fn sign(&self, jwt: &Jwt) -> Result<String> {
        let input = jwt
            .encode()
            .map_err(|e| MyIdError::Signing(format!("cannot encode JWT: {}", e)))?;
        let signature = sign_es256k(&self.signing_key, input.as_bytes());
        Ok(format!("{}.{}", input, base64url_encode(&signature)))
    }
}
