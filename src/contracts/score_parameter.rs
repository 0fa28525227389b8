// src/contracts/score_parameter.rs
//! Score parameter encoders.
//!
//! Turns a [`CredentialInfo`] or [`RevokeCredentialInfo`] into the unsigned JWT the
//! issuer signs and the credential registry checks. Field names and the zero default for
//! unset dates are part of what the registry verifies, so they must not change.

use crate::jwt::{Header, Jwt, Payload};
use crate::models::credential_info::CredentialInfo;
use crate::models::property_name::{
    CREDENTIAL_INFO_EXPIRY_DATE, CREDENTIAL_INFO_HOLDER_DID, CREDENTIAL_INFO_ISSUER_DID,
    CREDENTIAL_INFO_ISSUE_DATE, CREDENTIAL_INFO_REVOKE_DATE, CREDENTIAL_INFO_SIGNATURE,
};
use crate::models::revoke_credential_info::RevokeCredentialInfo;
use crate::wallet::key_holder::DidKeyHolder;

/// Encodes a credential info for signing by `key_holder`.
///
/// # Arguments
/// * `key_holder` - Signer whose algorithm and kid go in the header
/// * `credential_info` - Registry state to encode
///
/// # Returns
/// Unsigned JWT whose payload carries issuer DID, signature and the three dates (`0`
/// when unset), plus the holder DID when one is set.
pub fn credential_info_param(key_holder: &dyn DidKeyHolder, credential_info: &CredentialInfo) -> Jwt {
    let mut payload = Payload::default();
    payload.put(CREDENTIAL_INFO_ISSUER_DID, credential_info.issuer_did());
    payload.put(CREDENTIAL_INFO_SIGNATURE, credential_info.signature());
    payload.put(CREDENTIAL_INFO_ISSUE_DATE, credential_info.issue_date().unwrap_or(0));
    payload.put(CREDENTIAL_INFO_REVOKE_DATE, credential_info.revoke_date().unwrap_or(0));
    payload.put(CREDENTIAL_INFO_EXPIRY_DATE, credential_info.expiry_date().unwrap_or(0));
    if let Some(holder_did) = credential_info.holder_did() {
        payload.put(CREDENTIAL_INFO_HOLDER_DID, holder_did);
    }

    Jwt::new(header(key_holder), payload)
}

/// Encodes a revocation for signing by `key_holder`: issuer DID, signature and revoke date.
pub fn revoke_credential_info_param(
    key_holder: &dyn DidKeyHolder,
    revoke_info: &RevokeCredentialInfo,
) -> Jwt {
    let mut payload = Payload::default();
    payload.put(CREDENTIAL_INFO_ISSUER_DID, revoke_info.issuer_did());
    payload.put(CREDENTIAL_INFO_SIGNATURE, revoke_info.signature());
    payload.put(CREDENTIAL_INFO_REVOKE_DATE, revoke_info.revoke_date());

    Jwt::new(header(key_holder), payload)
}

fn header(key_holder: &dyn DidKeyHolder) -> Header {
    Header::new(key_holder.algorithm(), key_holder.kid())
}
