// src/models/revoke_credential_info.rs
//! Revocation event for a registered credential.

use crate::models::credential_info::CredentialInfoType;

/// Everything the registry needs to revoke a credential: who revokes it, which
/// credential (by signature) and when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevokeCredentialInfo {
    kind: CredentialInfoType,
    issuer_did: String,
    signature: String,
    revoke_date: i64,
}

impl RevokeCredentialInfo {
    pub fn new(
        kind: CredentialInfoType,
        issuer_did: impl Into<String>,
        signature: impl Into<String>,
        revoke_date: i64,
    ) -> Self {
        Self {
            kind,
            issuer_did: issuer_did.into(),
            signature: signature.into(),
            revoke_date,
        }
    }

    pub fn kind(&self) -> CredentialInfoType {
        self.kind
    }

    pub fn issuer_did(&self) -> &str {
        &self.issuer_did
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn revoke_date(&self) -> i64 {
        self.revoke_date
    }
}
