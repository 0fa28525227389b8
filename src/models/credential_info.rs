// src/models/credential_info.rs
//! Registry state of a credential.
//!
//! A [`CredentialInfo`] is what the issuer signs and submits when registering or
//! revoking a credential, and what the registry returns when queried. It is immutable
//! once built; the dates its type requires are checked at construction.
//!
//! The registry JSON uses different field names from the in-memory ones:
//!
//! | field | registry JSON |
//! |---|---|
//! | `signature` | `sig` |
//! | `creation_block` | `created` |
//! | `revocation_block` | `revoked` |

use crate::error::{MyIdError, Result};
use crate::utils::serialization::is_truthy;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which lifecycle event a credential info describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CredentialInfoType {
    /// Read back from the registry; no date requirements.
    Common,
    /// Registration; requires issue and expiry dates.
    Register,
    /// Revocation; requires a revoke date.
    Revoke,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialInfo {
    kind: CredentialInfoType,
    issuer_did: String,
    holder_did: Option<String>,
    signature: String,
    is_revoke: bool,
    issue_date: Option<i64>,
    revoke_date: Option<i64>,
    expiry_date: Option<i64>,
    creation_block: Option<i64>,
    revocation_block: Option<i64>,
}

/// Builder for [`CredentialInfo`]; [`build`](Self::build) enforces the type's required dates.
#[derive(Debug, Clone)]
pub struct CredentialInfoBuilder {
    info: CredentialInfo,
}

impl CredentialInfo {
    /// Starts a credential info of `kind` for the credential identified by `signature`.
    pub fn builder(
        kind: CredentialInfoType,
        issuer_did: impl Into<String>,
        signature: impl Into<String>,
    ) -> CredentialInfoBuilder {
        CredentialInfoBuilder {
            info: CredentialInfo {
                kind,
                issuer_did: issuer_did.into(),
                holder_did: None,
                signature: signature.into(),
                is_revoke: false,
                issue_date: None,
                revoke_date: None,
                expiry_date: None,
                creation_block: None,
                revocation_block: None,
            },
        }
    }

    pub fn kind(&self) -> CredentialInfoType {
        self.kind
    }

    pub fn issuer_did(&self) -> &str {
        &self.issuer_did
    }

    pub fn holder_did(&self) -> Option<&str> {
        self.holder_did.as_deref()
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn is_revoke(&self) -> bool {
        self.is_revoke
    }

    pub fn issue_date(&self) -> Option<i64> {
        self.issue_date
    }

    pub fn revoke_date(&self) -> Option<i64> {
        self.revoke_date
    }

    pub fn expiry_date(&self) -> Option<i64> {
        self.expiry_date
    }

    /// Block height at which the ledger recorded the registration.
    pub fn creation_block(&self) -> Option<i64> {
        self.creation_block
    }

    /// Block height at which the ledger recorded the revocation.
    pub fn revocation_block(&self) -> Option<i64> {
        self.revocation_block
    }

    /// Parses the registry JSON shape.
    ///
    /// The result is always [`CredentialInfoType::Common`]; falsy fields are treated as absent.
    ///
    /// # Errors
    /// Returns [`MyIdError::Json`] if `issuerDid` or `sig` is missing.
    pub fn from_json(data: &Value) -> Result<Self> {
        let record: RegistryRecord = serde_json::from_value(data.clone())?;

        let mut builder =
            Self::builder(CredentialInfoType::Common, record.issuer_did, record.signature);
        if let Some(holder_did) = record.holder_did.filter(|d| !d.is_empty()) {
            builder = builder.holder_did(holder_did);
        }
        builder.info.is_revoke = record.is_revoke.unwrap_or(false);
        builder.info.issue_date = non_zero(record.issue_date);
        builder.info.revoke_date = non_zero(record.revoke_date);
        builder.info.expiry_date = non_zero(record.expiry_date);
        builder.info.creation_block = non_zero(record.creation_block);
        builder.info.revocation_block = non_zero(record.revocation_block);
        builder.build()
    }

    /// Renders the registry JSON shape, with absent values as `null`.
    pub fn to_json(&self) -> Value {
        let record = RegistryRecord {
            kind: Some(self.kind),
            issuer_did: self.issuer_did.clone(),
            holder_did: self.holder_did.clone(),
            signature: self.signature.clone(),
            is_revoke: Some(self.is_revoke),
            issue_date: self.issue_date,
            revoke_date: self.revoke_date,
            expiry_date: self.expiry_date,
            creation_block: self.creation_block,
            revocation_block: self.revocation_block,
        };
        serde_json::to_value(record).unwrap_or(Value::Null)
    }
}

impl CredentialInfoBuilder {
    pub fn holder_did(mut self, holder_did: impl Into<String>) -> Self {
        self.info.holder_did = Some(holder_did.into());
        self
    }

    pub fn is_revoke(mut self, is_revoke: bool) -> Self {
        self.info.is_revoke = is_revoke;
        self
    }

    pub fn issue_date(mut self, issue_date: i64) -> Self {
        self.info.issue_date = Some(issue_date);
        self
    }

    pub fn revoke_date(mut self, revoke_date: i64) -> Self {
        self.info.revoke_date = Some(revoke_date);
        self
    }

    pub fn expiry_date(mut self, expiry_date: i64) -> Self {
        self.info.expiry_date = Some(expiry_date);
        self
    }

    pub fn creation_block(mut self, block: i64) -> Self {
        self.info.creation_block = Some(block);
        self
    }

    pub fn revocation_block(mut self, block: i64) -> Self {
        self.info.revocation_block = Some(block);
        self
    }

    /// Finishes the credential info.
    ///
    /// # Errors
    /// Returns [`MyIdError::InvalidCredentialInfo`] if a `Register` info lacks a non-zero
    /// issue or expiry date, or a `Revoke` info lacks a non-zero revoke date.
    pub fn build(self) -> Result<CredentialInfo> {
        let info = self.info;
        match info.kind {
            CredentialInfoType::Register => {
                if non_zero(info.issue_date).is_none() {
                    return Err(MyIdError::InvalidCredentialInfo(
                        "issue_date cannot be None".into(),
                    ));
                }
                if non_zero(info.expiry_date).is_none() {
                    return Err(MyIdError::InvalidCredentialInfo(
                        "expiry_date cannot be None".into(),
                    ));
                }
            }
            CredentialInfoType::Revoke => {
                if non_zero(info.revoke_date).is_none() {
                    return Err(MyIdError::InvalidCredentialInfo(
                        "revoke_date cannot be None".into(),
                    ));
                }
            }
            CredentialInfoType::Common => {}
        }
        Ok(info)
    }
}

fn non_zero(value: Option<i64>) -> Option<i64> {
    value.filter(|v| *v != 0)
}

/// Registry JSON shape of a credential info.
#[derive(Debug, Serialize, Deserialize)]
struct RegistryRecord {
    #[serde(rename = "type", default, skip_deserializing)]
    kind: Option<CredentialInfoType>,
    #[serde(rename = "issuerDid")]
    issuer_did: String,
    #[serde(rename = "holderDid", default)]
    holder_did: Option<String>,
    #[serde(rename = "sig")]
    signature: String,
    #[serde(rename = "isRevoke", default, deserialize_with = "truthy_bool")]
    is_revoke: Option<bool>,
    #[serde(rename = "issueDate", default)]
    issue_date: Option<i64>,
    #[serde(rename = "revokeDate", default)]
    revoke_date: Option<i64>,
    #[serde(rename = "expiryDate", default)]
    expiry_date: Option<i64>,
    #[serde(rename = "created", default)]
    creation_block: Option<i64>,
    #[serde(rename = "revoked", default)]
    revocation_block: Option<i64>,
}

/// The registry reports `isRevoke` as a bool, a 0/1 integer or a hex string depending on
/// the node; anything truthy counts as revoked.
fn truthy_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.map(|v| match &v {
        Value::String(s) => !matches!(s.as_str(), "" | "0" | "0x0" | "false"),
        other => is_truthy(other),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ISSUER: &str = "did:icon:02:issuer";
    const SIG: &str = "c2lnbmF0dXJl";

    #[test]
    fn test_register_requires_issue_and_expiry_dates() {
        let missing_issue = CredentialInfo::builder(CredentialInfoType::Register, ISSUER, SIG)
            .expiry_date(1_700_086_400)
            .build();
        assert!(matches!(missing_issue, Err(MyIdError::InvalidCredentialInfo(_))));

        let missing_expiry = CredentialInfo::builder(CredentialInfoType::Register, ISSUER, SIG)
            .issue_date(1_700_000_000)
            .build();
        assert!(matches!(missing_expiry, Err(MyIdError::InvalidCredentialInfo(_))));

        let zero_expiry = CredentialInfo::builder(CredentialInfoType::Register, ISSUER, SIG)
            .issue_date(1_700_000_000)
            .expiry_date(0)
            .build();
        assert!(zero_expiry.is_err());
    }

    #[test]
    fn test_register_with_both_dates_succeeds() {
        let info = CredentialInfo::builder(CredentialInfoType::Register, ISSUER, SIG)
            .issue_date(1_700_000_000)
            .expiry_date(1_700_086_400)
            .holder_did("did:icon:02:holder")
            .creation_block(42)
            .build()
            .unwrap();
        assert_eq!(info.kind(), CredentialInfoType::Register);
        assert_eq!(info.holder_did(), Some("did:icon:02:holder"));
        assert_eq!(info.revoke_date(), None);
    }

    #[test]
    fn test_revoke_requires_revoke_date() {
        let missing = CredentialInfo::builder(CredentialInfoType::Revoke, ISSUER, SIG).build();
        assert!(matches!(missing, Err(MyIdError::InvalidCredentialInfo(_))));

        let ok = CredentialInfo::builder(CredentialInfoType::Revoke, ISSUER, SIG)
            .revoke_date(1_700_000_100)
            .build();
        assert!(ok.is_ok());
    }

    #[test]
    fn test_from_json_maps_registry_field_names() {
        let info = CredentialInfo::from_json(&json!({
            "issuerDid": ISSUER,
            "sig": SIG,
            "holderDid": "",
            "isRevoke": "0x1",
            "issueDate": 1_700_000_000,
            "expiryDate": 1_700_086_400,
            "revokeDate": 0,
            "created": 120,
            "revoked": 130
        }))
        .unwrap();

        assert_eq!(info.kind(), CredentialInfoType::Common);
        assert_eq!(info.signature(), SIG);
        assert_eq!(info.holder_did(), None);
        assert!(info.is_revoke());
        assert_eq!(info.revoke_date(), None);
        assert_eq!(info.creation_block(), Some(120));
        assert_eq!(info.revocation_block(), Some(130));
    }

    #[test]
    fn test_from_json_requires_issuer_and_signature() {
        assert!(CredentialInfo::from_json(&json!({"sig": SIG})).is_err());
        assert!(CredentialInfo::from_json(&json!({"issuerDid": ISSUER})).is_err());
    }

    #[test]
    fn test_json_roundtrip_keeps_identity_and_dates() {
        let info = CredentialInfo::builder(CredentialInfoType::Register, ISSUER, SIG)
            .issue_date(1_700_000_000)
            .expiry_date(1_700_086_400)
            .build()
            .unwrap();

        let json = info.to_json();
        assert_eq!(json["sig"], SIG);
        assert_eq!(json["type"], "REGISTER");
        assert!(json["revokeDate"].is_null());

        let decoded = CredentialInfo::from_json(&json).unwrap();
        assert_eq!(decoded.issuer_did(), ISSUER);
        assert_eq!(decoded.signature(), SIG);
        assert_eq!(decoded.issue_date(), Some(1_700_000_000));
        assert_eq!(decoded.expiry_date(), Some(1_700_086_400));
    }
}
