// src/models/requests.rs
//! Request bodies for the registry web service.
//!
//! The registry's text and query renderings only carry "truthy" fields: `None`, empty
//! strings and zero are left out. JSON bodies leave out `None` but keep explicit values,
//! so a `status` of `0` still reaches the registry.

use serde::{Deserialize, Serialize};
use std::fmt;
use url::form_urlencoded;

/// Credential / DID-update request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VcRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jwt: Option<String>,
    /// Decimal network id of the DID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nid: Option<String>,
    /// Key status: 1 active, 0 revoked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sig: Option<String>,
}

impl VcRequest {
    /// Renders the truthy fields as a percent-encoded query string
    /// (`?jwt=..&nid=..&sig=..&status=..`). Returns an empty string when no field is set.
    pub fn to_query_param(&self) -> String {
        let fields = self.truthy_fields();
        if fields.is_empty() {
            return String::new();
        }
        let mut query = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &fields {
            query.append_pair(key, value);
        }
        format!("?{}", query.finish())
    }

    fn truthy_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::new();
        if let Some(jwt) = self.jwt.as_ref().filter(|v| !v.is_empty()) {
            fields.push(("jwt", jwt.clone()));
        }
        if let Some(nid) = self.nid.as_ref().filter(|v| !v.is_empty()) {
            fields.push(("nid", nid.clone()));
        }
        if let Some(sig) = self.sig.as_ref().filter(|v| !v.is_empty()) {
            fields.push(("sig", sig.clone()));
        }
        if let Some(status) = self.status.filter(|v| *v != 0) {
            fields.push(("status", status.to_string()));
        }
        fields
    }
}

impl fmt::Display for VcRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_object(f, &self.truthy_fields())
    }
}

/// DID creation request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DidRequest {
    #[serde(rename = "keyId")]
    pub key_id: String,
    pub nid: String,
    #[serde(rename = "publicKey")]
    pub public_key: String,
}

impl fmt::Display for DidRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<(&'static str, String)> = [
            ("keyId", &self.key_id),
            ("nid", &self.nid),
            ("publicKey", &self.public_key),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| (key, value.clone()))
        .collect();
        write_object(f, &fields)
    }
}

/// Issuance log entry posted after a credential is registered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedRegRequest {
    pub vc_sig: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer_did: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holder_did: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vc_type: Option<Vec<String>>,
}

impl fmt::Display for IssuedRegRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

// {"k":"v","k2":"v2"} with every value quoted, as the registry logs them.
fn write_object(f: &mut fmt::Formatter<'_>, fields: &[(&'static str, String)]) -> fmt::Result {
    let body: Vec<String> = fields
        .iter()
        .map(|(key, value)| format!("\"{}\":\"{}\"", key, value))
        .collect();
    write!(f, "{{{}}}", body.join(","))
}
