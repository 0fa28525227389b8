// src/models/property_name.rs
//! Fixed property names shared with the credential registry.
//!
//! The score-parameter content keys double as the registry's JSON field names, so a
//! credential info encoded for signing and one read back from the registry line up.

pub const CREDENTIAL_INFO_ISSUER_DID: &str = "issuerDid";
pub const CREDENTIAL_INFO_HOLDER_DID: &str = "holderDid";
pub const CREDENTIAL_INFO_SIGNATURE: &str = "sig";
pub const CREDENTIAL_INFO_ISSUE_DATE: &str = "issueDate";
pub const CREDENTIAL_INFO_REVOKE_DATE: &str = "revokeDate";
pub const CREDENTIAL_INFO_EXPIRY_DATE: &str = "expiryDate";

/// Generic type tag every W3C credential carries.
pub const VERIFIABLE_CREDENTIAL_TYPE: &str = "VerifiableCredential";
