// src/services/api_path.rs
//! Registry web service endpoints, relative to the configured registry URL.

/// Read DID; the DID is appended.
pub const R_DID: &str = "/v1/did/";
pub const C_DID: &str = "/v1/did/create";
/// Update DID: add or revoke a public key.
pub const U_DID: &str = "/v1/did/update";

pub const GET_VC: &str = "/v1/credential";
pub const IS_VALID_VC: &str = "/v1/credential/isValid";
pub const REG_VC: &str = "/v1/credential/register";
pub const REV_VC: &str = "/v1/credential/revoke";

pub const ISS_VC_LOG: &str = "/v1/log/issueCredential";
