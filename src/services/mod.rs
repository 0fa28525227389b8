// src/services/mod.rs
//! Issuer, verifier and ledger services, plus the registry plumbing they share.

pub mod api_path;
pub mod credential_service;
pub mod http_transport;
pub mod issuer_service;
pub mod registry;
pub mod service_result;
pub mod verifier_service;

#[cfg(test)]
pub(crate) mod testing;
