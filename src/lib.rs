// src/lib.rs

//! # MyID SDK
//!
//! Client SDK for a blockchain-backed DID and verifiable credential registry.
//!
//! ## Architecture Overview
//! 1. **Models**: `CredentialInfo`, credentials, presentations and DID documents
//! 2. **Contracts**: score parameter encoders and call/transaction descriptors
//! 3. **Services**: registry client, issuer, verifier and the ledger-backed
//!    [`CredentialService`](services::credential_service::CredentialService)
//! 4. **Blockchain**: ledger collaborator traits and the JSON-RPC client
//! 5. **Wallet**: DID key holders and ECDH key stores
//!
//! Network access goes through two traits, [`HttpTransport`](services::http_transport::HttpTransport)
//! for the registry web service and [`LedgerClient`](blockchain::ledger::LedgerClient) for the
//! ledger, so every service can run against in-memory collaborators.

pub mod blockchain;
pub mod config;
pub mod contracts;
pub mod error;
pub mod jwt;
pub mod models;
pub mod protocol;
pub mod services;
pub mod utils;
pub mod wallet;

pub use config::Settings;
pub use error::{MyIdError, Result};
pub use models::credential_info::{CredentialInfo, CredentialInfoType};
pub use models::revoke_credential_info::RevokeCredentialInfo;
pub use services::credential_service::CredentialService;
pub use services::issuer_service::IssuerService;
pub use services::registry::RegistryClient;
pub use services::service_result::ServiceResult;
pub use services::verifier_service::VerifierService;
