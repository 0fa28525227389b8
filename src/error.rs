// src/error.rs
//! Error types for the MyID SDK.
//!
//! Every failure the SDK raises is a [`MyIdError`]. Verification failures are not errors:
//! they are reported through [`ServiceResult`](crate::services::service_result::ServiceResult)
//! so callers can tell a revoked issuer from a bad signature without matching on errors.

use crate::blockchain::ledger::LedgerError;
use std::time::Duration;
use thiserror::Error;

/// Errors returned by SDK operations.
#[derive(Debug, Error)]
pub enum MyIdError {
    /// A `CredentialInfo` was built without the dates its type requires.
    #[error("invalid credential info: {0}")]
    InvalidCredentialInfo(String),

    /// A signature argument was empty.
    #[error("signature cannot be empty")]
    EmptySignature,

    /// A JWT submitted to the ledger carries no signature.
    #[error("JWT string must contain signature to send a transaction")]
    UnsignedJwt,

    /// A compact JWT could not be decoded.
    #[error("invalid JWT: {0}")]
    InvalidJwt(String),

    /// A compact JWE could not be parsed or decrypted.
    #[error("invalid JWE: {0}")]
    InvalidJwe(String),

    /// No ECDH key is registered for the key id named by a JWE.
    #[error("no ECDH key for kid {0}")]
    MissingEcdhKey(String),

    /// A DID string does not have the expected `did:<method>:<nid>:<id>` shape.
    #[error("invalid DID: {0}")]
    InvalidDid(String),

    /// The key holder failed to sign.
    #[error("signing failed: {0}")]
    Signing(String),

    /// A protocol message is missing content or has the wrong shape.
    #[error("invalid protocol message: {0}")]
    InvalidProtocolMessage(String),

    /// The registry answered a read with a failure status.
    #[error("registry request failed: {0}")]
    Rpc(String),

    /// A ledger read or submission failed.
    #[error("ledger request failed: {0}")]
    Ledger(#[from] LedgerError),

    /// The transaction result could not be fetched within the retry budget.
    #[error("transaction {tx_hash} failed after {attempts} attempts: {source}")]
    Transaction {
        tx_hash: String,
        attempts: u32,
        source: LedgerError,
    },

    /// Confirmation polling was cancelled by the configured timeout.
    #[error("transaction {tx_hash} was not confirmed within {timeout:?}")]
    TransactionTimeout { tx_hash: String, timeout: Duration },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// Convenience result type for SDK operations.
pub type Result<T, E = MyIdError> = std::result::Result<T, E>;
