// src/contracts/credential_info_score.rs
//! Credential registry score interface.
//!
//! Builds the [`Call`] and [`Transaction`] descriptors for the on-ledger credential
//! registry. Nothing here touches the network; descriptors are handed to a
//! [`LedgerClient`](crate::blockchain::ledger::LedgerClient) by
//! [`CredentialService`](crate::services::credential_service::CredentialService).
//!
//! Read methods: `get`, `isValid`, `getRejectHistory`, `getUndertakerList`.
//! Write methods take exactly one parameter, the signed JWT:
//!
//! | builder | parameter |
//! |---|---|
//! | [`jwt_method`](CredentialInfoScore::jwt_method) | `credentialJwt` |
//! | [`jwt_list_method`](CredentialInfoScore::jwt_list_method) | `credentialJwtList` |
//! | [`reject_history_jwt_method`](CredentialInfoScore::reject_history_jwt_method) | `rejectJwt` |

use crate::blockchain::ledger::{Call, Transaction, TRANSACTION_VERSION};
use crate::utils::clock::{Clock, SystemClock};
use std::collections::BTreeMap;
use std::sync::Arc;

pub const METHOD_GET: &str = "get";
pub const METHOD_IS_VALID: &str = "isValid";
pub const METHOD_GET_REJECT_HISTORY: &str = "getRejectHistory";
pub const METHOD_GET_UNDERTAKER_LIST: &str = "getUndertakerList";

pub const METHOD_REGISTER: &str = "register";
pub const METHOD_REGISTER_LIST: &str = "registerList";
pub const METHOD_REVOKE: &str = "revoke";
pub const METHOD_REVOKE_DID: &str = "revokeDid";
pub const METHOD_REVOKE_VC_AND_DID: &str = "revokeVCAndDid";
pub const METHOD_REGISTER_REJECT_HISTORY: &str = "registerRejectHistory";

const PARAM_SIGNATURE: &str = "sig";
const PARAM_VC_ID: &str = "vcId";
const PARAM_CREDENTIAL_JWT: &str = "credentialJwt";
const PARAM_CREDENTIAL_JWT_LIST: &str = "credentialJwtList";
const PARAM_REJECT_JWT: &str = "rejectJwt";

/// Fee ceiling of every write transaction unless configured otherwise.
pub const DEFAULT_STEP_LIMIT: u64 = 5_000_000;

/// Descriptor builder for one deployed credential registry score.
#[derive(Clone)]
pub struct CredentialInfoScore {
    network_id: u64,
    score_address: String,
    step_limit: u64,
    clock: Arc<dyn Clock>,
}

impl CredentialInfoScore {
    /// # Arguments
    /// * `network_id` - Network id of the ledger
    /// * `score_address` - Address the registry score is deployed at
    pub fn new(network_id: u64, score_address: impl Into<String>) -> Self {
        Self {
            network_id,
            score_address: score_address.into(),
            step_limit: DEFAULT_STEP_LIMIT,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_step_limit(mut self, step_limit: u64) -> Self {
        self.step_limit = step_limit;
        self
    }

    /// Replaces the clock transaction timestamps are taken from.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn network_id(&self) -> u64 {
        self.network_id
    }

    pub fn score_address(&self) -> &str {
        &self.score_address
    }

    pub fn get_call(&self, signature: &str) -> Call {
        self.build_call(METHOD_GET, Some((PARAM_SIGNATURE, signature)))
    }

    pub fn is_valid_call(&self, signature: &str) -> Call {
        self.build_call(METHOD_IS_VALID, Some((PARAM_SIGNATURE, signature)))
    }

    pub fn reject_history_call(&self, vc_id: &str) -> Call {
        self.build_call(METHOD_GET_REJECT_HISTORY, Some((PARAM_VC_ID, vc_id)))
    }

    pub fn undertaker_list_call(&self) -> Call {
        self.build_call(METHOD_GET_UNDERTAKER_LIST, None)
    }

    /// Transaction for a single credential-info JWT.
    ///
    /// # Arguments
    /// * `from` - Sender address
    /// * `jwt` - Signed JWT
    /// * `method` - One of `register`, `revoke`, `revokeDid`, `revokeVCAndDid`
    pub fn jwt_method(&self, from: &str, jwt: &str, method: &str) -> Transaction {
        self.build_transaction(from, method, PARAM_CREDENTIAL_JWT, jwt.to_string())
    }

    /// Transaction registering several JWTs at once; they travel comma-joined.
    pub fn jwt_list_method(&self, from: &str, jwt_list: &[String], method: &str) -> Transaction {
        self.build_transaction(from, method, PARAM_CREDENTIAL_JWT_LIST, jwt_list.join(","))
    }

    /// Transaction recording a rejection.
    pub fn reject_history_jwt_method(&self, from: &str, jwt: &str, method: &str) -> Transaction {
        self.build_transaction(from, method, PARAM_REJECT_JWT, jwt.to_string())
    }

    fn build_call(&self, method: &str, param: Option<(&str, &str)>) -> Call {
        Call {
            to: self.score_address.clone(),
            method: method.to_string(),
            params: param.map(|(key, value)| {
                let mut params = BTreeMap::new();
                params.insert(key.to_string(), value.to_string());
                params
            }),
        }
    }

    fn build_transaction(&self, from: &str, method: &str, key: &str, value: String) -> Transaction {
        let mut params = BTreeMap::new();
        params.insert(key.to_string(), value);
        Transaction {
            version: TRANSACTION_VERSION,
            nid: self.network_id,
            from: from.to_string(),
            to: self.score_address.clone(),
            step_limit: self.step_limit,
            timestamp: self.clock.unix_micros(),
            method: method.to_string(),
            params,
        }
    }
}

impl std::fmt::Debug for CredentialInfoScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialInfoScore")
            .field("network_id", &self.network_id)
            .field("score_address", &self.score_address)
            .field("step_limit", &self.step_limit)
            .finish()
    }
}
