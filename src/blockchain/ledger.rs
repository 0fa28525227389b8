// src/blockchain/ledger.rs
//! Ledger collaborator interfaces.
//!
//! The SDK never talks to the ledger directly from its services. It builds [`Call`] and
//! [`Transaction`] descriptors, has a [`Wallet`] sign them, and hands them to a
//! [`LedgerClient`], which may be the bundled JSON-RPC client or a test double.

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::utils::serialization::base64_encode;

/// Version tag every transaction carries.
pub const TRANSACTION_VERSION: u64 = 3;

/// Errors raised by a [`LedgerClient`] or [`Wallet`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The node answered with a JSON-RPC error object.
    #[error("JSON-RPC error {code}: {message}")]
    JsonRpc { code: i64, message: String },

    /// The node has no result for the request (yet).
    #[error("empty result")]
    EmptyResult,

    /// The request never reached the node or the response was lost.
    #[error("transport error: {0}")]
    Transport(String),

    /// The node's response did not have the expected shape.
    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("wallet could not sign: {0}")]
    Signing(String),
}

/// Read-only score call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub to: String,
    pub method: String,
    pub params: Option<BTreeMap<String, String>>,
}

impl Call {
    /// JSON-RPC `params` object for `icx_call`.
    pub fn to_params(&self) -> Value {
        let mut data = Map::new();
        data.insert("method".into(), Value::String(self.method.clone()));
        if let Some(params) = &self.params {
            data.insert("params".into(), json!(params));
        }
        json!({
            "to": self.to,
            "dataType": "call",
            "data": data,
        })
    }
}

/// Score-invoking write transaction, before signing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub version: u64,
    pub nid: u64,
    pub from: String,
    pub to: String,
    /// Fee ceiling.
    pub step_limit: u64,
    /// Microseconds since the Unix epoch.
    pub timestamp: i64,
    pub method: String,
    pub params: BTreeMap<String, String>,
}

impl Transaction {
    /// JSON-RPC `params` object for `icx_sendTransaction`, without signature.
    ///
    /// Numeric fields are hex strings.
    pub fn to_params(&self) -> Value {
        json!({
            "version": to_hex(self.version),
            "nid": to_hex(self.nid),
            "from": self.from,
            "to": self.to,
            "stepLimit": to_hex(self.step_limit),
            "timestamp": format!("{:#x}", self.timestamp),
            "dataType": "call",
            "data": {
                "method": self.method,
                "params": self.params,
            },
        })
    }

    /// The string a wallet signs: `icx_sendTransaction.` followed by the params
    /// flattened with sorted keys.
    pub fn serialize_for_signing(&self) -> String {
        format!("icx_sendTransaction.{}", serialize_object(&self.to_params()))
    }
}

/// A transaction together with the wallet's signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    transaction: Transaction,
    signature: String,
}

impl SignedTransaction {
    /// Signs `transaction` with `wallet`.
    ///
    /// # Errors
    /// Returns [`LedgerError::Signing`] if the wallet refuses to sign.
    pub fn new(transaction: Transaction, wallet: &dyn Wallet) -> Result<Self, LedgerError> {
        let message = transaction.serialize_for_signing();
        let signature = wallet.sign(message.as_bytes())?;
        Ok(Self {
            transaction,
            signature: base64_encode(&signature),
        })
    }

    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    /// Base64 signature.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn to_params(&self) -> Value {
        let mut params = self.transaction.to_params();
        if let Value::Object(map) = &mut params {
            map.insert("signature".into(), Value::String(self.signature.clone()));
        }
        params
    }
}

/// Signing account on the ledger.
///
/// Implementations hash the message with whatever digest their network requires.
pub trait Wallet: Send + Sync {
    fn address(&self) -> String;

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, LedgerError>;
}

/// Ledger node access.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Executes a read-only call and returns the score's raw string response.
    async fn call(&self, call: &Call) -> Result<String, LedgerError>;

    /// Submits a signed transaction and returns its hash.
    async fn send_transaction(&self, transaction: &SignedTransaction) -> Result<String, LedgerError>;

    /// Fetches a transaction result; `None` while the transaction is pending.
    async fn get_transaction_result(&self, tx_hash: &str) -> Result<Option<Value>, LedgerError>;
}

fn to_hex(value: u64) -> String {
    format!("{:#x}", value)
}

fn serialize_object(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            // serde_json::Map keeps keys sorted
            let fields: Vec<String> = map
                .iter()
                .map(|(key, value)| format!("{}.{}", key, serialize_value(value)))
                .collect();
            fields.join(".")
        }
        other => serialize_value(other),
    }
}

fn serialize_value(value: &Value) -> String {
    match value {
        Value::Null => "\\0".to_string(),
        Value::String(s) => escape(s),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => format!("{:#x}", *b as u8),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(serialize_value).collect();
            format!("[{}]", items.join("."))
        }
        Value::Object(_) => format!("{{{}}}", serialize_object(value)),
    }
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '.' | '{' | '}' | '[' | ']') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
