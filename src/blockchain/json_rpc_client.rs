// src/blockchain/json_rpc_client.rs
//! JSON-RPC ledger client.
//!
//! Talks to a ledger node over the v3 JSON-RPC API:
//! - `icx_call` for read-only score calls
//! - `icx_sendTransaction` for signed transactions
//! - `icx_getTransactionResult` for confirmation polling

use crate::blockchain::ledger::{Call, LedgerClient, LedgerError, SignedTransaction};
use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

const METHOD_CALL: &str = "icx_call";
const METHOD_SEND_TRANSACTION: &str = "icx_sendTransaction";
const METHOD_GET_TRANSACTION_RESULT: &str = "icx_getTransactionResult";

/// Ledger client over HTTP JSON-RPC 2.0.
#[derive(Debug)]
pub struct JsonRpcLedgerClient {
    /// JSON-RPC endpoint, e.g. `http://localhost:9000/api/v3`
    url: String,
    /// Reusable HTTP client
    http_client: reqwest::Client,
    next_id: AtomicU64,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    #[serde(default)]
    message: String,
}

impl JsonRpcLedgerClient {
    /// Creates a client for the node at `url`.
    ///
    /// # Arguments
    /// * `url` - JSON-RPC endpoint URL
    /// * `timeout` - Per-request timeout
    ///
    /// # Errors
    /// Returns [`LedgerError::Transport`] if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, LedgerError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LedgerError::Transport(e.to_string()))?;
        Ok(Self {
            url: url.into(),
            http_client,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Sends one JSON-RPC request and returns its `result` member.
    ///
    /// # Errors
    /// - [`LedgerError::Transport`] if the request fails or the body is not JSON
    /// - [`LedgerError::JsonRpc`] if the node returns an error object
    async fn request(&self, method: &str, params: Value) -> Result<Option<Value>, LedgerError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "method": method,
            "id": id,
            "params": params,
        });
        debug!("{} request #{} to {}", method, id, self.url);

        let response = self
            .http_client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| LedgerError::Transport(e.to_string()))?;
        let response: RpcResponse = response
            .json()
            .await
            .map_err(|e| LedgerError::Transport(e.to_string()))?;

        if let Some(error) = response.error {
            debug!("{} request #{} failed: {} {}", method, id, error.code, error.message);
            return Err(LedgerError::JsonRpc {
                code: error.code,
                message: error.message,
            });
        }
        Ok(response.result.filter(|result| !result.is_null()))
    }
}

#[async_trait]
impl LedgerClient for JsonRpcLedgerClient {
    async fn call(&self, call: &Call) -> Result<String, LedgerError> {
        match self.request(METHOD_CALL, call.to_params()).await? {
            Some(Value::String(result)) => Ok(result),
            Some(other) => Ok(other.to_string()),
            None => Err(LedgerError::EmptyResult),
        }
    }

    async fn send_transaction(&self, transaction: &SignedTransaction) -> Result<String, LedgerError> {
        match self
            .request(METHOD_SEND_TRANSACTION, transaction.to_params())
            .await?
        {
            Some(Value::String(tx_hash)) => Ok(tx_hash),
            Some(other) => Err(LedgerError::Malformed(format!(
                "transaction hash is not a string: {}",
                other
            ))),
            None => Err(LedgerError::EmptyResult),
        }
    }

    async fn get_transaction_result(&self, tx_hash: &str) -> Result<Option<Value>, LedgerError> {
        self.request(METHOD_GET_TRANSACTION_RESULT, json!({ "txHash": tx_hash }))
            .await
    }
}
