// src/services/testing.rs
//! In-memory collaborators for service tests. They record every call so tests can
//! assert on what went over the wire, including that nothing did.

use crate::blockchain::ledger::{Call, LedgerClient, LedgerError, SignedTransaction, Wallet};
use crate::services::http_transport::{HttpTransport, ResultResponse};
use crate::utils::clock::Sleeper;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub url: String,
    pub body: Option<Value>,
}

/// Answers with the scripted response whose path is the longest match inside the URL.
#[derive(Default)]
pub struct SpyTransport {
    responses: Mutex<Vec<(String, ResultResponse)>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl SpyTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, path: &str, response: ResultResponse) {
        self.responses.lock().unwrap().push((path.to_string(), response));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.url.contains(path))
            .collect()
    }

    fn answer(&self, method: &'static str, url: &str, body: Option<Value>) -> ResultResponse {
        self.requests.lock().unwrap().push(RecordedRequest {
            method,
            url: url.to_string(),
            body,
        });
        self.responses
            .lock()
            .unwrap()
            .iter()
            .filter(|(path, _)| url.contains(path.as_str()))
            .max_by_key(|(path, _)| path.len())
            .map(|(_, response)| response.clone())
            .unwrap_or_else(|| ResultResponse::failure("no response scripted"))
    }
}

#[async_trait]
impl HttpTransport for SpyTransport {
    async fn get(&self, url: &str) -> ResultResponse {
        self.answer("GET", url, None)
    }

    async fn post(&self, url: &str, body: &Value) -> ResultResponse {
        self.answer("POST", url, Some(body.clone()))
    }
}

/// Ledger whose transaction results are played back from a script; once the script
/// runs out every poll reports "pending".
#[derive(Default)]
pub struct SpyLedger {
    call_responses: Mutex<Vec<(String, String)>>,
    results: Mutex<VecDeque<Result<Option<Value>, LedgerError>>>,
    pub calls: Mutex<Vec<Call>>,
    pub sent: Mutex<Vec<SignedTransaction>>,
    pub polls: Mutex<u32>,
}

impl SpyLedger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond_to_call(&self, method: &str, response: &str) {
        self.call_responses
            .lock()
            .unwrap()
            .push((method.to_string(), response.to_string()));
    }

    pub fn push_result(&self, result: Result<Option<Value>, LedgerError>) {
        self.results.lock().unwrap().push_back(result);
    }

    pub fn poll_count(&self) -> u32 {
        *self.polls.lock().unwrap()
    }

    pub fn network_calls(&self) -> usize {
        self.calls.lock().unwrap().len() + self.sent.lock().unwrap().len() + self.poll_count() as usize
    }
}

#[async_trait]
impl LedgerClient for SpyLedger {
    async fn call(&self, call: &Call) -> Result<String, LedgerError> {
        self.calls.lock().unwrap().push(call.clone());
        self.call_responses
            .lock()
            .unwrap()
            .iter()
            .find(|(method, _)| *method == call.method)
            .map(|(_, response)| response.clone())
            .ok_or(LedgerError::EmptyResult)
    }

    async fn send_transaction(&self, transaction: &SignedTransaction) -> Result<String, LedgerError> {
        let mut sent = self.sent.lock().unwrap();
        sent.push(transaction.clone());
        Ok(format!("0x{:064x}", sent.len()))
    }

    async fn get_transaction_result(&self, _tx_hash: &str) -> Result<Option<Value>, LedgerError> {
        *self.polls.lock().unwrap() += 1;
        self.results.lock().unwrap().pop_front().unwrap_or(Ok(None))
    }
}

pub struct SpyWallet;

impl Wallet for SpyWallet {
    fn address(&self) -> String {
        "hx0000000000000000000000000000000000000001".to_string()
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, LedgerError> {
        Ok(message.iter().take(8).copied().collect())
    }
}

/// Records requested sleeps without sleeping.
#[derive(Default)]
pub struct SpySleeper {
    pub sleeps: Mutex<Vec<Duration>>,
}

impl SpySleeper {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for SpySleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}
