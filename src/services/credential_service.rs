// src/services/credential_service.rs
//! Credential registry transactions.
//!
//! Submits signed credential-info JWTs to the registry score and waits for the ledger
//! to confirm them, and reads registry state back.
//!
//! # Confirmation
//! After a transaction is sent its result is polled with a bounded retry:
//! - an attempt fails when the ledger errors or reports no result yet
//! - the back-off is slept between attempts, never after the last one
//! - after `max_attempts` failed attempts the last cause is returned as
//!   [`MyIdError::Transaction`]
//! - the whole loop runs under a timeout and gives up with
//!   [`MyIdError::TransactionTimeout`]

use crate::blockchain::ledger::{
    Call, LedgerClient, LedgerError, SignedTransaction, Transaction, Wallet,
};
use crate::config::{RetryPolicy, Settings};
use crate::contracts::credential_info_score::{
    CredentialInfoScore, METHOD_REGISTER, METHOD_REGISTER_LIST, METHOD_REGISTER_REJECT_HISTORY,
    METHOD_REVOKE, METHOD_REVOKE_DID, METHOD_REVOKE_VC_AND_DID,
};
use crate::error::{MyIdError, Result};
use crate::jwt::Jwt;
use crate::models::credential_info::CredentialInfo;
use crate::utils::clock::{Sleeper, TokioSleeper};
use crate::utils::serialization::is_truthy;
use log::{debug, info};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Default time allowed for confirming one transaction.
pub const DEFAULT_TRANSACTION_TIMEOUT: Duration = Duration::from_millis(15_000);

/// Registry operations backed by the ledger.
#[derive(Clone)]
pub struct CredentialService {
    ledger: Arc<dyn LedgerClient>,
    score: CredentialInfoScore,
    retry_policy: RetryPolicy,
    timeout: Duration,
    sleeper: Arc<dyn Sleeper>,
}

impl CredentialService {
    /// Creates a service with the default retry policy and timeout.
    ///
    /// # Arguments
    /// * `ledger` - Ledger client, shared with other services
    /// * `network_id` - Network id carried by transactions
    /// * `score_address` - Address of the credential registry score
    pub fn new(ledger: Arc<dyn LedgerClient>, network_id: u64, score_address: &str) -> Self {
        Self {
            ledger,
            score: CredentialInfoScore::new(network_id, score_address),
            retry_policy: RetryPolicy::default(),
            timeout: DEFAULT_TRANSACTION_TIMEOUT,
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// Creates a service configured from `settings`.
    pub fn from_settings(ledger: Arc<dyn LedgerClient>, settings: &Settings) -> Self {
        let score = CredentialInfoScore::new(settings.network_id, settings.score_address.clone())
            .with_step_limit(settings.step_limit);
        Self::new(ledger, settings.network_id, &settings.score_address)
            .with_score(score)
            .with_retry_policy(settings.retry_policy())
            .with_timeout(settings.transaction_timeout())
    }

    /// Replaces the descriptor builder, e.g. to pin its clock.
    pub fn with_score(mut self, score: CredentialInfoScore) -> Self {
        self.score = score;
        self
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn score(&self) -> &CredentialInfoScore {
        &self.score
    }

    /// Registers a credential info.
    ///
    /// # Arguments
    /// * `wallet` - Account paying for the transaction
    /// * `signed_jwt` - Signed output of
    ///   [`credential_info_param`](crate::contracts::score_parameter::credential_info_param)
    ///
    /// # Returns
    /// The confirmed transaction result.
    ///
    /// # Errors
    /// - [`MyIdError::UnsignedJwt`] before any network call if the JWT is not signed
    /// - [`MyIdError::Ledger`] if submission fails
    /// - [`MyIdError::Transaction`] / [`MyIdError::TransactionTimeout`] if confirmation fails
    pub async fn register(&self, wallet: &dyn Wallet, signed_jwt: &str) -> Result<Value> {
        self.send_jwt(wallet, signed_jwt, METHOD_REGISTER).await
    }

    /// Registers several credential infos in one transaction.
    pub async fn register_credential_list(
        &self,
        wallet: &dyn Wallet,
        signed_jwts: &[String],
    ) -> Result<Value> {
        for signed_jwt in signed_jwts {
            ensure_signed(signed_jwt)?;
        }
        let transaction = self
            .score
            .jwt_list_method(&wallet.address(), signed_jwts, METHOD_REGISTER_LIST);
        self.send_transaction(transaction, wallet).await
    }

    /// Revokes a credential.
    pub async fn revoke(&self, wallet: &dyn Wallet, signed_jwt: &str) -> Result<Value> {
        self.send_jwt(wallet, signed_jwt, METHOD_REVOKE).await
    }

    /// Revokes the issuer DID named in the credential info.
    pub async fn revoke_did(&self, wallet: &dyn Wallet, signed_jwt: &str) -> Result<Value> {
        self.send_jwt(wallet, signed_jwt, METHOD_REVOKE_DID).await
    }

    /// Revokes the credential and the issuer DID together.
    pub async fn revoke_vc_and_did(&self, wallet: &dyn Wallet, signed_jwt: &str) -> Result<Value> {
        self.send_jwt(wallet, signed_jwt, METHOD_REVOKE_VC_AND_DID).await
    }

    /// Records a rejected credential request.
    pub async fn register_reject_history(
        &self,
        wallet: &dyn Wallet,
        signed_jwt: &str,
    ) -> Result<Value> {
        ensure_signed(signed_jwt)?;
        let transaction = self.score.reject_history_jwt_method(
            &wallet.address(),
            signed_jwt,
            METHOD_REGISTER_REJECT_HISTORY,
        );
        self.send_transaction(transaction, wallet).await
    }

    /// Reads the registry state of the credential with `signature`.
    ///
    /// # Returns
    /// `None` if the registry has no record.
    ///
    /// # Errors
    /// - [`MyIdError::EmptySignature`] before any network call if `signature` is empty
    /// - [`MyIdError::Ledger`] if the call fails; reads are not retried
    pub async fn get(&self, signature: &str) -> Result<Option<CredentialInfo>> {
        ensure_signature(signature)?;
        let response = self.read(&self.score.get_call(signature)).await?;
        if response.is_null() {
            return Ok(None);
        }
        CredentialInfo::from_json(&response).map(Some)
    }

    /// Asks the registry whether the credential with `signature` is valid.
    pub async fn is_valid(&self, signature: &str) -> Result<Value> {
        ensure_signature(signature)?;
        self.read(&self.score.is_valid_call(signature)).await
    }

    /// Reads the rejection history of a credential.
    pub async fn get_reject_history(&self, vc_id: &str) -> Result<Value> {
        self.read(&self.score.reject_history_call(vc_id)).await
    }

    /// Reads the list of accounts allowed to act for the registry.
    pub async fn get_undertaker_list(&self) -> Result<Value> {
        self.read(&self.score.undertaker_list_call()).await
    }

    async fn read(&self, call: &Call) -> Result<Value> {
        let response = self.ledger.call(call).await?;
        debug!("{} -> {}", call.method, response);
        serde_json::from_str(&response).map_err(Into::into)
    }

    async fn send_jwt(&self, wallet: &dyn Wallet, signed_jwt: &str, method: &str) -> Result<Value> {
        ensure_signed(signed_jwt)?;
        let transaction = self.score.jwt_method(&wallet.address(), signed_jwt, method);
        self.send_transaction(transaction, wallet).await
    }

    async fn send_transaction(&self, transaction: Transaction, wallet: &dyn Wallet) -> Result<Value> {
        let method = transaction.method.clone();
        let signed = SignedTransaction::new(transaction, wallet)?;
        let tx_hash = self.ledger.send_transaction(&signed).await?;
        info!("sent {} transaction {}", method, tx_hash);
        self.wait_for_result(&tx_hash).await
    }

    async fn wait_for_result(&self, tx_hash: &str) -> Result<Value> {
        match tokio::time::timeout(self.timeout, self.poll_result(tx_hash)).await {
            Ok(result) => result,
            Err(_) => Err(MyIdError::TransactionTimeout {
                tx_hash: tx_hash.to_string(),
                timeout: self.timeout,
            }),
        }
    }

    async fn poll_result(&self, tx_hash: &str) -> Result<Value> {
        let max_attempts = self.retry_policy.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            let cause = match self.ledger.get_transaction_result(tx_hash).await {
                Ok(Some(result)) if is_truthy(&result) => return Ok(result),
                Ok(_) => LedgerError::EmptyResult,
                Err(e) => e,
            };
            debug!("transaction {} attempt {}: {}", tx_hash, attempt, cause);

            if attempt >= max_attempts {
                return Err(MyIdError::Transaction {
                    tx_hash: tx_hash.to_string(),
                    attempts: attempt,
                    source: cause,
                });
            }
            debug!(
                "remaining attempts for transaction {}: {}",
                tx_hash,
                max_attempts - attempt
            );
            self.sleeper.sleep(self.retry_policy.backoff).await;
        }
    }
}

impl std::fmt::Debug for CredentialService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialService")
            .field("score", &self.score)
            .field("retry_policy", &self.retry_policy)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn ensure_signed(signed_jwt: &str) -> Result<()> {
    if Jwt::decode(signed_jwt)?.signature().is_none() {
        return Err(MyIdError::UnsignedJwt);
    }
    Ok(())
}

fn ensure_signature(signature: &str) -> Result<()> {
    if signature.is_empty() {
        return Err(MyIdError::EmptySignature);
    }
    Ok(())
}
