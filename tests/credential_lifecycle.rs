// tests/credential_lifecycle.rs
//! Register, read and revoke a credential against an in-memory registry ledger.

use async_trait::async_trait;
use myid_sdk::blockchain::ledger::{Call, LedgerClient, LedgerError, SignedTransaction, Wallet};
use myid_sdk::contracts::score_parameter::{credential_info_param, revoke_credential_info_param};
use myid_sdk::jwt::Jwt;
use myid_sdk::wallet::key_holder::{DidKeyHolder, Es256kKeyHolder};
use myid_sdk::{CredentialInfo, CredentialInfoType, CredentialService, MyIdError, RevokeCredentialInfo};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

const ISSUER: &str = "did:icon:02:issuer";
const HOLDER: &str = "did:icon:02:holder";
const SCORE: &str = "cx0000000000000000000000000000000000000002";

/// Applies `register` and `revoke` transactions to a map of records keyed by signature.
#[derive(Default)]
struct InMemoryRegistry {
    records: Mutex<HashMap<String, Map<String, Value>>>,
    receipts: Mutex<HashMap<String, Value>>,
}

impl InMemoryRegistry {
    fn apply(&self, method: &str, jwt: &Jwt) -> Result<(), LedgerError> {
        let payload = jwt.payload().contents().clone();
        let signature = payload
            .get("sig")
            .and_then(Value::as_str)
            .ok_or_else(|| LedgerError::Malformed("credential info has no sig".into()))?
            .to_string();
        let mut records = self.records.lock().unwrap();
        match method {
            "register" => {
                let mut record = payload;
                record.insert("isRevoke".into(), json!(false));
                records.insert(signature, record);
            }
            "revoke" => {
                let record = records
                    .get_mut(&signature)
                    .ok_or_else(|| LedgerError::Malformed("unknown credential".into()))?;
                record.insert("isRevoke".into(), json!(true));
                record.insert("revokeDate".into(), payload["revokeDate"].clone());
            }
            other => return Err(LedgerError::Malformed(format!("unsupported method {}", other))),
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerClient for InMemoryRegistry {
    async fn call(&self, call: &Call) -> Result<String, LedgerError> {
        let signature = call
            .params
            .as_ref()
            .and_then(|params| params.get("sig"))
            .cloned()
            .unwrap_or_default();
        let records = self.records.lock().unwrap();
        let record = records.get(&signature);
        let response = match call.method.as_str() {
            "get" => record.map_or(Value::Null, |r| Value::Object(r.clone())),
            "isValid" => json!(record.map_or(false, |r| r["isRevoke"] == false)),
            _ => Value::Null,
        };
        Ok(response.to_string())
    }

    async fn send_transaction(&self, transaction: &SignedTransaction) -> Result<String, LedgerError> {
        let tx = transaction.transaction();
        let token = tx
            .params
            .get("credentialJwt")
            .ok_or_else(|| LedgerError::Malformed("no credentialJwt".into()))?;
        let jwt = Jwt::decode(token).map_err(|e| LedgerError::Malformed(e.to_string()))?;
        self.apply(&tx.method, &jwt)?;

        let mut receipts = self.receipts.lock().unwrap();
        let tx_hash = format!("0x{:064x}", receipts.len() + 1);
        receipts.insert(tx_hash.clone(), json!({"txHash": tx_hash, "status": "0x1"}));
        Ok(tx_hash)
    }

    async fn get_transaction_result(&self, tx_hash: &str) -> Result<Option<Value>, LedgerError> {
        Ok(self.receipts.lock().unwrap().get(tx_hash).cloned())
    }
}

struct TestWallet;

impl Wallet for TestWallet {
    fn address(&self) -> String {
        "hx0000000000000000000000000000000000000001".to_string()
    }

    fn sign(&self, _message: &[u8]) -> Result<Vec<u8>, LedgerError> {
        Ok(vec![7; 65])
    }
}

fn service() -> CredentialService {
    CredentialService::new(Arc::new(InMemoryRegistry::default()), 2, SCORE)
}

#[tokio::test]
async fn test_register_then_revoke() {
    let service = service();
    let issuer = Es256kKeyHolder::generate(ISSUER, "key1");
    let info = CredentialInfo::builder(CredentialInfoType::Register, ISSUER, "vc-signature")
        .holder_did(HOLDER)
        .issue_date(1_700_000_000)
        .expiry_date(1_800_000_000)
        .build()
        .unwrap();

    let signed = issuer.sign(&credential_info_param(&issuer, &info)).unwrap();
    let receipt = service.register(&TestWallet, &signed).await.unwrap();
    assert_eq!(receipt["status"], "0x1");

    let stored = service.get("vc-signature").await.unwrap().unwrap();
    assert_eq!(stored.issuer_did(), ISSUER);
    assert_eq!(stored.holder_did(), Some(HOLDER));
    assert_eq!(stored.expiry_date(), Some(1_800_000_000));
    assert!(!stored.is_revoke());
    assert_eq!(service.is_valid("vc-signature").await.unwrap(), json!(true));

    let revoke = RevokeCredentialInfo::new(
        CredentialInfoType::Revoke,
        ISSUER,
        "vc-signature",
        1_750_000_000,
    );
    let signed = issuer
        .sign(&revoke_credential_info_param(&issuer, &revoke))
        .unwrap();
    service.revoke(&TestWallet, &signed).await.unwrap();

    let stored = service.get("vc-signature").await.unwrap().unwrap();
    assert!(stored.is_revoke());
    assert_eq!(stored.revoke_date(), Some(1_750_000_000));
    assert_eq!(service.is_valid("vc-signature").await.unwrap(), json!(false));
}

#[tokio::test]
async fn test_unknown_credential_reads_as_none() {
    let service = service();
    assert!(service.get("never-registered").await.unwrap().is_none());
    assert_eq!(service.is_valid("never-registered").await.unwrap(), json!(false));
}

#[tokio::test]
async fn test_unsigned_registration_is_rejected() {
    let service = service();
    let issuer = Es256kKeyHolder::generate(ISSUER, "key1");
    let info = CredentialInfo::builder(CredentialInfoType::Register, ISSUER, "vc-signature")
        .issue_date(1_700_000_000)
        .expiry_date(1_800_000_000)
        .build()
        .unwrap();
    let unsigned = format!("{}.", credential_info_param(&issuer, &info).encode().unwrap());

    let error = service.register(&TestWallet, &unsigned).await.unwrap_err();
    assert!(matches!(error, MyIdError::UnsignedJwt));
    assert!(service.get("vc-signature").await.unwrap().is_none());
}
