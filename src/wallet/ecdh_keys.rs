// src/wallet/ecdh_keys.rs
//! ECDH keys for protected protocol messages.
//!
//! JWE encryption itself is delegated to [`EcdhKey`] implementations. The SDK only keeps
//! track of which key belongs to which `kid`, in an [`EcdhKeyStore`] owned by the service
//! that needs it.

use crate::error::Result;
use crate::protocol::jwe::Jwe;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// An ECDH key agreed with a counterparty.
pub trait EcdhKey: Send + Sync {
    /// Key id the counterparty puts in the JWE header.
    fn kid(&self) -> &str;

    /// Encrypts `plaintext` into a compact JWE.
    fn encrypt(&self, plaintext: &str) -> Result<String>;

    /// Decrypts `jwe` and returns its plaintext.
    fn decrypt(&self, jwe: &Jwe) -> Result<String>;
}

/// Thread-safe map of ECDH keys by kid.
///
/// Adding a key under an existing kid replaces it.
#[derive(Default)]
pub struct EcdhKeyStore {
    keys: RwLock<HashMap<String, Arc<dyn EcdhKey>>>,
}

impl EcdhKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `key` under its own kid.
    pub fn add(&self, key: Arc<dyn EcdhKey>) {
        let kid = key.kid().to_string();
        self.write().insert(kid, key);
    }

    pub fn get(&self, kid: &str) -> Option<Arc<dyn EcdhKey>> {
        self.read().get(kid).cloned()
    }

    /// Removes the key for `kid`; returns whether one was present.
    pub fn delete(&self, kid: &str) -> bool {
        self.write().remove(kid).is_some()
    }

    pub fn delete_all(&self) {
        self.write().clear();
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // A panic while holding the lock leaves the map itself intact.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<dyn EcdhKey>>> {
        self.keys.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<dyn EcdhKey>>> {
        self.keys.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for EcdhKeyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kids: Vec<String> = self.read().keys().cloned().collect();
        kids.sort();
        f.debug_struct("EcdhKeyStore").field("kids", &kids).finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::MyIdError;

    /// Reversible stand-in for a real ECDH key: the "ciphertext" is the plaintext
    /// reversed, carried in the JWE ciphertext segment.
    pub(crate) struct ReversingKey {
        pub kid: String,
    }

    impl ReversingKey {
        pub fn new(kid: &str) -> Arc<Self> {
            Arc::new(Self { kid: kid.to_string() })
        }
    }

    impl EcdhKey for ReversingKey {
        fn kid(&self) -> &str {
            &self.kid
        }

        fn encrypt(&self, plaintext: &str) -> Result<String> {
            let header = crate::utils::serialization::encode_segment(&serde_json::json!({
                "alg": "ECDH-ES", "enc": "A128GCM", "kid": self.kid
            }))?;
            let reversed: String = plaintext.chars().rev().collect();
            Ok(format!(
                "{}..iv.{}.tag",
                header,
                crate::utils::serialization::base64url_encode(reversed.as_bytes())
            ))
        }

        fn decrypt(&self, jwe: &Jwe) -> Result<String> {
            let bytes = crate::utils::serialization::base64url_decode(jwe.ciphertext())
                .map_err(|e| MyIdError::InvalidJwe(e.to_string()))?;
            let reversed = String::from_utf8(bytes)
                .map_err(|e| MyIdError::InvalidJwe(e.to_string()))?;
            Ok(reversed.chars().rev().collect())
        }
    }

    #[test]
    fn test_add_get_delete() {
        let store = EcdhKeyStore::new();
        assert!(store.is_empty());

        store.add(ReversingKey::new("kid-1"));
        store.add(ReversingKey::new("kid-2"));
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("kid-1").unwrap().kid(), "kid-1");

        assert!(store.delete("kid-1"));
        assert!(!store.delete("kid-1"));
        assert!(store.get("kid-1").is_none());

        store.delete_all();
        assert!(store.is_empty());
    }

    #[test]
    fn test_duplicate_kid_last_writer_wins() {
        let store = EcdhKeyStore::new();
        let first = ReversingKey::new("kid-1");
        let second = ReversingKey::new("kid-1");
        store.add(first);
        store.add(second.clone());

        assert_eq!(store.len(), 1);
        let stored = store.get("kid-1").unwrap();
        assert!(Arc::ptr_eq(
            &stored,
            &(second as Arc<dyn EcdhKey>)
        ));
    }

    #[test]
    fn test_concurrent_add_and_lookup() {
        let store = Arc::new(EcdhKeyStore::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    let kid = format!("kid-{}", i);
                    store.add(ReversingKey::new(&kid));
                    store.get(&kid).is_some()
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
        assert_eq!(store.len(), 8);
    }
}
