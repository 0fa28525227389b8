// src/wallet/mod.rs
//! Key material: DID signing keys and ECDH keys for protected messages.

pub mod ecdh_keys;
pub mod key_holder;
