// src/models/mod.rs
//! Data structures exchanged with the registry, the ledger and other parties.

pub mod credential;
pub mod credential_info;
pub mod did;
pub mod presentation;
pub mod property_name;
pub mod requests;
pub mod revoke_credential_info;
