// src/blockchain/mod.rs
//! Ledger access: collaborator traits, descriptors and the JSON-RPC client.

pub mod json_rpc_client;
pub mod ledger;
