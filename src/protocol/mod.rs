// src/protocol/mod.rs
//! Messages exchanged between identity holders, issuers and verifiers.

pub mod claim_request;
pub mod jwe;
pub mod message;

pub use claim_request::ClaimRequest;
pub use jwe::Jwe;
pub use message::{ProtocolMessage, ProtocolType, SignResult};
