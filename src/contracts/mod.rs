// src/contracts/mod.rs
//! Credential registry score: descriptor builders and parameter encoders.

pub mod credential_info_score;
pub mod score_parameter;
