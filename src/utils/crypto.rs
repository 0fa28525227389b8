// src/utils/crypto.rs
//! ES256K helpers over the secp256k1 curve.
//!
//! JWTs exchanged with the registry are signed with ECDSA over secp256k1 and SHA-256
//! (`ES256K`). Signatures are the 64-byte `r || s` form, base64url encoded in tokens.

use k256::ecdsa::signature::{Signer, Verifier};
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};

/// JOSE algorithm name for ECDSA/secp256k1/SHA-256.
pub const ES256K: &str = "ES256K";

/// Signs `message` and returns the 64-byte compact signature.
pub fn sign_es256k(key: &SigningKey, message: &[u8]) -> Vec<u8> {
    let signature: Signature = key.sign(message);
    signature.to_vec()
}

/// Checks a compact signature against `message`.
///
/// Returns `None` when the bytes are not a well-formed signature.
pub fn verify_es256k(key: &VerifyingKey, message: &[u8], signature: &[u8]) -> Option<bool> {
    let signature = Signature::from_slice(signature).ok()?;
    Some(key.verify(message, &signature).is_ok())
}

/// Parses a SEC1-encoded (compressed or uncompressed) public key.
pub fn verifying_key_from_sec1(bytes: &[u8]) -> Option<VerifyingKey> {
    VerifyingKey::from_sec1_bytes(bytes).ok()
}

/// Compressed SEC1 encoding of a public key.
pub fn verifying_key_to_sec1(key: &VerifyingKey) -> Vec<u8> {
    key.to_encoded_point(true).as_bytes().to_vec()
}
