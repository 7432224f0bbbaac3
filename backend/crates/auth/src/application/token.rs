//! Session Token Signing
//!
//! The session cookie carries `"{session_id}.{signature}"` where the
//! signature is HMAC-SHA256 over the UUID string, base64 url-safe without
//! padding. A token that fails verification is treated as absent rather
//! than as an error, so a tampered cookie degrades to a fresh session.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// Generate a signed session token
pub fn sign(session_id: Uuid, secret: &[u8; 32]) -> String {
    let session_id = session_id.to_string();

    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(session_id.as_bytes());

    let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    format!("{session_id}.{signature}")
}

/// Parse and verify a session token, returning the session id
pub fn verify(token: &str, secret: &[u8; 32]) -> Option<Uuid> {
    let (session_id, signature_b64) = token.split_once('.')?;

    let signature = URL_SAFE_NO_PAD.decode(signature_b64).ok()?;

    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(session_id.as_bytes());
    mac.verify_slice(&signature).ok()?;

    session_id.parse().ok()
}
