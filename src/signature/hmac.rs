//! HMAC-SHA256 signing and verification.
//!
//! Signatures are the standard padded base64 encoding of the 32-byte tag.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use ring::hmac;
use tracing::debug;

use crate::error::{SignatureErrorKind, SigningResult};

/// Compute `base64(HMAC-SHA256(data, key))`.
///
/// Fails with `EmptyKey` when `key` is empty. Empty `data` is allowed.
pub fn sign(data: &str, key: &str) -> SigningResult<String> {
    if key.is_empty() {
        return Err(SignatureErrorKind::EmptyKey.into());
    }

    let key = hmac::Key::new(hmac::HMAC_SHA256, key.as_bytes());
    let tag = hmac::sign(&key, data.as_bytes());
    Ok(STANDARD.encode(tag.as_ref()))
}

/// Check a claimed signature against `data` under `key`.
///
/// Returns `Ok(false)` for any mismatch, including a signature that is not
/// canonical base64 or has the wrong length. Fails with `MissingInput` only
/// when `key` is empty and verification cannot be attempted.
///
/// The tag comparison is constant-time.
pub fn verify(signature: &str, data: &str, key: &str) -> SigningResult<bool> {
    if key.is_empty() {
        return Err(SignatureErrorKind::MissingInput.into());
    }

    let claimed = match STANDARD.decode(signature) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!(error = %e, "Signature is not valid base64");
            return Ok(false);
        }
    };

    let key = hmac::Key::new(hmac::HMAC_SHA256, key.as_bytes());
    let valid = hmac::verify(&key, data.as_bytes(), &claimed).is_ok();
    if !valid {
        debug!(data_len = data.len(), "Signature mismatch");
    }
    Ok(valid)
}
