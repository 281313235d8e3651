//! Request signing module.
//!
//! Signs a piece of request text with HMAC-SHA256 under a key derived per
//! request, and carries the inputs the receiver needs in three headers:
//!
//! ```text
//! Timestamp: <seconds since epoch, fractional, verbatim>
//! Nonce:     <16 alphanumeric characters>
//! Signature: base64(HMAC-SHA256(text, Timestamp ‖ Nonce ‖ text[..30 chars]))
//! ```
//!
//! Freshness windows and nonce replay tracking are left to the caller.

mod constants;
mod headers;
mod hmac;
mod key;
mod nonce;

pub use constants::*;
pub use headers::{build_headers, HeaderBuilder, SignatureHeaders};
pub use hmac::{sign, verify};
pub use key::{derive_key, Timestamp};
pub use nonce::{generate_nonce, generate_nonce_with};
