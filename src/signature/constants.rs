//! Header names and fixed parameters of the signing scheme.

/// Header carrying the client's timestamp string.
pub const TIMESTAMP_HEADER: &str = "Timestamp";

/// Header carrying the random nonce.
pub const NONCE_HEADER: &str = "Nonce";

/// Header carrying the base64 HMAC-SHA256 signature.
pub const SIGNATURE_HEADER: &str = "Signature";

/// Number of leading characters of the signed text mixed into the derived key.
pub const KEY_DATA_PREFIX_CHARS: usize = 30;

/// Nonce length used when none is configured.
pub const DEFAULT_NONCE_LENGTH: usize = 16;
