//! Per-request key derivation.
//!
//! The signing key is not a shared secret. Both sides rebuild it from the
//! `Timestamp` and `Nonce` header values plus the leading characters of the
//! signed text:
//!
//! ```text
//! key = timestamp ‖ nonce ‖ first 30 chars of text
//! ```
//!
//! The timestamp must be reused exactly as the client sent it. Turning it
//! into a number and back can change its text (`"1700000000.10"` becomes
//! `"1700000000.1"`), after which the server derives a different key.

use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use super::KEY_DATA_PREFIX_CHARS;

/// Seconds since the Unix epoch, kept as the exact text the client produced.
///
/// This type never parses its contents. Build it once with
/// [`Timestamp::now`] on the client, or from the received header string on
/// the server, and pass it through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(String);

impl Timestamp {
    /// Current wall-clock time.
    pub fn now() -> Self {
        let elapsed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Self::from_duration(elapsed)
    }

    /// Render a duration since the epoch as fractional seconds.
    ///
    /// Whole seconds keep a `.0` suffix, so the text always has a
    /// fractional part.
    pub fn from_duration(since_epoch: Duration) -> Self {
        let mut text = since_epoch.as_secs_f64().to_string();
        if !text.contains('.') {
            text.push_str(".0");
        }
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for Timestamp {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for Timestamp {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl AsRef<str> for Timestamp {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derive the signing key for one request.
///
/// Truncation counts user-perceived characters (extended grapheme
/// clusters), so `e` + combining accent, ZWJ emoji sequences, flags and
/// `\r\n` each count once, as they do for Swift and iOS clients. Text
/// shorter than the prefix length is used whole.
pub fn derive_key(data: &str, timestamp: &str, nonce: &str) -> String {
    let prefix_end = data
        .grapheme_indices(true)
        .nth(KEY_DATA_PREFIX_CHARS)
        .map_or(data.len(), |(idx, _)| idx);

    let mut key = String::with_capacity(timestamp.len() + nonce.len() + prefix_end);
    key.push_str(timestamp);
    key.push_str(nonce);
    key.push_str(&data[..prefix_end]);
    key
}
