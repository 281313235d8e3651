//! Building and checking the `Timestamp` / `Nonce` / `Signature` header set.

use rand::{CryptoRng, Rng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::SigningConfig;
use crate::error::{SignatureErrorKind, SigningResult};

use super::{
    derive_key, generate_nonce_with, hmac, Timestamp, DEFAULT_NONCE_LENGTH, NONCE_HEADER,
    SIGNATURE_HEADER, TIMESTAMP_HEADER,
};

/// The three header values attached to a signed request.
///
/// Serializes with the wire header names as field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureHeaders {
    #[serde(rename = "Timestamp")]
    pub timestamp: Timestamp,
    #[serde(rename = "Nonce")]
    pub nonce: String,
    #[serde(rename = "Signature")]
    pub signature: String,
}

impl SignatureHeaders {
    /// Header `(name, value)` pairs in wire order.
    pub fn to_pairs(&self) -> [(&'static str, &str); 3] {
        [
            (TIMESTAMP_HEADER, self.timestamp.as_str()),
            (NONCE_HEADER, self.nonce.as_str()),
            (SIGNATURE_HEADER, self.signature.as_str()),
        ]
    }

    /// Collect the header set from received request headers.
    ///
    /// Names match ASCII case-insensitively. The first occurrence of each
    /// header wins. Values are taken verbatim.
    pub fn from_pairs<I, K, V>(pairs: I) -> SigningResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut timestamp = None;
        let mut nonce = None;
        let mut signature = None;

        for (name, value) in pairs {
            let name = name.as_ref();
            let slot = if name.eq_ignore_ascii_case(TIMESTAMP_HEADER) {
                &mut timestamp
            } else if name.eq_ignore_ascii_case(NONCE_HEADER) {
                &mut nonce
            } else if name.eq_ignore_ascii_case(SIGNATURE_HEADER) {
                &mut signature
            } else {
                continue;
            };
            if slot.is_none() {
                *slot = Some(value.as_ref().to_string());
            }
        }

        let require = |value: Option<String>, name: &'static str| {
            value.ok_or(SignatureErrorKind::MissingHeader { name })
        };

        Ok(Self {
            timestamp: Timestamp::from(require(timestamp, TIMESTAMP_HEADER)?),
            nonce: require(nonce, NONCE_HEADER)?,
            signature: require(signature, SIGNATURE_HEADER)?,
        })
    }

    /// Re-derive the key from these headers and `data`, then verify.
    ///
    /// `data` must be the same text the client signed, byte for byte.
    pub fn verify(&self, data: &str) -> SigningResult<bool> {
        let key = derive_key(data, self.timestamp.as_str(), &self.nonce);
        hmac::verify(&self.signature, data, &key)
    }
}

/// Produces signature headers for outbound requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderBuilder {
    nonce_length: usize,
}

impl Default for HeaderBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_NONCE_LENGTH)
    }
}

impl HeaderBuilder {
    pub fn new(nonce_length: usize) -> Self {
        Self { nonce_length }
    }

    pub fn from_settings(config: &SigningConfig) -> Self {
        Self::new(config.nonce_length)
    }

    pub fn nonce_length(&self) -> usize {
        self.nonce_length
    }

    /// Sign `data` with a fresh timestamp and nonce.
    pub fn build(&self, data: &str) -> SigningResult<SignatureHeaders> {
        self.build_with(data, Timestamp::now(), &mut rand::thread_rng())
    }

    /// Sign `data` with the given timestamp and nonce source.
    ///
    /// Either the full header set is returned or an error; never a partial set.
    pub fn build_with<R>(
        &self,
        data: &str,
        timestamp: Timestamp,
        rng: &mut R,
    ) -> SigningResult<SignatureHeaders>
    where
        R: Rng + CryptoRng,
    {
        let nonce = generate_nonce_with(rng, self.nonce_length);
        let key = derive_key(data, timestamp.as_str(), &nonce);
        let signature = hmac::sign(data, &key)?;

        debug!(
            nonce_len = nonce.len(),
            data_len = data.len(),
            "Built signature headers"
        );

        Ok(SignatureHeaders {
            timestamp,
            nonce,
            signature,
        })
    }
}

/// Sign `data` with the default nonce length.
pub fn build_headers(data: &str) -> SigningResult<SignatureHeaders> {
    HeaderBuilder::default().build(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SigningError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn fixed_headers(data: &str) -> SignatureHeaders {
        let mut rng = StdRng::seed_from_u64(1);
        HeaderBuilder::default()
            .build_with(data, Timestamp::from("1700000000.25"), &mut rng)
            .unwrap()
    }

    #[test]
    fn test_build_headers_verifies() {
        let data = "What is the capital of France?";
        let headers = build_headers(data).unwrap();

        assert_eq!(headers.nonce.len(), DEFAULT_NONCE_LENGTH);
        assert!(headers.nonce.chars().all(|c| c.is_ascii_alphanumeric()));
        assert!(headers.verify(data).unwrap());
    }

    #[test]
    fn test_build_with_is_reproducible() {
        let first = fixed_headers("hello");
        let second = fixed_headers("hello");
        assert_eq!(first, second);
        assert_eq!(first.timestamp.as_str(), "1700000000.25");
    }

    #[test]
    fn test_signature_uses_derived_key() {
        let data = "A message that is longer than thirty characters in total";
        let headers = fixed_headers(data);

        let key = derive_key(data, headers.timestamp.as_str(), &headers.nonce);
        assert_eq!(headers.signature, hmac::sign(data, &key).unwrap());
    }

    #[test]
    fn test_empty_data_still_signs() {
        let headers = fixed_headers("");
        assert!(headers.verify("").unwrap());
    }

    #[test]
    fn test_tampered_data_fails() {
        let headers = fixed_headers("pay alice 10");
        assert!(!headers.verify("pay alice 11").unwrap());
    }

    #[test]
    fn test_tamper_beyond_key_prefix_fails() {
        let data = "0123456789012345678901234567890123456789";
        let headers = fixed_headers(data);
        let tampered = "0123456789012345678901234567890123456780";
        assert!(!headers.verify(tampered).unwrap());
    }

    #[test]
    fn test_reformatted_timestamp_fails() {
        let mut headers = fixed_headers("hello");
        headers.timestamp = Timestamp::from("1700000000.250");
        assert!(!headers.verify("hello").unwrap());
    }

    #[test]
    fn test_custom_nonce_length() {
        let builder = HeaderBuilder::from_settings(&SigningConfig { nonce_length: 32 });
        assert_eq!(builder.nonce_length(), 32);
        assert_eq!(HeaderBuilder::default().nonce_length(), DEFAULT_NONCE_LENGTH);
        let headers = builder.build("data").unwrap();
        assert_eq!(headers.nonce.len(), 32);
        assert!(headers.verify("data").unwrap());
    }

    #[test]
    fn test_to_pairs_order() {
        let headers = fixed_headers("hello");
        let pairs = headers.to_pairs();
        assert_eq!(pairs[0], ("Timestamp", "1700000000.25"));
        assert_eq!(pairs[1].0, "Nonce");
        assert_eq!(pairs[2].0, "Signature");
    }

    #[test]
    fn test_from_pairs_case_insensitive() {
        let headers = fixed_headers("hello");
        let received: HashMap<String, String> = headers
            .to_pairs()
            .iter()
            .map(|(name, value)| (name.to_lowercase(), value.to_string()))
            .chain([("content-type".to_string(), "application/json".to_string())])
            .collect();

        let parsed = SignatureHeaders::from_pairs(&received).unwrap();
        assert_eq!(parsed, headers);
        assert!(parsed.verify("hello").unwrap());
    }

    #[test]
    fn test_from_pairs_first_occurrence_wins() {
        let parsed = SignatureHeaders::from_pairs([
            ("Timestamp", "1"),
            ("Nonce", "abc"),
            ("Nonce", "def"),
            ("Signature", "sig"),
        ])
        .unwrap();
        assert_eq!(parsed.nonce, "abc");
    }

    #[test]
    fn test_from_pairs_missing_header() {
        let result = SignatureHeaders::from_pairs([("Timestamp", "1"), ("Signature", "sig")]);
        assert!(matches!(
            result,
            Err(SigningError::Signature {
                kind: SignatureErrorKind::MissingHeader { name: "Nonce" }
            })
        ));
    }

    #[test]
    fn test_verify_with_all_inputs_empty_is_error() {
        let headers = SignatureHeaders {
            timestamp: Timestamp::from(""),
            nonce: String::new(),
            signature: String::new(),
        };
        assert!(matches!(
            headers.verify(""),
            Err(SigningError::Signature {
                kind: SignatureErrorKind::MissingInput
            })
        ));
    }

    #[test]
    fn test_json_uses_header_names() {
        let headers = fixed_headers("hello");
        let json = serde_json::to_value(&headers).unwrap();
        assert_eq!(json["Timestamp"], "1700000000.25");
        assert_eq!(json["Nonce"], headers.nonce.as_str());
        assert_eq!(json["Signature"], headers.signature.as_str());
    }
}
