//! Error types for request signing.

use thiserror::Error;

/// Main error type for the signing library.
#[derive(Error, Debug)]
pub enum SigningError {
    /// Configuration-related errors.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Signing and verification errors.
    #[error("Signature error: {kind}")]
    Signature { kind: SignatureErrorKind },

    /// I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Signature error kinds.
///
/// A signature that simply does not match is not an error; verification
/// reports it as `Ok(false)`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignatureErrorKind {
    #[error("Signing key is empty")]
    EmptyKey,

    #[error("Verification input is missing (empty key)")]
    MissingInput,

    #[error("Missing required header: {name}")]
    MissingHeader { name: &'static str },
}

impl From<SignatureErrorKind> for SigningError {
    fn from(kind: SignatureErrorKind) -> Self {
        SigningError::Signature { kind }
    }
}

/// Result type alias for signing operations.
pub type SigningResult<T> = Result<T, SigningError>;
