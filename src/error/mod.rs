//! Error types for the signing library.
//!
//! Provides a unified error handling system using thiserror.

mod types;

pub use types::*;
