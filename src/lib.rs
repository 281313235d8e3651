//! Lumo Signing Library
//!
//! This crate signs client-supplied request text with HMAC-SHA256 and
//! verifies it on the server, using a key derived from the request's
//! timestamp, nonce and leading text.

pub mod config;
pub mod error;
pub mod signature;
