//! Configuration module.
//!
//! Handles loading and validating settings from TOML files.

mod settings;

pub use settings::*;
