//! Core types, configuration, and error handling for vulngate.
//!
//! This crate provides the shared foundation used by the scanner and the
//! binary:
//! - [`VulngateError`] — unified error type using `thiserror`
//! - [`VulngateConfig`] — configuration loaded from `.vulngate.toml` and
//!   layered with environment variables into [`Settings`]
//! - Shared types: [`Verdict`]

mod config;
mod error;
mod types;

pub use config::{
    InferenceConfig, InferenceSettings, ScanConfig, Settings, VulngateConfig, DEFAULT_BASE_URL,
    DEFAULT_MAX_DIFF_CHARS, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS, ENV_API_BASE, ENV_MAX_DIFF_CHARS,
    ENV_MODEL, ENV_TOKEN,
};
pub use error::VulngateError;
pub use types::Verdict;

/// A convenience `Result` type for vulngate operations.
pub type Result<T> = std::result::Result<T, VulngateError>;
