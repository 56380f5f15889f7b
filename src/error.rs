//! Error types for bangs
//!
//! Resolution itself never fails; these cover everything around it
//! (config, preference storage, launching the browser).

use thiserror::Error;

/// Errors that can occur outside the resolver
#[derive(Debug, Error)]
pub enum BangError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Preference storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Tag is not present in the bang table
    #[error("Unknown bang: {0}")]
    UnknownBang(String),

    /// A bang definition is malformed
    #[error("Invalid bang '{tag}': {reason}")]
    InvalidBang { tag: String, reason: String },

    /// Failed to hand a URL to the browser
    #[error("Launch error: {0}")]
    Launch(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing errors
    #[error("Config parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// JSON errors from the preference file
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for bangs operations
pub type BangResult<T> = Result<T, BangError>;
