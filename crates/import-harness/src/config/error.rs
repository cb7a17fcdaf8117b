// crates/import-harness/src/config/error.rs
// ============================================================================
// Module: Configuration Errors
// Description: Error type shared by environment and env-var resolution.
// Dependencies: thiserror
// ============================================================================

use thiserror::Error;

/// Errors raised while resolving harness configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Environment name outside the supported set.
    #[error("unknown environment: {0}")]
    UnknownEnvironment(String),
    /// Required environment variable is not set.
    #[error("{name} must be set")]
    Missing {
        /// Variable name.
        name: String,
    },
    /// Environment variable is not valid UTF-8.
    #[error("{name} must be valid UTF-8")]
    InvalidUtf8 {
        /// Variable name.
        name: String,
    },
    /// Environment variable is set but blank.
    #[error("{name} must not be empty")]
    Empty {
        /// Variable name.
        name: String,
    },
    /// Environment variable failed validation.
    #[error("{name} {reason}")]
    Invalid {
        /// Variable name.
        name: String,
        /// Validation failure.
        reason: String,
    },
    /// Configured URL is not an absolute http(s) URL.
    #[error("invalid url {url}: {reason}")]
    InvalidUrl {
        /// Offending URL.
        url: String,
        /// Parse or scheme failure.
        reason: String,
    },
}
