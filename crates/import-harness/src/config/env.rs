// crates/import-harness/src/config/env.rs
// ============================================================================
// Module: Harness Environment Variables
// Description: Env-var keys and strict readers for harness settings.
// Purpose: Centralize env parsing with strict UTF-8 validation.
// Dependencies: dotenv
// ============================================================================

//! ## Overview
//! Environment values are parsed with strict UTF-8 enforcement to avoid silent
//! misconfiguration. Invalid UTF-8 or blank values fail closed. A `.env` file
//! in the working directory is loaded once before the first lookup.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Once;
use std::time::Duration;

use super::ConfigError;

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Environment keys read by the harness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarnessEnv {
    /// Username for the auth service.
    UserAuth,
    /// Password for the auth service.
    PassAuth,
    /// Database host.
    DbHost,
    /// Optional database port.
    DbPort,
    /// Database user.
    DbUser,
    /// Database password.
    DbPassword,
    /// Database name (file path for the `sqlite` engine).
    DbName,
    /// Optional database engine (`postgres` or `sqlite`).
    DbEngine,
    /// Optional target environment name (defaults to `test`).
    Environment,
    /// Optional override for the auth request template path.
    AuthTemplate,
    /// Optional HTTP timeout in seconds (positive integer).
    TimeoutSeconds,
    /// Optional artifact root for system-test runs.
    RunRoot,
}

impl HarnessEnv {
    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UserAuth => "USER_AUTH",
            Self::PassAuth => "PASS_AUTH",
            Self::DbHost => "DB_HOST",
            Self::DbPort => "DB_PORT",
            Self::DbUser => "DB_USER",
            Self::DbPassword => "DB_PASSWORD",
            Self::DbName => "DB_NAME",
            Self::DbEngine => "DB_ENGINE",
            Self::Environment => "IMPORT_HARNESS_ENV",
            Self::AuthTemplate => "IMPORT_HARNESS_AUTH_TEMPLATE",
            Self::TimeoutSeconds => "IMPORT_HARNESS_TIMEOUT_SEC",
            Self::RunRoot => "IMPORT_HARNESS_RUN_ROOT",
        }
    }
}

// ============================================================================
// SECTION: HTTP Settings
// ============================================================================

/// Transport settings shared by the auth and import calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HttpSettings {
    /// Request timeout; `None` keeps the HTTP library default.
    pub timeout: Option<Duration>,
}

impl HttpSettings {
    /// Loads HTTP settings from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when the timeout override is not a positive integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        let name = HarnessEnv::TimeoutSeconds.as_str();
        let timeout =
            read_env_nonempty(name)?.map(|raw| parse_timeout_seconds(name, &raw)).transpose()?;
        Ok(Self {
            timeout,
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Loads `.env` from the working directory once per process.
///
/// A missing file is not an error; variables already set in the process win.
pub fn load_dotenv() {
    static LOADED: Once = Once::new();
    LOADED.call_once(|| {
        if let Err(err) = dotenv::dotenv() {
            tracing::debug!(error = %err, "no .env file loaded");
        }
    });
}

/// Reads an environment variable and enforces UTF-8 validity.
///
/// # Errors
///
/// Returns an error when the environment variable contains invalid UTF-8.
pub fn read_env_strict(name: &str) -> Result<Option<String>, ConfigError> {
    std::env::var_os(name).map_or(Ok(None), |raw| {
        raw.into_string().map(Some).map_err(|_| ConfigError::InvalidUtf8 {
            name: name.to_string(),
        })
    })
}

/// Reads an environment variable and rejects empty values.
///
/// # Errors
///
/// Returns an error when the variable is set but empty or whitespace.
pub fn read_env_nonempty(name: &str) -> Result<Option<String>, ConfigError> {
    match read_env_strict(name)? {
        Some(value) if value.trim().is_empty() => Err(ConfigError::Empty {
            name: name.to_string(),
        }),
        Some(value) => Ok(Some(value)),
        None => Ok(None),
    }
}

/// Reads a required, non-empty environment variable.
///
/// # Errors
///
/// Returns an error when the variable is unset, blank, or not valid UTF-8.
pub fn require_env(key: HarnessEnv) -> Result<String, ConfigError> {
    let name = key.as_str();
    read_env_nonempty(name)?.ok_or_else(|| ConfigError::Missing {
        name: name.to_string(),
    })
}

/// Parses a positive timeout value from an environment variable string.
///
/// # Errors
///
/// Returns an error when the value is non-numeric or zero.
pub(crate) fn parse_timeout_seconds(name: &str, raw: &str) -> Result<Duration, ConfigError> {
    let invalid = |reason: &str| ConfigError::Invalid {
        name: name.to_string(),
        reason: reason.to_string(),
    };
    let secs: u64 =
        raw.trim().parse().map_err(|_| invalid("must be a positive integer number of seconds"))?;
    if secs == 0 {
        return Err(invalid("must be greater than zero"));
    }
    Ok(Duration::from_secs(secs))
}
