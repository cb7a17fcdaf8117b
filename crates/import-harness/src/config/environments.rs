// crates/import-harness/src/config/environments.rs
// ============================================================================
// Module: Environment Resolver
// Description: Fixed mapping from environment names to service URLs.
// Purpose: Resolve base and auth URLs for a named target environment.
// Dependencies: url
// ============================================================================

//! ## Overview
//! Supported environments form a closed enum. Each variant maps to a fixed
//! pair of URLs; there is no global mutable table. Unknown names fail with
//! [`ConfigError::UnknownEnvironment`] carrying the rejected name.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use url::Url;

use super::ConfigError;
use super::HarnessEnv;
use super::env::read_env_nonempty;

// ============================================================================
// SECTION: Environments
// ============================================================================

/// Environment used when `IMPORT_HARNESS_ENV` is unset.
pub const DEFAULT_ENVIRONMENT: Environment = Environment::Test;

/// Supported target environments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Environment {
    /// Shared test environment.
    Test,
    /// Development environment.
    Dev,
}

impl Environment {
    /// All supported environments.
    pub const ALL: [Self; 2] = [Self::Test, Self::Dev];

    /// Returns the canonical environment name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Test => "test",
            Self::Dev => "dev",
        }
    }

    /// Returns the `(base_url, auth_url)` pair for the environment.
    #[must_use]
    const fn endpoints(self) -> (&'static str, &'static str) {
        match self {
            Self::Test => ("https://api.test.worldsys.ar", "https://api.auth.test.ar"),
            Self::Dev => ("https://api.dev.worldsys.ar", "https://api.auth.dev.ar"),
        }
    }

    /// Returns the URL configuration for the environment.
    #[must_use]
    pub fn config(self) -> EnvironmentConfig {
        let (base_url, auth_url) = self.endpoints();
        EnvironmentConfig {
            base_url: base_url.to_string(),
            auth_url: auth_url.to_string(),
        }
    }

    /// Reads the target environment from `IMPORT_HARNESS_ENV`.
    ///
    /// # Errors
    ///
    /// Returns an error when the variable is blank, not UTF-8, or names an
    /// unsupported environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        read_env_nonempty(HarnessEnv::Environment.as_str())?
            .map_or(Ok(DEFAULT_ENVIRONMENT), |name| name.parse())
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|env| env.as_str() == name)
            .ok_or_else(|| ConfigError::UnknownEnvironment(name.to_string()))
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves an environment name to its URL configuration.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownEnvironment`] for names outside the
/// supported set.
pub fn resolve_environment(name: &str) -> Result<EnvironmentConfig, ConfigError> {
    name.parse::<Environment>().map(Environment::config)
}

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Base and auth URLs for one target environment.
///
/// # Invariants
/// - Both URLs are absolute `http` or `https` URLs with a host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentConfig {
    /// Base URL of the import API.
    base_url: String,
    /// URL of the token endpoint.
    auth_url: String,
}

impl EnvironmentConfig {
    /// Builds a configuration from explicit URLs.
    ///
    /// # Errors
    ///
    /// Returns an error when either URL is not an absolute http(s) URL.
    pub fn new(base_url: &str, auth_url: &str) -> Result<Self, ConfigError> {
        validate_url(base_url)?;
        validate_url(auth_url)?;
        Ok(Self {
            base_url: base_url.to_string(),
            auth_url: auth_url.to_string(),
        })
    }

    /// Returns the base URL of the import API.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the token endpoint URL.
    #[must_use]
    pub fn auth_url(&self) -> &str {
        &self.auth_url
    }

    /// Returns `{base_url}/import`.
    #[must_use]
    pub fn import_url(&self) -> String {
        format!("{}/import", self.base_url.trim_end_matches('/'))
    }
}

/// Checks that a URL is absolute, has a host, and uses http(s).
fn validate_url(raw: &str) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };
    let url = Url::parse(raw).map_err(|err| invalid(err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {}", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    Ok(())
}
