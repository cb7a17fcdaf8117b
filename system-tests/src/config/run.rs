// system-tests/src/config/run.rs
// ============================================================================
// Module: System Test Run Settings
// Description: Environment-backed run settings for live scenarios.
// Purpose: Centralize env parsing with strict UTF-8 validation.
// Dependencies: import-harness
// ============================================================================

//! ## Overview
//! Values go through the harness's strict readers, so invalid UTF-8 and
//! empty values fail closed instead of falling back to defaults.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;

use import_harness::config::ConfigError;
use import_harness::config::Environment;
use import_harness::config::HarnessEnv;
use import_harness::config::load_dotenv;
use import_harness::config::read_env_nonempty;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Sad-path cases shipped with the system tests.
pub const NEGATIVE_CASES_FIXTURE: &str = "negative_validation_cases.json";

/// Resolves a file under `system-tests/fixtures/`.
#[must_use]
pub fn fixture_path(relative: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures").join(relative)
}

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Typed system test configuration derived from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemTestConfig {
    /// Target environment.
    pub environment: Environment,
    /// Optional artifact root override.
    pub run_root: Option<PathBuf>,
}

impl SystemTestConfig {
    /// Loads configuration from `.env` and environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when a value is not valid UTF-8, is empty, or names
    /// an unknown environment.
    pub fn load() -> Result<Self, ConfigError> {
        load_dotenv();
        Self::from_env()
    }

    /// Reads configuration from the process environment only.
    ///
    /// # Errors
    ///
    /// Returns an error when a value is not valid UTF-8, is empty, or names
    /// an unknown environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = Environment::from_env()?;
        let run_root = read_env_nonempty(HarnessEnv::RunRoot.as_str())?.map(PathBuf::from);
        Ok(Self {
            environment,
            run_root,
        })
    }
}
