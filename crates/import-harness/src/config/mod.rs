// crates/import-harness/src/config/mod.rs
// ============================================================================
// Module: Harness Configuration
// Description: Environment resolution and env-var backed harness settings.
// Purpose: Provide typed, immutable configuration to clients and fixtures.
// Dependencies: dotenv, thiserror, url
// ============================================================================

//! ## Overview
//! The target environment is chosen from a fixed enumerated set and mapped to
//! its base and auth URLs. Every other setting (credentials, database access,
//! timeouts) is read from environment variables with strict UTF-8 checks.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod env;
mod environments;
mod error;

// ============================================================================
// SECTION: Tests
// ============================================================================


// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use env::HarnessEnv;
pub use env::HttpSettings;
pub use env::load_dotenv;
pub use env::read_env_nonempty;
pub use env::read_env_strict;
pub use env::require_env;
pub use environments::DEFAULT_ENVIRONMENT;
pub use environments::Environment;
pub use environments::EnvironmentConfig;
pub use environments::resolve_environment;
pub use error::ConfigError;
