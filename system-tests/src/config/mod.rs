// system-tests/src/config/mod.rs
// ============================================================================
// Module: System Test Configuration
// Description: Run settings and fixture locations for live scenarios.
// Dependencies: import-harness
// ============================================================================

//! ## Overview
//! System-test configuration is read from environment variables (after
//! `.env`) and mapped into a small typed structure for the test helpers.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod run;

// ============================================================================
// SECTION: Tests
// ============================================================================


// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use run::NEGATIVE_CASES_FIXTURE;
pub use run::SystemTestConfig;
pub use run::fixture_path;
