// system-tests/src/artifacts/mod.rs
// ============================================================================
// Module: System Test Artifacts
// Description: Per-test run roots, summaries, and transcripts on disk.
// Dependencies: serde, serde_jcs
// ============================================================================

//! ## Overview
//! Per-test run roots, summaries, and transcripts written to disk for live
//! import scenarios.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod reporter;

// ============================================================================
// SECTION: Tests
// ============================================================================


// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use reporter::TestArtifacts;
pub use reporter::TestReporter;
