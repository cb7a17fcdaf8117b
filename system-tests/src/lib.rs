// system-tests/src/lib.rs
// ============================================================================
// Module: Import Harness System Tests Library
// Description: Shared configuration and artifacts for live import scenarios.
// Purpose: Locate fixtures and write per-test summaries for system-tests.
// Dependencies: import-harness, serde, serde_jcs
// ============================================================================

//! ## Overview
//! This crate hosts configuration and the artifact reporter shared by the
//! live scenario binaries in `system-tests/tests`. The binaries only build
//! with the `system-tests` feature because they need reachable remote
//! services.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod artifacts;
pub mod config;
