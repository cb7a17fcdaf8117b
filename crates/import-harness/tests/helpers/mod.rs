// crates/import-harness/tests/helpers/mod.rs
// ============================================================================
// Module: Import Harness Test Helpers
// Description: Shared helpers for offline import harness tests.
// Purpose: Provide stub services, seeded databases, and logging setup.
// Dependencies: axum, rusqlite, tempfile, tracing-subscriber
// ============================================================================

//! ## Overview
//! Shared helpers for offline import harness tests.
//! Invariants:
//! - Stub servers bind loopback ports and stop when their handle drops.
//! - Databases live in per-test temporary directories.

#![allow(dead_code, reason = "Shared helpers are reused across multiple test binaries.")]

pub mod import_stub;
pub mod logging;
pub mod seed;
