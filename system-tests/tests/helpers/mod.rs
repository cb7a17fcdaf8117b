// system-tests/tests/helpers/mod.rs
// ============================================================================
// Module: System Test Helpers
// Description: Shared helpers for live import system-tests.
// Purpose: Install test logging for the scenario binaries.
// Dependencies: tracing-subscriber
// ============================================================================

//! ## Overview
//! Shared helpers for live import system-tests.
//! Invariants:
//! - Every test writes a summary, including on panic.
//! - Transcripts never contain credentials or tokens.

#![allow(dead_code, reason = "Shared helpers are reused across multiple test suites.")]

use std::sync::Once;

use tracing_subscriber::EnvFilter;

/// Installs a test-writer subscriber honoring `RUST_LOG` (default `info`).
pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt().with_env_filter(filter).with_test_writer().try_init();
    });
}
