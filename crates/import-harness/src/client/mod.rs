// crates/import-harness/src/client/mod.rs
// ============================================================================
// Module: Authenticated Import Client
// Description: Token acquisition and import calls with transcripts.
// Dependencies: reqwest, serde_json, thiserror, tracing
// ============================================================================

//! ## Overview
//! Each import call makes two network calls: one to the auth URL for a fresh
//! bearer token and one to `{base_url}/import`. Both are recorded in the
//! client transcript with secrets masked.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod auth;
mod import;
mod transcript;

// ============================================================================
// SECTION: Tests
// ============================================================================


// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use auth::AuthError;
pub use auth::AuthSettings;
pub use auth::AuthToken;
pub use auth::Credentials;
pub use auth::DEFAULT_AUTH_TEMPLATE;
pub use auth::PASSWORD_PLACEHOLDER;
pub use auth::USERNAME_PLACEHOLDER;
pub use auth::render_auth_body;
pub use import::ImportClient;
pub use import::ImportError;
pub use import::ImportResponse;
pub use transcript::ExchangeKind;
pub use transcript::TranscriptEntry;
