// crates/import-harness/src/client/auth.rs
// ============================================================================
// Module: Token Acquisition
// Description: Credential loading, request templating, and token fetch.
// Purpose: Exchange the configured credentials for a bearer token.
// Dependencies: reqwest, serde_json, thiserror, tracing
// ============================================================================

//! ## Overview
//! The auth request body comes from a JSON template containing two textual
//! placeholders, [`USERNAME_PLACEHOLDER`] and [`PASSWORD_PLACEHOLDER`].
//! Credentials are JSON-escaped before substitution so the rendered text
//! always parses, then the body is posted to the auth URL and the
//! `access_token` field of the JSON reply is returned.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::transcript::ExchangeKind;
use super::transcript::Transcript;
use crate::config::ConfigError;
use crate::config::HarnessEnv;
use crate::config::read_env_nonempty;
use crate::config::require_env;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Placeholder replaced by the username in the auth template.
pub const USERNAME_PLACEHOLDER: &str = "{usuario}";
/// Placeholder replaced by the password in the auth template.
pub const PASSWORD_PLACEHOLDER: &str = "{clave}";
/// Auth template shipped with the crate.
pub const DEFAULT_AUTH_TEMPLATE: &str =
    concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/auth_data.json");
/// Text substituted for secrets in transcripts.
const REDACTED: &str = "<redacted>";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Errors raised while acquiring a bearer token.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Credentials or template path could not be resolved.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Template file could not be read.
    #[error("failed to read auth template {path}: {message}")]
    Template {
        /// Template path.
        path: PathBuf,
        /// I/O failure.
        message: String,
    },
    /// Rendered template is not valid JSON.
    #[error("auth template is not valid json: {0}")]
    TemplateJson(String),
    /// Auth request failed before a response arrived.
    #[error("auth request failed: {0}")]
    Transport(String),
    /// Auth service answered with a non-success status.
    #[error("auth request returned status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },
    /// Auth response did not carry a usable `access_token`.
    #[error("auth response missing access_token")]
    MissingToken,
}

/// Username and password for the auth service.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Auth username.
    pub username: String,
    /// Auth password.
    pub password: String,
}

impl Credentials {
    /// Builds credentials from explicit values.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Reads `USER_AUTH` and `PASS_AUTH`.
    ///
    /// # Errors
    ///
    /// Returns an error when either variable is unset, blank, or not UTF-8.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            username: require_env(HarnessEnv::UserAuth)?,
            password: require_env(HarnessEnv::PassAuth)?,
        })
    }

    /// Returns a copy with the password masked.
    fn redacted(&self) -> Self {
        Self::new(self.username.clone(), REDACTED)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &REDACTED)
            .finish()
    }
}

/// Everything needed to request a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSettings {
    /// Credentials substituted into the template.
    pub credentials: Credentials,
    /// Path of the JSON request template.
    pub template_path: PathBuf,
}

impl AuthSettings {
    /// Builds settings from explicit values.
    #[must_use]
    pub fn new(credentials: Credentials, template_path: impl Into<PathBuf>) -> Self {
        Self {
            credentials,
            template_path: template_path.into(),
        }
    }

    /// Reads credentials and the optional template override from env vars.
    ///
    /// # Errors
    ///
    /// Returns an error when credentials are missing or an override is blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        let template_path = read_env_nonempty(HarnessEnv::AuthTemplate.as_str())?
            .map_or_else(|| PathBuf::from(DEFAULT_AUTH_TEMPLATE), PathBuf::from);
        Ok(Self::new(Credentials::from_env()?, template_path))
    }
}

/// Bearer token returned by the auth service.
///
/// # Invariants
/// - The token string is never empty.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    /// Wraps a raw token, rejecting empty values.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.is_empty() { None } else { Some(Self(raw)) }
    }

    /// Returns the raw token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AuthToken").field(&REDACTED).finish()
    }
}

/// Token endpoint reply.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    /// Issued token.
    #[serde(default)]
    access_token: Option<String>,
}

// ============================================================================
// SECTION: Templating
// ============================================================================

/// Substitutes credentials into template text and parses the result.
///
/// # Errors
///
/// Returns [`AuthError::TemplateJson`] when the rendered text is not JSON.
pub fn render_auth_body(template: &str, credentials: &Credentials) -> Result<Value, AuthError> {
    let rendered = template
        .replace(USERNAME_PLACEHOLDER, &json_escape(&credentials.username)?)
        .replace(PASSWORD_PLACEHOLDER, &json_escape(&credentials.password)?);
    serde_json::from_str(&rendered).map_err(|err| AuthError::TemplateJson(err.to_string()))
}

/// Escapes a value for inclusion inside a JSON string literal.
fn json_escape(value: &str) -> Result<String, AuthError> {
    let quoted =
        serde_json::to_string(value).map_err(|err| AuthError::TemplateJson(err.to_string()))?;
    Ok(quoted
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or_default()
        .to_string())
}

/// Reads the template file.
fn read_template(path: &Path) -> Result<String, AuthError> {
    fs::read_to_string(path).map_err(|err| AuthError::Template {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

// ============================================================================
// SECTION: Token Fetch
// ============================================================================

/// Posts the rendered template to `auth_url` and extracts `access_token`.
pub(crate) fn fetch_token(
    http: &Client,
    auth_url: &str,
    settings: &AuthSettings,
    transcript: &Transcript,
) -> Result<AuthToken, AuthError> {
    let template = read_template(&settings.template_path)?;
    let body = render_auth_body(&template, &settings.credentials)?;
    let logged_request = render_auth_body(&template, &settings.credentials.redacted())?;
    tracing::debug!(url = auth_url, "requesting auth token");

    let response = match http.post(auth_url).json(&body).send() {
        Ok(response) => response,
        Err(err) => {
            let err = AuthError::Transport(err.to_string());
            transcript.record_failure(ExchangeKind::Auth, auth_url, logged_request, &err);
            return Err(err);
        }
    };
    let status = response.status();
    let text = response.text().map_err(|err| AuthError::Transport(err.to_string()));
    let text = match text {
        Ok(text) => text,
        Err(err) => {
            transcript.record_failure(ExchangeKind::Auth, auth_url, logged_request, &err);
            return Err(err);
        }
    };

    let outcome = if status.is_success() {
        serde_json::from_str::<TokenResponse>(&text)
            .ok()
            .and_then(|parsed| parsed.access_token)
            .and_then(AuthToken::new)
            .ok_or(AuthError::MissingToken)
    } else {
        Err(AuthError::Status {
            status: status.as_u16(),
        })
    };
    transcript.record(
        ExchangeKind::Auth,
        auth_url,
        logged_request,
        Some(status.as_u16()),
        redact_token(&text),
        outcome.as_ref().err().map(ToString::to_string),
    );
    outcome
}

/// Masks `access_token` in a token reply before it is recorded.
fn redact_token(text: &str) -> Value {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(mut map)) => {
            if map.contains_key("access_token") {
                map.insert("access_token".to_string(), Value::String(REDACTED.to_string()));
            }
            Value::Object(map)
        }
        Ok(other) => other,
        Err(_) => Value::String(text.to_string()),
    }
}
