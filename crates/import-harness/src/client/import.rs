// crates/import-harness/src/client/import.rs
// ============================================================================
// Module: Import API Client
// Description: Authenticated client for the `POST /import` endpoint.
// Purpose: Re-authenticate per call and return the raw import response.
// Dependencies: reqwest, serde_json, thiserror, tracing
// ============================================================================

//! ## Overview
//! [`ImportClient`] resolves its environment, fetches a token on
//! construction, and fetches a fresh token again before every import call.
//! Tokens are never reused across import calls.
//!
//! Every HTTP response, whatever its status, is returned as an
//! [`ImportResponse`] so negative scenarios can inspect it. Only transport
//! and auth failures are errors; [`ImportResponse::error_for_status`] turns
//! non-2xx responses into errors for callers that want that contract.

// ============================================================================
// SECTION: Imports
// ============================================================================

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;

use super::auth;
use super::auth::AuthError;
use super::auth::AuthSettings;
use super::auth::AuthToken;
use super::transcript::ExchangeKind;
use super::transcript::Transcript;
use super::transcript::TranscriptEntry;
use super::transcript::body_value;
use crate::config::ConfigError;
use crate::config::Environment;
use crate::config::EnvironmentConfig;
use crate::config::HttpSettings;
use crate::config::load_dotenv;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised by import calls.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Client configuration could not be resolved.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// HTTP client could not be built.
    #[error("failed to build http client: {0}")]
    Client(String),
    /// Token acquisition failed before the import call.
    #[error("import aborted, no token: {0}")]
    Auth(#[from] AuthError),
    /// Import request failed before a response arrived.
    #[error("import request failed: {0}")]
    Transport(String),
    /// Import endpoint answered with a non-success status.
    #[error("import returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },
    /// Response body did not decode into the requested type.
    #[error("invalid import response body: {0}")]
    Decode(String),
}

// ============================================================================
// SECTION: Response
// ============================================================================

/// Status and body returned by the import endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportResponse {
    /// HTTP status code.
    status: u16,
    /// Response body text.
    body: String,
}

impl ImportResponse {
    /// Returns the HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Returns the response body text.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns true for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::Decode`] when the body does not decode into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ImportError> {
        serde_json::from_str(&self.body).map_err(|err| ImportError::Decode(err.to_string()))
    }

    /// Converts a non-2xx response into [`ImportError::Status`].
    ///
    /// # Errors
    ///
    /// Returns an error when the status is outside the 2xx range.
    pub fn error_for_status(self) -> Result<Self, ImportError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ImportError::Status {
                status: self.status,
                body: self.body,
            })
        }
    }
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// Authenticated client for the import endpoint.
#[derive(Debug)]
pub struct ImportClient {
    /// Resolved target URLs.
    config: EnvironmentConfig,
    /// Credentials and template.
    auth: AuthSettings,
    /// Blocking HTTP client.
    http: Client,
    /// Recorded exchanges.
    transcript: Transcript,
    /// Token fetched at construction, if the fetch succeeded.
    initial_token: Option<AuthToken>,
}

impl ImportClient {
    /// Builds a client and performs the initial token fetch.
    ///
    /// A failed initial fetch is logged and leaves [`Self::initial_token`]
    /// empty; it does not fail construction.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn new(
        config: EnvironmentConfig,
        auth: AuthSettings,
        settings: HttpSettings,
    ) -> Result<Self, ImportError> {
        let mut builder = Client::builder();
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|err| ImportError::Client(err.to_string()))?;
        let mut client = Self {
            config,
            auth,
            http,
            transcript: Transcript::default(),
            initial_token: None,
        };
        // fetch_token logs the failure.
        client.initial_token = client.fetch_token().ok();
        Ok(client)
    }

    /// Builds a client for a named environment using env-var settings.
    ///
    /// # Errors
    ///
    /// Returns an error when credentials or HTTP settings are invalid.
    pub fn from_env(environment: Environment) -> Result<Self, ImportError> {
        load_dotenv();
        let auth = AuthSettings::from_env()?;
        let settings = HttpSettings::from_env()?;
        Self::new(environment.config(), auth, settings)
    }

    /// Returns the resolved environment configuration.
    #[must_use]
    pub const fn config(&self) -> &EnvironmentConfig {
        &self.config
    }

    /// Returns the token fetched at construction, if any.
    #[must_use]
    pub const fn initial_token(&self) -> Option<&AuthToken> {
        self.initial_token.as_ref()
    }

    /// Returns a snapshot of every exchange made by this client.
    #[must_use]
    pub fn transcript(&self) -> Vec<TranscriptEntry> {
        self.transcript.entries()
    }

    /// Requests a fresh bearer token.
    ///
    /// # Errors
    ///
    /// Returns an error when the template cannot be rendered, the request
    /// fails, the status is non-2xx, or the reply lacks `access_token`.
    pub fn fetch_token(&self) -> Result<AuthToken, AuthError> {
        auth::fetch_token(&self.http, self.config.auth_url(), &self.auth, &self.transcript)
            .inspect_err(|err| {
                let auth_url = self.config.auth_url();
                tracing::warn!(error = %err, auth_url, "token fetch failed");
            })
    }

    /// Imports a single person by id.
    ///
    /// # Errors
    ///
    /// Returns an error when token acquisition or the HTTP exchange fails.
    /// Non-2xx responses are returned as `Ok`.
    pub fn post_import(&self, person_id: i64) -> Result<ImportResponse, ImportError> {
        self.post_import_value(Value::from(person_id))
    }

    /// Imports a single person with an arbitrary JSON `personId` value.
    ///
    /// # Errors
    ///
    /// Returns an error when token acquisition or the HTTP exchange fails.
    /// Non-2xx responses are returned as `Ok`.
    pub fn post_import_value(&self, person_id: Value) -> Result<ImportResponse, ImportError> {
        let token = self.fetch_token()?;
        let url = self.config.import_url();
        let body = json!([{ "personId": person_id }]);
        tracing::debug!(url = %url, "posting import request");

        let sent = self.http.post(&url).bearer_auth(token.as_str()).json(&body).send();
        let response = match sent {
            Ok(response) => response,
            Err(err) => return Err(self.transport_failure(&url, body, &err.to_string())),
        };
        let status = response.status().as_u16();
        let text = match response.text() {
            Ok(text) => text,
            Err(err) => return Err(self.transport_failure(&url, body, &err.to_string())),
        };
        self.transcript.record(
            ExchangeKind::Import,
            &url,
            body,
            Some(status),
            body_value(&text),
            None,
        );
        tracing::debug!(status, "import response received");
        Ok(ImportResponse {
            status,
            body: text,
        })
    }

    /// Logs and records a failed import exchange.
    fn transport_failure(&self, url: &str, body: Value, message: &str) -> ImportError {
        let err = ImportError::Transport(message.to_string());
        tracing::warn!(error = %err, url, "import request failed");
        self.transcript.record_failure(ExchangeKind::Import, url, body, &err);
        err
    }
}
