// crates/import-harness/tests/helpers/import_stub.rs
// ============================================================================
// Module: Import Service Stub
// Description: Loopback auth and import endpoints for offline tests.
// Purpose: Exercise token acquisition and import calls over real HTTP.
// Dependencies: axum, rusqlite, tokio
// ============================================================================

//! ## Overview
//! The stub serves `POST /auth/token` and `POST /import` on a loopback port.
//! Every token request that matches the configured credentials issues a new
//! token (`stub-token-1`, `stub-token-2`, ...). Import requests must carry one
//! of the issued tokens. Accepted imports are persisted to an optional
//! `SQLite` file so database checks can observe them.
//!
//! Import validation:
//! - missing or unknown bearer token: 401
//! - body other than `[{"personId": <integer>}]`: 400
//! - `personId <= 0`: 400
//! - `personId > 999_999`: 404
//! - otherwise: 200 and the row is inserted

use std::net::TcpListener as StdTcpListener;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::thread;

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::post;
use import_harness::client::AuthSettings;
use import_harness::client::Credentials;
use import_harness::client::DEFAULT_AUTH_TEMPLATE;
use import_harness::config::ConfigError;
use import_harness::config::EnvironmentConfig;
use serde_json::Value;
use serde_json::json;
use tokio::runtime::Builder;
use tokio::sync::oneshot;

/// Username accepted by default.
pub const STUB_USER: &str = "qa-user";
/// Password accepted by default.
pub const STUB_PASSWORD: &str = "qa-pass\"word";
/// Largest person id the stub considers known.
pub const MAX_KNOWN_PERSON_ID: i64 = 999_999;

/// Stub behavior.
#[derive(Clone, Debug)]
pub struct StubOptions {
    pub username: String,
    pub password: String,
    /// Forces every token request to fail with this status.
    pub auth_failure: Option<u16>,
    /// `SQLite` file receiving accepted imports.
    pub import_db: Option<PathBuf>,
}

impl Default for StubOptions {
    fn default() -> Self {
        Self {
            username: STUB_USER.to_string(),
            password: STUB_PASSWORD.to_string(),
            auth_failure: None,
            import_db: None,
        }
    }
}

impl StubOptions {
    pub fn failing_auth(status: u16) -> Self {
        Self {
            auth_failure: Some(status),
            ..Self::default()
        }
    }

    pub fn persisting_to(path: impl Into<PathBuf>) -> Self {
        Self {
            import_db: Some(path.into()),
            ..Self::default()
        }
    }
}

/// Captured import request.
#[derive(Clone, Debug)]
pub struct RecordedImport {
    pub authorization: Option<String>,
    pub body: Value,
    pub status: u16,
}

#[derive(Default)]
struct Ledger {
    auth_requests: Vec<Value>,
    issued: Vec<String>,
    imports: Vec<RecordedImport>,
}

#[derive(Clone)]
struct StubState {
    options: StubOptions,
    ledger: Arc<Mutex<Ledger>>,
}

/// Handle for the running stub; the server stops on drop.
pub struct ImportStubHandle {
    origin: String,
    shutdown: Option<oneshot::Sender<()>>,
    join: Option<thread::JoinHandle<()>>,
    ledger: Arc<Mutex<Ledger>>,
}

impl ImportStubHandle {
    /// Returns `http://127.0.0.1:<port>`.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Environment config targeting the stub.
    pub fn environment(&self) -> Result<EnvironmentConfig, ConfigError> {
        EnvironmentConfig::new(&self.origin, &format!("{}/auth/token", self.origin))
    }

    /// Auth settings matching the default stub credentials.
    pub fn auth_settings(&self) -> AuthSettings {
        AuthSettings::new(Credentials::new(STUB_USER, STUB_PASSWORD), DEFAULT_AUTH_TEMPLATE)
    }

    /// Rendered auth bodies received so far.
    pub fn auth_requests(&self) -> Vec<Value> {
        self.ledger.lock().map_or_else(|_| Vec::new(), |ledger| ledger.auth_requests.clone())
    }

    /// Tokens issued so far, oldest first.
    pub fn issued_tokens(&self) -> Vec<String> {
        self.ledger.lock().map_or_else(|_| Vec::new(), |ledger| ledger.issued.clone())
    }

    /// Import requests received so far.
    pub fn imports(&self) -> Vec<RecordedImport> {
        self.ledger.lock().map_or_else(|_| Vec::new(), |ledger| ledger.imports.clone())
    }
}

impl Drop for ImportStubHandle {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

/// Spawns the stub on a dedicated runtime thread.
pub fn spawn_import_stub(options: StubOptions) -> Result<ImportStubHandle, String> {
    let listener = StdTcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("import stub bind failed: {err}"))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("import stub listener nonblocking failed: {err}"))?;
    let addr =
        listener.local_addr().map_err(|err| format!("import stub local addr failed: {err}"))?;

    let ledger = Arc::new(Mutex::new(Ledger::default()));
    let state = StubState {
        options,
        ledger: Arc::clone(&ledger),
    };
    let app = Router::new()
        .route("/auth/token", post(handle_token))
        .route("/import", post(handle_import))
        .with_state(state);
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let join = thread::spawn(move || {
        let Ok(runtime) = Builder::new_current_thread().enable_all().build() else {
            return;
        };
        runtime.block_on(async move {
            let Ok(listener) = tokio::net::TcpListener::from_std(listener) else {
                return;
            };
            let server = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });
            let _ = server.await;
        });
    });
    Ok(ImportStubHandle {
        origin: format!("http://{addr}"),
        shutdown: Some(shutdown_tx),
        join: Some(join),
        ledger,
    })
}

/// Origin nobody listens on, for transport failures.
pub fn unreachable_origin() -> Result<String, String> {
    let listener = StdTcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("reserve port failed: {err}"))?;
    let addr = listener.local_addr().map_err(|err| format!("local addr failed: {err}"))?;
    drop(listener);
    Ok(format!("http://{addr}"))
}

async fn handle_token(State(state): State<StubState>, bytes: Bytes) -> Response {
    let body: Value = serde_json::from_slice(bytes.as_ref()).unwrap_or(Value::Null);
    let Ok(mut ledger) = state.ledger.lock() else {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };
    ledger.auth_requests.push(body.clone());

    if let Some(status) = state.options.auth_failure {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (status, Json(json!({"error": "auth unavailable"}))).into_response();
    }
    let matches = body.get("username").and_then(Value::as_str) == Some(state.options.username.as_str())
        && body.get("password").and_then(Value::as_str) == Some(state.options.password.as_str());
    if !matches {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "invalid_grant"}))).into_response();
    }

    let token = format!("stub-token-{}", ledger.issued.len() + 1);
    ledger.issued.push(token.clone());
    Json(json!({"access_token": token, "token_type": "Bearer", "expires_in": 300})).into_response()
}

async fn handle_import(State(state): State<StubState>, headers: HeaderMap, bytes: Bytes) -> Response {
    let authorization =
        headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok()).map(ToString::to_string);
    let body: Value = serde_json::from_slice(bytes.as_ref()).unwrap_or(Value::Null);
    let Ok(mut ledger) = state.ledger.lock() else {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };

    let token = authorization.as_deref().and_then(|value| value.strip_prefix("Bearer "));
    let (status, payload) = match token {
        Some(token) if ledger.issued.iter().any(|issued| issued == token) => {
            import_outcome(&state.options, &body)
        }
        _ => (StatusCode::UNAUTHORIZED, json!({"error": "invalid token"})),
    };
    ledger.imports.push(RecordedImport {
        authorization,
        body,
        status: status.as_u16(),
    });
    (status, Json(payload)).into_response()
}

fn import_outcome(options: &StubOptions, body: &Value) -> (StatusCode, Value) {
    let person_id = match body.as_array().map(Vec::as_slice) {
        Some([entry]) => entry.get("personId").and_then(Value::as_i64),
        _ => None,
    };
    let Some(person_id) = person_id else {
        return (StatusCode::BAD_REQUEST, json!({"error": "personId must be an integer"}));
    };
    if person_id <= 0 {
        return (StatusCode::BAD_REQUEST, json!({"error": "personId must be positive"}));
    }
    if person_id > MAX_KNOWN_PERSON_ID {
        return (StatusCode::NOT_FOUND, json!({"error": "person not found"}));
    }
    if let Some(path) = &options.import_db {
        if let Err(err) = persist(path, person_id) {
            return (StatusCode::INTERNAL_SERVER_ERROR, json!({"error": err}));
        }
    }
    (StatusCode::OK, json!({"imported": 1, "personId": person_id}))
}

fn persist(path: &Path, person_id: i64) -> Result<(), String> {
    let connection = rusqlite::Connection::open(path).map_err(|err| err.to_string())?;
    connection
        .execute(
            r#"INSERT OR IGNORE INTO imported_persons ("personId", "fullName") VALUES (?1, ?2)"#,
            rusqlite::params![person_id, format!("Imported {person_id}")],
        )
        .map_err(|err| err.to_string())?;
    Ok(())
}
