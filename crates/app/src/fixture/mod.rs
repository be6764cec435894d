//! Mock reqres backend.
//!
//! An axum server holding a pinned copy of the reqres data set, so the
//! suite can run deterministically without network access. It implements
//! the endpoints the suite exercises: register, login, the paginated user
//! list (with `delay`), single user lookup and user creation.

mod data;

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use axum::extract::{Path, Query, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub use data::{DEFAULT_PER_PAGE, TOKEN};

const FIRST_CREATED_ID: u64 = 100;

/// Builder for the mock backend.
#[derive(Debug, Clone)]
pub struct MockReqres {
    delay_unit: Duration,
    api_key: Option<String>,
}

impl Default for MockReqres {
    fn default() -> Self {
        Self {
            delay_unit: Duration::from_secs(1),
            api_key: None,
        }
    }
}

impl MockReqres {
    /// Creates a backend that honours `delay` in seconds and needs no key.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how long one unit of the `delay` query parameter lasts.
    #[must_use]
    pub const fn with_delay_unit(mut self, unit: Duration) -> Self {
        self.delay_unit = unit;
        self
    }

    /// Rejects requests whose `x-api-key` header differs from `key`.
    #[must_use]
    pub fn require_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Builds the router.
    pub fn router(self) -> Router {
        let state = FixtureState {
            delay_unit: self.delay_unit,
            api_key: self.api_key.map(Arc::from),
            next_id: Arc::new(AtomicU64::new(FIRST_CREATED_ID)),
        };

        Router::new()
            .route("/api/register", post(register))
            .route("/api/login", post(login))
            .route("/api/users", get(list_users).post(create_user))
            .route("/api/users/{id}", get(get_user))
            .layer(middleware::from_fn_with_state(state.clone(), check_api_key))
            .with_state(state)
    }

    /// Serves the backend on an ephemeral loopback port.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn spawn(self) -> std::io::Result<RunningFixture> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let router = self.router();

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!(error = %e, "mock backend stopped");
            }
        });

        tracing::info!(%addr, "mock reqres backend listening");
        Ok(RunningFixture { addr, handle })
    }
}

/// A backend serving in the background; stopped when dropped.
#[derive(Debug)]
pub struct RunningFixture {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl RunningFixture {
    /// Address the backend listens on.
    #[must_use]
    pub const fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Base URL to point the harness at.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for RunningFixture {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[derive(Clone)]
struct FixtureState {
    delay_unit: Duration,
    api_key: Option<Arc<str>>,
    next_id: Arc<AtomicU64>,
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

async fn check_api_key(State(state): State<FixtureState>, request: Request, next: Next) -> Response {
    if let Some(expected) = state.api_key.as_deref() {
        let given = request
            .headers()
            .get("x-api-key")
            .and_then(|v| v.to_str().ok());
        if given != Some(expected) {
            return error(StatusCode::UNAUTHORIZED, "Missing API key");
        }
    }
    next.run(request).await
}

#[derive(Debug, Deserialize)]
struct Credentials {
    email: Option<String>,
    username: Option<String>,
    password: Option<String>,
}

impl Credentials {
    /// Resolves the account, or the error reqres answers with.
    fn account(&self) -> Result<Option<data::User>, &'static str> {
        let login = self
            .email
            .as_deref()
            .or(self.username.as_deref())
            .filter(|s| !s.is_empty())
            .ok_or("Missing email or username")?;
        if self.password.as_deref().is_none_or(str::is_empty) {
            return Err("Missing password");
        }
        Ok(data::find_by_email(login))
    }
}

async fn register(Json(credentials): Json<Credentials>) -> Response {
    match credentials.account() {
        Ok(Some(user)) => Json(json!({ "id": user.id, "token": TOKEN })).into_response(),
        Ok(None) => error(
            StatusCode::BAD_REQUEST,
            "Note: Only defined users succeed registration",
        ),
        Err(message) => error(StatusCode::BAD_REQUEST, message),
    }
}

async fn login(Json(credentials): Json<Credentials>) -> Response {
    match credentials.account() {
        Ok(Some(_)) => Json(json!({ "token": TOKEN })).into_response(),
        Ok(None) => error(StatusCode::BAD_REQUEST, "user not found"),
        Err(message) => error(StatusCode::BAD_REQUEST, message),
    }
}

#[derive(Debug, Deserialize)]
struct ListParams {
    page: Option<usize>,
    per_page: Option<usize>,
    delay: Option<u32>,
}

async fn list_users(State(state): State<FixtureState>, Query(params): Query<ListParams>) -> Json<Value> {
    if let Some(delay) = params.delay.filter(|d| *d > 0) {
        tokio::time::sleep(state.delay_unit * delay).await;
    }
    Json(data::page(
        params.page.unwrap_or(1),
        params.per_page.unwrap_or(DEFAULT_PER_PAGE),
    ))
}

async fn get_user(Path(id): Path<String>) -> Response {
    match id.parse().ok().and_then(data::find_user) {
        Some(user) => Json(json!({ "data": user.to_json(), "support": data::support() })).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({}))).into_response(),
    }
}

async fn create_user(
    State(state): State<FixtureState>,
    Json(mut fields): Json<Map<String, Value>>,
) -> (StatusCode, Json<Value>) {
    let id = state.next_id.fetch_add(1, Ordering::Relaxed);
    fields.insert("id".to_string(), Value::String(id.to_string()));
    fields.insert(
        "createdAt".to_string(),
        Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    (StatusCode::CREATED, Json(Value::Object(fields)))
}
