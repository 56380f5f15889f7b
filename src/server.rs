//! HTTP redirector.
//!
//! Point a browser's custom search engine at `http://host:port/?q=%s` and
//! every search goes through bang resolution.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::core::{BangTable, Resolution, FALLBACK_TAG};
use crate::error::{BangError, BangResult};
use crate::storage::{
    clear_default_bang, default_bang_tag, set_default_bang, PreferenceStore, DEFAULT_BANG_KEY,
};

/// Application state shared across handlers.
pub struct AppState {
    pub table: BangTable,
    store: Mutex<Box<dyn PreferenceStore + Send>>,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(table: BangTable, store: impl PreferenceStore + Send + 'static) -> Self {
        Self {
            table,
            store: Mutex::new(Box::new(store)),
        }
    }

    fn resolve(&self, query: &str) -> Resolution {
        self.table.resolve_detailed(query, || {
            self.store
                .lock()
                .ok()
                .and_then(|store| store.get(DEFAULT_BANG_KEY))
        })
    }

    fn default_tag(&self) -> String {
        match self.store.lock() {
            Ok(store) => default_bang_tag(&**store, &self.table),
            Err(_) => FALLBACK_TAG.to_string(),
        }
    }

    fn with_store_mut<T>(
        &self,
        f: impl FnOnce(&mut dyn PreferenceStore) -> BangResult<T>,
    ) -> Result<T, ApiError> {
        let mut store = self
            .store
            .lock()
            .map_err(|_| ApiError::Internal("Preference store unavailable".to_string()))?;
        Ok(f(&mut **store)?)
    }
}

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
            ApiError::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, m.clone()),
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<BangError> for ApiError {
    fn from(err: BangError) -> Self {
        match err {
            BangError::UnknownBang(tag) => ApiError::NotFound(format!("Unknown bang: {}", tag)),
            other => {
                tracing::error!("Request failed: {}", other);
                ApiError::Internal(other.to_string())
            }
        }
    }
}

/// `?q=` query parameter.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResolveResponse {
    pub query: String,
    #[serde(flatten)]
    pub resolution: ResolutionPayload,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResolutionPayload {
    pub rule: String,
    pub tag: String,
    pub term: String,
    pub url: String,
}

impl From<Resolution> for ResolutionPayload {
    fn from(r: Resolution) -> Self {
        Self {
            rule: r.rule.as_str().to_string(),
            tag: r.tag,
            term: r.term,
            url: r.url,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BangInfo {
    pub tag: String,
    pub url: String,
    pub description: Option<String>,
    pub default: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DefaultBang {
    pub tag: String,
}

pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/search", get(search))
        .route("/api/resolve", get(api_resolve))
        .route("/api/bangs", get(api_bangs))
        .route(
            "/api/default",
            get(get_default).put(put_default).delete(delete_default),
        )
        .route("/health", get(|| async { "OK" }))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until Ctrl-C or SIGTERM.
pub async fn serve(config: &ServerConfig, state: SharedState) -> BangResult<()> {
    let router = build_router(state);
    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = signal::ctrl_c().await;
    };
    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        if let Ok(mut stream) = signal(SignalKind::terminate()) {
            let _ = stream.recv().await;
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

fn redirect(state: &AppState, query: &str) -> Result<Response, ApiError> {
    let resolution = state.resolve(query);
    tracing::info!(rule = ?resolution.rule, tag = %resolution.tag, "Redirecting");

    let location = HeaderValue::from_str(&resolution.url).map_err(|_| {
        ApiError::Internal(format!("Resolved URL is not a valid header: {}", resolution.url))
    })?;
    Ok((StatusCode::SEE_OTHER, [(header::LOCATION, location)]).into_response())
}

/// Redirect when `q` is present (even empty), otherwise show the search page.
async fn home(
    State(state): State<SharedState>,
    Query(params): Query<SearchParams>,
) -> Result<Response, ApiError> {
    match params.q {
        Some(q) => redirect(&state, &q),
        None => Ok(Html(render_home(&state)).into_response()),
    }
}

async fn search(
    State(state): State<SharedState>,
    Query(params): Query<SearchParams>,
) -> Result<Response, ApiError> {
    redirect(&state, params.q.as_deref().unwrap_or_default())
}

async fn api_resolve(
    State(state): State<SharedState>,
    Query(params): Query<SearchParams>,
) -> Json<ResolveResponse> {
    let query = params.q.unwrap_or_default();
    let resolution = state.resolve(&query).into();
    Json(ResolveResponse { query, resolution })
}

async fn api_bangs(State(state): State<SharedState>) -> Json<Vec<BangInfo>> {
    let default = state.default_tag();
    let bangs = state
        .table
        .sorted()
        .into_iter()
        .map(|bang| BangInfo {
            tag: bang.tag.clone(),
            url: bang.url.clone(),
            description: bang.description.clone(),
            default: bang.tag == default,
        })
        .collect();
    Json(bangs)
}

async fn get_default(State(state): State<SharedState>) -> Json<DefaultBang> {
    Json(DefaultBang {
        tag: state.default_tag(),
    })
}

async fn put_default(
    State(state): State<SharedState>,
    body: Result<Json<DefaultBang>, JsonRejection>,
) -> Result<Json<DefaultBang>, ApiError> {
    let Json(body) = body?;
    state.with_store_mut(|store| set_default_bang(store, &state.table, &body.tag))?;
    Ok(Json(DefaultBang { tag: body.tag }))
}

async fn delete_default(State(state): State<SharedState>) -> Result<Json<DefaultBang>, ApiError> {
    state.with_store_mut(clear_default_bang)?;
    Ok(Json(DefaultBang {
        tag: state.default_tag(),
    }))
}

fn html_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn render_home(state: &AppState) -> String {
    let default = state.default_tag();

    let mut rows = String::new();
    for bang in state.table.sorted() {
        let marker = if bang.tag == default { " <em>(default)</em>" } else { "" };
        rows.push_str(&format!(
            "<tr><td><code>!{tag}</code> / <code>{tag}!</code>{marker}</td><td>{desc}</td><td class=\"url\">{url}</td></tr>\n",
            tag = html_escape(&bang.tag),
            desc = html_escape(bang.description.as_deref().unwrap_or("")),
            url = html_escape(&bang.url),
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>bangs</title>
    <style>
      :root {{ color-scheme: light dark; }}
      body {{ font-family: system-ui, sans-serif; max-width: 60rem; margin: 2rem auto; padding: 0 1rem; }}
      form {{ display: flex; gap: .5rem; margin-bottom: 2rem; }}
      input {{ flex: 1; font-size: 1.1rem; padding: .5rem; }}
      td {{ padding: .25rem .75rem .25rem 0; vertical-align: top; }}
      .url {{ opacity: .7; word-break: break-all; }}
    </style>
  </head>
  <body>
    <form action="/" method="get">
      <input type="search" name="q" placeholder="Search or use a bang: !g rust, rust w!" autofocus />
      <button type="submit">Search</button>
    </form>
    <table>
{rows}    </table>
  </body>
</html>
"#
    )
}
