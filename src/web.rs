// src/web.rs

use crate::config::ConfigBuilder;
use crate::constants::{
    API_KEY_ENV, AUDIT_LOG_FILENAME, DEFAULT_CATEGORIES, DEFAULT_MODEL, DEFAULT_WORKERS,
    MAX_CHARS_PER_FILE, MODEL_ENV,
};
use crate::errors::Error;
use crate::plan::PlanEntry;
use crate::progress::ProgressReporter;
use crate::{build_plan, CancellationToken};
use axum::extract::Query;
use axum::{
    extract::{Json, State},
    http::{header, StatusCode, Uri},
    response::{
        sse::{Event, Sse},
        IntoResponse, Response,
    },
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use rust_embed::RustEmbed;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;
use tower_http::trace::TraceLayer;

#[derive(RustEmbed)]
#[folder = "assets/"]
struct Assets;

// --- Internal Types ---
#[derive(Clone, Debug)]
struct BroadcastMessage {
    request_id: String,
    payload: String,
}

// --- Shared State for SSE ---
struct AppState {
    tx: broadcast::Sender<BroadcastMessage>,
}

// --- Web Progress Reporter ---
// Bridges the planner's synchronous progress trait to async SSE
struct WebProgressReporter {
    tx: broadcast::Sender<BroadcastMessage>,
    request_id: String,
    // Clients close their stream on the first "done".
    finished: AtomicBool,
}

impl WebProgressReporter {
    fn send(&self, payload: serde_json::Value) {
        let _ = self.tx.send(BroadcastMessage {
            request_id: self.request_id.clone(),
            payload: payload.to_string(),
        });
    }
}

impl ProgressReporter for WebProgressReporter {
    fn set_length(&self, len: u64) {
        self.send(json!({ "type": "start", "total": len }));
    }
    fn set_position(&self, pos: u64) {
        self.send(json!({ "type": "position", "done": pos }));
    }
    fn set_message(&self, msg: String) {
        self.send(json!({ "type": "progress", "msg": msg }));
    }
    fn finish(&self) {
        if !self.finished.swap(true, Ordering::SeqCst) {
            self.send(json!({ "type": "done" }));
        }
    }
    fn finish_with_message(&self, msg: String) {
        self.set_message(msg);
        self.finish();
    }
}

// --- Request Structs ---
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct PlanRequest {
    pub directory: String,
    pub model: Option<String>,
    pub categories: Option<Vec<String>>,
    pub workers: Option<usize>,
    pub max_chars: Option<usize>,
    pub max_size: Option<String>,
    pub request_id: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Default)]
pub struct ApplyRequest {
    #[serde(flatten)]
    pub options: PlanRequest,
    /// A plan previously returned by `/api/plan`. When absent the directory is re-planned.
    pub plan: Option<Vec<PlanEntry>>,
    pub audit_log: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Default)]
pub struct UndoRequest {
    pub directory: String,
    pub audit_log: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct EventQuery {
    pub request_id: Option<String>,
}

#[derive(Serialize)]
pub struct PlanResponse {
    pub num_files: usize,
    pub plan: Vec<PlanEntry>,
}

#[derive(Serialize)]
pub struct SettingsResponse {
    pub model: String,
    pub categories: Vec<String>,
    pub workers: usize,
    pub max_chars: usize,
    pub audit_log: String,
    pub api_key_configured: bool,
}

// --- Server Startup ---
pub fn create_router() -> Router {
    let (tx, _rx) = broadcast::channel(100);
    let state = Arc::new(AppState { tx });

    Router::new()
        .route("/api/plan", post(plan_handler))
        .route("/api/apply", post(apply_handler))
        .route("/api/undo", post(undo_handler))
        .route("/api/settings", get(settings_handler))
        .route("/api/events", get(sse_handler)) // Real-time events
        .fallback(static_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(port: u16, open_browser: bool) -> anyhow::Result<()> {
    let app = create_router();

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let url = format!("http://{}", addr);

    println!("docsort web UI running at {}", url);

    if open_browser {
        let _ = open::that(&url);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

// --- Handlers ---

async fn static_handler(uri: Uri) -> impl IntoResponse {
    let mut path = uri.path().trim_start_matches('/').to_string();
    if path.is_empty() {
        path = "index.html".to_string();
    }
    match Assets::get(&path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            ([(header::CONTENT_TYPE, mime.as_ref())], content.data).into_response()
        }
        None => (StatusCode::NOT_FOUND, "404 Not Found").into_response(),
    }
}

async fn settings_handler() -> Json<SettingsResponse> {
    Json(SettingsResponse {
        model: std::env::var(MODEL_ENV)
            .ok()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
        workers: DEFAULT_WORKERS,
        max_chars: MAX_CHARS_PER_FILE,
        audit_log: AUDIT_LOG_FILENAME.to_string(),
        api_key_configured: std::env::var(API_KEY_ENV)
            .map(|k| !k.trim().is_empty())
            .unwrap_or(false),
    })
}

// Server-Sent Events Handler
async fn sse_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<EventQuery>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let filter_id = params.request_id.unwrap_or_else(|| "global".to_string());
    let rx = state.tx.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(move |msg| {
        // Filter messages server-side so clients only see their own events
        match msg {
            Ok(m) if m.request_id == filter_id => Some(Ok(Event::default().data(m.payload))),
            Ok(_) => None,
            Err(_) => Some(Ok(Event::default().event("error").data("Stream error"))),
        }
    });

    Sse::new(stream).keep_alive(axum::response::sse::KeepAlive::default())
}

async fn plan_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PlanRequest>,
) -> Response {
    let reporter = reporter_for(&state, req.request_id.clone());

    let result = tokio::task::spawn_blocking(move || {
        reporter.set_message("Listing files...".to_string());
        let config = builder_from(&req).build()?;
        let plan = build_plan(&config, &CancellationToken::new(), Some(reporter.clone()))?;
        // Planning returns early without progress when nothing is supported.
        reporter.finish();
        Ok::<PlanResponse, anyhow::Error>(PlanResponse {
            num_files: plan.len(),
            plan,
        })
    })
    .await;

    respond(result)
}

async fn apply_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ApplyRequest>,
) -> Response {
    let reporter = reporter_for(&state, req.options.request_id.clone());

    let result = tokio::task::spawn_blocking(move || {
        let mut builder = builder_from(&req.options).apply(true);
        if let Some(name) = req.audit_log.filter(|s| !s.trim().is_empty()) {
            builder = builder.audit_log_name(name);
        }
        let config = builder.build()?;

        let plan = match req.plan {
            Some(plan) => {
                check_plan_within(&config.directory, &plan)?;
                plan
            }
            None => build_plan(&config, &CancellationToken::new(), Some(reporter.clone()))?,
        };

        reporter.set_message(format!("Renaming {} file(s)...", plan.len()));
        let report = crate::apply_plan(&config, plan)?;
        reporter.finish();
        Ok::<_, anyhow::Error>(report)
    })
    .await;

    respond(result)
}

async fn undo_handler(Json(req): Json<UndoRequest>) -> Response {
    let result = tokio::task::spawn_blocking(move || {
        let mut builder = ConfigBuilder::new().directory(req.directory);
        if let Some(name) = req.audit_log.filter(|s| !s.trim().is_empty()) {
            builder = builder.audit_log_name(name);
        }
        let config = builder.build()?;
        let report = crate::undo_organization(&config.directory, &config.audit_log_name)?;
        Ok::<_, anyhow::Error>(report)
    })
    .await;

    respond(result)
}

fn reporter_for(state: &AppState, request_id: Option<String>) -> Arc<WebProgressReporter> {
    Arc::new(WebProgressReporter {
        tx: state.tx.clone(),
        request_id: request_id.unwrap_or_else(|| "global".to_string()),
        finished: AtomicBool::new(false),
    })
}

fn builder_from(req: &PlanRequest) -> ConfigBuilder {
    let mut builder = ConfigBuilder::new().directory(req.directory.clone());
    if let Some(model) = req.model.clone().filter(|s| !s.trim().is_empty()) {
        builder = builder.model(model);
    }
    if let Some(categories) = req.categories.clone().filter(|c| !c.is_empty()) {
        builder = builder.categories(categories);
    }
    if let Some(workers) = req.workers {
        builder = builder.workers(workers);
    }
    if let Some(max_chars) = req.max_chars {
        builder = builder.max_chars(max_chars);
    }
    if let Some(size) = req.max_size.clone().filter(|s| !s.trim().is_empty()) {
        builder = builder.max_size(size);
    }
    builder
}

/// Rejects a client-supplied plan that would move files from or to outside `directory`.
fn check_plan_within(directory: &Path, plan: &[PlanEntry]) -> anyhow::Result<()> {
    for entry in plan {
        let source_ok = entry.old_path.parent() == Some(directory);
        let target_ok = entry.suggested_new_path.starts_with(directory)
            && entry
                .suggested_new_path
                .components()
                .all(|c| !matches!(c, std::path::Component::ParentDir));
        if !source_ok || !target_ok {
            anyhow::bail!(
                "Plan entry for '{}' points outside '{}'",
                entry.old_name,
                directory.display()
            );
        }
    }
    Ok(())
}

fn respond<T: Serialize>(
    result: Result<anyhow::Result<T>, tokio::task::JoinError>,
) -> Response {
    match result {
        Ok(Ok(body)) => (StatusCode::OK, axum::Json(body)).into_response(),
        Ok(Err(e)) => (status_for(&e), e.to_string()).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

fn status_for(error: &anyhow::Error) -> StatusCode {
    match error.downcast_ref::<Error>() {
        Some(Error::AuditLogNotFound(_)) => StatusCode::NOT_FOUND,
        Some(Error::AuditLogConflict(_)) => StatusCode::CONFLICT,
        Some(Error::Io { .. })
        | Some(Error::AuditLogCorrupt { .. })
        | Some(Error::Serialize(_))
        | Some(Error::WorkerPool(_))
        | Some(Error::HttpClient(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    }
}
