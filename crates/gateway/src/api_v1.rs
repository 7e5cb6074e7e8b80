//! HTTP API v1: the JSON surface behind the web form.
//!
//! Endpoints:
//!
//! - `GET /v1/tasks`: the three task definitions
//! - `GET /v1/templates`: case templates
//! - `POST /v1/sessions`: create a session
//! - `POST /v1/sessions/{id}/run`: run one task
//! - `POST /v1/sessions/{id}/run-all`: run all tasks
//! - `GET /v1/sessions/{id}/history`: session history, newest first
//! - `DELETE /v1/sessions/{id}/history`: clear session history

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use quickmd_config::TemplateStore;
use quickmd_core::Error;
use quickmd_core::history::{HistoryEntry, RunMode};
use quickmd_core::session::Session;
use quickmd_core::task::{Task, TaskId};
use quickmd_pipeline::{Pipeline, Selection, TaskReport};

// ── State ─────────────────────────────────────────────────────────────────

/// Shared state for the v1 API.
pub struct ApiV1State {
    pub pipeline: Pipeline,
    pub templates: TemplateStore,
    /// One isolated session per browser tab.
    pub sessions: RwLock<HashMap<String, Session>>,
    /// Oldest session is evicted when this many exist.
    pub max_sessions: usize,
}

impl ApiV1State {
    pub fn new(pipeline: Pipeline, templates: TemplateStore, max_sessions: usize) -> Self {
        Self {
            pipeline,
            templates,
            sessions: RwLock::new(HashMap::new()),
            max_sessions,
        }
    }
}

pub type SharedApiState = Arc<ApiV1State>;

// ── Router ────────────────────────────────────────────────────────────────

/// Build the v1 API router. Nest this under "/v1" in the main router.
pub fn v1_router(state: SharedApiState) -> Router {
    Router::new()
        .route("/tasks", get(list_tasks_handler))
        .route("/templates", get(list_templates_handler))
        .route("/sessions", post(create_session_handler))
        .route("/sessions/{id}/run", post(run_handler))
        .route("/sessions/{id}/run-all", post(run_all_handler))
        .route(
            "/sessions/{id}/history",
            get(history_handler).delete(clear_history_handler),
        )
        .with_state(state)
}

// ── DTOs ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

impl From<Error> for ErrorResponse {
    fn from(e: Error) -> Self {
        Self {
            error: e.to_string(),
        }
    }
}

fn map_error(e: Error) -> ApiError {
    let status = match e {
        Error::InvalidCase(_) | Error::UnknownTask(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(e.into()))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSessionResponse {
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
pub struct RunRequest {
    pub task: String,
    pub case: String,
}

#[derive(Debug, Deserialize)]
pub struct RunAllRequest {
    pub case: String,
}

/// A run as returned to the client, both fresh and from history.
#[derive(Debug, Serialize)]
pub struct EntryDto {
    pub id: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub mode: RunMode,
    pub case: String,
    pub results: Vec<TaskReport>,
}

impl From<&HistoryEntry> for EntryDto {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            id: entry.id.clone(),
            timestamp: entry.timestamp,
            mode: entry.mode,
            case: entry.case.clone(),
            results: TaskReport::from_entry(entry),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub entries: Vec<EntryDto>,
    pub count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClearHistoryResponse {
    pub cleared: usize,
}

// ── Handlers ──────────────────────────────────────────────────────────────

async fn list_tasks_handler() -> Json<&'static [Task]> {
    Json(Task::all())
}

async fn list_templates_handler(State(state): State<SharedApiState>) -> Json<TemplateStore> {
    Json(state.templates.clone())
}

async fn create_session_handler(
    State(state): State<SharedApiState>,
) -> (StatusCode, Json<CreateSessionResponse>) {
    let session = Session::new();
    let id = session.id.to_string();

    let mut sessions = state.sessions.write().await;

    // Evict the oldest session if at capacity
    if sessions.len() >= state.max_sessions
        && let Some(oldest_key) = sessions
            .iter()
            .min_by_key(|(_, s)| s.created_at)
            .map(|(k, _)| k.clone())
    {
        sessions.remove(&oldest_key);
        info!(session = %oldest_key, "Evicted oldest session");
    }

    sessions.insert(id.clone(), session);
    info!(session = %id, "Session created");

    (StatusCode::CREATED, Json(CreateSessionResponse { session_id: id }))
}

async fn ensure_session(state: &ApiV1State, id: &str) -> Result<(), ApiError> {
    if state.sessions.read().await.contains_key(id) {
        Ok(())
    } else {
        Err(api_error(StatusCode::NOT_FOUND, format!("Session '{id}' not found")))
    }
}

/// Run `selection` outside the session lock, then record the entry.
async fn run_selection(
    state: &ApiV1State,
    id: &str,
    selection: Selection,
    case: String,
) -> Result<Json<EntryDto>, ApiError> {
    ensure_session(state, id).await?;

    let entry = state
        .pipeline
        .execute(selection, &case)
        .await
        .map_err(map_error)?;

    let mut sessions = state.sessions.write().await;
    match sessions.get_mut(id) {
        Some(session) => {
            if let Selection::Single(task) = selection {
                session.select_task(task);
            }
            session.set_case(case);
            session.record(entry.clone());
        }
        None => warn!(session = %id, "Session evicted during run; result not recorded"),
    }

    Ok(Json(EntryDto::from(&entry)))
}

async fn run_handler(
    State(state): State<SharedApiState>,
    Path(id): Path<String>,
    Json(payload): Json<RunRequest>,
) -> Result<Json<EntryDto>, ApiError> {
    let task: TaskId = payload.task.parse().map_err(map_error)?;
    info!(session = %id, task = %task, "v1/run request");
    run_selection(&state, &id, Selection::Single(task), payload.case).await
}

async fn run_all_handler(
    State(state): State<SharedApiState>,
    Path(id): Path<String>,
    Json(payload): Json<RunAllRequest>,
) -> Result<Json<EntryDto>, ApiError> {
    info!(session = %id, "v1/run-all request");
    run_selection(&state, &id, Selection::All, payload.case).await
}

async fn history_handler(
    State(state): State<SharedApiState>,
    Path(id): Path<String>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let sessions = state.sessions.read().await;
    let session = sessions
        .get(&id)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, format!("Session '{id}' not found")))?;

    let entries: Vec<EntryDto> = session
        .history()
        .list()
        .into_iter()
        .map(EntryDto::from)
        .collect();
    let count = entries.len();

    Ok(Json(HistoryResponse { entries, count }))
}

async fn clear_history_handler(
    State(state): State<SharedApiState>,
    Path(id): Path<String>,
) -> Result<Json<ClearHistoryResponse>, ApiError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions
        .get_mut(&id)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, format!("Session '{id}' not found")))?;

    let cleared = session.history().len();
    session.clear_history();
    info!(session = %id, cleared, "History cleared");

    Ok(Json(ClearHistoryResponse { cleared }))
}
