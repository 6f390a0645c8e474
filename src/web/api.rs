use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Duration, Utc};
use log::{info, warn};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use uuid::Uuid;

use crate::algorithm::AlgorithmKind;
use crate::graph::{samples, Graph, GraphSpec};
use crate::runner::playback::lock;
use crate::runner::StepRunner;
use crate::web::models::*;
use crate::web::server::ServerConfig;
use crate::Error;

type ApiError = (StatusCode, Json<ErrorResponse>);
type ApiResult<T> = Result<Json<T>, ApiError>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<Mutex<HashMap<Uuid, Session>>>,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            config,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ServerConfig::default())
    }
}

/// Create the API router
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/samples", get(list_samples))
        .route("/api/algorithms", get(list_algorithms))
        .route("/api/sessions", get(list_sessions).post(create_session))
        .route("/api/sessions/:session_id", get(get_session).delete(delete_session))
        .route("/api/sessions/:session_id/forward", post(step_forward))
        .route("/api/sessions/:session_id/backward", post(step_backward))
        .route("/api/sessions/:session_id/reset", post(reset_session))
        .route("/api/sessions/:session_id/run", post(run_session))
        .route("/api/sessions/:session_id/goto/:index", post(go_to_step))
        .route("/api/compare", post(compare_algorithms))
}

fn error_response(status: StatusCode, error: &str, message: String) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            message,
            details: None,
        }),
    )
}

/// Maps library errors onto client errors
fn bad_request(err: Error) -> ApiError {
    let code = match err {
        Error::UnknownSource(_) => "unknown_source",
        Error::UnknownAlgorithm(_) => "unknown_algorithm",
        Error::UnknownSample(_) => "unknown_sample",
        Error::AlgorithmError(_) => "algorithm_error",
        _ => "invalid_graph",
    };
    let status = match err {
        Error::AlgorithmError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    };
    error_response(status, code, err.to_string())
}

fn session_not_found(session_id: Uuid) -> ApiError {
    error_response(
        StatusCode::NOT_FOUND,
        "session_not_found",
        format!("Session {} not found", session_id),
    )
}

/// Resolves the graph and source of a request: an inline graph wins over a
/// sample name, and the sample's own source fills in a missing one.
fn resolve_input(
    sample: Option<&str>,
    graph: Option<GraphSpec<f64>>,
    source: Option<String>,
) -> Result<(Arc<Graph<f64>>, String), Error> {
    if let Some(spec) = graph {
        let graph = Graph::try_from(spec)?;
        let source = match source {
            Some(source) => source,
            None => graph
                .nodes()
                .first()
                .map(|node| node.id.clone())
                .ok_or_else(|| Error::UnknownSource("<empty graph>".to_string()))?,
        };
        return Ok((Arc::new(graph), source));
    }

    let sample = samples::by_name(sample.unwrap_or("simple"))?;
    let source = source.unwrap_or_else(|| sample.source.to_string());
    Ok((Arc::new(sample.graph), source))
}

/// Oldest creation time a live session may have
fn expiry_cutoff(state: &AppState) -> DateTime<Utc> {
    Utc::now() - Duration::minutes(state.config.session_timeout_minutes as i64)
}

/// Runs `f` against one session, mapping a missing or expired id to 404
fn with_session<T>(
    state: &AppState,
    session_id: Uuid,
    f: impl FnOnce(&mut Session) -> Result<T, ApiError>,
) -> Result<T, ApiError> {
    let mut sessions = lock(&state.sessions);
    let expired = sessions
        .get(&session_id)
        .is_some_and(|session| session.created_at <= expiry_cutoff(state));
    if expired {
        sessions.remove(&session_id);
        info!("Session {} expired", session_id);
    }

    let session = sessions
        .get_mut(&session_id)
        .ok_or_else(|| session_not_found(session_id))?;
    f(session)
}

/// Drops sessions older than the configured timeout
fn expire_sessions(state: &AppState, sessions: &mut HashMap<Uuid, Session>) {
    let cutoff = expiry_cutoff(state);
    let before = sessions.len();
    sessions.retain(|_, session| session.created_at > cutoff);
    let expired = before - sessions.len();
    if expired > 0 {
        info!("Expired {} idle sessions", expired);
    }
}

/// Runs trace work on the blocking pool so long runs do not stall the executor
async fn run_blocking<T, F>(work: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|err| {
        warn!("Blocking task failed: {}", err);
        error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "task_failed",
            err.to_string(),
        )
    })?
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "sssp_trace",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now()
    }))
}

pub async fn list_samples() -> ApiResult<Vec<SampleInfo>> {
    let samples = samples::all().map_err(bad_request)?;
    Ok(Json(
        samples
            .into_iter()
            .map(|sample| SampleInfo {
                name: sample.name,
                title: sample.title,
                source: sample.source,
                graph: sample.graph.to_spec(),
            })
            .collect(),
    ))
}

pub async fn list_algorithms() -> Json<Vec<AlgorithmInfo>> {
    Json(
        AlgorithmKind::ALL
            .iter()
            .map(|&kind| AlgorithmInfo {
                id: kind,
                name: kind.name(),
                pseudocode: kind.pseudocode(),
            })
            .collect(),
    )
}

/// Start a traced run and return its first step
pub async fn create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionView>), ApiError> {
    let algorithm: AlgorithmKind = request.algorithm.parse().map_err(bad_request)?;
    let (graph, source) =
        resolve_input(request.sample.as_deref(), request.graph, request.source).map_err(bad_request)?;
    let runner = StepRunner::initialize(graph, &source, algorithm).map_err(bad_request)?;

    let mut sessions = lock(&state.sessions);
    expire_sessions(&state, &mut sessions);
    if sessions.len() >= state.config.max_sessions {
        warn!("Rejecting new session: {} sessions open", sessions.len());
        return Err(error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "too_many_sessions",
            format!("At most {} sessions may be open", state.config.max_sessions),
        ));
    }

    let session = Session::new(runner);
    let view = session.view();
    info!("Created session {} ({} from {})", session.id, algorithm, source);
    sessions.insert(session.id, session);

    Ok((StatusCode::CREATED, Json(view)))
}

/// List all sessions
pub async fn list_sessions(State(state): State<AppState>) -> Json<Vec<SessionView>> {
    let mut sessions = lock(&state.sessions);
    expire_sessions(&state, &mut sessions);
    let mut views: Vec<SessionView> = sessions.values().map(Session::view).collect();
    views.sort_by_key(|view| view.created_at);
    Json(views)
}

/// Get specific session
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<SessionView> {
    with_session(&state, session_id, |session| Ok(Json(session.view())))
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    match lock(&state.sessions).remove(&session_id) {
        Some(_) => {
            info!("Deleted session {}", session_id);
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(session_not_found(session_id)),
    }
}

pub async fn step_forward(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<SessionView> {
    with_session(&state, session_id, |session| {
        session.runner.step_forward();
        Ok(Json(session.view()))
    })
}

pub async fn step_backward(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<SessionView> {
    with_session(&state, session_id, |session| {
        session.runner.step_backward();
        Ok(Json(session.view()))
    })
}

pub async fn reset_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<SessionView> {
    with_session(&state, session_id, |session| {
        session.runner.reset().map_err(bad_request)?;
        Ok(Json(session.view()))
    })
}

pub async fn run_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<SessionView> {
    run_blocking(move || {
        with_session(&state, session_id, |session| {
            let start = Instant::now();
            session.runner.run_to_completion();
            info!(
                "Session {} ran to completion: {} steps in {:.2}ms",
                session_id,
                session.runner.steps().len(),
                start.elapsed().as_secs_f64() * 1000.0
            );
            Ok(Json(session.view()))
        })
    })
    .await
}

/// Jump to an already produced step
pub async fn go_to_step(
    State(state): State<AppState>,
    Path((session_id, index)): Path<(Uuid, usize)>,
) -> ApiResult<SessionView> {
    with_session(&state, session_id, |session| {
        if !session.runner.go_to(index) {
            return Err(error_response(
                StatusCode::BAD_REQUEST,
                "step_out_of_range",
                format!(
                    "Step {} has not been produced yet ({} cached)",
                    index,
                    session.runner.steps().len()
                ),
            ));
        }
        Ok(Json(session.view()))
    })
}

/// Run both algorithms on the same input and report how they differ
pub async fn compare_algorithms(Json(request): Json<CompareRequest>) -> ApiResult<CompareResponse> {
    run_blocking(move || compare(request)).await
}

fn compare(request: CompareRequest) -> ApiResult<CompareResponse> {
    let (graph, source) =
        resolve_input(request.sample.as_deref(), request.graph, request.source).map_err(bad_request)?;

    let timed = |kind: AlgorithmKind| {
        let start = Instant::now();
        let result = kind.compute_shortest_paths(Arc::clone(&graph), &source);
        (result, start.elapsed().as_secs_f64() * 1000.0)
    };
    let ((classic, classic_ms), (pivot, pivot_ms)) = rayon::join(
        || timed(AlgorithmKind::Classic),
        || timed(AlgorithmKind::PivotReduced),
    );
    let classic = classic.map_err(bad_request)?;
    let pivot = pivot.map_err(bad_request)?;

    let agree = classic.same_distances(&pivot);
    if !agree {
        warn!("Algorithms disagree on distances from {}", source);
    }

    Ok(Json(CompareResponse {
        classic: RunSummary::new(&graph, AlgorithmKind::Classic, &classic, classic_ms),
        pivot_reduced: RunSummary::new(&graph, AlgorithmKind::PivotReduced, &pivot, pivot_ms),
        agree,
    }))
}
