//! # HTTP API Module
//!
//! The axum REST surface over the member directory.
//!
//! Endpoints mirror the CLI: evaluation is public (rate limited), anything
//! that mutates the directory or exports it requires the API key when one
//! is configured. Key comparison is constant-time.

use crate::cli::{self, CliError};
use axum::extract::{Path as UrlPath, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::Engine;
use gradia_core::completion::SweepOutcome;
use gradia_core::formats::encode_snapshot;
use gradia_core::palette::{badge_color, progress_bar_color};
use gradia_core::{evaluate, Date, Directory, FieldSignal, MemberId, ProfileRecord, TierResult};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Requests per second allowed on the public evaluate endpoint.
const EVALUATE_RPS: u32 = 20;
const EVALUATE_BURST: u32 = 40;

// =============================================================================
// APP STATE
// =============================================================================

/// Shared server state.
///
/// The directory lives behind an async `RwLock`; the core itself stays
/// lock-free and single-threaded.
#[derive(Clone)]
pub struct AppState {
    directory: Arc<RwLock<Directory>>,
    db_path: PathBuf,
    api_key: Option<String>,
    limiter: Arc<DefaultDirectRateLimiter>,
}

impl AppState {
    /// Create server state over a loaded directory.
    #[must_use]
    pub fn new(directory: Directory, db_path: PathBuf, api_key: Option<String>) -> Self {
        let rps = NonZeroU32::new(EVALUATE_RPS).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(EVALUATE_BURST).unwrap_or(NonZeroU32::MIN);
        Self {
            directory: Arc::new(RwLock::new(directory)),
            db_path,
            api_key,
            limiter: Arc::new(RateLimiter::direct(
                Quota::per_second(rps).allow_burst(burst),
            )),
        }
    }

    fn authorized(&self, headers: &HeaderMap) -> bool {
        let Some(expected) = &self.api_key else {
            return true;
        };
        let Some(provided) = bearer_token(headers) else {
            return false;
        };
        provided.as_bytes().ct_eq(expected.as_bytes()).into()
    }

    async fn persist(&self) -> Result<(), CliError> {
        let directory = self.directory.read().await;
        cli::save_directory(&directory, &self.db_path)
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

// =============================================================================
// RESPONSE TYPES
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Directory status response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub member_count: usize,
    pub competition_count: usize,
    pub members_at_level: [usize; 4],
}

/// Tier evaluation response: the result plus its presentation tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateResponse {
    pub result: TierResult,
    pub badge_color: String,
    pub progress_bar_color: String,
}

impl EvaluateResponse {
    fn from_result(result: TierResult) -> Self {
        Self {
            badge_color: badge_color(result.level).to_string(),
            progress_bar_color: progress_bar_color(result.level).to_string(),
            result,
        }
    }
}

/// Sweep request body. An absent or null `today` means the current UTC
/// date; send `{}` for a plain scheduled run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SweepRequest {
    #[serde(default)]
    pub today: Option<String>,
}

/// Sweep response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepResponse {
    pub success: bool,
    pub date: String,
    pub outcome: SweepOutcome,
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({"success": false, "error": message}))).into_response()
}

fn unauthorized() -> Response {
    error_response(StatusCode::UNAUTHORIZED, "missing or invalid API key")
}

// =============================================================================
// HANDLERS
// =============================================================================

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let directory = state.directory.read().await;
    let census = directory.tier_census();
    Json(StatusResponse {
        member_count: directory.member_count(),
        competition_count: directory.competition_count(),
        members_at_level: census.members_at_level,
    })
}

/// Evaluate a posted profile record without touching the directory.
async fn evaluate_profile(
    State(state): State<AppState>,
    Json(record): Json<ProfileRecord>,
) -> Response {
    if state.limiter.check().is_err() {
        return error_response(StatusCode::TOO_MANY_REQUESTS, "rate limit exceeded");
    }
    Json(EvaluateResponse::from_result(evaluate(&record))).into_response()
}

/// Evaluate a stored member.
async fn member_tier(State(state): State<AppState>, UrlPath(id): UrlPath<u64>) -> Response {
    let directory = state.directory.read().await;
    match directory.evaluate_member(MemberId(id)) {
        Some(result) => Json(EvaluateResponse::from_result(result)).into_response(),
        None => error_response(StatusCode::NOT_FOUND, "unknown member"),
    }
}

/// Apply one field signal to the directory.
async fn ingest_signal(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(signal): Json<FieldSignal>,
) -> Response {
    if !state.authorized(&headers) {
        return unauthorized();
    }

    {
        let mut directory = state.directory.write().await;
        directory.apply(&signal);
    }
    if let Err(err) = state.persist().await {
        tracing::error!(%err, "failed to persist directory");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "persist failed");
    }

    let directory = state.directory.read().await;
    Json(json!({
        "success": true,
        "member_count": directory.member_count(),
    }))
    .into_response()
}

/// Run the competition completion sweep.
async fn run_sweep(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<SweepRequest>,
) -> Response {
    if !state.authorized(&headers) {
        return unauthorized();
    }

    let today = match request.today.as_deref() {
        Some(raw) => match Date::parse(raw) {
            Ok(date) => date,
            Err(err) => return error_response(StatusCode::BAD_REQUEST, &err.to_string()),
        },
        None => {
            let now = chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string();
            match Date::parse(&now) {
                Ok(date) => date,
                Err(err) => {
                    return error_response(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
                }
            }
        }
    };

    let outcome = {
        let mut directory = state.directory.write().await;
        directory.sweep(&today)
    };
    if let Err(err) = state.persist().await {
        tracing::error!(%err, "failed to persist directory");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "persist failed");
    }

    tracing::info!(
        completed = outcome.completed.len(),
        unchanged = outcome.unchanged,
        "completion sweep finished"
    );
    Json(SweepResponse {
        success: true,
        date: today.as_str().to_string(),
        outcome,
    })
    .into_response()
}

/// Export the directory as a base64-encoded binary snapshot.
async fn export_snapshot(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if !state.authorized(&headers) {
        return unauthorized();
    }

    let directory = state.directory.read().await;
    match encode_snapshot(&directory) {
        Ok(bytes) => Json(json!({
            "success": true,
            "data_base64": base64::engine::general_purpose::STANDARD.encode(bytes),
        }))
        .into_response(),
        Err(err) => {
            tracing::error!(%err, "snapshot encoding failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "snapshot encoding failed")
        }
    }
}

// =============================================================================
// ROUTER & SERVER
// =============================================================================

/// Build the API router over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/status", get(status))
        .route("/evaluate", post(evaluate_profile))
        .route("/member/{id}/tier", get(member_tier))
        .route("/signal", post(ingest_signal))
        .route("/sweep", post(run_sweep))
        .route("/export", post(export_snapshot))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutting down");
}

/// Load the directory and serve the API until ctrl-c.
pub async fn serve(
    db_path: &Path,
    backend: &str,
    addr: &str,
    api_key: Option<String>,
) -> Result<(), CliError> {
    let directory = cli::load_or_create_directory(db_path, backend)?;
    let state = AppState::new(directory, db_path.to_path_buf(), api_key);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr, "gradia api listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
