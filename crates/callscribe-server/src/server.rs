//! Axum router and handlers.

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::warn;

use callscribe_core::{CallJob, CallSource};
use callscribe_pipeline::{AdmissionController, Submission};

use crate::health::{self, HealthResponse};

/// Shared state accessible from Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// The admission controller owning the pipeline.
    pub controller: Arc<AdmissionController>,
    /// When the server started.
    pub start_time: Instant,
}

impl AppState {
    /// State around an existing controller.
    pub fn new(controller: Arc<AdmissionController>) -> Self {
        Self {
            controller,
            start_time: Instant::now(),
        }
    }
}

/// Body of every `POST /transcriptions` answer.
#[derive(Debug, Serialize)]
struct SubmitResponse {
    status: &'static str,
}

/// Build the Axum router with all routes.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/transcriptions", post(submit_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(health::health_check(
        state.start_time,
        state.controller.is_busy(),
    ))
}

/// POST /transcriptions
///
/// Descriptor validation lives here, before admission: an upload job without
/// a file name can never be acquired, so it is rejected at the door instead
/// of burning the worker slot.
async fn submit_handler(
    State(state): State<AppState>,
    Json(job): Json<CallJob>,
) -> (StatusCode, Json<SubmitResponse>) {
    if job.source == CallSource::Upload && job.upload_file_name.is_none() {
        warn!(cdr_id = job.id, "upload descriptor without a file name rejected");
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(SubmitResponse { status: "invalid" }),
        );
    }
    match state.controller.submit(job) {
        Submission::Accepted => (
            StatusCode::ACCEPTED,
            Json(SubmitResponse { status: "accepted" }),
        ),
        Submission::Busy => (
            StatusCode::TOO_MANY_REQUESTS,
            Json(SubmitResponse { status: "busy" }),
        ),
    }
}
