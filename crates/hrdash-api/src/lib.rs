//! hrdash API - HTTP server for the recruiting dashboard
//!
//! Serves candidates with their classified roles, tags and relevance
//! scores, and lets recruiters edit job descriptions, statuses and
//! interview feedback.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::get,
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;

use crate::handlers::{candidates, feedback, health, jobs};
use crate::state::AppState;

/// OpenAPI document
#[derive(OpenApi)]
#[openapi(
    info(title = "hrdash API", description = "Recruiting dashboard backend"),
    paths(
        health::health_check,
        health::metrics,
        candidates::list_candidates,
        candidates::get_resume_text,
        candidates::download_resume,
        candidates::update_status,
        candidates::analyze,
        jobs::list_jobs,
        jobs::update_job,
        feedback::submit_feedback,
    ),
    components(schemas(
        error::ApiError,
        health::HealthResponse,
        health::BuildInfo,
        health::MetricsResponse,
        health::CacheMetrics,
        candidates::CandidateView,
        candidates::ResumeTextResponse,
        candidates::StatusUpdate,
        candidates::StatusUpdateResponse,
        candidates::AnalyzeRequest,
        candidates::AnalysisView,
        jobs::JobView,
        jobs::JobUpdate,
        feedback::FeedbackView,
        feedback::FeedbackRequest,
        feedback::FeedbackResponse,
    )),
    tags(
        (name = "health", description = "Liveness and counters"),
        (name = "candidates", description = "Candidates, resumes and scoring"),
        (name = "jobs", description = "Job descriptions"),
        (name = "feedback", description = "Interview feedback"),
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true)
}

/// Build the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.server.cors_origins);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/metrics", get(health::metrics))
        .route("/api-docs/openapi.json", get(openapi_json))
        .nest("/api", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
