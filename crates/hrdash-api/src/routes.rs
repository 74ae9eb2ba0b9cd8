//! API route definitions

use crate::handlers::{candidates, feedback, jobs};
use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

/// Routes served under `/api`
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Candidate endpoints
        .route("/candidates", get(candidates::list_candidates))
        .route("/candidates/:id/resume", get(candidates::get_resume_text))
        .route("/candidates/:id/download", get(candidates::download_resume))
        .route("/candidates/:id/status", put(candidates::update_status))
        .route("/analyze", post(candidates::analyze))
        // Job endpoints
        .route("/jobs", get(jobs::list_jobs))
        .route("/jobs/:id", put(jobs::update_job))
        // Feedback endpoints
        .route("/feedback", post(feedback::submit_feedback))
}
