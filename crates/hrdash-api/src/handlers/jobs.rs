//! Job description handlers

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use hrdash_core::JobDescription;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

/// Job description
#[derive(Debug, Serialize, ToSchema)]
pub struct JobView {
    #[schema(example = 1)]
    pub id: u32,
    #[schema(example = "UX Designer Intern")]
    pub title: String,
    pub description: String,
    pub skills: Vec<String>,
    #[schema(example = "Riyadh (Hybrid)")]
    pub location: Option<String>,
}

impl From<JobDescription> for JobView {
    fn from(job: JobDescription) -> Self {
        Self {
            id: job.id,
            title: job.title,
            description: job.description,
            skills: job.skills,
            location: job.location,
        }
    }
}

/// List job descriptions
#[utoipa::path(
    get,
    path = "/api/jobs",
    tag = "jobs",
    responses(
        (status = 200, description = "Job list", body = Vec<JobView>)
    )
)]
pub async fn list_jobs(State(state): State<Arc<AppState>>) -> Json<Vec<JobView>> {
    state.increment_requests();
    Json(state.jobs.list().await.into_iter().map(JobView::from).collect())
}

/// Job update request
#[derive(Debug, Deserialize, ToSchema)]
pub struct JobUpdate {
    pub description: String,
    #[serde(default)]
    pub skills: Vec<String>,
}

/// Edit a job's description and skills
#[utoipa::path(
    put,
    path = "/api/jobs/{id}",
    tag = "jobs",
    params(
        ("id" = u32, Path, description = "Job id")
    ),
    request_body = JobUpdate,
    responses(
        (status = 200, description = "Updated job", body = JobView),
        (status = 404, description = "Job not found", body = crate::error::ApiError)
    )
)]
pub async fn update_job(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
    Json(req): Json<JobUpdate>,
) -> Result<Json<JobView>, AppError> {
    state.increment_requests();

    state
        .jobs
        .update(id, req.description, req.skills)
        .await?
        .map(|job| Json(JobView::from(job)))
        .ok_or_else(|| AppError::NotFound("Job".to_string()))
}
