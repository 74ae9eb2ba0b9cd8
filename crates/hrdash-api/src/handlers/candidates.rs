//! Candidate handlers

use crate::error::AppError;
use crate::handlers::feedback::FeedbackView;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use hrdash_core::{Candidate, CandidateId, ScoreResult, DEFAULT_STATUS};
use hrdash_pipeline::ResumeDownload;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;

/// Candidate with metadata, status, feedback and role score
#[derive(Debug, Serialize, ToSchema)]
pub struct CandidateView {
    #[schema(example = 0)]
    pub id: i64,
    pub submission_time: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub working_status: String,
    pub resume_url: String,
    pub local_filename: String,

    /// Classified role or "Unclassified"
    #[schema(example = "Senior Software Engineer")]
    pub role: String,
    pub skills: Vec<String>,
    pub locations: Vec<String>,
    pub languages: Vec<String>,
    pub resume_text: String,

    #[schema(example = "Received")]
    pub status: String,
    pub feedback: Option<FeedbackView>,

    /// Relevance to the job matching the role (0-100)
    #[schema(example = 62.5)]
    pub score: f64,
    pub matched_keywords: Vec<String>,
}

impl CandidateView {
    fn new(
        candidate: Candidate,
        status: String,
        feedback: Option<FeedbackView>,
        score: ScoreResult,
    ) -> Self {
        Self {
            id: candidate.id.0,
            submission_time: candidate.submission_time,
            first_name: candidate.first_name,
            last_name: candidate.last_name,
            email: candidate.email,
            phone: candidate.phone,
            working_status: candidate.working_status,
            resume_url: candidate.resume_url,
            local_filename: candidate.local_filename,
            role: candidate.role.to_string(),
            skills: candidate.skills,
            locations: candidate.locations,
            languages: candidate.languages,
            resume_text: candidate.resume_text,
            status,
            feedback,
            score: score.score,
            matched_keywords: score.matched_keywords,
        }
    }
}

/// List every candidate
#[utoipa::path(
    get,
    path = "/api/candidates",
    tag = "candidates",
    responses(
        (status = 200, description = "Candidate list", body = Vec<CandidateView>),
        (status = 500, description = "Candidate source failed", body = crate::error::ApiError)
    )
)]
pub async fn list_candidates(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CandidateView>>, AppError> {
    state.increment_requests();

    let candidates = state.pipeline.load_candidates().await?;
    let jobs = state.jobs.list().await;
    let scores = state.pipeline.score_by_role(&candidates, &jobs);
    let statuses = state.statuses.snapshot().await;
    let feedback = state.feedback.snapshot().await;

    let views = candidates
        .into_iter()
        .zip(scores)
        .map(|(candidate, score)| {
            let key = candidate.id.cache_key();
            let status = statuses
                .get(&key)
                .cloned()
                .unwrap_or_else(|| DEFAULT_STATUS.to_string());
            let feedback = feedback.get(&key).cloned().map(FeedbackView::from);
            CandidateView::new(candidate, status, feedback, score)
        })
        .collect();

    Ok(Json(views))
}

/// Resume text response
#[derive(Debug, Serialize, ToSchema)]
pub struct ResumeTextResponse {
    pub text: String,
}

/// Extract a candidate's resume text
#[utoipa::path(
    get,
    path = "/api/candidates/{id}/resume",
    tag = "candidates",
    params(
        ("id" = i64, Path, description = "Candidate id")
    ),
    responses(
        (status = 200, description = "Resume text", body = ResumeTextResponse),
        (status = 404, description = "Unknown candidate or no text", body = crate::error::ApiError)
    )
)]
pub async fn get_resume_text(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<ResumeTextResponse>, AppError> {
    state.increment_requests();

    match state.pipeline.resume_text(CandidateId(id)).await? {
        Some(text) => Ok(Json(ResumeTextResponse { text })),
        None => Err(AppError::NotFound("Resume text".to_string())),
    }
}

/// MIME type of a resume file, by extension
fn content_type(filename: &str) -> &'static str {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => "application/pdf",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "txt" | "md" => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

/// Download a candidate's original resume file
#[utoipa::path(
    get,
    path = "/api/candidates/{id}/download",
    tag = "candidates",
    params(
        ("id" = i64, Path, description = "Candidate id")
    ),
    responses(
        (status = 200, description = "Resume file as an attachment"),
        (status = 307, description = "Hosted copy could not be fetched; follow the Location header"),
        (status = 404, description = "Unknown candidate or no file", body = crate::error::ApiError)
    )
)]
pub async fn download_resume(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    state.increment_requests();

    match state.pipeline.resume_download(CandidateId(id)).await? {
        Some(ResumeDownload::File { filename, bytes }) => {
            let disposition = format!("attachment; filename=\"{}\"", filename.replace('"', ""));
            Ok((
                [
                    (header::CONTENT_TYPE, content_type(&filename).to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                bytes,
            )
                .into_response())
        }
        Some(ResumeDownload::Redirect(url)) => Ok(Redirect::temporary(&url).into_response()),
        None => Err(AppError::NotFound("Resume file".to_string())),
    }
}

/// Status update request
#[derive(Debug, Deserialize, ToSchema)]
pub struct StatusUpdate {
    #[schema(example = "Interview")]
    pub status: String,
}

/// Status update response
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusUpdateResponse {
    #[schema(example = "success")]
    pub status: String,
    pub new_status: String,
}

/// Set a candidate's pipeline status
#[utoipa::path(
    put,
    path = "/api/candidates/{id}/status",
    tag = "candidates",
    params(
        ("id" = i64, Path, description = "Candidate id")
    ),
    request_body = StatusUpdate,
    responses(
        (status = 200, description = "Status saved", body = StatusUpdateResponse),
        (status = 400, description = "Blank status", body = crate::error::ApiError)
    )
)]
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<StatusUpdate>,
) -> Result<impl IntoResponse, AppError> {
    state.increment_requests();

    let status = req.status.trim().to_string();
    if status.is_empty() {
        return Err(AppError::BadRequest("Status cannot be empty".to_string()));
    }

    state
        .statuses
        .insert_and_save(CandidateId(id).cache_key(), status.clone())
        .await?;
    info!(candidate_id = id, status = %status, "Candidate status updated");

    Ok((
        StatusCode::OK,
        Json(StatusUpdateResponse {
            status: "success".to_string(),
            new_status: status,
        }),
    ))
}

/// Ad-hoc analysis request
#[derive(Debug, Deserialize, ToSchema)]
pub struct AnalyzeRequest {
    /// Job description to score against
    #[schema(example = "Senior Rust engineer with AWS experience")]
    pub description: String,
}

/// Score of one candidate
#[derive(Debug, Serialize, ToSchema)]
pub struct AnalysisView {
    pub id: i64,
    #[schema(example = 62.5)]
    pub score: f64,
    pub matched_keywords: Vec<String>,
}

/// Score every candidate against a job description
#[utoipa::path(
    post,
    path = "/api/analyze",
    tag = "candidates",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "One score per candidate", body = Vec<AnalysisView>)
    )
)]
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<Vec<AnalysisView>>, AppError> {
    state.increment_requests();

    let results = state.pipeline.analyze(&req.description).await?;
    Ok(Json(
        results
            .into_iter()
            .map(|r| AnalysisView {
                id: r.id.0,
                score: r.score,
                matched_keywords: r.matched_keywords,
            })
            .collect(),
    ))
}
