//! Interview feedback handlers

use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use hrdash_core::{CandidateId, Feedback};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;

/// Stored feedback for a candidate
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FeedbackView {
    #[schema(example = 4)]
    pub rating: i32,
    pub notes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Feedback> for FeedbackView {
    fn from(feedback: Feedback) -> Self {
        Self {
            rating: feedback.rating,
            notes: feedback.notes,
            updated_at: feedback.updated_at,
        }
    }
}

/// Feedback submission
#[derive(Debug, Deserialize, ToSchema)]
pub struct FeedbackRequest {
    pub candidate_id: i64,
    #[schema(example = 4)]
    pub rating: i32,
    pub notes: String,
}

/// Acknowledgement
#[derive(Debug, Serialize, ToSchema)]
pub struct FeedbackResponse {
    #[schema(example = "success")]
    pub status: String,
}

/// Record interview feedback, replacing any earlier entry
#[utoipa::path(
    post,
    path = "/api/feedback",
    tag = "feedback",
    request_body = FeedbackRequest,
    responses(
        (status = 200, description = "Feedback saved", body = FeedbackResponse)
    )
)]
pub async fn submit_feedback(
    State(state): State<Arc<AppState>>,
    Json(req): Json<FeedbackRequest>,
) -> Result<Json<FeedbackResponse>, AppError> {
    state.increment_requests();

    let feedback = Feedback {
        rating: req.rating,
        notes: req.notes,
        updated_at: Some(Utc::now()),
    };
    state
        .feedback
        .insert_and_save(CandidateId(req.candidate_id).cache_key(), feedback)
        .await?;
    info!(candidate_id = req.candidate_id, rating = req.rating, "Feedback recorded");

    Ok(Json(FeedbackResponse {
        status: "success".to_string(),
    }))
}
