use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::deal_context::tasks::{
    answer_deal_question, draft_follow_up_email, suggest_action_items, SuggestedActionItems,
};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdBody {
    pub user_id: Uuid,
}

#[derive(Deserialize)]
pub struct QuestionRequest {
    pub user_id: Uuid,
    pub question: String,
}

#[derive(Serialize)]
pub struct SuggestionsResponse {
    pub success: bool,
    #[serde(flatten)]
    pub result: SuggestedActionItems,
}

#[derive(Serialize)]
pub struct EmailDraftResponse {
    pub success: bool,
    pub email_content: String,
}

#[derive(Serialize)]
pub struct AnswerResponse {
    pub success: bool,
    pub answer: String,
}

/// POST /api/v1/deals/:deal_id/transcripts/:transcript_id/suggest-action-items
pub async fn handle_suggest_action_items(
    State(state): State<AppState>,
    Path((deal_id, transcript_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UserIdBody>,
) -> Result<Json<SuggestionsResponse>, AppError> {
    let result = suggest_action_items(
        state.store.as_ref(),
        state.llm.as_ref(),
        req.user_id,
        deal_id,
        transcript_id,
    )
    .await?;
    Ok(Json(SuggestionsResponse {
        success: true,
        result,
    }))
}

/// POST /api/v1/transcripts/:transcript_id/follow-up-email
pub async fn handle_follow_up_email(
    State(state): State<AppState>,
    Path(transcript_id): Path<Uuid>,
    Json(req): Json<UserIdBody>,
) -> Result<Json<EmailDraftResponse>, AppError> {
    let email_content = draft_follow_up_email(
        state.store.as_ref(),
        state.llm.as_ref(),
        req.user_id,
        transcript_id,
    )
    .await?;
    Ok(Json(EmailDraftResponse {
        success: true,
        email_content,
    }))
}

/// POST /api/v1/deals/:deal_id/questions
pub async fn handle_deal_question(
    State(state): State<AppState>,
    Path(deal_id): Path<Uuid>,
    Json(req): Json<QuestionRequest>,
) -> Result<Json<AnswerResponse>, AppError> {
    let answer = answer_deal_question(
        state.store.as_ref(),
        state.llm.as_ref(),
        req.user_id,
        deal_id,
        &req.question,
    )
    .await?;
    Ok(Json(AnswerResponse {
        success: true,
        answer,
    }))
}
