use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::deals::{authorize_deal, UserIdQuery};
use crate::errors::AppError;
use crate::models::deal::ActionItemRow;
use crate::state::AppState;
use crate::store::{ActionItemPatch, DealStore, NewActionItem};

#[derive(Deserialize)]
pub struct NewActionItemRequest {
    pub user_id: Uuid,
    pub description: String,
    pub transcript_id: Option<Uuid>,
}

#[derive(Deserialize)]
pub struct UpdateActionItemRequest {
    pub user_id: Uuid,
    pub description: Option<String>,
    pub is_completed: Option<bool>,
}

#[derive(Serialize)]
pub struct ActionItemListResponse {
    pub success: bool,
    pub items: Vec<ActionItemRow>,
}

#[derive(Serialize)]
pub struct ActionItemResponse {
    pub success: bool,
    pub item: ActionItemRow,
}

fn non_blank_description(raw: &str) -> Result<String, AppError> {
    let description = raw.trim();
    if description.is_empty() {
        return Err(AppError::Validation(
            "Description cannot be empty.".to_string(),
        ));
    }
    Ok(description.to_string())
}

/// Validates an update. At least one field must be set.
pub fn build_patch(req: &UpdateActionItemRequest) -> Result<ActionItemPatch, AppError> {
    if req.description.is_none() && req.is_completed.is_none() {
        return Err(AppError::Validation(
            "Nothing to update: provide a description or completion status.".to_string(),
        ));
    }
    Ok(ActionItemPatch {
        description: req
            .description
            .as_deref()
            .map(non_blank_description)
            .transpose()?,
        is_completed: req.is_completed,
    })
}

/// Adds a manually written action item, optionally tied to one of the deal's transcripts.
pub async fn add_manual_action_item(
    store: &dyn DealStore,
    deal_id: Uuid,
    req: NewActionItemRequest,
) -> Result<ActionItemRow, AppError> {
    let description = non_blank_description(&req.description)?;
    authorize_deal(store, deal_id, req.user_id).await?;

    if let Some(transcript_id) = req.transcript_id {
        let belongs = store
            .get_transcript(transcript_id)
            .await?
            .is_some_and(|t| t.deal_id == deal_id);
        if !belongs {
            return Err(AppError::NotFound(
                "Transcript not found for this deal.".to_string(),
            ));
        }
    }

    let mut created = store
        .create_action_items(vec![NewActionItem {
            deal_id,
            transcript_id: req.transcript_id,
            description,
            is_ai_suggested: false,
            user_id: req.user_id,
        }])
        .await?;
    created
        .pop()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("action item insert returned no row")))
}

/// GET /api/v1/deals/:deal_id/action-items
pub async fn handle_list_action_items(
    State(state): State<AppState>,
    Path(deal_id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ActionItemListResponse>, AppError> {
    authorize_deal(state.store.as_ref(), deal_id, params.user_id).await?;
    let items = state
        .store
        .list_action_items(deal_id, params.user_id)
        .await?;
    Ok(Json(ActionItemListResponse {
        success: true,
        items,
    }))
}

/// POST /api/v1/deals/:deal_id/action-items
pub async fn handle_add_action_item(
    State(state): State<AppState>,
    Path(deal_id): Path<Uuid>,
    Json(req): Json<NewActionItemRequest>,
) -> Result<(StatusCode, Json<ActionItemResponse>), AppError> {
    let item = add_manual_action_item(state.store.as_ref(), deal_id, req).await?;
    Ok((
        StatusCode::CREATED,
        Json(ActionItemResponse {
            success: true,
            item,
        }),
    ))
}

/// GET /api/v1/transcripts/:transcript_id/action-items
pub async fn handle_list_transcript_action_items(
    State(state): State<AppState>,
    Path(transcript_id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ActionItemListResponse>, AppError> {
    let items = state
        .store
        .list_action_items_for_transcript(transcript_id, params.user_id)
        .await?;
    Ok(Json(ActionItemListResponse {
        success: true,
        items,
    }))
}

/// PATCH /api/v1/action-items/:item_id
pub async fn handle_update_action_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Json(req): Json<UpdateActionItemRequest>,
) -> Result<Json<ActionItemResponse>, AppError> {
    let patch = build_patch(&req)?;
    let item = state
        .store
        .update_action_item(item_id, req.user_id, patch)
        .await?
        .ok_or_else(|| AppError::NotFound("Action item not found.".to_string()))?;
    Ok(Json(ActionItemResponse {
        success: true,
        item,
    }))
}

/// DELETE /api/v1/action-items/:item_id
pub async fn handle_delete_action_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    state
        .store
        .delete_action_item(item_id, params.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Action item not found.".to_string()))?;
    Ok(StatusCode::NO_CONTENT)
}
