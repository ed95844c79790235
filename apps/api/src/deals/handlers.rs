use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::deal_context::models::DealAIContext;
use crate::deal_context::tasks::load_deal_snapshot;
use crate::deals::{authorize_deal, normalize_deal_name, UserIdQuery};
use crate::errors::AppError;
use crate::models::deal::{DealRow, DealSummaryRow};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct DealNameRequest {
    pub user_id: Uuid,
    pub name: String,
}

#[derive(Serialize)]
pub struct DealListResponse {
    pub success: bool,
    pub deals: Vec<DealSummaryRow>,
}

#[derive(Serialize)]
pub struct DealResponse {
    pub success: bool,
    pub deal: DealRow,
}

#[derive(Serialize)]
pub struct DealDetailResponse {
    pub success: bool,
    #[serde(flatten)]
    pub context: DealAIContext,
}

/// GET /api/v1/deals
pub async fn handle_list_deals(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<DealListResponse>, AppError> {
    let deals = state.store.list_deals_for_user(params.user_id).await?;
    Ok(Json(DealListResponse {
        success: true,
        deals,
    }))
}

/// POST /api/v1/deals
pub async fn handle_create_deal(
    State(state): State<AppState>,
    Json(req): Json<DealNameRequest>,
) -> Result<(StatusCode, Json<DealResponse>), AppError> {
    let name = normalize_deal_name(&req.name)?;
    let deal = state.store.create_deal(req.user_id, &name).await?;
    info!("Created deal {} for user {}", deal.id, req.user_id);
    Ok((
        StatusCode::CREATED,
        Json(DealResponse {
            success: true,
            deal,
        }),
    ))
}

/// GET /api/v1/deals/:deal_id
pub async fn handle_get_deal(
    State(state): State<AppState>,
    Path(deal_id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<DealDetailResponse>, AppError> {
    let context = load_deal_snapshot(state.store.as_ref(), params.user_id, deal_id).await?;
    Ok(Json(DealDetailResponse {
        success: true,
        context,
    }))
}

/// PATCH /api/v1/deals/:deal_id
pub async fn handle_rename_deal(
    State(state): State<AppState>,
    Path(deal_id): Path<Uuid>,
    Json(req): Json<DealNameRequest>,
) -> Result<Json<DealResponse>, AppError> {
    let name = normalize_deal_name(&req.name)?;
    authorize_deal(state.store.as_ref(), deal_id, req.user_id).await?;

    let deal = state
        .store
        .rename_deal(deal_id, &name)
        .await?
        .ok_or(AppError::AccessDenied)?;
    Ok(Json(DealResponse {
        success: true,
        deal,
    }))
}

/// DELETE /api/v1/deals/:deal_id
pub async fn handle_delete_deal(
    State(state): State<AppState>,
    Path(deal_id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    if !state.store.delete_deal(deal_id, params.user_id).await? {
        return Err(AppError::AccessDenied);
    }
    Ok(StatusCode::NO_CONTENT)
}
