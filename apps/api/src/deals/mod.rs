//! CRUD surface for deals and the records hanging off them.
//!
//! Every deal-scoped handler authorizes through [`authorize_deal`] before
//! touching related rows.

pub mod action_items;
pub mod contacts;
pub mod handlers;
pub mod transcripts;

use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::deal::DealRow;
use crate::store::DealStore;

pub const MAX_DEAL_NAME_LEN: usize = 255;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

/// The deal when `user_id` owns it; `AccessDenied` otherwise, including when it does not exist.
pub async fn authorize_deal(
    store: &dyn DealStore,
    deal_id: Uuid,
    user_id: Uuid,
) -> Result<DealRow, AppError> {
    store
        .find_deal_for_user(deal_id, user_id)
        .await?
        .ok_or(AppError::AccessDenied)
}

/// Trims and bounds a deal name.
pub fn normalize_deal_name(raw: &str) -> Result<String, AppError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Deal name cannot be empty.".to_string()));
    }
    if name.chars().count() > MAX_DEAL_NAME_LEN {
        return Err(AppError::Validation(format!(
            "Deal name cannot exceed {MAX_DEAL_NAME_LEN} characters."
        )));
    }
    Ok(name.to_string())
}
