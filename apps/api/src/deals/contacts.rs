use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::deals::{authorize_deal, UserIdQuery};
use crate::errors::AppError;
use crate::models::deal::{ContactRow, ContactWithRoleRow, DealContactRow};
use crate::state::AppState;
use crate::store::{DealStore, NewContact};

#[derive(Debug, Deserialize, Validate)]
pub struct AddContactRequest {
    pub user_id: Uuid,
    #[validate(length(min = 1, max = 100, message = "First name must be 1 to 100 characters."))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name must be 1 to 100 characters."))]
    pub last_name: String,
    #[validate(
        email(message = "A valid email is required."),
        length(max = 255, message = "Email cannot exceed 255 characters.")
    )]
    pub email: String,
    #[validate(length(max = 150, message = "Job title cannot exceed 150 characters."))]
    pub job_title: Option<String>,
    #[validate(length(max = 100, message = "Role in deal cannot exceed 100 characters."))]
    pub role_in_deal: Option<String>,
}

impl AddContactRequest {
    /// Trims every text field; blank optional fields become `None`.
    fn normalized(self) -> Self {
        let blank_to_none = |v: Option<String>| {
            v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        };
        Self {
            user_id: self.user_id,
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_ascii_lowercase(),
            job_title: blank_to_none(self.job_title),
            role_in_deal: blank_to_none(self.role_in_deal),
        }
    }
}

#[derive(Serialize)]
pub struct ContactListResponse {
    pub success: bool,
    pub contacts: Vec<ContactWithRoleRow>,
}

#[derive(Serialize)]
pub struct AddContactResponse {
    pub success: bool,
    pub contact: ContactRow,
    pub association: DealContactRow,
}

/// Reuses the user's contact with the same email, or creates one, then links it to the deal.
pub async fn add_contact_to_deal(
    store: &dyn DealStore,
    deal_id: Uuid,
    req: AddContactRequest,
) -> Result<(ContactRow, DealContactRow), AppError> {
    let req = req.normalized();
    req.validate()?;
    authorize_deal(store, deal_id, req.user_id).await?;

    let contact = match store.find_contact_by_email(req.user_id, &req.email).await? {
        Some(existing) => existing,
        None => {
            store
                .create_contact(NewContact {
                    user_id: req.user_id,
                    first_name: req.first_name,
                    last_name: req.last_name,
                    email: req.email,
                    job_title: req.job_title,
                })
                .await?
        }
    };

    let association = store
        .link_contact(deal_id, contact.id, req.role_in_deal.as_deref())
        .await?;
    info!("Linked contact {} to deal {deal_id}", contact.id);
    Ok((contact, association))
}

/// GET /api/v1/deals/:deal_id/contacts
pub async fn handle_list_contacts(
    State(state): State<AppState>,
    Path(deal_id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ContactListResponse>, AppError> {
    authorize_deal(state.store.as_ref(), deal_id, params.user_id).await?;
    let contacts = state.store.list_contacts_for_deal(deal_id).await?;
    Ok(Json(ContactListResponse {
        success: true,
        contacts,
    }))
}

/// POST /api/v1/deals/:deal_id/contacts
pub async fn handle_add_contact(
    State(state): State<AppState>,
    Path(deal_id): Path<Uuid>,
    Json(req): Json<AddContactRequest>,
) -> Result<(StatusCode, Json<AddContactResponse>), AppError> {
    let (contact, association) = add_contact_to_deal(state.store.as_ref(), deal_id, req).await?;
    Ok((
        StatusCode::CREATED,
        Json(AddContactResponse {
            success: true,
            contact,
            association,
        }),
    ))
}

/// DELETE /api/v1/deals/:deal_id/contacts/:contact_id
pub async fn handle_remove_contact(
    State(state): State<AppState>,
    Path((deal_id, contact_id)): Path<(Uuid, Uuid)>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    authorize_deal(state.store.as_ref(), deal_id, params.user_id).await?;
    if !state.store.unlink_contact(deal_id, contact_id).await? {
        return Err(AppError::NotFound(
            "Contact is not associated with this deal.".to_string(),
        ));
    }
    Ok(StatusCode::NO_CONTENT)
}
