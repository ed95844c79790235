pub mod health;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::deal_context::handlers as ai;
use crate::deals::{action_items, contacts, handlers as deals, transcripts};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .nest("/api/v1", api_routes())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_handler))
        // Deals
        .route(
            "/deals",
            get(deals::handle_list_deals).post(deals::handle_create_deal),
        )
        .route(
            "/deals/:deal_id",
            get(deals::handle_get_deal)
                .patch(deals::handle_rename_deal)
                .delete(deals::handle_delete_deal),
        )
        // Transcripts
        .route(
            "/deals/:deal_id/transcripts",
            post(transcripts::handle_upload_transcript),
        )
        .route(
            "/deals/:deal_id/transcripts/:transcript_id",
            delete(transcripts::handle_delete_transcript),
        )
        // Contacts
        .route(
            "/deals/:deal_id/contacts",
            get(contacts::handle_list_contacts).post(contacts::handle_add_contact),
        )
        .route(
            "/deals/:deal_id/contacts/:contact_id",
            delete(contacts::handle_remove_contact),
        )
        // Action items
        .route(
            "/deals/:deal_id/action-items",
            get(action_items::handle_list_action_items).post(action_items::handle_add_action_item),
        )
        .route(
            "/action-items/:item_id",
            patch(action_items::handle_update_action_item)
                .delete(action_items::handle_delete_action_item),
        )
        .route(
            "/transcripts/:transcript_id/action-items",
            get(action_items::handle_list_transcript_action_items),
        )
        // AI tasks
        .route(
            "/deals/:deal_id/transcripts/:transcript_id/suggest-action-items",
            post(ai::handle_suggest_action_items),
        )
        .route(
            "/transcripts/:transcript_id/follow-up-email",
            post(ai::handle_follow_up_email),
        )
        .route("/deals/:deal_id/questions", post(ai::handle_deal_question))
}
