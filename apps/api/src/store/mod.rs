//! Persistence accessors for deals and their related records.
//!
//! `AppState` holds an `Arc<dyn DealStore>` built once at startup from the
//! connection pool. Handlers and the AI pipeline receive it explicitly.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::deal::{
    ActionItemRow, ContactRow, ContactWithRoleRow, DealContactRow, DealRow, DealSummaryRow,
    TranscriptRow,
};

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgDealStore;

pub type StoreResult<T> = Result<T, sqlx::Error>;

#[derive(Debug, Clone)]
pub struct NewTranscript {
    pub deal_id: Uuid,
    pub file_name: String,
    pub content: String,
    pub call_date: NaiveDate,
    pub call_time: String,
}

#[derive(Debug, Clone)]
pub struct NewContact {
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub job_title: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewActionItem {
    pub deal_id: Uuid,
    pub transcript_id: Option<Uuid>,
    pub description: String,
    pub is_ai_suggested: bool,
    pub user_id: Uuid,
}

/// Fields left as `None` are not touched.
#[derive(Debug, Clone, Default)]
pub struct ActionItemPatch {
    pub description: Option<String>,
    pub is_completed: Option<bool>,
}

#[async_trait]
pub trait DealStore: Send + Sync {
    // ── deals ──────────────────────────────────────────────────────────────

    /// The deal, only if `user_id` owns it.
    async fn find_deal_for_user(&self, deal_id: Uuid, user_id: Uuid)
        -> StoreResult<Option<DealRow>>;

    async fn get_deal(&self, deal_id: Uuid) -> StoreResult<Option<DealRow>>;

    /// Newest first.
    async fn list_deals_for_user(&self, user_id: Uuid) -> StoreResult<Vec<DealSummaryRow>>;

    async fn create_deal(&self, user_id: Uuid, name: &str) -> StoreResult<DealRow>;

    async fn rename_deal(&self, deal_id: Uuid, name: &str) -> StoreResult<Option<DealRow>>;

    /// Removes the deal and everything attached to it. `false` when the deal
    /// does not exist or is not owned by `user_id`.
    async fn delete_deal(&self, deal_id: Uuid, user_id: Uuid) -> StoreResult<bool>;

    // ── transcripts ────────────────────────────────────────────────────────

    async fn create_transcript(&self, new: NewTranscript) -> StoreResult<TranscriptRow>;

    async fn get_transcript(&self, transcript_id: Uuid) -> StoreResult<Option<TranscriptRow>>;

    /// Newest first by creation time.
    async fn list_transcripts(&self, deal_id: Uuid) -> StoreResult<Vec<TranscriptRow>>;

    /// Transcripts of `deal_id` whose id is in `ids`, newest first.
    async fn list_transcripts_by_ids(
        &self,
        deal_id: Uuid,
        ids: &[Uuid],
    ) -> StoreResult<Vec<TranscriptRow>>;

    async fn delete_transcript(&self, transcript_id: Uuid) -> StoreResult<bool>;

    // ── contacts ───────────────────────────────────────────────────────────

    /// Ordered by last name, then first name. Callers authorize the deal first.
    async fn list_contacts_for_deal(&self, deal_id: Uuid) -> StoreResult<Vec<ContactWithRoleRow>>;

    async fn find_contact_by_email(
        &self,
        user_id: Uuid,
        email: &str,
    ) -> StoreResult<Option<ContactRow>>;

    async fn create_contact(&self, new: NewContact) -> StoreResult<ContactRow>;

    /// Creates the association or replaces its role.
    async fn link_contact(
        &self,
        deal_id: Uuid,
        contact_id: Uuid,
        role_in_deal: Option<&str>,
    ) -> StoreResult<DealContactRow>;

    async fn unlink_contact(&self, deal_id: Uuid, contact_id: Uuid) -> StoreResult<bool>;

    // ── action items ───────────────────────────────────────────────────────

    async fn list_action_items(&self, deal_id: Uuid, user_id: Uuid)
        -> StoreResult<Vec<ActionItemRow>>;

    async fn list_action_items_for_transcript(
        &self,
        transcript_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Vec<ActionItemRow>>;

    /// Inserts all items or none.
    async fn create_action_items(&self, items: Vec<NewActionItem>)
        -> StoreResult<Vec<ActionItemRow>>;

    /// `None` when the item does not exist or its deal is not owned by `user_id`.
    async fn update_action_item(
        &self,
        item_id: Uuid,
        user_id: Uuid,
        patch: ActionItemPatch,
    ) -> StoreResult<Option<ActionItemRow>>;

    async fn delete_action_item(
        &self,
        item_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<ActionItemRow>>;
}
