use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct DealRow {
    pub id: Uuid,
    pub name: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Deal list entry with the number of uploaded transcripts.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DealSummaryRow {
    pub id: Uuid,
    pub name: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub transcript_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct TranscriptRow {
    pub id: Uuid,
    pub deal_id: Uuid,
    pub file_name: String,
    pub content: String,
    pub call_date: NaiveDate,
    /// `HH:MM`
    pub call_time: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct ContactRow {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub job_title: Option<String>,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A contact joined with its deal association. `role_in_deal` belongs to the
/// association, not the contact.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct ContactWithRoleRow {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub job_title: Option<String>,
    pub user_id: Uuid,
    pub role_in_deal: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct DealContactRow {
    pub deal_id: Uuid,
    pub contact_id: Uuid,
    pub role_in_deal: Option<String>,
}

/// Owned by the deal. `transcript_id` is cleared when the originating
/// transcript is deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct ActionItemRow {
    pub id: Uuid,
    pub deal_id: Uuid,
    pub transcript_id: Option<Uuid>,
    pub description: String,
    pub is_completed: bool,
    pub is_ai_suggested: bool,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
