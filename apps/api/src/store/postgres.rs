use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::deal::{
    ActionItemRow, ContactRow, ContactWithRoleRow, DealContactRow, DealRow, DealSummaryRow,
    TranscriptRow,
};
use crate::store::{
    ActionItemPatch, DealStore, NewActionItem, NewContact, NewTranscript, StoreResult,
};

/// `DealStore` backed by PostgreSQL.
#[derive(Clone)]
pub struct PgDealStore {
    pool: PgPool,
}

impl PgDealStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DealStore for PgDealStore {
    async fn find_deal_for_user(
        &self,
        deal_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<DealRow>> {
        sqlx::query_as::<_, DealRow>("SELECT * FROM deals WHERE id = $1 AND user_id = $2 LIMIT 1")
            .bind(deal_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_deal(&self, deal_id: Uuid) -> StoreResult<Option<DealRow>> {
        sqlx::query_as::<_, DealRow>("SELECT * FROM deals WHERE id = $1")
            .bind(deal_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn list_deals_for_user(&self, user_id: Uuid) -> StoreResult<Vec<DealSummaryRow>> {
        sqlx::query_as::<_, DealSummaryRow>(
            r#"
            SELECT d.id, d.name, d.user_id, d.created_at, d.updated_at,
                   COUNT(t.id) AS transcript_count
            FROM deals d
            LEFT JOIN transcripts t ON t.deal_id = d.id
            WHERE d.user_id = $1
            GROUP BY d.id
            ORDER BY d.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn create_deal(&self, user_id: Uuid, name: &str) -> StoreResult<DealRow> {
        sqlx::query_as::<_, DealRow>(
            "INSERT INTO deals (name, user_id) VALUES ($1, $2) RETURNING *",
        )
        .bind(name)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn rename_deal(&self, deal_id: Uuid, name: &str) -> StoreResult<Option<DealRow>> {
        sqlx::query_as::<_, DealRow>(
            "UPDATE deals SET name = $1, updated_at = now() WHERE id = $2 RETURNING *",
        )
        .bind(name)
        .bind(deal_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_deal(&self, deal_id: Uuid, user_id: Uuid) -> StoreResult<bool> {
        let mut tx = self.pool.begin().await?;

        let owned: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM deals WHERE id = $1 AND user_id = $2 FOR UPDATE")
                .bind(deal_id)
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?;

        if owned.is_none() {
            tx.rollback().await?;
            warn!("Refused to delete deal {deal_id} for user {user_id}: not found or not owned");
            return Ok(false);
        }

        for statement in [
            "DELETE FROM action_items WHERE deal_id = $1",
            "DELETE FROM deal_contacts WHERE deal_id = $1",
            "DELETE FROM transcripts WHERE deal_id = $1",
            "DELETE FROM deals WHERE id = $1",
        ] {
            sqlx::query(statement).bind(deal_id).execute(&mut *tx).await?;
        }

        tx.commit().await?;
        info!("Deleted deal {deal_id} and its dependents");
        Ok(true)
    }

    async fn create_transcript(&self, new: NewTranscript) -> StoreResult<TranscriptRow> {
        sqlx::query_as::<_, TranscriptRow>(
            r#"
            INSERT INTO transcripts (deal_id, file_name, content, call_date, call_time)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(new.deal_id)
        .bind(&new.file_name)
        .bind(&new.content)
        .bind(new.call_date)
        .bind(&new.call_time)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_transcript(&self, transcript_id: Uuid) -> StoreResult<Option<TranscriptRow>> {
        sqlx::query_as::<_, TranscriptRow>("SELECT * FROM transcripts WHERE id = $1")
            .bind(transcript_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn list_transcripts(&self, deal_id: Uuid) -> StoreResult<Vec<TranscriptRow>> {
        sqlx::query_as::<_, TranscriptRow>(
            "SELECT * FROM transcripts WHERE deal_id = $1 ORDER BY created_at DESC",
        )
        .bind(deal_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn list_transcripts_by_ids(
        &self,
        deal_id: Uuid,
        ids: &[Uuid],
    ) -> StoreResult<Vec<TranscriptRow>> {
        sqlx::query_as::<_, TranscriptRow>(
            r#"
            SELECT * FROM transcripts
            WHERE deal_id = $1 AND id = ANY($2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(deal_id)
        .bind(ids)
        .fetch_all(&self.pool)
        .await
    }

    async fn delete_transcript(&self, transcript_id: Uuid) -> StoreResult<bool> {
        // action_items.transcript_id is ON DELETE SET NULL
        let result = sqlx::query("DELETE FROM transcripts WHERE id = $1")
            .bind(transcript_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_contacts_for_deal(&self, deal_id: Uuid) -> StoreResult<Vec<ContactWithRoleRow>> {
        sqlx::query_as::<_, ContactWithRoleRow>(
            r#"
            SELECT c.id, c.first_name, c.last_name, c.email, c.job_title, c.user_id,
                   dc.role_in_deal
            FROM contacts c
            INNER JOIN deal_contacts dc ON dc.contact_id = c.id
            WHERE dc.deal_id = $1
            ORDER BY c.last_name, c.first_name
            "#,
        )
        .bind(deal_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn find_contact_by_email(
        &self,
        user_id: Uuid,
        email: &str,
    ) -> StoreResult<Option<ContactRow>> {
        sqlx::query_as::<_, ContactRow>(
            "SELECT * FROM contacts WHERE user_id = $1 AND email = $2 LIMIT 1",
        )
        .bind(user_id)
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    async fn create_contact(&self, new: NewContact) -> StoreResult<ContactRow> {
        sqlx::query_as::<_, ContactRow>(
            r#"
            INSERT INTO contacts (first_name, last_name, email, job_title, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.email)
        .bind(&new.job_title)
        .bind(new.user_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn link_contact(
        &self,
        deal_id: Uuid,
        contact_id: Uuid,
        role_in_deal: Option<&str>,
    ) -> StoreResult<DealContactRow> {
        sqlx::query_as::<_, DealContactRow>(
            r#"
            INSERT INTO deal_contacts (deal_id, contact_id, role_in_deal)
            VALUES ($1, $2, $3)
            ON CONFLICT (deal_id, contact_id)
            DO UPDATE SET role_in_deal = EXCLUDED.role_in_deal
            RETURNING *
            "#,
        )
        .bind(deal_id)
        .bind(contact_id)
        .bind(role_in_deal)
        .fetch_one(&self.pool)
        .await
    }

    async fn unlink_contact(&self, deal_id: Uuid, contact_id: Uuid) -> StoreResult<bool> {
        let result =
            sqlx::query("DELETE FROM deal_contacts WHERE deal_id = $1 AND contact_id = $2")
                .bind(deal_id)
                .bind(contact_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_action_items(
        &self,
        deal_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Vec<ActionItemRow>> {
        sqlx::query_as::<_, ActionItemRow>(
            "SELECT * FROM action_items WHERE deal_id = $1 AND user_id = $2 ORDER BY created_at",
        )
        .bind(deal_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn list_action_items_for_transcript(
        &self,
        transcript_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Vec<ActionItemRow>> {
        sqlx::query_as::<_, ActionItemRow>(
            r#"
            SELECT a.* FROM action_items a
            INNER JOIN deals d ON d.id = a.deal_id
            WHERE a.transcript_id = $1 AND d.user_id = $2
            ORDER BY a.created_at
            "#,
        )
        .bind(transcript_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn create_action_items(
        &self,
        items: Vec<NewActionItem>,
    ) -> StoreResult<Vec<ActionItemRow>> {
        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(items.len());

        for item in &items {
            let row = sqlx::query_as::<_, ActionItemRow>(
                r#"
                INSERT INTO action_items
                    (deal_id, transcript_id, description, is_ai_suggested, user_id)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *
                "#,
            )
            .bind(item.deal_id)
            .bind(item.transcript_id)
            .bind(&item.description)
            .bind(item.is_ai_suggested)
            .bind(item.user_id)
            .fetch_one(&mut *tx)
            .await?;
            created.push(row);
        }

        tx.commit().await?;
        Ok(created)
    }

    async fn update_action_item(
        &self,
        item_id: Uuid,
        user_id: Uuid,
        patch: ActionItemPatch,
    ) -> StoreResult<Option<ActionItemRow>> {
        sqlx::query_as::<_, ActionItemRow>(
            r#"
            UPDATE action_items a
            SET description = COALESCE($3, a.description),
                is_completed = COALESCE($4, a.is_completed),
                updated_at = now()
            FROM deals d
            WHERE a.id = $1 AND a.deal_id = d.id AND d.user_id = $2
            RETURNING a.*
            "#,
        )
        .bind(item_id)
        .bind(user_id)
        .bind(patch.description)
        .bind(patch.is_completed)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_action_item(
        &self,
        item_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<ActionItemRow>> {
        sqlx::query_as::<_, ActionItemRow>(
            r#"
            DELETE FROM action_items a
            USING deals d
            WHERE a.id = $1 AND a.deal_id = d.id AND d.user_id = $2
            RETURNING a.*
            "#,
        )
        .bind(item_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }
}
