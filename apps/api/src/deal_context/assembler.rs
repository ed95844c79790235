//! Deal context assembly: authorize once, then gather the deal's related records.
//!
//! Flow: find_deal_for_user (fail fast) → get_deal → transcripts / contacts /
//!       action items fetched concurrently → DealAIContext.
//!
//! Authorization happens exactly once, here. The section fetches trust it.

use thiserror::Error;
use tracing::{debug, error};
use uuid::Uuid;

use crate::deal_context::models::{ContextParams, DealAIContext};
use crate::models::deal::TranscriptRow;
use crate::store::{DealStore, StoreResult};

#[derive(Debug, Error)]
pub enum ContextError {
    /// The deal does not exist or is owned by another user.
    #[error("deal not found or access denied")]
    AccessDenied,

    /// Authorization found the deal but the full record could not be read back.
    #[error("deal {deal_id} disappeared between authorization and fetch")]
    Inconsistent { deal_id: Uuid },

    #[error("failed to fetch deal context: {0}")]
    Store(#[from] sqlx::Error),
}

/// Builds the AI context for `deal_id` on behalf of `user_id`.
pub async fn assemble_deal_context(
    store: &dyn DealStore,
    deal_id: Uuid,
    user_id: Uuid,
    params: &ContextParams,
) -> Result<DealAIContext, ContextError> {
    if store.find_deal_for_user(deal_id, user_id).await?.is_none() {
        debug!("Context request for deal {deal_id} by user {user_id} denied");
        return Err(ContextError::AccessDenied);
    }

    let deal = store.get_deal(deal_id).await?.ok_or_else(|| {
        error!("Deal {deal_id} not found after passing authorization for user {user_id}");
        ContextError::Inconsistent { deal_id }
    })?;

    let (transcripts, contacts, action_items) = tokio::try_join!(
        fetch_transcripts(store, deal_id, params),
        async {
            if params.include_contacts {
                store.list_contacts_for_deal(deal_id).await
            } else {
                Ok(Vec::new())
            }
        },
        async {
            if params.include_action_items {
                store.list_action_items(deal_id, user_id).await
            } else {
                Ok(Vec::new())
            }
        },
    )
    .map_err(|e| {
        error!("Failed to fetch deal context for deal {deal_id}: {e}");
        e
    })?;

    debug!(
        "Assembled context for deal {deal_id}: {} transcripts, {} contacts, {} action items",
        transcripts.len(),
        contacts.len(),
        action_items.len()
    );

    Ok(DealAIContext {
        deal: Some(deal),
        transcripts,
        contacts,
        action_items,
    })
}

async fn fetch_transcripts(
    store: &dyn DealStore,
    deal_id: Uuid,
    params: &ContextParams,
) -> StoreResult<Vec<TranscriptRow>> {
    if !params.include_transcripts {
        return Ok(Vec::new());
    }

    let mut transcripts = match params.transcript_ids.as_deref() {
        Some(ids) if !ids.is_empty() => store.list_transcripts_by_ids(deal_id, ids).await?,
        _ => store.list_transcripts(deal_id).await?,
    };

    if let Some(limit) = params.limit_transcripts.filter(|&n| n > 0) {
        transcripts.truncate(limit);
    }

    Ok(transcripts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use crate::store::{NewActionItem, NewContact, NewTranscript};
    use chrono::NaiveDate;

    fn transcript(deal_id: Uuid, file_name: &str) -> NewTranscript {
        NewTranscript {
            deal_id,
            file_name: file_name.to_string(),
            content: format!("Content of {file_name}"),
            call_date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            call_time: "14:30".to_string(),
        }
    }

    async fn seeded_deal(store: &MemoryStore, owner: Uuid, transcripts: usize) -> Uuid {
        let deal = store.create_deal(owner, "Acme Renewal").await.unwrap();
        for i in 0..transcripts {
            store
                .create_transcript(transcript(deal.id, &format!("call-{i}.txt")))
                .await
                .unwrap();
        }
        store.clear_calls();
        deal.id
    }

    #[tokio::test]
    async fn test_non_owner_is_denied_without_further_fetches() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let deal_id = seeded_deal(&store, owner, 2).await;

        let result =
            assemble_deal_context(&store, deal_id, Uuid::new_v4(), &ContextParams::default()).await;

        assert!(matches!(result, Err(ContextError::AccessDenied)));
        assert_eq!(store.calls(), vec!["find_deal_for_user"]);
    }

    #[tokio::test]
    async fn test_missing_deal_is_denied() {
        let store = MemoryStore::new();
        let result = assemble_deal_context(
            &store,
            Uuid::new_v4(),
            Uuid::new_v4(),
            &ContextParams::default(),
        )
        .await;
        assert!(matches!(result, Err(ContextError::AccessDenied)));
    }

    #[tokio::test]
    async fn test_refetch_miss_is_inconsistency() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let deal_id = seeded_deal(&store, owner, 0).await;
        store.hide_deals_from_get();

        let result =
            assemble_deal_context(&store, deal_id, owner, &ContextParams::default()).await;

        assert!(matches!(result, Err(ContextError::Inconsistent { deal_id: id }) if id == deal_id));
    }

    #[tokio::test]
    async fn test_transcripts_newest_first_and_limited() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let deal_id = seeded_deal(&store, owner, 4).await;

        let params = ContextParams {
            limit_transcripts: Some(2),
            ..ContextParams::default()
        };
        let context = assemble_deal_context(&store, deal_id, owner, &params)
            .await
            .unwrap();

        let names: Vec<_> = context.transcripts.iter().map(|t| t.file_name.as_str()).collect();
        assert_eq!(names, vec!["call-3.txt", "call-2.txt"]);
    }

    #[tokio::test]
    async fn test_zero_limit_means_unlimited() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let deal_id = seeded_deal(&store, owner, 3).await;

        let params = ContextParams {
            limit_transcripts: Some(0),
            ..ContextParams::default()
        };
        let context = assemble_deal_context(&store, deal_id, owner, &params)
            .await
            .unwrap();
        assert_eq!(context.transcripts.len(), 3);
    }

    #[tokio::test]
    async fn test_transcript_ids_intersect_with_deal() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let deal = store.create_deal(owner, "Acme").await.unwrap();
        let other = store.create_deal(owner, "Globex").await.unwrap();
        let wanted = store
            .create_transcript(transcript(deal.id, "wanted.txt"))
            .await
            .unwrap();
        store
            .create_transcript(transcript(deal.id, "unwanted.txt"))
            .await
            .unwrap();
        let foreign = store
            .create_transcript(transcript(other.id, "foreign.txt"))
            .await
            .unwrap();

        let params = ContextParams {
            transcript_ids: Some(vec![wanted.id, foreign.id]),
            ..ContextParams::default()
        };
        let context = assemble_deal_context(&store, deal.id, owner, &params)
            .await
            .unwrap();

        assert_eq!(context.transcripts.len(), 1);
        assert_eq!(context.transcripts[0].id, wanted.id);
    }

    #[tokio::test]
    async fn test_empty_transcript_ids_fetches_all() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let deal_id = seeded_deal(&store, owner, 2).await;

        let params = ContextParams {
            transcript_ids: Some(vec![]),
            ..ContextParams::default()
        };
        let context = assemble_deal_context(&store, deal_id, owner, &params)
            .await
            .unwrap();

        assert_eq!(context.transcripts.len(), 2);
        assert!(store.calls().contains(&"list_transcripts"));
    }

    #[tokio::test]
    async fn test_excluded_sections_are_not_fetched() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let deal_id = seeded_deal(&store, owner, 1).await;

        let params = ContextParams {
            include_contacts: false,
            include_action_items: false,
            ..ContextParams::default()
        };
        let context = assemble_deal_context(&store, deal_id, owner, &params)
            .await
            .unwrap();

        assert_eq!(context.transcripts.len(), 1);
        assert!(context.contacts.is_empty());
        assert!(context.action_items.is_empty());
        let calls = store.calls();
        assert!(!calls.contains(&"list_contacts_for_deal"));
        assert!(!calls.contains(&"list_action_items"));
    }

    #[tokio::test]
    async fn test_full_context_collects_every_section() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let deal_id = seeded_deal(&store, owner, 1).await;
        let contact = store
            .create_contact(NewContact {
                user_id: owner,
                first_name: "Ada".into(),
                last_name: "Lovelace".into(),
                email: "ada@example.com".into(),
                job_title: None,
            })
            .await
            .unwrap();
        store
            .link_contact(deal_id, contact.id, Some("Champion"))
            .await
            .unwrap();
        store
            .create_action_items(vec![NewActionItem {
                deal_id,
                transcript_id: None,
                description: "Send pricing".into(),
                is_ai_suggested: false,
                user_id: owner,
            }])
            .await
            .unwrap();

        let context = assemble_deal_context(&store, deal_id, owner, &ContextParams::default())
            .await
            .unwrap();

        assert_eq!(context.deal_name(), "Acme Renewal");
        assert_eq!(context.contacts.len(), 1);
        assert_eq!(context.contacts[0].role_in_deal.as_deref(), Some("Champion"));
        assert_eq!(context.action_items.len(), 1);
    }
}
