//! In-memory `DealStore` for unit tests. Records every accessor call by name.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use crate::models::deal::{
    ActionItemRow, ContactRow, ContactWithRoleRow, DealContactRow, DealRow, DealSummaryRow,
    TranscriptRow,
};
use crate::store::{
    ActionItemPatch, DealStore, NewActionItem, NewContact, NewTranscript, StoreResult,
};

#[derive(Default)]
struct Tables {
    deals: Vec<DealRow>,
    transcripts: Vec<TranscriptRow>,
    contacts: Vec<ContactRow>,
    deal_contacts: Vec<DealContactRow>,
    action_items: Vec<ActionItemRow>,
    ticks: i64,
}

impl Tables {
    /// Strictly increasing timestamps so ordering by creation time is stable.
    fn now(&mut self) -> DateTime<Utc> {
        self.ticks += 1;
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap() + Duration::seconds(self.ticks)
    }

    fn owns(&self, deal_id: Uuid, user_id: Uuid) -> bool {
        self.deals
            .iter()
            .any(|d| d.id == deal_id && d.user_id == user_id)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    calls: Mutex<Vec<&'static str>>,
    /// When set, `get_deal` misses even for existing deals.
    hide_deals_from_get: Mutex<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn hide_deals_from_get(&self) {
        *self.hide_deals_from_get.lock().unwrap() = true;
    }

    fn record(&self, name: &'static str) {
        self.calls.lock().unwrap().push(name);
    }
}

#[async_trait]
impl DealStore for MemoryStore {
    async fn find_deal_for_user(
        &self,
        deal_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<DealRow>> {
        self.record("find_deal_for_user");
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .deals
            .iter()
            .find(|d| d.id == deal_id && d.user_id == user_id)
            .cloned())
    }

    async fn get_deal(&self, deal_id: Uuid) -> StoreResult<Option<DealRow>> {
        self.record("get_deal");
        if *self.hide_deals_from_get.lock().unwrap() {
            return Ok(None);
        }
        let tables = self.tables.lock().unwrap();
        Ok(tables.deals.iter().find(|d| d.id == deal_id).cloned())
    }

    async fn list_deals_for_user(&self, user_id: Uuid) -> StoreResult<Vec<DealSummaryRow>> {
        self.record("list_deals_for_user");
        let tables = self.tables.lock().unwrap();
        let mut deals: Vec<DealSummaryRow> = tables
            .deals
            .iter()
            .filter(|d| d.user_id == user_id)
            .map(|d| DealSummaryRow {
                id: d.id,
                name: d.name.clone(),
                user_id: d.user_id,
                created_at: d.created_at,
                updated_at: d.updated_at,
                transcript_count: tables
                    .transcripts
                    .iter()
                    .filter(|t| t.deal_id == d.id)
                    .count() as i64,
            })
            .collect();
        deals.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(deals)
    }

    async fn create_deal(&self, user_id: Uuid, name: &str) -> StoreResult<DealRow> {
        self.record("create_deal");
        let mut tables = self.tables.lock().unwrap();
        let now = tables.now();
        let deal = DealRow {
            id: Uuid::new_v4(),
            name: name.to_string(),
            user_id,
            created_at: now,
            updated_at: now,
        };
        tables.deals.push(deal.clone());
        Ok(deal)
    }

    async fn rename_deal(&self, deal_id: Uuid, name: &str) -> StoreResult<Option<DealRow>> {
        self.record("rename_deal");
        let mut tables = self.tables.lock().unwrap();
        let now = tables.now();
        Ok(tables.deals.iter_mut().find(|d| d.id == deal_id).map(|d| {
            d.name = name.to_string();
            d.updated_at = now;
            d.clone()
        }))
    }

    async fn delete_deal(&self, deal_id: Uuid, user_id: Uuid) -> StoreResult<bool> {
        self.record("delete_deal");
        let mut tables = self.tables.lock().unwrap();
        if !tables.owns(deal_id, user_id) {
            return Ok(false);
        }
        tables.action_items.retain(|a| a.deal_id != deal_id);
        tables.deal_contacts.retain(|dc| dc.deal_id != deal_id);
        tables.transcripts.retain(|t| t.deal_id != deal_id);
        tables.deals.retain(|d| d.id != deal_id);
        Ok(true)
    }

    async fn create_transcript(&self, new: NewTranscript) -> StoreResult<TranscriptRow> {
        self.record("create_transcript");
        let mut tables = self.tables.lock().unwrap();
        let now = tables.now();
        let transcript = TranscriptRow {
            id: Uuid::new_v4(),
            deal_id: new.deal_id,
            file_name: new.file_name,
            content: new.content,
            call_date: new.call_date,
            call_time: new.call_time,
            created_at: now,
            updated_at: now,
        };
        tables.transcripts.push(transcript.clone());
        Ok(transcript)
    }

    async fn get_transcript(&self, transcript_id: Uuid) -> StoreResult<Option<TranscriptRow>> {
        self.record("get_transcript");
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .transcripts
            .iter()
            .find(|t| t.id == transcript_id)
            .cloned())
    }

    async fn list_transcripts(&self, deal_id: Uuid) -> StoreResult<Vec<TranscriptRow>> {
        self.record("list_transcripts");
        let tables = self.tables.lock().unwrap();
        let mut transcripts: Vec<TranscriptRow> = tables
            .transcripts
            .iter()
            .filter(|t| t.deal_id == deal_id)
            .cloned()
            .collect();
        transcripts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(transcripts)
    }

    async fn list_transcripts_by_ids(
        &self,
        deal_id: Uuid,
        ids: &[Uuid],
    ) -> StoreResult<Vec<TranscriptRow>> {
        self.record("list_transcripts_by_ids");
        let tables = self.tables.lock().unwrap();
        let mut transcripts: Vec<TranscriptRow> = tables
            .transcripts
            .iter()
            .filter(|t| t.deal_id == deal_id && ids.contains(&t.id))
            .cloned()
            .collect();
        transcripts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(transcripts)
    }

    async fn delete_transcript(&self, transcript_id: Uuid) -> StoreResult<bool> {
        self.record("delete_transcript");
        let mut tables = self.tables.lock().unwrap();
        let before = tables.transcripts.len();
        tables.transcripts.retain(|t| t.id != transcript_id);
        for item in tables
            .action_items
            .iter_mut()
            .filter(|a| a.transcript_id == Some(transcript_id))
        {
            item.transcript_id = None;
        }
        Ok(tables.transcripts.len() < before)
    }

    async fn list_contacts_for_deal(&self, deal_id: Uuid) -> StoreResult<Vec<ContactWithRoleRow>> {
        self.record("list_contacts_for_deal");
        let tables = self.tables.lock().unwrap();
        let mut contacts: Vec<ContactWithRoleRow> = tables
            .deal_contacts
            .iter()
            .filter(|dc| dc.deal_id == deal_id)
            .filter_map(|dc| {
                tables
                    .contacts
                    .iter()
                    .find(|c| c.id == dc.contact_id)
                    .map(|c| ContactWithRoleRow {
                        id: c.id,
                        first_name: c.first_name.clone(),
                        last_name: c.last_name.clone(),
                        email: c.email.clone(),
                        job_title: c.job_title.clone(),
                        user_id: c.user_id,
                        role_in_deal: dc.role_in_deal.clone(),
                    })
            })
            .collect();
        contacts.sort_by(|a, b| {
            (a.last_name.as_str(), a.first_name.as_str())
                .cmp(&(b.last_name.as_str(), b.first_name.as_str()))
        });
        Ok(contacts)
    }

    async fn find_contact_by_email(
        &self,
        user_id: Uuid,
        email: &str,
    ) -> StoreResult<Option<ContactRow>> {
        self.record("find_contact_by_email");
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .contacts
            .iter()
            .find(|c| c.user_id == user_id && c.email == email)
            .cloned())
    }

    async fn create_contact(&self, new: NewContact) -> StoreResult<ContactRow> {
        self.record("create_contact");
        let mut tables = self.tables.lock().unwrap();
        let now = tables.now();
        let contact = ContactRow {
            id: Uuid::new_v4(),
            first_name: new.first_name,
            last_name: new.last_name,
            email: new.email,
            job_title: new.job_title,
            user_id: new.user_id,
            created_at: now,
            updated_at: now,
        };
        tables.contacts.push(contact.clone());
        Ok(contact)
    }

    async fn link_contact(
        &self,
        deal_id: Uuid,
        contact_id: Uuid,
        role_in_deal: Option<&str>,
    ) -> StoreResult<DealContactRow> {
        self.record("link_contact");
        let mut tables = self.tables.lock().unwrap();
        let role_in_deal = role_in_deal.map(str::to_string);
        if let Some(existing) = tables
            .deal_contacts
            .iter_mut()
            .find(|dc| dc.deal_id == deal_id && dc.contact_id == contact_id)
        {
            existing.role_in_deal = role_in_deal;
            return Ok(existing.clone());
        }
        let link = DealContactRow {
            deal_id,
            contact_id,
            role_in_deal,
        };
        tables.deal_contacts.push(link.clone());
        Ok(link)
    }

    async fn unlink_contact(&self, deal_id: Uuid, contact_id: Uuid) -> StoreResult<bool> {
        self.record("unlink_contact");
        let mut tables = self.tables.lock().unwrap();
        let before = tables.deal_contacts.len();
        tables
            .deal_contacts
            .retain(|dc| !(dc.deal_id == deal_id && dc.contact_id == contact_id));
        Ok(tables.deal_contacts.len() < before)
    }

    async fn list_action_items(
        &self,
        deal_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Vec<ActionItemRow>> {
        self.record("list_action_items");
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .action_items
            .iter()
            .filter(|a| a.deal_id == deal_id && a.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_action_items_for_transcript(
        &self,
        transcript_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Vec<ActionItemRow>> {
        self.record("list_action_items_for_transcript");
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .action_items
            .iter()
            .filter(|a| a.transcript_id == Some(transcript_id) && tables.owns(a.deal_id, user_id))
            .cloned()
            .collect())
    }

    async fn create_action_items(
        &self,
        items: Vec<NewActionItem>,
    ) -> StoreResult<Vec<ActionItemRow>> {
        self.record("create_action_items");
        let mut tables = self.tables.lock().unwrap();
        let mut created = Vec::with_capacity(items.len());
        for item in items {
            let now = tables.now();
            let row = ActionItemRow {
                id: Uuid::new_v4(),
                deal_id: item.deal_id,
                transcript_id: item.transcript_id,
                description: item.description,
                is_completed: false,
                is_ai_suggested: item.is_ai_suggested,
                user_id: item.user_id,
                created_at: now,
                updated_at: now,
            };
            tables.action_items.push(row.clone());
            created.push(row);
        }
        Ok(created)
    }

    async fn update_action_item(
        &self,
        item_id: Uuid,
        user_id: Uuid,
        patch: ActionItemPatch,
    ) -> StoreResult<Option<ActionItemRow>> {
        self.record("update_action_item");
        let mut tables = self.tables.lock().unwrap();
        let now = tables.now();
        let Some(deal_id) = tables
            .action_items
            .iter()
            .find(|a| a.id == item_id)
            .map(|a| a.deal_id)
        else {
            return Ok(None);
        };
        if !tables.owns(deal_id, user_id) {
            return Ok(None);
        }
        Ok(tables
            .action_items
            .iter_mut()
            .find(|a| a.id == item_id)
            .map(|item| {
                if let Some(description) = patch.description {
                    item.description = description;
                }
                if let Some(done) = patch.is_completed {
                    item.is_completed = done;
                }
                item.updated_at = now;
                item.clone()
            }))
    }

    async fn delete_action_item(
        &self,
        item_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<ActionItemRow>> {
        self.record("delete_action_item");
        let mut tables = self.tables.lock().unwrap();
        let Some(index) = tables.action_items.iter().position(|a| a.id == item_id) else {
            return Ok(None);
        };
        if !tables.owns(tables.action_items[index].deal_id, user_id) {
            return Ok(None);
        }
        Ok(Some(tables.action_items.remove(index)))
    }
}
