use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::deal::{ActionItemRow, ContactWithRoleRow, DealRow, TranscriptRow};

/// Read-only snapshot of a deal and its related records, built per request
/// and dropped once formatted.
#[derive(Debug, Clone, Serialize)]
pub struct DealAIContext {
    /// Always present when built by `assemble_deal_context`.
    pub deal: Option<DealRow>,
    pub transcripts: Vec<TranscriptRow>,
    pub contacts: Vec<ContactWithRoleRow>,
    pub action_items: Vec<ActionItemRow>,
}

impl DealAIContext {
    pub fn deal_name(&self) -> &str {
        self.deal.as_ref().map(|d| d.name.as_str()).unwrap_or_default()
    }
}

/// Controls which related records the assembler fetches.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ContextParams {
    pub include_transcripts: bool,
    pub include_contacts: bool,
    pub include_action_items: bool,
    /// When non-empty, only these transcripts (that also belong to the deal) are fetched.
    pub transcript_ids: Option<Vec<Uuid>>,
    /// Keeps the first N transcripts after ordering. `0` means no limit.
    pub limit_transcripts: Option<usize>,
}

impl Default for ContextParams {
    fn default() -> Self {
        Self {
            include_transcripts: true,
            include_contacts: true,
            include_action_items: true,
            transcript_ids: None,
            limit_transcripts: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextSection {
    Deal,
    Contacts,
    Transcripts,
    ActionItems,
}

impl ContextSection {
    /// Render order, independent of the order a caller lists sections in.
    pub const ALL: [ContextSection; 4] = [
        ContextSection::Deal,
        ContextSection::Contacts,
        ContextSection::Transcripts,
        ContextSection::ActionItems,
    ];
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptFormat {
    #[default]
    Full,
    /// Not summarized yet: renders the same as `Full`.
    Summary,
    TitlesOnly,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    /// `None` means every section.
    pub include_sections: Option<Vec<ContextSection>>,
    pub transcript_format: TranscriptFormat,
}

impl FormatOptions {
    pub fn includes(&self, section: ContextSection) -> bool {
        self.include_sections
            .as_ref()
            .map_or(true, |sections| sections.contains(&section))
    }
}
