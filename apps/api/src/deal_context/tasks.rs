//! AI task runners: assemble context, format it, prompt once, shape the result.
//!
//! Runners never retry the LLM call; transport retry lives in `llm_client`.

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::deal_context::assembler::{assemble_deal_context, ContextError};
use crate::deal_context::formatter::format_deal_context;
use crate::deal_context::models::{
    ContextParams, ContextSection, DealAIContext, FormatOptions, TranscriptFormat,
};
use crate::deal_context::prompts::{
    action_items_prompt, deal_question_prompt, follow_up_email_prompt,
};
use crate::deal_context::suggestions::parse_suggested_items;
use crate::errors::AppError;
use crate::llm_client::prompts::{fenced_context, SALES_ASSISTANT_SYSTEM};
use crate::llm_client::TextGenerator;
use crate::models::deal::ActionItemRow;
use crate::store::{DealStore, NewActionItem};

#[derive(Debug, Clone, Serialize)]
pub struct SuggestedActionItems {
    pub items: Vec<ActionItemRow>,
    pub count: usize,
    /// Set when the scan was skipped rather than producing zero suggestions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl SuggestedActionItems {
    fn empty(note: Option<&str>) -> Self {
        Self {
            items: Vec::new(),
            count: 0,
            note: note.map(String::from),
        }
    }
}

/// Scans one transcript of a deal for action items and persists them as AI suggestions.
pub async fn suggest_action_items(
    store: &dyn DealStore,
    llm: &dyn TextGenerator,
    user_id: Uuid,
    deal_id: Uuid,
    transcript_id: Uuid,
) -> Result<SuggestedActionItems, AppError> {
    let params = ContextParams {
        transcript_ids: Some(vec![transcript_id]),
        include_contacts: false,
        include_action_items: false,
        ..ContextParams::default()
    };
    let context = assemble_deal_context(store, deal_id, user_id, &params).await?;

    let Some(transcript) = context.transcripts.first() else {
        return Err(AppError::NotFound(format!(
            "Transcript {transcript_id} not found for this deal"
        )));
    };
    if transcript.content.trim().is_empty() {
        return Ok(SuggestedActionItems::empty(Some(
            "Transcript content is empty or missing.",
        )));
    }

    let options = FormatOptions {
        include_sections: Some(vec![ContextSection::Transcripts]),
        transcript_format: TranscriptFormat::Full,
    };
    let formatted = format_deal_context(Some(&context), Some(&options))?;

    let prompt = action_items_prompt(context.deal_name(), &fenced_context(&formatted));

    let raw = llm.generate(&prompt, SALES_ASSISTANT_SYSTEM).await?;
    let descriptions = parse_suggested_items(&raw);

    if descriptions.is_empty() {
        info!("No action items suggested for transcript {transcript_id}");
        return Ok(SuggestedActionItems::empty(None));
    }

    let new_items = descriptions
        .into_iter()
        .map(|description| NewActionItem {
            deal_id,
            transcript_id: Some(transcript_id),
            description,
            is_ai_suggested: true,
            user_id,
        })
        .collect();
    let items = store.create_action_items(new_items).await?;

    info!(
        "Persisted {} suggested action items for transcript {transcript_id}",
        items.len()
    );

    Ok(SuggestedActionItems {
        count: items.len(),
        items,
        note: None,
    })
}

/// Drafts the body of a follow-up email for the call captured in `transcript_id`.
pub async fn draft_follow_up_email(
    store: &dyn DealStore,
    llm: &dyn TextGenerator,
    user_id: Uuid,
    transcript_id: Uuid,
) -> Result<String, AppError> {
    // A missing transcript and a foreign one look the same to the caller.
    let transcript = store
        .get_transcript(transcript_id)
        .await?
        .ok_or(AppError::AccessDenied)?;

    let params = ContextParams {
        transcript_ids: Some(vec![transcript_id]),
        ..ContextParams::default()
    };
    let context = assemble_deal_context(store, transcript.deal_id, user_id, &params).await?;

    if transcript.content.trim().is_empty() {
        return Err(AppError::Validation(
            "Transcript content is empty.".to_string(),
        ));
    }

    let options = FormatOptions {
        include_sections: Some(ContextSection::ALL.to_vec()),
        transcript_format: TranscriptFormat::Full,
    };
    let formatted = format_deal_context(Some(&context), Some(&options))?;

    let prompt = follow_up_email_prompt(&transcript_id.to_string(), &fenced_context(&formatted));

    let email = llm.generate(&prompt, SALES_ASSISTANT_SYSTEM).await?;
    non_blank(email, "LLM failed to generate email content.")
}

/// Answers `question` using only the deal's assembled context.
pub async fn answer_deal_question(
    store: &dyn DealStore,
    llm: &dyn TextGenerator,
    user_id: Uuid,
    deal_id: Uuid,
    question: &str,
) -> Result<String, AppError> {
    let question = question.trim();
    if question.is_empty() {
        return Err(AppError::Validation("Question cannot be empty.".to_string()));
    }

    let context = assemble_deal_context(store, deal_id, user_id, &ContextParams::default()).await?;
    let formatted = format_deal_context(Some(&context), None)?;

    let prompt = deal_question_prompt(&fenced_context(&formatted), question);

    let answer = llm.generate(&prompt, SALES_ASSISTANT_SYSTEM).await?;
    non_blank(answer, "The AI failed to generate an answer. Please try again.")
}

/// Deal detail for the UI: the same snapshot the AI tasks see.
pub async fn load_deal_snapshot(
    store: &dyn DealStore,
    user_id: Uuid,
    deal_id: Uuid,
) -> Result<DealAIContext, ContextError> {
    assemble_deal_context(store, deal_id, user_id, &ContextParams::default()).await
}

fn non_blank(text: String, message: &str) -> Result<String, AppError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AppError::Llm(message.to_string()));
    }
    Ok(trimmed.to_string())
}
