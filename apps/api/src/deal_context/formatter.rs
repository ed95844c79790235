//! Renders a `DealAIContext` into the plain-text block embedded in LLM prompts.
//!
//! Pure and deterministic: sections always render in the order
//! deal → contacts → transcripts → action items, and empty sections emit nothing.

use chrono::Local;
use thiserror::Error;
use tracing::debug;

use crate::deal_context::models::{ContextSection, DealAIContext, FormatOptions, TranscriptFormat};
use crate::models::deal::{ActionItemRow, ContactWithRoleRow, DealRow, TranscriptRow};

pub const CONTEXT_HEADER: &str = "--- DEAL CONTEXT ---\n\n";

/// Returned in place of a header with no sections under it.
pub const NO_SECTIONS_AVAILABLE: &str =
    "No relevant context sections were included or available for formatting.";

const NOT_AVAILABLE: &str = "N/A";
const DATE_FORMAT: &str = "%-m/%-d/%Y";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("Error: No deal context provided.")]
    MissingContext,

    #[error("Error: Deal details missing from context.")]
    MissingDeal,
}

/// Formats `context` for inclusion in a prompt.
pub fn format_deal_context(
    context: Option<&DealAIContext>,
    options: Option<&FormatOptions>,
) -> Result<String, FormatError> {
    let context = context.ok_or(FormatError::MissingContext)?;
    let defaults = FormatOptions::default();
    let options = options.unwrap_or(&defaults);

    if options.includes(ContextSection::Deal) && context.deal.is_none() {
        return Err(FormatError::MissingDeal);
    }

    let mut out = String::from(CONTEXT_HEADER);

    for section in ContextSection::ALL {
        if !options.includes(section) {
            continue;
        }
        match section {
            ContextSection::Deal => {
                if let Some(deal) = &context.deal {
                    write_deal(&mut out, deal);
                }
            }
            ContextSection::Contacts if !context.contacts.is_empty() => {
                write_contacts(&mut out, &context.contacts);
            }
            ContextSection::Transcripts if !context.transcripts.is_empty() => {
                write_transcripts(&mut out, &context.transcripts, options.transcript_format);
            }
            ContextSection::ActionItems if !context.action_items.is_empty() => {
                write_action_items(&mut out, &context.action_items);
            }
            _ => {}
        }
    }

    if out == CONTEXT_HEADER {
        return Ok(NO_SECTIONS_AVAILABLE.to_string());
    }

    Ok(out)
}

fn or_na(value: &str) -> &str {
    if value.is_empty() {
        NOT_AVAILABLE
    } else {
        value
    }
}

fn opt_or_na(value: Option<&str>) -> &str {
    or_na(value.unwrap_or_default())
}

fn write_deal(out: &mut String, deal: &DealRow) {
    // Calendar date in the server's local time zone.
    let created = deal.created_at.with_timezone(&Local).format(DATE_FORMAT);
    out.push_str("Deal Information:\n");
    out.push_str(&format!("  Name: {}\n", deal.name));
    out.push_str(&format!("  ID: {}\n", deal.id));
    out.push_str(&format!("  Created At: {created}\n"));
    out.push('\n');
}

fn write_contacts(out: &mut String, contacts: &[ContactWithRoleRow]) {
    out.push_str("Associated Contacts:\n");
    for contact in contacts {
        out.push_str(&format!(
            "  - Name: {} {}\n",
            contact.first_name, contact.last_name
        ));
        out.push_str(&format!("    Email: {}\n", or_na(&contact.email)));
        out.push_str(&format!(
            "    Job Title: {}\n",
            opt_or_na(contact.job_title.as_deref())
        ));
        out.push_str(&format!(
            "    Role in Deal: {}\n",
            opt_or_na(contact.role_in_deal.as_deref())
        ));
    }
    out.push('\n');
}

fn write_transcripts(out: &mut String, transcripts: &[TranscriptRow], format: TranscriptFormat) {
    if format == TranscriptFormat::Summary {
        debug!("Transcript summaries are not implemented; rendering full content");
    }

    out.push_str("Transcripts:\n");
    for transcript in transcripts {
        out.push_str(&format!("  - File Name: {}\n", or_na(&transcript.file_name)));
        out.push_str(&format!(
            "    Call Date: {}\n",
            transcript.call_date.format(DATE_FORMAT)
        ));
        out.push_str(&format!("    Call Time: {}\n", or_na(&transcript.call_time)));

        match format {
            TranscriptFormat::Full | TranscriptFormat::Summary => {
                out.push_str(&format!("    Content: {}\n", or_na(&transcript.content)));
            }
            TranscriptFormat::TitlesOnly => {}
        }
    }
    out.push('\n');
}

fn write_action_items(out: &mut String, items: &[ActionItemRow]) {
    out.push_str("Action Items:\n");
    for item in items {
        let status = if item.is_completed {
            "Completed"
        } else {
            "Pending"
        };
        out.push_str(&format!("  - Description: {}\n", item.description));
        out.push_str(&format!("    Status: {status}\n"));
    }
    out.push('\n');
}
