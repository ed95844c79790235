// Shared prompt constants and prompt-building utilities.
// Each AI task defines its own template in deal_context/prompts.rs.
// This file contains cross-cutting prompt fragments.

/// System prompt used for every sales-assistant task.
pub const SALES_ASSISTANT_SYSTEM: &str = "You are an assistant for sales professionals. \
    You work only from the deal context supplied in the user message. \
    Do NOT invent names, dates, figures or commitments that are not in that context.";

/// Delimiter wrapped around formatted deal context inside prompts.
pub const CONTEXT_FENCE: &str = "---";

/// Wraps a formatted context block in the shared delimiters.
pub fn fenced_context(context: &str) -> String {
    format!("{CONTEXT_FENCE}\n{}\n{CONTEXT_FENCE}", context.trim_end())
}
