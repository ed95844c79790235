//! Deal context for AI tasks.
//!
//! `assemble_deal_context` authorizes and gathers a deal snapshot,
//! `format_deal_context` renders it for a prompt, and `parse_suggested_items`
//! reads action items back out of the model's reply. The runners in `tasks`
//! tie the three together with one LLM call each.

pub mod assembler;
pub mod formatter;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod suggestions;
pub mod tasks;

pub use assembler::{assemble_deal_context, ContextError};
pub use formatter::{format_deal_context, FormatError};
pub use suggestions::parse_suggested_items;
