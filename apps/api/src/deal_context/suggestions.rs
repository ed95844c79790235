//! Best-effort parsing of LLM action-item suggestions.
//!
//! The model is asked for a JSON array of strings but is not held to it.
//! After stripping code fences, rules are tried in order and the first one
//! that matches decides the result:
//!
//! 1. `JsonList`: a JSON array of strings; blank entries dropped.
//! 2. `LineList`: newline- or bullet-separated text; bullet markers stripped.
//! 3. `SingleItem`: any other non-empty text that is not the "no items" reply.
//!
//! When nothing matches the result is empty. Parsing never fails.

use tracing::warn;

use crate::llm_client::strip_code_fences;

/// The model's reply when a transcript contains nothing actionable (case-insensitive).
pub const NO_ACTION_ITEMS_REPLY: &str = "No action items found.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseRule {
    JsonList,
    LineList,
    SingleItem,
}

impl ParseRule {
    pub const ORDER: [ParseRule; 3] = [
        ParseRule::JsonList,
        ParseRule::LineList,
        ParseRule::SingleItem,
    ];

    /// `None` when the rule does not recognise `text`.
    pub fn apply(self, text: &str) -> Option<Vec<String>> {
        match self {
            ParseRule::JsonList => serde_json::from_str::<Vec<String>>(text)
                .ok()
                .map(|items| {
                    items
                        .into_iter()
                        .filter(|item| !item.trim().is_empty())
                        .collect()
                }),
            ParseRule::LineList => {
                if !(text.contains('\n') || text.contains("* ") || text.contains("- ")) {
                    return None;
                }
                Some(
                    text.lines()
                        .map(strip_bullet)
                        .filter(|line| !line.is_empty())
                        .map(String::from)
                        .collect(),
                )
            }
            ParseRule::SingleItem => {
                let text = text.trim();
                if text.is_empty() || text.eq_ignore_ascii_case(NO_ACTION_ITEMS_REPLY) {
                    None
                } else {
                    Some(vec![text.to_string()])
                }
            }
        }
    }
}

/// Parsed items plus the rule that produced them (`None` for the empty fallback).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSuggestions {
    pub items: Vec<String>,
    pub rule: Option<ParseRule>,
}

pub fn parse_suggestions(raw: &str) -> ParsedSuggestions {
    let cleaned = strip_code_fences(raw);

    for rule in ParseRule::ORDER {
        if let Some(items) = rule.apply(cleaned) {
            if rule != ParseRule::JsonList {
                warn!(
                    "Action item suggestions were not a JSON string array; parsed with {:?}",
                    rule
                );
            }
            return ParsedSuggestions {
                items,
                rule: Some(rule),
            };
        }
    }

    ParsedSuggestions {
        items: Vec::new(),
        rule: None,
    }
}

/// Splits raw LLM output into action item descriptions.
pub fn parse_suggested_items(raw: &str) -> Vec<String> {
    parse_suggestions(raw).items
}

/// Removes leading whitespace, `*` and `-` characters, then trims.
fn strip_bullet(line: &str) -> &str {
    line.trim_start_matches(|c: char| c.is_whitespace() || c == '*' || c == '-')
        .trim()
}
