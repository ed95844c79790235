// AI task prompt builders.
// Each prompt is built in a single `format!` so inserted deal text is never
// re-scanned for placeholders.

/// Exact reply the model must give when the context does not answer the question.
pub const ANSWER_NOT_FOUND: &str = "The answer cannot be found in the provided context.";

pub fn action_items_prompt(deal_name: &str, context: &str) -> String {
    format!(
        r#"Analyze the following sales call transcript for the deal "{deal_name}".
Identify and extract a list of clear, concise, and actionable tasks or follow-up items.
Each action item should be a short phrase starting with a verb.
If no specific action items can be identified, respond with an empty list or "No action items found.".
Format the output as a JSON array of strings, where each string is an action item.
For example: ["Schedule follow-up meeting", "Send pricing details", "Clarify budget constraints"].

Transcript Context:
{context}

Suggested Action Items (JSON array of strings):"#
    )
}

pub fn follow_up_email_prompt(transcript_id: &str, context: &str) -> String {
    format!(
        r#"Role: You are an expert email writer for sales professionals.
Goal: Draft a concise and actionable follow-up email to keep momentum going with a prospect after a sales call.
Context: You are given the following deal context, which includes details about the deal, associated contacts, the transcript of the call with ID {transcript_id}, and open action items.

Deal Context:
{context}

Instructions:
- Keep the email brief and to the point.
- Reference key discussion points or agreements from the transcript.
- Propose a clear next step.
- Maintain a professional and friendly tone.
- Do not include a subject line, only the body of the email.
- Do not include a greeting or a sign-off. Write only the body that goes between them."#
    )
}

pub fn deal_question_prompt(context: &str, question: &str) -> String {
    format!(
        r#"Answer the following question based *solely* on the provided "Deal Context" below.
Do not use any external knowledge or make assumptions beyond what is explicitly stated in the context.
If the answer cannot be found in the provided context, you MUST respond with: "{ANSWER_NOT_FOUND}"

Deal Context:
{context}

User Question: {question}"#
    )
}
