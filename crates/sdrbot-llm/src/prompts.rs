//! Prompt builders for the qualification flows.
//!
//! Every prompt that needs context embeds the rendered conversation — the
//! provider keeps nothing between calls, so the full history is re-sent each
//! time. Prompts are plain single-message strings; there is no system-role
//! priming.

use sdrbot_core::Conversation;

/// Greeting that opens the API-driven conversation.
pub fn api_greeting() -> String {
    "You are a friendly SDR bot. Greet the visitor naturally and ask the first \
     qualification question."
        .to_string()
}

/// Greeting that opens the guided CLI dialogue.
pub fn cli_greeting() -> String {
    "You are a friendly SDR bot. Greet the visitor warmly.".to_string()
}

/// Asks the model for the next qualification question or follow-up.
pub fn next_question(conversation: &Conversation) -> String {
    format!(
        "You are a helpful SDR. Based on the conversation so far:\n{}\n\
         Ask the next qualification question or follow-up naturally.",
        conversation.render()
    )
}

/// Asks the model for a 2-3 sentence summary of the discussion.
pub fn summary(conversation: &Conversation) -> String {
    format!(
        "You are a helpful SDR bot. Based on the conversation below, summarize \
         the discussion in 2-3 sentences.\nConversation:\n{}",
        conversation.render()
    )
}

/// Asks the model to emit a structured JSON lead object for the conversation.
pub fn lead_json(conversation: &Conversation) -> String {
    format!(
        "You are a helpful SDR bot. Based on the conversation below, generate a \
         structured JSON lead object with:\n\
         name, email, company, role, pain_points, interested_product, \
         conversation_summary.\n\nConversation:\n{}",
        conversation.render()
    )
}
