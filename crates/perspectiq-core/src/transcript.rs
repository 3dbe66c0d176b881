//! Plain-text transcripts of a session.

use crate::api::{Message, SessionHistoryItem};

/// `<role>: <content>` per message, newline separated.
pub fn build_transcript(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|m| format!("{}: {}", m.role.as_str(), m.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Label for a message's speaker in a conversation view.
///
/// Assistant turns use the message persona, then the session persona, then
/// "Counterpart".
pub fn speaker_label<'a>(message: &'a Message, session_persona: Option<&'a str>) -> &'a str {
    if message.is_user() {
        return "You";
    }
    message
        .persona
        .as_deref()
        .filter(|p| !p.is_empty())
        .or(session_persona.filter(|p| !p.is_empty()))
        .unwrap_or("Counterpart")
}

/// Whether a summary should be generated for a session on view.
pub fn needs_generated_summary(session: &SessionHistoryItem, messages: &[Message]) -> bool {
    session.stored_summary().is_none() && !messages.is_empty()
}

pub const NO_SUMMARY: &str = "No summary available for this session yet.";
pub const EVALUATION_PENDING: &str = "Evaluation pending...";

/// Summary to display: stored, then generated, then a placeholder.
pub fn display_summary<'a>(
    session: &'a SessionHistoryItem,
    generated: Option<&'a str>,
) -> &'a str {
    session
        .stored_summary()
        .or(generated.filter(|s| !s.trim().is_empty()))
        .unwrap_or(NO_SUMMARY)
}
