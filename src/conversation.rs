use crate::data_models::{ChatTurn, Role};
use crate::errors::PipelineError;

/// Number of trailing turns kept for completion grounding.
pub const HISTORY_WINDOW: usize = 10;

/// The trailing slice of a conversation plus the query it is asking.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationWindow {
    pub turns: Vec<ChatTurn>,
    pub query: String,
}

impl ConversationWindow {
    /// Single-shot (non-chat) window: one user turn holding the query.
    pub fn single(query: impl Into<String>) -> ConversationWindow {
        let query = query.into();
        ConversationWindow {
            turns: vec![ChatTurn::user(query.clone())],
            query,
        }
    }
}

/// Takes the last `HISTORY_WINDOW` turns and picks the last user turn inside
/// them as the active query. Fails before any network work if there is none.
/// The query is that turn's content with surrounding whitespace trimmed.
pub fn extract_query(history: &[ChatTurn]) -> Result<ConversationWindow, PipelineError> {
    if history.is_empty() {
        return Err(PipelineError::EmptyInput("Empty message history".to_string()));
    }

    let start = history.len().saturating_sub(HISTORY_WINDOW);
    let turns = history[start..].to_vec();

    let last_user = turns
        .iter()
        .rev()
        .find(|turn| turn.role == Role::User)
        .ok_or_else(|| {
            PipelineError::EmptyInput(format!(
                "No user message in the last {HISTORY_WINDOW} turns"
            ))
        })?;

    let query = last_user.content.trim().to_string();
    if query.is_empty() {
        return Err(PipelineError::EmptyInput("Empty message".to_string()));
    }

    Ok(ConversationWindow { turns, query })
}
