use crate::data_models::{SearchResult, UnifiedResponse};

pub const NO_RESULTS_SUMMARY: &str = "No results found.";
pub const NO_RESULTS_CHAT_SUMMARY: &str = "No search results found.";
pub const NO_RESULTS_REPLY: &str = "I couldn't find any relevant search results.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// `/search`: results + summary, no reply.
    Search,
    /// `/chat`: results + summary + reply, reply always present.
    Chat,
}

/// Response for an upstream search that came back with zero hits. No
/// completion call is made for these.
pub fn empty_response(query: impl Into<String>, mode: Mode) -> UnifiedResponse {
    let (summary, reply) = match mode {
        Mode::Search => (NO_RESULTS_SUMMARY, None),
        Mode::Chat => (NO_RESULTS_CHAT_SUMMARY, Some(NO_RESULTS_REPLY.to_string())),
    };
    UnifiedResponse {
        query: query.into(),
        results: Vec::new(),
        summary: summary.to_string(),
        reply,
    }
}

pub fn compose(
    query: impl Into<String>,
    results: Vec<SearchResult>,
    summary: String,
    reply: Option<String>,
) -> UnifiedResponse {
    UnifiedResponse {
        query: query.into(),
        results,
        summary,
        reply,
    }
}
