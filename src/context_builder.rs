use crate::data_models::SearchResult;

/// Renders at most `max_for_summary` results as `Title/URL/Snippet` blocks
/// separated by a blank line. This is the grounding text for both the summary
/// and the chat answer; it is bounded independently of how many results the
/// caller gets back.
pub fn build_context(results: &[SearchResult], max_for_summary: usize) -> String {
    results
        .iter()
        .take(max_for_summary)
        .map(|r| format!("Title: {}\nURL: {}\nSnippet: {}", r.title, r.url, r.content))
        .collect::<Vec<String>>()
        .join("\n\n")
}
