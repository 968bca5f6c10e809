use crate::data_models::{Category, RawResult, SearchResult};

/// Maps one provider hit onto a `SearchResult`. Never fails: missing fields
/// become `""`, and the image is resolved thumbnail → category placeholder →
/// generic placeholder, so `image` is always populated.
pub fn normalize(raw: &RawResult, category: &Category) -> SearchResult {
    let thumbnail = raw.field("thumbnail").trim();
    let image = if thumbnail.is_empty() {
        category.placeholder().to_string()
    } else {
        thumbnail.to_string()
    };

    SearchResult {
        url: raw.field("url").to_string(),
        title: raw.field("title").to_string(),
        content: raw.field("content").to_string(),
        image: Some(image),
    }
}

/// Truncates to `limit` first, then normalizes what is left.
pub fn normalize_top(raw: &[RawResult], limit: usize, category: &Category) -> Vec<SearchResult> {
    raw.iter()
        .take(limit)
        .map(|hit| normalize(hit, category))
        .collect()
}
