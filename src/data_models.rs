use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const MIN_RESULTS: usize = 1;
pub const MAX_RESULTS: usize = 20;
pub const DEFAULT_RESULTS: usize = 5;
pub const DEFAULT_LANGUAGE: &str = "en";

const GENERAL_PLACEHOLDER: &str = "https://via.placeholder.com/100x100?text=General";

/// Search category policy. `General` is the "no restriction" policy: it never
/// sends a filter upstream.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Category {
    #[default]
    General,
    News,
    Science,
    Technology,
    Images,
    /// Anything the upstream understands but we have no placeholder for.
    Other(String),
}

impl Category {
    /// Case-insensitive; blank input means `General`.
    pub fn parse(raw: &str) -> Category {
        let name = raw.trim().to_lowercase();
        match name.as_str() {
            "" | "general" => Category::General,
            "news" => Category::News,
            "science" => Category::Science,
            "technology" => Category::Technology,
            "images" => Category::Images,
            _ => Category::Other(name),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Category::General => "general",
            Category::News => "news",
            Category::Science => "science",
            Category::Technology => "technology",
            Category::Images => "images",
            Category::Other(name) => name,
        }
    }

    /// Value for the upstream `categories` parameter; `None` means omit it entirely.
    pub fn upstream_filter(&self) -> Option<&str> {
        match self {
            Category::General => None,
            other => Some(other.name()),
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            Category::News => "https://via.placeholder.com/100x100?text=News",
            Category::Science => "https://via.placeholder.com/100x100?text=Research",
            Category::Technology => "https://via.placeholder.com/100x100?text=Tech",
            Category::Images => "https://via.placeholder.com/100x100?text=Image",
            Category::General | Category::Other(_) => GENERAL_PLACEHOLDER,
        }
    }
}

/// One provider-shaped hit, kept as loose JSON until normalization.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct RawResult(pub Map<String, Value>);

impl RawResult {
    /// String field or `""` when missing / null / not a string.
    pub fn field(&self, key: &str) -> &str {
        self.0.get(key).and_then(Value::as_str).unwrap_or("")
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub url: String,
    pub title: String,
    pub content: String,
    pub image: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn new(role: Role, content: impl Into<String>) -> ChatTurn {
        ChatTurn {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> ChatTurn {
        ChatTurn::new(Role::User, content)
    }

    pub fn system(content: impl Into<String>) -> ChatTurn {
        ChatTurn::new(Role::System, content)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequestParams {
    pub query: String,
    pub category: Category,
    pub language: String,
    /// Always within [`MIN_RESULTS`, `MAX_RESULTS`].
    pub result_limit: usize,
}

impl SearchRequestParams {
    pub fn new(
        query: impl Into<String>,
        category: Category,
        language: impl Into<String>,
        result_limit: usize,
    ) -> SearchRequestParams {
        SearchRequestParams {
            query: query.into(),
            category,
            language: language.into(),
            result_limit: clamp_result_limit(result_limit),
        }
    }
}

pub fn clamp_result_limit(limit: usize) -> usize {
    limit.clamp(MIN_RESULTS, MAX_RESULTS)
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UnifiedResponse {
    pub query: String,
    pub results: Vec<SearchResult>,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub reply: Option<String>,
}
