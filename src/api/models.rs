use serde::Deserialize;

use crate::errors::PipelineError;
use crate::data_models::{
    ChatTurn, DEFAULT_LANGUAGE, DEFAULT_RESULTS, MAX_RESULTS, MIN_RESULTS,
};

/// `GET /search` query string.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub language: Option<String>,
    pub num_results: Option<String>,
}

/// `POST /chat` query string.
#[derive(Debug, Deserialize)]
pub struct ChatQuery {
    pub num_results: Option<String>,
    pub language: Option<String>,
}

/// `POST /chat` body. Either a full history or a bare message, which is
/// treated as a one-turn history.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ChatRequest {
    History { messages: Vec<ChatTurn> },
    Single { message: String },
}

impl ChatRequest {
    pub fn into_history(self) -> Vec<ChatTurn> {
        match self {
            ChatRequest::History { messages } => messages,
            ChatRequest::Single { message } => vec![ChatTurn::user(message)],
        }
    }
}

/// Clamps into [`MIN_RESULTS`, `MAX_RESULTS`]. Integers of any size saturate;
/// only non-numeric input is rejected.
pub fn result_limit(num_results: Option<&str>) -> Result<usize, PipelineError> {
    let raw = match num_results.map(str::trim) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Ok(DEFAULT_RESULTS),
    };

    let digits = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PipelineError::InvalidRequest(format!(
            "num_results must be an integer, got {raw:?}"
        )));
    }

    let limit = match raw.parse::<i64>() {
        Ok(n) => n.clamp(MIN_RESULTS as i64, MAX_RESULTS as i64) as usize,
        Err(_) if raw.starts_with('-') => MIN_RESULTS,
        Err(_) => MAX_RESULTS,
    };
    Ok(limit)
}

pub fn language(language: Option<String>) -> String {
    language
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
}
