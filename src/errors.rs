use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Failures that abort a request. Anything else degrades to a fallback value.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The search provider was unreachable, timed out, answered non-2xx or sent garbage.
    #[error("{0}")]
    UpstreamUnavailable(String),

    /// No query text, or a chat history without any user turn.
    #[error("{0}")]
    EmptyInput(String),

    /// Request body or parameters did not have the expected shape.
    #[error("{0}")]
    InvalidRequest(String),
}

impl PipelineError {
    pub fn status(&self) -> StatusCode {
        match self {
            PipelineError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            PipelineError::EmptyInput(_) | PipelineError::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

/// Failure of a single completion call. Never surfaced to callers directly.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("completion provider returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("completion provider returned no content")]
    EmptyReply,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}
