use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use nanoid::nanoid;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

use crate::data_models::{Category, SearchRequestParams, UnifiedResponse};
use crate::errors::PipelineError;
use crate::pipeline::Pipeline;

use super::models::{self, ChatQuery, ChatRequest, SearchQuery};

pub async fn search_handler(
    State(pipeline): State<Arc<Pipeline>>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<UnifiedResponse>, PipelineError> {
    let Query(query) = query.map_err(|e| PipelineError::InvalidRequest(e.body_text()))?;

    let q = query.q.unwrap_or_default();
    if q.trim().is_empty() {
        return Err(PipelineError::EmptyInput(
            "Query cannot be empty".to_string(),
        ));
    }

    let params = SearchRequestParams::new(
        q,
        Category::parse(query.category.as_deref().unwrap_or_default()),
        models::language(query.language),
        models::result_limit(query.num_results.as_deref())?,
    );

    let span = tracing::info_span!("search", request_id = %nanoid!(10));
    async move {
        let start = Instant::now();
        let response = pipeline.search(&params).await;
        log_outcome(&response, start);
        response.map(Json)
    }
    .instrument(span)
    .await
}

pub async fn chat_handler(
    State(pipeline): State<Arc<Pipeline>>,
    query: Result<Query<ChatQuery>, QueryRejection>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<UnifiedResponse>, PipelineError> {
    let Query(query) = query.map_err(|e| PipelineError::InvalidRequest(e.body_text()))?;
    let Json(body) = body.map_err(|e| PipelineError::InvalidRequest(e.body_text()))?;

    let history = body.into_history();
    let language = models::language(query.language);
    let limit = models::result_limit(query.num_results.as_deref())?;

    let span = tracing::info_span!("chat", request_id = %nanoid!(10), turns = history.len());
    async move {
        let start = Instant::now();
        let response = pipeline.chat(&history, &language, limit).await;
        log_outcome(&response, start);
        response.map(Json)
    }
    .instrument(span)
    .await
}

fn log_outcome(response: &Result<UnifiedResponse, PipelineError>, start: Instant) {
    let processing_time_ms = start.elapsed().as_millis() as u64;
    match response {
        Ok(r) => tracing::info!(
            results = r.results.len(),
            processing_time_ms,
            "request completed"
        ),
        Err(e) => tracing::warn!(error = %e, processing_time_ms, "request failed"),
    }
}
