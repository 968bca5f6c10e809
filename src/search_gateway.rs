use futures::FutureExt;
use futures::future::BoxFuture;
use serde::Deserialize;
use std::time::Duration;

use crate::data_models::{Category, RawResult};
use crate::errors::PipelineError;

/// Anything that can answer a web query with provider-shaped hits.
///
/// Implementations must report every failure (timeout, transport, non-2xx,
/// undecodable body) as [`PipelineError::UpstreamUnavailable`]. Zero hits is
/// `Ok(vec![])`, not an error.
pub trait SearchProvider: Send + Sync {
    fn search<'a>(
        &'a self,
        query: &'a str,
        category: &'a Category,
        language: &'a str,
    ) -> BoxFuture<'a, Result<Vec<RawResult>, PipelineError>>;
}

#[derive(Debug, Deserialize)]
struct SearxngResponse {
    #[serde(default)]
    results: Vec<RawResult>,
}

/// JSON API client for a SearXNG instance.
pub struct SearxngClient {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl SearxngClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<SearxngClient, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(SearxngClient {
            client,
            url: url.into(),
            timeout,
        })
    }

    /// `categories` is only present for non-general categories: SearXNG treats
    /// a missing filter differently from `categories=general`.
    pub fn query_params<'a>(
        query: &'a str,
        category: &'a Category,
        language: &'a str,
    ) -> Vec<(&'static str, &'a str)> {
        let mut params = vec![("q", query), ("format", "json"), ("language", language)];
        if let Some(filter) = category.upstream_filter() {
            params.push(("categories", filter));
        }
        params
    }

    async fn fetch(
        &self,
        query: &str,
        category: &Category,
        language: &str,
    ) -> Result<Vec<RawResult>, reqwest::Error> {
        let params = Self::query_params(query, category, language);
        let response = self
            .client
            .get(&self.url)
            .query(&params)
            .send()
            .await?
            .error_for_status()?;
        let body: SearxngResponse = response.json().await?;
        Ok(body.results)
    }
}

impl SearchProvider for SearxngClient {
    fn search<'a>(
        &'a self,
        query: &'a str,
        category: &'a Category,
        language: &'a str,
    ) -> BoxFuture<'a, Result<Vec<RawResult>, PipelineError>> {
        async move {
            match self.fetch(query, category, language).await {
                Ok(results) => {
                    log::info!("searxng returned {} hits for {:?}", results.len(), query);
                    Ok(results)
                }
                Err(e) => {
                    let detail = if e.is_timeout() {
                        format!("request timed out after {:?}", self.timeout)
                    } else {
                        e.to_string()
                    };
                    log::error!("error contacting searxng at {}: {}", self.url, detail);
                    Err(PipelineError::UpstreamUnavailable(format!(
                        "Error contacting SearXNG: {detail}"
                    )))
                }
            }
        }
        .boxed()
    }
}
