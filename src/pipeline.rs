use std::sync::Arc;

use crate::completion::{CompletionGateway, CompletionProvider, OpenAiClient};
use crate::composer::{self, Mode};
use crate::config::Config;
use crate::context_builder::build_context;
use crate::conversation::{ConversationWindow, extract_query};
use crate::data_models::{Category, ChatTurn, SearchRequestParams, UnifiedResponse};
use crate::errors::PipelineError;
use crate::normalizer::normalize_top;
use crate::search_gateway::{SearchProvider, SearxngClient};

/// search → normalize → context → summary → (chat: answer) → response.
///
/// Stateless: one `Pipeline` is shared by every request and holds only the
/// provider handles and the context cap.
pub struct Pipeline {
    search: Arc<dyn SearchProvider>,
    completions: CompletionGateway,
    context_cap: usize,
}

impl Pipeline {
    pub fn new(
        search: Arc<dyn SearchProvider>,
        completion: Arc<dyn CompletionProvider>,
        context_cap: usize,
    ) -> Self {
        Self {
            search,
            completions: CompletionGateway::new(completion),
            context_cap,
        }
    }

    /// Wires the real SearXNG and OpenAI clients from configuration.
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let search = SearxngClient::new(&config.searxng_url, config.search_timeout)?;
        let completion = OpenAiClient::new(
            &config.openai_base_url,
            &config.openai_api_key,
            &config.completion_model,
            config.completion_timeout,
        )?;
        Ok(Self::new(
            Arc::new(search),
            Arc::new(completion),
            config.context_cap,
        ))
    }

    /// Single-shot search: results plus summary, no reply.
    pub async fn search(&self, params: &SearchRequestParams) -> Result<UnifiedResponse, PipelineError> {
        let query = params.query.trim();
        if query.is_empty() {
            return Err(PipelineError::EmptyInput(
                "Query cannot be empty".to_string(),
            ));
        }
        let window = ConversationWindow::single(query);
        self.run(&window, params, Mode::Search).await
    }

    /// Search-augmented chat over the caller's history. The history is
    /// validated before anything goes upstream.
    pub async fn chat(
        &self,
        history: &[ChatTurn],
        language: &str,
        result_limit: usize,
    ) -> Result<UnifiedResponse, PipelineError> {
        let window = extract_query(history)?;
        let params = SearchRequestParams::new(
            window.query.clone(),
            Category::General,
            language,
            result_limit,
        );
        self.run(&window, &params, Mode::Chat).await
    }

    async fn run(
        &self,
        window: &ConversationWindow,
        params: &SearchRequestParams,
        mode: Mode,
    ) -> Result<UnifiedResponse, PipelineError> {
        let query = window.query.as_str();

        let raw = self
            .search
            .search(query, &params.category, &params.language)
            .await?;

        if raw.is_empty() {
            log::info!("no upstream hits for {:?}", query);
            return Ok(composer::empty_response(query, mode));
        }

        let results = normalize_top(&raw, params.result_limit, &params.category);
        log::debug!(
            "kept {} of {} hits (limit {}, context cap {})",
            results.len(),
            raw.len(),
            params.result_limit,
            self.context_cap
        );

        let context = build_context(&results, self.context_cap);
        let summary = self.completions.summarize(&context).await;

        let reply = match mode {
            Mode::Search => None,
            Mode::Chat => Some(self.completions.answer(window, &context, &summary).await),
        };

        Ok(composer::compose(query, results, summary, reply))
    }
}
