use futures::FutureExt;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::conversation::ConversationWindow;
use crate::data_models::ChatTurn;
use crate::errors::CompletionError;

pub const SUMMARY_FALLBACK: &str = "Error generating summary.";
pub const SUMMARY_MAX_TOKENS: u32 = 300;
pub const ANSWER_MAX_TOKENS: u32 = 400;
pub const TEMPERATURE: f32 = 0.7;

/// A chat-completion backend. Summaries and answers go through the same call
/// and only differ in prompt and output bound.
pub trait CompletionProvider: Send + Sync {
    fn complete<'a>(
        &'a self,
        messages: &'a [ChatTurn],
        max_tokens: u32,
        temperature: f32,
    ) -> BoxFuture<'a, Result<String, CompletionError>>;
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatTurn],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<OpenAiClient, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(OpenAiClient {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    async fn chat(
        &self,
        messages: &[ChatTurn],
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, CompletionError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
            max_tokens,
            temperature,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Status { status, body });
        }

        let body: ChatCompletionResponse = response.json().await?;
        let text = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(CompletionError::EmptyReply);
        }
        Ok(text)
    }
}

impl CompletionProvider for OpenAiClient {
    fn complete<'a>(
        &'a self,
        messages: &'a [ChatTurn],
        max_tokens: u32,
        temperature: f32,
    ) -> BoxFuture<'a, Result<String, CompletionError>> {
        self.chat(messages, max_tokens, temperature).boxed()
    }
}

pub fn summary_prompt(context: &str) -> String {
    format!(
        "You are a research assistant. Provide a concise summary of the following search results:\n\n\
         {context}\n\n\
         Write the summary as 3-5 bullet points focusing on key insights."
    )
}

/// The synthetic system turn appended to the history before answering.
pub fn grounding_turn(summary: &str, context: &str, query: &str) -> ChatTurn {
    ChatTurn::system(format!(
        "You are a helpful assistant. Use the following summarized and raw search results \
         to answer the user's question.\n\n\
         Summary:\n{summary}\n\n\
         Search Results:\n{context}\n\n\
         User's question: {query}\n\
         Provide a clear, factual answer based on the above."
    ))
}

pub fn answer_fallback(err: &CompletionError) -> String {
    format!("Error generating chat reply: {err}")
}

/// Summary and answer generation over one provider. Both calls are
/// best-effort: a failure turns into a fallback string, never an error, and
/// nothing is retried.
#[derive(Clone)]
pub struct CompletionGateway {
    provider: Arc<dyn CompletionProvider>,
}

impl CompletionGateway {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> CompletionGateway {
        CompletionGateway { provider }
    }

    pub async fn summarize(&self, context: &str) -> String {
        let messages = [ChatTurn::user(summary_prompt(context))];
        match self
            .provider
            .complete(&messages, SUMMARY_MAX_TOKENS, TEMPERATURE)
            .await
        {
            Ok(summary) => summary,
            Err(e) => {
                log::warn!("summary generation failed, using fallback: {e}");
                SUMMARY_FALLBACK.to_string()
            }
        }
    }

    /// `summary` may be the fallback sentinel; the answer is attempted anyway.
    pub async fn answer(&self, window: &ConversationWindow, context: &str, summary: &str) -> String {
        let mut messages = window.turns.clone();
        messages.push(grounding_turn(summary, context, &window.query));

        match self
            .provider
            .complete(&messages, ANSWER_MAX_TOKENS, TEMPERATURE)
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                log::warn!("answer generation failed, using fallback: {e}");
                answer_fallback(&e)
            }
        }
    }
}
