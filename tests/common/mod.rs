#![allow(dead_code)]

use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::json;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use privsearch::completion::{CompletionProvider, SUMMARY_MAX_TOKENS};
use privsearch::data_models::{Category, ChatTurn, RawResult};
use privsearch::errors::{CompletionError, PipelineError};
use privsearch::pipeline::Pipeline;
use privsearch::search_gateway::SearchProvider;

pub const FAKE_SUMMARY: &str = "- point one\n- point two\n- point three";
pub const FAKE_REPLY: &str = "It is sunny in Paris.";

pub fn hits(count: usize) -> Vec<RawResult> {
    (0..count)
        .map(|i| {
            serde_json::from_value(json!({
                "url": format!("https://site{i}.example/page"),
                "title": format!("Result {i}"),
                "content": format!("Snippet for result {i}"),
                "engine": "duckduckgo",
            }))
            .unwrap()
        })
        .collect()
}

/// Records every call and answers with a canned outcome.
pub struct FakeSearch {
    outcome: Result<Vec<RawResult>, String>,
    calls: AtomicUsize,
    seen: Mutex<Vec<(String, Category, String)>>,
}

impl FakeSearch {
    pub fn returning(hits: Vec<RawResult>) -> Arc<FakeSearch> {
        Arc::new(FakeSearch {
            outcome: Ok(hits),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(detail: &str) -> Arc<FakeSearch> {
        Arc::new(FakeSearch {
            outcome: Err(detail.to_string()),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<(String, Category, String)> {
        self.seen.lock().unwrap().clone()
    }
}

impl SearchProvider for FakeSearch {
    fn search<'a>(
        &'a self,
        query: &'a str,
        category: &'a Category,
        language: &'a str,
    ) -> BoxFuture<'a, Result<Vec<RawResult>, PipelineError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push((
            query.to_string(),
            category.clone(),
            language.to_string(),
        ));
        let outcome = self
            .outcome
            .clone()
            .map_err(PipelineError::UpstreamUnavailable);
        async move { outcome }.boxed()
    }
}

/// Tells summary from answer calls by their output bound.
pub struct FakeCompletion {
    fail_summary: bool,
    fail_answer: bool,
    calls: AtomicUsize,
    requests: Mutex<Vec<(Vec<ChatTurn>, u32, f32)>>,
}

impl FakeCompletion {
    pub fn new(fail_summary: bool, fail_answer: bool) -> Arc<FakeCompletion> {
        Arc::new(FakeCompletion {
            fail_summary,
            fail_answer,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn healthy() -> Arc<FakeCompletion> {
        Self::new(false, false)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<(Vec<ChatTurn>, u32, f32)> {
        self.requests.lock().unwrap().clone()
    }
}

impl CompletionProvider for FakeCompletion {
    fn complete<'a>(
        &'a self,
        messages: &'a [ChatTurn],
        max_tokens: u32,
        temperature: f32,
    ) -> BoxFuture<'a, Result<String, CompletionError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap()
            .push((messages.to_vec(), max_tokens, temperature));

        let is_summary = max_tokens == SUMMARY_MAX_TOKENS;
        let outcome = match (is_summary, self.fail_summary, self.fail_answer) {
            (true, true, _) | (false, _, true) => Err(CompletionError::EmptyReply),
            (true, false, _) => Ok(FAKE_SUMMARY.to_string()),
            (false, _, false) => Ok(FAKE_REPLY.to_string()),
        };
        async move { outcome }.boxed()
    }
}

pub fn pipeline(search: &Arc<FakeSearch>, completion: &Arc<FakeCompletion>) -> Pipeline {
    Pipeline::new(search.clone(), completion.clone(), 5)
}
