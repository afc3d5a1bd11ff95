//! Text-generation backends.
//!
//! - `TextGenerator` is the seam every prompt goes through.
//! - `OllamaGenerator` talks to an Ollama server over HTTP.
//! - `RetryingGenerator` bounds each attempt with a timeout and retries with
//!   linear backoff.
//! - `MockGenerator` answers deterministically per prompt template for tests.

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use moodcheck_core::config::LlmConfig;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::ScreeningError;
use crate::prompts::PromptKind;

/// A backend that turns a prompt into text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ScreeningError>;

    /// Generate under a system instruction. Backends without a separate
    /// system channel get the instruction prepended to the prompt.
    async fn generate_with_system(
        &self,
        system: &str,
        prompt: &str,
    ) -> Result<String, ScreeningError> {
        self.generate(&format!("{}\n\n{}", system, prompt)).await
    }
}

// =============================================================================
// OllamaGenerator
// =============================================================================

/// Generator backed by the Ollama `/api/chat` endpoint.
#[derive(Clone)]
pub struct OllamaGenerator {
    client: Client,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

impl OllamaGenerator {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    pub fn from_config(config: &LlmConfig) -> Self {
        Self::new(config.base_url.clone(), config.model.clone())
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/api/chat", self.base_url.trim_end_matches('/'))
    }

    fn request<'a>(&'a self, system: Option<&'a str>, prompt: &'a str) -> ChatRequest<'a> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt,
        });
        ChatRequest {
            model: &self.model,
            messages,
            stream: false,
        }
    }

    async fn chat(&self, request: &ChatRequest<'_>) -> Result<String, ScreeningError> {
        let response = self
            .client
            .post(self.endpoint())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ScreeningError::Backend(format!(
                "Ollama returned {}: {}",
                status, body
            )));
        }

        let body: ChatResponse = response.json().await?;
        Ok(body.message.content.trim().to_string())
    }
}

#[async_trait]
impl TextGenerator for OllamaGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, ScreeningError> {
        self.chat(&self.request(None, prompt)).await
    }

    async fn generate_with_system(
        &self,
        system: &str,
        prompt: &str,
    ) -> Result<String, ScreeningError> {
        self.chat(&self.request(Some(system), prompt)).await
    }
}

// =============================================================================
// RetryingGenerator
// =============================================================================

/// Wraps a generator with a per-attempt timeout and bounded retries.
pub struct RetryingGenerator<G> {
    inner: G,
    timeout: Duration,
    max_retries: u32,
    backoff: Duration,
}

impl<G: TextGenerator> RetryingGenerator<G> {
    pub fn new(inner: G, timeout: Duration, max_retries: u32, backoff: Duration) -> Self {
        Self {
            inner,
            timeout,
            max_retries,
            backoff,
        }
    }

    pub fn from_config(inner: G, config: &LlmConfig) -> Self {
        Self::new(
            inner,
            Duration::from_secs(config.request_timeout_secs),
            config.max_retries,
            Duration::from_millis(config.retry_backoff_ms),
        )
    }

    async fn with_retries<F, Fut>(&self, mut call: F) -> Result<String, ScreeningError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<String, ScreeningError>>,
    {
        let mut attempt = 0u32;
        loop {
            let err = match tokio::time::timeout(self.timeout, call()).await {
                Ok(Ok(text)) => return Ok(text),
                Ok(Err(e)) => e,
                Err(_) => ScreeningError::Timeout(self.timeout.as_millis() as u64),
            };

            if attempt >= self.max_retries {
                tracing::error!(attempts = attempt + 1, error = %err, "Text generation failed");
                return Err(err);
            }

            attempt += 1;
            tracing::warn!(attempt, error = %err, "Text generation failed, retrying");
            tokio::time::sleep(self.backoff * attempt).await;
        }
    }
}

#[async_trait]
impl<G: TextGenerator> TextGenerator for RetryingGenerator<G> {
    async fn generate(&self, prompt: &str) -> Result<String, ScreeningError> {
        self.with_retries(|| self.inner.generate(prompt)).await
    }

    async fn generate_with_system(
        &self,
        system: &str,
        prompt: &str,
    ) -> Result<String, ScreeningError> {
        self.with_retries(|| self.inner.generate_with_system(system, prompt))
            .await
    }
}

// =============================================================================
// MockGenerator
// =============================================================================

/// Deterministic generator that answers by prompt template.
///
/// Classification replies are taken from a queue first and fall back to a
/// fixed label once the queue is empty. Any template can be made to fail.
#[derive(Debug)]
pub struct MockGenerator {
    classification: String,
    queued_labels: Mutex<VecDeque<String>>,
    empathy: String,
    summary: String,
    companion: String,
    failing: Mutex<Vec<PromptKind>>,
    calls: Mutex<HashMap<PromptKind, usize>>,
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGenerator {
    pub fn new() -> Self {
        Self {
            classification: "Not at all".to_string(),
            queued_labels: Mutex::new(VecDeque::new()),
            empathy: "Thank you for sharing that with me.".to_string(),
            summary: "Depression severity: Minimal. You are doing your best.".to_string(),
            companion: "I'm here for you. Would you like to take a short check-in?".to_string(),
            failing: Mutex::new(Vec::new()),
            calls: Mutex::new(HashMap::new()),
        }
    }

    /// Label returned for every classification prompt.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.classification = label.into();
        self
    }

    /// Labels returned, in order, before falling back to the fixed label.
    pub fn with_labels<I, S>(self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Ok(mut queue) = self.queued_labels.lock() {
            queue.extend(labels.into_iter().map(Into::into));
        }
        self
    }

    pub fn with_empathy(mut self, text: impl Into<String>) -> Self {
        self.empathy = text.into();
        self
    }

    pub fn with_summary(mut self, text: impl Into<String>) -> Self {
        self.summary = text.into();
        self
    }

    pub fn with_companion(mut self, text: impl Into<String>) -> Self {
        self.companion = text.into();
        self
    }

    /// Make prompts of `kind` fail until `recover` is called.
    pub fn fail_on(&self, kind: PromptKind) {
        if let Ok(mut failing) = self.failing.lock() {
            failing.push(kind);
        }
    }

    pub fn recover(&self) {
        if let Ok(mut failing) = self.failing.lock() {
            failing.clear();
        }
    }

    /// Number of prompts of `kind` received so far, including failed ones.
    pub fn calls(&self, kind: PromptKind) -> usize {
        self.calls
            .lock()
            .map(|c| c.get(&kind).copied().unwrap_or(0))
            .unwrap_or(0)
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, ScreeningError> {
        let kind = PromptKind::detect(prompt);
        if let Ok(mut calls) = self.calls.lock() {
            *calls.entry(kind).or_insert(0) += 1;
        }

        let fails = self
            .failing
            .lock()
            .map(|f| f.contains(&kind))
            .unwrap_or(false);
        if fails {
            return Err(ScreeningError::Backend(format!(
                "mock failure for {:?} prompt",
                kind
            )));
        }

        let text = match kind {
            PromptKind::Classification => self
                .queued_labels
                .lock()
                .ok()
                .and_then(|mut q| q.pop_front())
                .unwrap_or_else(|| self.classification.clone()),
            PromptKind::Empathy => self.empathy.clone(),
            PromptKind::Summary => self.summary.clone(),
            PromptKind::Companion => self.companion.clone(),
        };
        Ok(text)
    }
}
