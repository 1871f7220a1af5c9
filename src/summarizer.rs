use std::fmt;
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::SummarizerConfig;
use crate::error::{Error, Result};
use crate::prompts::PromptEngine;
use crate::section::{Category, CategoryLabels};
use crate::sheet::OpinionSheet;

const MAX_ATTEMPTS: u32 = 3;
const INITIAL_BACKOFF_MS: u64 = 500;

/// One category as drafted by a summarizer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DraftSection {
    pub category: Category,
    #[serde(default)]
    pub lines: Vec<String>,
    #[serde(default)]
    pub conflict: bool,
}

/// Per-category output of a summarizer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StructuredDraft {
    pub sections: Vec<DraftSection>,
}

impl StructuredDraft {
    /// Lines for `category` across every matching section, plus whether any
    /// of those sections reported a conflict.
    pub fn category(&self, category: Category) -> (Vec<&str>, bool) {
        let mut lines = Vec::new();
        let mut conflict = false;
        for section in self.sections.iter().filter(|s| s.category == category) {
            lines.extend(section.lines.iter().map(String::as_str));
            conflict |= section.conflict;
        }
        (lines, conflict)
    }
}

/// Drafts sections from raw reviewer input in place of the lexical pipeline.
pub trait Summarizer {
    fn summarize(&self, sheet: &OpinionSheet) -> Result<StructuredDraft>;
}

// ---------------------------------------------------------------------------
// Chat client abstraction (for testability)
// ---------------------------------------------------------------------------

pub trait ChatClient {
    /// Send a single user prompt and return the assistant's reply text.
    fn complete(&self, prompt: &str) -> Result<String>;
}

/// OpenAI-compatible chat-completions client.
pub struct HttpChatClient {
    agent: ureq::Agent,
    endpoint: String,
    model: String,
    api_key: String,
}

impl HttpChatClient {
    pub fn new(endpoint: String, model: String, api_key: String, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            endpoint,
            model,
            api_key,
        }
    }

    /// Build a client from config, reading the API key from the environment.
    pub fn from_config(config: &SummarizerConfig) -> Result<Self> {
        let endpoint = config
            .endpoint
            .clone()
            .ok_or_else(|| Error::Summarizer("summarizer endpoint not configured".to_string()))?;
        let model = config
            .model
            .clone()
            .ok_or_else(|| Error::Summarizer("summarizer model not configured".to_string()))?;
        let api_key = resolve_api_key(&config.api_key_env)?;
        Ok(Self::new(
            endpoint,
            model,
            api_key,
            Duration::from_secs(config.timeout_secs),
        ))
    }

    fn request_body(&self, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "temperature": 0,
            "messages": [
                { "role": "user", "content": prompt },
            ],
        })
    }
}

impl ChatClient for HttpChatClient {
    fn complete(&self, prompt: &str) -> Result<String> {
        let body = self.request_body(prompt);
        let response = with_retries(MAX_ATTEMPTS, INITIAL_BACKOFF_MS, is_retryable, || {
            self.agent
                .post(&self.endpoint)
                .set("Authorization", &format!("Bearer {}", self.api_key))
                .set("Content-Type", "application/json")
                .send_json(&body)
        })
        .map_err(|e| Error::Summarizer(format!("model request failed: {e}")))?;

        let json: serde_json::Value = response
            .into_json()
            .map_err(|e| Error::Summarizer(format!("failed to parse model response: {e}")))?;
        extract_reply(&json)
    }
}

/// Call `send` until it succeeds, fails with a non-retryable error, or has
/// been tried `max_attempts` times. The wait doubles after every retry.
fn with_retries<T, E: fmt::Display>(
    max_attempts: u32,
    initial_backoff_ms: u64,
    retryable: impl Fn(&E) -> bool,
    mut send: impl FnMut() -> std::result::Result<T, E>,
) -> std::result::Result<T, E> {
    let mut attempt = 1;
    let mut backoff_ms = initial_backoff_ms;
    loop {
        match send() {
            Err(e) if attempt < max_attempts && retryable(&e) => {
                warn!(attempt, error = %e, backoff_ms, "model request failed, retrying");
                thread::sleep(Duration::from_millis(backoff_ms));
                backoff_ms *= 2;
                attempt += 1;
            }
            outcome => return outcome,
        }
    }
}

/// Only retry rate-limits (429), server errors (5xx), and transport/network errors.
fn is_retryable(err: &ureq::Error) -> bool {
    match err {
        ureq::Error::Status(code, _) => *code == 429 || *code >= 500,
        ureq::Error::Transport(_) => true,
    }
}

fn resolve_api_key(api_key_env: &str) -> Result<String> {
    match std::env::var(api_key_env) {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(Error::Summarizer(format!(
            "API key not found in ${api_key_env}"
        ))),
    }
}

/// Pull `choices[0].message.content` out of a chat-completions response.
fn extract_reply(json: &serde_json::Value) -> Result<String> {
    if let Some(error) = json.get("error") {
        return Err(Error::Summarizer(format!("model API error: {error}")));
    }
    json.pointer("/choices/0/message/content")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| Error::Summarizer("model response missing message content".to_string()))
}

/// Parse a model reply as `StructuredDraft`, tolerating a markdown code fence
/// around the JSON.
pub fn parse_structured_draft(raw: &str) -> Result<StructuredDraft> {
    serde_json::from_str(strip_markdown_fences(raw))
        .map_err(|e| Error::Summarizer(format!("failed to parse draft JSON: {e}")))
}

fn strip_markdown_fences(input: &str) -> &str {
    let trimmed = input.trim();
    let Some(fenced) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // The opening line only carries the info string, e.g. `json`.
    let body = fenced.split_once('\n').map_or("", |(_, rest)| rest);
    match body.rfind("```") {
        Some(end) => body[..end].trim(),
        None => body.trim(),
    }
}

// ---------------------------------------------------------------------------
// Model-backed summarizer
// ---------------------------------------------------------------------------

pub struct ModelSummarizer<C: ChatClient> {
    client: C,
    prompts: PromptEngine,
    labels: CategoryLabels,
}

impl<C: ChatClient> ModelSummarizer<C> {
    pub fn new(client: C, prompts: PromptEngine, labels: CategoryLabels) -> Self {
        Self {
            client,
            prompts,
            labels,
        }
    }
}

impl<C: ChatClient> Summarizer for ModelSummarizer<C> {
    fn summarize(&self, sheet: &OpinionSheet) -> Result<StructuredDraft> {
        let prompt = self.prompts.render_summarize(sheet, &self.labels)?;
        debug!(prompt_bytes = prompt.len(), "requesting model draft");

        let reply = self.client.complete(&prompt)?;
        let draft = parse_structured_draft(&reply)?;
        info!(sections = draft.sections.len(), "model draft received");
        Ok(draft)
    }
}
