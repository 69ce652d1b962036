//! Summarization: send extracted text to a chat model, get a summary back.
//!
//! All prompt wording lives in [`crate::prompts`]; this module only builds
//! requests, maps failures and cleans the result.
//!
//! Two implementations of [`Summarizer`] are provided:
//!
//! * [`ChatCompletionsSummarizer`] talks to an OpenAI-style
//!   `/chat/completions` endpoint directly with `reqwest`. Works with OpenAI,
//!   Azure OpenAI deployments and compatible local servers.
//! * [`ProviderSummarizer`] delegates to any `edgequake_llm` provider
//!   (OpenAI, Anthropic, Gemini, Ollama, ...).
//!
//! Neither retries and neither caches: every call issues exactly one request.

use crate::config::{AuthStyle, SummarizerConfig, SummaryLength, SUMMARY_KEY_ENV};
use crate::error::{EduError, SummarizationError};
use crate::pipeline::postprocess::clean_summary;
use crate::prompts::{system_prompt, user_prompt};
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, ProviderFactory};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Produces a summary of `text` at the requested length.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str, length: SummaryLength) -> Result<String, SummarizationError>;
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    messages: [WireMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

// ── Direct HTTP client ───────────────────────────────────────────────────

/// [`Summarizer`] for OpenAI-compatible chat-completions endpoints.
#[derive(Debug, Clone)]
pub struct ChatCompletionsSummarizer {
    client: reqwest::Client,
    config: SummarizerConfig,
    api_key: String,
}

impl ChatCompletionsSummarizer {
    /// Build a client. Fails when no API key is configured.
    pub fn new(config: SummarizerConfig) -> Result<Self, EduError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(EduError::MissingCredential {
                service: "summarization",
                env_var: SUMMARY_KEY_ENV,
            })?;

        let mut builder = reqwest::Client::builder();
        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        }
        let client = builder
            .build()
            .map_err(|e| EduError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    pub fn config(&self) -> &SummarizerConfig {
        &self.config
    }
}

#[async_trait]
impl Summarizer for ChatCompletionsSummarizer {
    async fn summarize(&self, text: &str, length: SummaryLength) -> Result<String, SummarizationError> {
        if text.trim().is_empty() {
            return Err(SummarizationError::EmptyInput);
        }

        let system = system_prompt(length);
        let user = user_prompt(text);
        let body = ChatRequest {
            messages: [
                WireMessage {
                    role: "system",
                    content: &system,
                },
                WireMessage {
                    role: "user",
                    content: &user,
                },
            ],
            max_tokens: length.max_tokens(),
            temperature: self.config.temperature,
            model: self.config.model.as_deref(),
        };

        let request = self.client.post(&self.config.endpoint).json(&body);
        let request = match self.config.auth_style {
            AuthStyle::Bearer => request.bearer_auth(&self.api_key),
            AuthStyle::ApiKeyHeader => request.header("api-key", &self.api_key),
        };

        let start = Instant::now();
        info!("Requesting {} summary ({} chars of input)", length, text.chars().count());

        let response = request
            .send()
            .await
            .map_err(|e| SummarizationError::Request(describe_reqwest(&e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizationError::Status {
                status: status.as_u16(),
                body: truncate(&body, 500),
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| SummarizationError::MalformedResponse(e.to_string()))?;

        let raw = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .ok_or(SummarizationError::EmptyResponse)?;

        let summary = clean_summary(&raw);
        if summary.is_empty() {
            return Err(SummarizationError::EmptyResponse);
        }

        debug!(
            "Summary: {} chars in {:?}",
            summary.chars().count(),
            start.elapsed()
        );
        Ok(summary)
    }
}

// ── edgequake-llm provider ───────────────────────────────────────────────

/// [`Summarizer`] backed by an `edgequake_llm` provider.
#[derive(Clone)]
pub struct ProviderSummarizer {
    provider: Arc<dyn LLMProvider>,
    temperature: f32,
}

impl ProviderSummarizer {
    pub fn new(provider: Arc<dyn LLMProvider>) -> Self {
        Self {
            provider,
            temperature: 0.7,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Build from a provider resolved via [`resolve_provider`].
    pub fn from_env(provider_name: Option<&str>, model: Option<&str>) -> Result<Self, EduError> {
        resolve_provider(provider_name, model).map(Self::new)
    }
}

fn completion_options(temperature: f32, length: SummaryLength) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(temperature),
        max_tokens: Some(length.max_tokens() as usize),
        ..Default::default()
    }
}

impl std::fmt::Debug for ProviderSummarizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSummarizer")
            .field("temperature", &self.temperature)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Summarizer for ProviderSummarizer {
    async fn summarize(&self, text: &str, length: SummaryLength) -> Result<String, SummarizationError> {
        if text.trim().is_empty() {
            return Err(SummarizationError::EmptyInput);
        }

        let messages = vec![
            ChatMessage::system(system_prompt(length)),
            ChatMessage::user(user_prompt(text)),
        ];
        let options = completion_options(self.temperature, length);

        let start = Instant::now();
        info!("Requesting {} summary via provider", length);

        let response = self
            .provider
            .chat(&messages, Some(&options))
            .await
            .map_err(|e| SummarizationError::Provider(e.to_string()))?;

        debug!(
            "Provider summary: {} prompt / {} completion tokens in {:?}",
            response.prompt_tokens,
            response.completion_tokens,
            start.elapsed()
        );

        let summary = clean_summary(&response.content);
        if summary.is_empty() {
            return Err(SummarizationError::EmptyResponse);
        }
        Ok(summary)
    }
}

/// Default model when a provider is named without one.
pub const DEFAULT_PROVIDER_MODEL: &str = "gpt-4o-mini";

/// Resolve an `edgequake_llm` provider, from most to least specific.
///
/// 1. Named provider (`provider_name`) with `model` or the default model.
/// 2. `EDGEQUAKE_LLM_PROVIDER` + `EDGEQUAKE_MODEL`, when both are set.
/// 3. `OPENAI_API_KEY` present: OpenAI with `model` or the default model.
/// 4. [`ProviderFactory::from_env`] auto-detection.
pub fn resolve_provider(
    provider_name: Option<&str>,
    model: Option<&str>,
) -> Result<Arc<dyn LLMProvider>, EduError> {
    if let Some(name) = provider_name {
        return create_provider(name, model.unwrap_or(DEFAULT_PROVIDER_MODEL));
    }

    if let (Ok(prov), Ok(env_model)) = (
        std::env::var("EDGEQUAKE_LLM_PROVIDER"),
        std::env::var("EDGEQUAKE_MODEL"),
    ) {
        if !prov.is_empty() && !env_model.is_empty() {
            return create_provider(&prov, &env_model);
        }
    }

    if std::env::var("OPENAI_API_KEY").is_ok_and(|k| !k.is_empty()) {
        return create_provider("openai", model.unwrap_or(DEFAULT_PROVIDER_MODEL));
    }

    let (provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| EduError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No LLM provider could be auto-detected from environment.\n\
                Set OPENAI_API_KEY or ANTHROPIC_API_KEY, or set {} for the direct endpoint.\n\
                Error: {}",
                SUMMARY_KEY_ENV, e
            ),
        })?;
    Ok(provider)
}

fn create_provider(name: &str, model: &str) -> Result<Arc<dyn LLMProvider>, EduError> {
    ProviderFactory::create_llm_provider(name, model).map_err(|e| EduError::ProviderNotConfigured {
        provider: name.to_string(),
        hint: format!("{e}"),
    })
}

// ── Helpers ──────────────────────────────────────────────────────────────

pub(crate) fn describe_reqwest(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("request timed out: {e}")
    } else if e.is_connect() {
        format!("could not connect: {e}")
    } else {
        e.to_string()
    }
}

pub(crate) fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars).collect();
        format!("{head}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_rejected_at_construction() {
        let err = ChatCompletionsSummarizer::new(SummarizerConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            EduError::MissingCredential {
                env_var: SUMMARY_KEY_ENV,
                ..
            }
        ));
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let config = SummarizerConfig::builder().api_key("   ").build().unwrap();
        assert!(ChatCompletionsSummarizer::new(config).is_err());
    }

    #[tokio::test]
    async fn empty_input_never_leaves_the_process() {
        let config = SummarizerConfig::builder()
            .endpoint("http://127.0.0.1:9/unreachable")
            .api_key("k")
            .build()
            .unwrap();
        let s = ChatCompletionsSummarizer::new(config).unwrap();
        let err = s.summarize("  \n\t", SummaryLength::Short).await.unwrap_err();
        assert!(matches!(err, SummarizationError::EmptyInput));
    }

    #[test]
    fn request_body_shape() {
        let body = ChatRequest {
            messages: [
                WireMessage {
                    role: "system",
                    content: "sys",
                },
                WireMessage {
                    role: "user",
                    content: "usr",
                },
            ],
            max_tokens: 150,
            temperature: 0.7,
            model: None,
        };
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(v["messages"][0]["role"], "system");
        assert_eq!(v["messages"][1]["content"], "usr");
        assert_eq!(v["max_tokens"], 150);
        assert!(v.get("model").is_none());
    }

    #[test]
    fn response_without_choices_parses() {
        let r: ChatResponse = serde_json::from_str(r#"{"id":"x"}"#).unwrap();
        assert!(r.choices.is_empty());
    }

    #[test]
    fn provider_options_follow_length() {
        let short = completion_options(0.7, SummaryLength::Short);
        let long = completion_options(0.7, SummaryLength::Long);
        assert_eq!(short.max_tokens, Some(150));
        assert_eq!(long.max_tokens, Some(800));
        assert_eq!(long.temperature, Some(0.7));
    }

    #[test]
    fn truncate_long_bodies() {
        assert_eq!(truncate("abc", 5), "abc");
        assert_eq!(truncate("abcdef", 3), "abc…");
    }
}
