//! Configuration types for the two remote clients.
//!
//! Each client is controlled through one struct ([`SummarizerConfig`],
//! [`SynthesizerConfig`]) built via its builder. Credentials are always
//! supplied by the caller (CLI flag or environment variable); nothing is
//! compiled in, and the `Debug` output redacts them.

use crate::error::EduError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Environment variable the CLI reads the summarization key from.
pub const SUMMARY_KEY_ENV: &str = "EDUSUMMARIZE_LLM_API_KEY";

/// Environment variable the CLI reads the speech key from.
pub const SPEECH_KEY_ENV: &str = "ELEVENLABS_API_KEY";

/// Default chat-completions endpoint.
pub const DEFAULT_SUMMARY_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Default model sent in the request body.
pub const DEFAULT_SUMMARY_MODEL: &str = "gpt-4o";

/// Default speech API base URL.
pub const DEFAULT_SPEECH_BASE_URL: &str = "https://api.elevenlabs.io";

/// Default voice ("Rachel").
pub const DEFAULT_VOICE_ID: &str = "21m00Tcm4TlvDq8ikWAM";

/// Default speech model.
pub const DEFAULT_SPEECH_MODEL: &str = "eleven_monolingual_v1";

// ── Summary length ───────────────────────────────────────────────────────

/// How long a summary the user wants.
///
/// | Length | Instruction | Max output tokens |
/// |--------|-------------|-------------------|
/// | short  | brief 2-3 sentences | 150 |
/// | medium | 1-2 paragraphs (default) | 500 |
/// | long   | key points and insights | 800 |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl SummaryLength {
    /// Length-specific sentence appended to the system prompt.
    pub fn instruction(self) -> &'static str {
        match self {
            SummaryLength::Short => "Provide a brief 2-3 sentence summary.",
            SummaryLength::Medium => "Provide a comprehensive summary in 1-2 paragraphs.",
            SummaryLength::Long => "Provide a detailed summary with key points and insights.",
        }
    }

    /// Output-token budget sent with the request.
    pub fn max_tokens(self) -> u32 {
        match self {
            SummaryLength::Short => 150,
            SummaryLength::Medium => 500,
            SummaryLength::Long => 800,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SummaryLength::Short => "short",
            SummaryLength::Medium => "medium",
            SummaryLength::Long => "long",
        }
    }
}

impl fmt::Display for SummaryLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SummaryLength {
    type Err = EduError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" => Ok(SummaryLength::Short),
            "medium" => Ok(SummaryLength::Medium),
            "long" | "detailed" => Ok(SummaryLength::Long),
            other => Err(EduError::InvalidConfig(format!(
                "summary length must be short, medium or long, got '{other}'"
            ))),
        }
    }
}

/// How the summarization key is presented to the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthStyle {
    /// `Authorization: Bearer <key>` (OpenAI and most compatible servers).
    #[default]
    Bearer,
    /// `api-key: <key>` (Azure OpenAI deployments).
    ApiKeyHeader,
}

// ── Summarizer ───────────────────────────────────────────────────────────

/// Configuration for [`crate::pipeline::summarize::ChatCompletionsSummarizer`].
#[derive(Clone)]
pub struct SummarizerConfig {
    /// Full chat-completions URL. Default: OpenAI's.
    pub endpoint: String,

    /// Service key. Required by the HTTP client.
    pub api_key: Option<String>,

    /// Header style for the key. Default: bearer.
    pub auth_style: AuthStyle,

    /// Model name placed in the body. Azure deployments encode the model in
    /// the URL; set this to `None` for them.
    pub model: Option<String>,

    /// Sampling temperature. Default: 0.7.
    pub temperature: f32,

    /// Whole-request timeout in seconds. `0` disables the client-side
    /// timeout. Default: 120.
    pub timeout_secs: u64,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SUMMARY_ENDPOINT.to_string(),
            api_key: None,
            auth_style: AuthStyle::default(),
            model: Some(DEFAULT_SUMMARY_MODEL.to_string()),
            temperature: 0.7,
            timeout_secs: 120,
        }
    }
}

impl fmt::Debug for SummarizerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SummarizerConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("auth_style", &self.auth_style)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl SummarizerConfig {
    pub fn builder() -> SummarizerConfigBuilder {
        SummarizerConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`SummarizerConfig`].
#[derive(Debug)]
pub struct SummarizerConfigBuilder {
    config: SummarizerConfig,
}

impl SummarizerConfigBuilder {
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.config.endpoint = url.into();
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn auth_style(mut self, style: AuthStyle) -> Self {
        self.config.auth_style = style;
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    /// Omit the `model` field from the request body.
    pub fn no_model(mut self) -> Self {
        self.config.model = None;
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t;
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<SummarizerConfig, EduError> {
        let c = &self.config;
        validate_url("summarization endpoint", &c.endpoint)?;
        if !(0.0..=2.0).contains(&c.temperature) {
            return Err(EduError::InvalidConfig(format!(
                "temperature must be 0.0–2.0, got {}",
                c.temperature
            )));
        }
        Ok(self.config)
    }
}

// ── Synthesizer ──────────────────────────────────────────────────────────

/// Configuration for [`crate::pipeline::synthesize::ElevenLabsSynthesizer`].
///
/// Voice and model are fixed per client; there is no per-call selection.
#[derive(Clone)]
pub struct SynthesizerConfig {
    /// API base URL, without the `/v1/...` path.
    pub base_url: String,

    /// Service key. Required.
    pub api_key: Option<String>,

    pub voice_id: String,

    pub model_id: String,

    /// Voice stability, 0.0–1.0. Default: 0.5.
    pub stability: f32,

    /// Similarity boost, 0.0–1.0. Default: 0.5.
    pub similarity_boost: f32,

    /// Whole-request timeout in seconds; `0` disables it. Default: 120.
    pub timeout_secs: u64,
}

impl Default for SynthesizerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SPEECH_BASE_URL.to_string(),
            api_key: None,
            voice_id: DEFAULT_VOICE_ID.to_string(),
            model_id: DEFAULT_SPEECH_MODEL.to_string(),
            stability: 0.5,
            similarity_boost: 0.5,
            timeout_secs: 120,
        }
    }
}

impl fmt::Debug for SynthesizerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SynthesizerConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("voice_id", &self.voice_id)
            .field("model_id", &self.model_id)
            .field("stability", &self.stability)
            .field("similarity_boost", &self.similarity_boost)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl SynthesizerConfig {
    pub fn builder() -> SynthesizerConfigBuilder {
        SynthesizerConfigBuilder {
            config: Self::default(),
        }
    }

    /// Full synthesis URL for the configured voice.
    pub fn speech_url(&self) -> String {
        format!(
            "{}/v1/text-to-speech/{}",
            self.base_url.trim_end_matches('/'),
            self.voice_id
        )
    }
}

/// Builder for [`SynthesizerConfig`].
#[derive(Debug)]
pub struct SynthesizerConfigBuilder {
    config: SynthesizerConfig,
}

impl SynthesizerConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn voice_id(mut self, id: impl Into<String>) -> Self {
        self.config.voice_id = id.into();
        self
    }

    pub fn model_id(mut self, id: impl Into<String>) -> Self {
        self.config.model_id = id.into();
        self
    }

    pub fn stability(mut self, v: f32) -> Self {
        self.config.stability = v;
        self
    }

    pub fn similarity_boost(mut self, v: f32) -> Self {
        self.config.similarity_boost = v;
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<SynthesizerConfig, EduError> {
        let c = &self.config;
        validate_url("speech base URL", &c.base_url)?;
        if c.voice_id.trim().is_empty() {
            return Err(EduError::InvalidConfig("voice id must not be empty".into()));
        }
        for (name, v) in [("stability", c.stability), ("similarity boost", c.similarity_boost)] {
            if !(0.0..=1.0).contains(&v) {
                return Err(EduError::InvalidConfig(format!(
                    "{name} must be 0.0–1.0, got {v}"
                )));
            }
        }
        Ok(self.config)
    }
}

fn validate_url(what: &str, url: &str) -> Result<(), EduError> {
    if url.starts_with("https://") || url.starts_with("http://") {
        Ok(())
    } else {
        Err(EduError::InvalidConfig(format!(
            "{what} must be an http(s) URL, got '{url}'"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_budgets_grow() {
        assert!(SummaryLength::Short.max_tokens() < SummaryLength::Medium.max_tokens());
        assert!(SummaryLength::Medium.max_tokens() < SummaryLength::Long.max_tokens());
        assert_eq!(SummaryLength::default(), SummaryLength::Medium);
    }

    #[test]
    fn length_parses_case_insensitively() {
        assert_eq!("SHORT".parse::<SummaryLength>().unwrap(), SummaryLength::Short);
        assert_eq!("detailed".parse::<SummaryLength>().unwrap(), SummaryLength::Long);
        assert!("tiny".parse::<SummaryLength>().is_err());
    }

    #[test]
    fn summarizer_builder_validates() {
        assert!(SummarizerConfig::builder().temperature(2.5).build().is_err());
        assert!(SummarizerConfig::builder().endpoint("ftp://x").build().is_err());
        let c = SummarizerConfig::builder()
            .endpoint("http://localhost:9000/chat")
            .api_key("k")
            .auth_style(AuthStyle::ApiKeyHeader)
            .no_model()
            .build()
            .unwrap();
        assert_eq!(c.model, None);
        assert_eq!(c.auth_style, AuthStyle::ApiKeyHeader);
    }

    #[test]
    fn synthesizer_builder_validates() {
        assert!(SynthesizerConfig::builder().stability(1.5).build().is_err());
        assert!(SynthesizerConfig::builder().voice_id(" ").build().is_err());
        assert!(SynthesizerConfig::builder().build().is_ok());
    }

    #[test]
    fn speech_url_joins_cleanly() {
        let c = SynthesizerConfig::builder()
            .base_url("http://127.0.0.1:8080/")
            .voice_id("abc")
            .build()
            .unwrap();
        assert_eq!(c.speech_url(), "http://127.0.0.1:8080/v1/text-to-speech/abc");
    }

    #[test]
    fn debug_redacts_keys() {
        let c = SynthesizerConfig::builder().api_key("sk_secret").build().unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("sk_secret"));
        assert!(dbg.contains("<redacted>"));

        let c = SummarizerConfig::builder().api_key("sk-secret").build().unwrap();
        assert!(!format!("{c:?}").contains("sk-secret"));
    }
}
