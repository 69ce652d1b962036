//! Speech synthesis: turn summary text into spoken audio.

use crate::audio::{AudioClip, MPEG_AUDIO};
use crate::config::{SynthesizerConfig, SPEECH_KEY_ENV};
use crate::error::{EduError, SynthesisError};
use crate::pipeline::summarize::{describe_reqwest, truncate};
use async_trait::async_trait;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Converts text to an encoded audio clip.
///
/// Voice and model are fixed by the implementation's configuration.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<AudioClip, SynthesisError>;
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

#[derive(Debug, Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
}

/// [`SpeechSynthesizer`] for the ElevenLabs text-to-speech API.
#[derive(Debug, Clone)]
pub struct ElevenLabsSynthesizer {
    client: reqwest::Client,
    config: SynthesizerConfig,
    api_key: String,
}

impl ElevenLabsSynthesizer {
    /// Build a client. Fails when no API key is configured.
    pub fn new(config: SynthesizerConfig) -> Result<Self, EduError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(EduError::MissingCredential {
                service: "speech synthesis",
                env_var: SPEECH_KEY_ENV,
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

    pub fn config(&self) -> &SynthesizerConfig {
        &self.config
    }
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<AudioClip, SynthesisError> {
        if text.trim().is_empty() {
            return Err(SynthesisError::EmptyInput);
        }

        let body = SpeechRequest {
            text,
            model_id: &self.config.model_id,
            voice_settings: VoiceSettings {
                stability: self.config.stability,
                similarity_boost: self.config.similarity_boost,
            },
        };

        let start = Instant::now();
        info!(
            "Requesting speech for {} chars (voice {})",
            text.chars().count(),
            self.config.voice_id
        );

        let response = self
            .client
            .post(self.config.speech_url())
            .header(reqwest::header::ACCEPT, MPEG_AUDIO)
            .header("xi-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| SynthesisError::Request(describe_reqwest(&e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SynthesisError::Status {
                status: status.as_u16(),
                body: truncate(&body, 500),
            });
        }

        let mime = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| v.starts_with("audio/"))
            .unwrap_or(MPEG_AUDIO)
            .to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SynthesisError::Body(e.to_string()))?;
        if bytes.is_empty() {
            return Err(SynthesisError::EmptyAudio);
        }

        debug!("Speech: {} bytes of {} in {:?}", bytes.len(), mime, start.elapsed());
        Ok(AudioClip::new(bytes.to_vec(), mime))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_rejected_at_construction() {
        let err = ElevenLabsSynthesizer::new(SynthesizerConfig::default()).unwrap_err();
        assert!(err.to_string().contains(SPEECH_KEY_ENV));
    }

    #[tokio::test]
    async fn empty_input_is_rejected_locally() {
        let config = SynthesizerConfig::builder()
            .base_url("http://127.0.0.1:9")
            .api_key("k")
            .build()
            .unwrap();
        let s = ElevenLabsSynthesizer::new(config).unwrap();
        assert!(matches!(
            s.synthesize(" ").await.unwrap_err(),
            SynthesisError::EmptyInput
        ));
    }

    #[test]
    fn request_body_shape() {
        let body = SpeechRequest {
            text: "test",
            model_id: "eleven_monolingual_v1",
            voice_settings: VoiceSettings {
                stability: 0.5,
                similarity_boost: 0.5,
            },
        };
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(v["text"], "test");
        assert_eq!(v["model_id"], "eleven_monolingual_v1");
        assert_eq!(v["voice_settings"]["stability"], 0.5);
        assert_eq!(v["voice_settings"]["similarity_boost"], 0.5);
    }
}
