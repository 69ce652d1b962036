//! # edusummarize
//!
//! Turn educational PDFs into short summaries and spoken audio.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF upload
//!  │
//!  ├─ 1. Extract    text layer of every page via pdfium (spawn_blocking)
//!  │                → item waits in `completed` until a summary is requested
//!  ├─ 2. Summarize  one chat-completions request (short / medium / long)
//!  ├─ 3. Polish     deterministic cleanup of the generated text
//!  ├─ 4. Speak      one text-to-speech request → MP3 clip
//!  └─ 5. Play       temp-file audio handle, single playback slot, download
//! ```
//!
//! Each uploaded file is a [`TrackedItem`] with its own [`ItemStatus`]; the
//! [`PipelineController`] runs every stage as an independent Tokio task so
//! files never wait on each other.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edusummarize::{
//!     ChatCompletionsSummarizer, ElevenLabsSynthesizer, PdfiumExtractor, PipelineController,
//!     SourceFile, Stages, SummarizerConfig, SummaryLength, SynthesizerConfig,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let summarizer = SummarizerConfig::builder()
//!         .api_key(std::env::var("EDUSUMMARIZE_LLM_API_KEY")?)
//!         .build()?;
//!     let synthesizer = SynthesizerConfig::builder()
//!         .api_key(std::env::var("ELEVENLABS_API_KEY")?)
//!         .build()?;
//!
//!     let controller = PipelineController::new(Stages {
//!         extractor: Arc::new(PdfiumExtractor::new()),
//!         summarizer: Arc::new(ChatCompletionsSummarizer::new(summarizer)?),
//!         synthesizer: Arc::new(ElevenLabsSynthesizer::new(synthesizer)?),
//!     });
//!
//!     let id = controller.submit(SourceFile::from_path("lecture.pdf").await?);
//!     controller.wait_idle().await;
//!     controller.generate(id, SummaryLength::Short)?;
//!     controller.wait_idle().await;
//!
//!     if let Some(item) = controller.get(id) {
//!         println!("{}: {}", item.status.label(), item.summary.unwrap_or_default());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature     | Default | Description |
//! |-------------|---------|-------------|
//! | `cli`       | on      | The `edusummarize` binary (clap, anyhow, indicatif, tracing-subscriber) |
//! | `clipboard` | via cli | [`clipboard::copy_summary`] (arboard) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod audio;
#[cfg(feature = "clipboard")]
pub mod clipboard;
pub mod config;
pub mod controller;
pub mod error;
pub mod item;
pub mod observer;
pub mod output;
pub mod pipeline;
pub mod playback;
pub mod prompts;
pub mod status;
pub mod voice;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use audio::{save_clip, AudioClip, AudioHandle, DEFAULT_DOWNLOAD_NAME};
pub use config::{AuthStyle, SummarizerConfig, SummaryLength, SynthesizerConfig};
pub use controller::{PipelineController, Stages};
pub use error::{
    ClipboardError, ControllerError, EduError, ExtractionError, StageError, SummarizationError,
    SynthesisError,
};
pub use item::{ItemId, SourceFile, TrackedItem};
pub use observer::{NoopObserver, PipelineObserver};
pub use output::{ItemReport, SessionReport, SessionStats};
pub use pipeline::{
    ChatCompletionsSummarizer, ElevenLabsSynthesizer, PdfiumExtractor, ProviderSummarizer,
    SpeechSynthesizer, Summarizer, TextExtractor,
};
pub use playback::{PlaybackChange, PlaybackSlot};
pub use status::{InvalidTransition, ItemStatus, StageEvent};
pub use voice::{VoiceSession, SAMPLE_TEXTS};
