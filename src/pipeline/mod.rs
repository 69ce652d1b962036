//! Pipeline stages for PDF → summary → speech.
//!
//! Each submodule implements exactly one transformation step behind a trait,
//! so the controller can be driven by real clients or by test fakes.
//!
//! ## Data Flow
//!
//! ```text
//! extract ──▶ summarize ──▶ postprocess ──▶ synthesize
//! (pdfium)    (chat model)   (cleanup)      (speech API)
//! ```
//!
//! 1. [`extract`]    : pull the text layer out of every page; runs in
//!    `spawn_blocking` because pdfium is synchronous
//! 2. [`summarize`]  : one chat-completions request per call, no retry
//! 3. [`postprocess`] : deterministic cleanup of the generated text
//! 4. [`synthesize`] : one text-to-speech request per call, no retry

pub mod extract;
pub mod postprocess;
pub mod summarize;
pub mod synthesize;

pub use extract::{PdfiumExtractor, TextExtractor};
pub use summarize::{ChatCompletionsSummarizer, ProviderSummarizer, Summarizer};
pub use synthesize::{ElevenLabsSynthesizer, SpeechSynthesizer};
