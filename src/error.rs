//! Error types for the edusummarize library.
//!
//! Two layers of errors reflect two distinct failure modes:
//!
//! * [`EduError`] is **fatal** for the operation that returned it: bad
//!   configuration, a missing credential, an unreadable input file or an
//!   output file that could not be written.
//!
//! * Stage errors ([`ExtractionError`], [`SummarizationError`],
//!   [`SynthesisError`]) are **non-fatal** for the session. A single tracked
//!   item failed one pipeline stage. The controller records them on the item
//!   as a [`StageError`] and every other item keeps going.
//!
//! [`ClipboardError`] is cosmetic; callers report it and move on.

use crate::item::ItemId;
use crate::status::ItemStatus;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors returned by configuration, client construction and file I/O.
#[derive(Debug, Error)]
pub enum EduError {
    // ── Config errors ─────────────────────────────────────────────────────
    /// An API key is required but was not supplied.
    #[error("No API key configured for {service}.\nSet {env_var} or pass the key on the command line.")]
    MissingCredential {
        service: &'static str,
        env_var: &'static str,
    },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The named LLM provider could not be initialised.
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// reqwest refused to build a client (TLS backend failure etc.).
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// An input file could not be read.
    #[error("Failed to read '{path}': {source}")]
    InputReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not create or write an output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A download was requested before any audio was generated.
    #[error("No audio has been generated yet")]
    NoAudio,
}

/// PDF text extraction failed. No partial text is ever returned.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractionError {
    /// The file has no content at all.
    #[error("'{name}' is empty")]
    EmptyFile { name: String },

    /// The content does not start with the `%PDF` signature.
    #[error("'{name}' is not a valid PDF (first bytes: {magic:?})")]
    NotAPdf { name: String, magic: Vec<u8> },

    /// The PDF is password protected.
    #[error("'{name}' is encrypted and cannot be read without a password")]
    Encrypted { name: String },

    /// pdfium could not parse the document.
    #[error("'{name}' could not be parsed: {detail}")]
    Corrupt { name: String, detail: String },

    /// Parsing succeeded but no page carries text (scanned or image-only PDF).
    #[error("'{name}' contains no extractable text")]
    NoText { name: String },

    /// The pdfium shared library could not be bound.
    #[error(
        "PDF engine unavailable: {0}\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium or install pdfium system-wide."
    )]
    EngineUnavailable(String),

    /// The blocking extraction task panicked or was aborted.
    #[error("Extraction task failed: {0}")]
    TaskFailed(String),
}

/// The remote summarization call did not produce a summary.
#[derive(Debug, Error)]
pub enum SummarizationError {
    /// Nothing to summarize; rejected before any request is made.
    #[error("Please enter some text to summarize")]
    EmptyInput,

    /// Transport-level failure (DNS, TLS, connection reset, client timeout).
    #[error("Summarization request failed: {0}")]
    Request(String),

    /// The endpoint answered with a non-success status.
    #[error("Summarization endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The body was not the expected chat-completions JSON.
    #[error("Summarization response was malformed: {0}")]
    MalformedResponse(String),

    /// The response parsed but held no generated text.
    #[error("Summarization endpoint returned no text")]
    EmptyResponse,

    /// An `edgequake-llm` provider reported an error.
    #[error("LLM provider error: {0}")]
    Provider(String),
}

/// The remote speech synthesis call did not produce audio.
#[derive(Debug, Error)]
pub enum SynthesisError {
    /// Nothing to speak; rejected before any request is made.
    #[error("Please enter some text to convert to speech")]
    EmptyInput,

    /// Transport-level failure.
    #[error("Speech request failed: {0}")]
    Request(String),

    /// The endpoint answered with a non-success status.
    #[error("Speech endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The audio body could not be read.
    #[error("Failed to read audio stream: {0}")]
    Body(String),

    /// The endpoint returned a success status with zero audio bytes.
    #[error("Speech endpoint returned an empty audio stream")]
    EmptyAudio,

    /// The audio could not be staged into a playable handle.
    #[error("Failed to create audio handle: {0}")]
    Handle(String),
}

/// Copying a summary to the system clipboard failed.
#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("Clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to copy to clipboard: {0}")]
    Write(String),
}

/// A non-fatal, per-item stage failure.
///
/// Stored as a message on [`crate::item::TrackedItem`] and reported to the
/// [`crate::observer::PipelineObserver`]; serialisable so it can be included
/// in JSON reports.
#[derive(Debug, Clone, Error, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum StageError {
    #[error("Text extraction failed: {0}")]
    Extraction(String),

    #[error("Summary generation failed: {0}")]
    Summarization(String),

    #[error("Voice generation failed: {0}")]
    Synthesis(String),
}

impl From<ExtractionError> for StageError {
    fn from(e: ExtractionError) -> Self {
        StageError::Extraction(e.to_string())
    }
}

impl From<SummarizationError> for StageError {
    fn from(e: SummarizationError) -> Self {
        StageError::Summarization(e.to_string())
    }
}

impl From<SynthesisError> for StageError {
    fn from(e: SynthesisError) -> Self {
        StageError::Synthesis(e.to_string())
    }
}

/// Rejected user action on the pipeline controller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ControllerError {
    /// No tracked item carries this id (never submitted, or already removed).
    #[error("No tracked item with id {0}")]
    UnknownItem(ItemId),

    /// Summary generation was requested for an item that is not `completed`.
    #[error("Item {id} is '{status}', summary generation needs 'completed'")]
    NotReady { id: ItemId, status: ItemStatus },
}
