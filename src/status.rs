//! Per-item pipeline status and its transition function.
//!
//! ```text
//! uploading ─▶ processing ─▶ completed ─▶ summarizing ─▶ generating-voice ─▶ ready
//!     │            │             │             │                │
//!     └────────────┴─────────────┴─────────────┴────────────────┴──▶ error
//! ```
//!
//! `ready` and `error` are terminal. [`ItemStatus::transition`] is total over
//! every `(status, event)` pair: an edge not drawn above comes back as
//! [`InvalidTransition`] rather than a new status.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Where a tracked item currently sits in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemStatus {
    /// Accepted; extraction not yet started.
    Uploading,
    /// Text extraction in flight.
    Processing,
    /// Text extracted; waiting for the user to request a summary.
    Completed,
    /// Summarization request in flight.
    Summarizing,
    /// Speech synthesis request in flight.
    GeneratingVoice,
    /// Summary and audio attached.
    Ready,
    /// A stage failed; the item carries an error message.
    Error,
}

/// Outcome or request that moves an item along its pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StageEvent {
    /// The file was accepted into the collection.
    Accepted,
    /// Extraction succeeded.
    Extracted,
    /// The user asked for summary + voice.
    SummaryRequested,
    /// Summarization succeeded.
    Summarized,
    /// Synthesis succeeded.
    Synthesized,
    /// The current stage failed.
    Failed,
}

/// An edge that does not exist in the status graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid status transition: {event:?} while '{from}'")]
pub struct InvalidTransition {
    pub from: ItemStatus,
    pub event: StageEvent,
}

impl ItemStatus {
    /// All statuses in pipeline order, `error` last.
    pub const ALL: [ItemStatus; 7] = [
        ItemStatus::Uploading,
        ItemStatus::Processing,
        ItemStatus::Completed,
        ItemStatus::Summarizing,
        ItemStatus::GeneratingVoice,
        ItemStatus::Ready,
        ItemStatus::Error,
    ];

    /// Next status after `event`, or [`InvalidTransition`] if no such edge exists.
    pub fn transition(self, event: StageEvent) -> Result<ItemStatus, InvalidTransition> {
        use ItemStatus::*;
        use StageEvent::*;

        match (self, event) {
            (Uploading, Accepted) => Ok(Processing),
            (Processing, Extracted) => Ok(Completed),
            (Completed, SummaryRequested) => Ok(Summarizing),
            (Summarizing, Summarized) => Ok(GeneratingVoice),
            (GeneratingVoice, Synthesized) => Ok(Ready),
            (Uploading | Processing | Completed | Summarizing | GeneratingVoice, Failed) => Ok(Error),
            (from, event) => Err(InvalidTransition { from, event }),
        }
    }

    pub fn is_terminal(self) -> bool {
        match self {
            ItemStatus::Ready | ItemStatus::Error => true,
            ItemStatus::Uploading
            | ItemStatus::Processing
            | ItemStatus::Completed
            | ItemStatus::Summarizing
            | ItemStatus::GeneratingVoice => false,
        }
    }

    /// True while a stage operation is in flight for the item.
    pub fn is_busy(self) -> bool {
        match self {
            ItemStatus::Uploading
            | ItemStatus::Processing
            | ItemStatus::Summarizing
            | ItemStatus::GeneratingVoice => true,
            ItemStatus::Completed | ItemStatus::Ready | ItemStatus::Error => false,
        }
    }

    /// Wire/log name, e.g. `generating-voice`.
    pub fn as_str(self) -> &'static str {
        match self {
            ItemStatus::Uploading => "uploading",
            ItemStatus::Processing => "processing",
            ItemStatus::Completed => "completed",
            ItemStatus::Summarizing => "summarizing",
            ItemStatus::GeneratingVoice => "generating-voice",
            ItemStatus::Ready => "ready",
            ItemStatus::Error => "error",
        }
    }

    /// Human-readable label shown next to the item.
    pub fn label(self) -> &'static str {
        match self {
            ItemStatus::Uploading => "Uploading...",
            ItemStatus::Processing => "Extracting text...",
            ItemStatus::Completed => "Text extracted - Ready for summary",
            ItemStatus::Summarizing => "Generating AI summary...",
            ItemStatus::GeneratingVoice => "Creating voice audio...",
            ItemStatus::Ready => "Ready to play!",
            ItemStatus::Error => "Processing failed",
        }
    }

    /// Single-character status icon for terminal output.
    pub fn glyph(self) -> &'static str {
        match self {
            ItemStatus::Uploading
            | ItemStatus::Processing
            | ItemStatus::Summarizing
            | ItemStatus::GeneratingVoice => "◌",
            ItemStatus::Completed => "✓",
            ItemStatus::Ready => "▶",
            ItemStatus::Error => "✗",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
