//! Tracked file items: one record per submitted document.
//!
//! Stage outputs are attached only through the `record_*` methods, each of
//! which first validates the status transition. An item that has already
//! failed therefore can never pick up a late summary or audio clip.

use crate::audio::{AudioClip, AudioHandle};
use crate::error::{EduError, StageError};
use crate::status::{InvalidTransition, ItemStatus, StageEvent};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Length of the extracted-text preview, in characters.
pub const PREVIEW_CHARS: usize = 200;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identity of a tracked item for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(u64);

impl ItemId {
    pub(crate) fn next() -> Self {
        ItemId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Rebuild an id from its numeric value (e.g. parsed back from a report).
    pub fn from_raw(raw: u64) -> Self {
        ItemId(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The original upload: a file name plus its binary content.
#[derive(Clone)]
pub struct SourceFile {
    name: String,
    bytes: Arc<[u8]>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        let bytes: Vec<u8> = bytes.into();
        Self {
            name: name.into(),
            bytes: Arc::from(bytes),
        }
    }

    /// Read a file from disk, naming it after its final path component.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, EduError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| EduError::InputReadFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// File name without its extension, for naming derived artifacts.
    pub fn stem(&self) -> &str {
        Path::new(&self.name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.name)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceFile")
            .field("name", &self.name)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// One submitted document and everything derived from it so far.
#[derive(Debug, Clone)]
pub struct TrackedItem {
    pub id: ItemId,
    pub file: SourceFile,
    /// Present once extraction succeeded.
    pub text: Option<String>,
    /// Present once summarization succeeded.
    pub summary: Option<String>,
    /// Present once synthesis succeeded.
    pub audio: Option<AudioClip>,
    /// Shared with snapshots; the temp file goes away with the last clone.
    pub handle: Option<Arc<AudioHandle>>,
    pub status: ItemStatus,
    pub error: Option<String>,
}

impl TrackedItem {
    /// A freshly accepted item in `uploading`.
    pub fn new(file: SourceFile) -> Self {
        Self {
            id: ItemId::next(),
            file,
            text: None,
            summary: None,
            audio: None,
            handle: None,
            status: ItemStatus::Uploading,
            error: None,
        }
    }

    /// Apply a bare event (no payload). Returns `(from, to)`.
    pub fn apply(&mut self, event: StageEvent) -> Result<(ItemStatus, ItemStatus), InvalidTransition> {
        let from = self.status;
        let to = from.transition(event)?;
        self.status = to;
        Ok((from, to))
    }

    /// `processing → completed`, attaching the extracted text.
    pub fn record_text(&mut self, text: String) -> Result<(ItemStatus, ItemStatus), InvalidTransition> {
        let change = self.apply(StageEvent::Extracted)?;
        self.text = Some(text);
        Ok(change)
    }

    /// `summarizing → generating-voice`, attaching the summary.
    pub fn record_summary(
        &mut self,
        summary: String,
    ) -> Result<(ItemStatus, ItemStatus), InvalidTransition> {
        let change = self.apply(StageEvent::Summarized)?;
        self.summary = Some(summary);
        Ok(change)
    }

    /// `generating-voice → ready`, attaching the clip and its handle.
    pub fn record_audio(
        &mut self,
        audio: AudioClip,
        handle: Arc<AudioHandle>,
    ) -> Result<(ItemStatus, ItemStatus), InvalidTransition> {
        let change = self.apply(StageEvent::Synthesized)?;
        self.audio = Some(audio);
        self.handle = Some(handle);
        Ok(change)
    }

    /// Any non-terminal status `→ error`, attaching the message.
    pub fn record_failure(
        &mut self,
        error: &StageError,
    ) -> Result<(ItemStatus, ItemStatus), InvalidTransition> {
        let change = self.apply(StageEvent::Failed)?;
        self.error = Some(error.to_string());
        Ok(change)
    }

    /// First [`PREVIEW_CHARS`] characters of the extracted text followed by `...`.
    pub fn preview(&self) -> Option<String> {
        self.text.as_deref().map(|text| {
            let head: String = text.chars().take(PREVIEW_CHARS).collect();
            format!("{head}...")
        })
    }
}
