//! Serializable reports of pipeline state, used by the CLI's `--json` mode.

use crate::item::{ItemId, TrackedItem};
use crate::status::ItemStatus;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Everything known about one item at the time of the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemReport {
    pub id: ItemId,
    pub file_name: String,
    pub file_bytes: usize,
    pub status: ItemStatus,
    /// Human-readable status label.
    pub label: String,
    /// First 200 characters of the extracted text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_chars: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_bytes: Option<usize>,
    /// Where the audio was saved, if it was.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&TrackedItem> for ItemReport {
    fn from(item: &TrackedItem) -> Self {
        Self {
            id: item.id,
            file_name: item.file.name().to_string(),
            file_bytes: item.file.len(),
            status: item.status,
            label: item.status.label().to_string(),
            preview: item.preview(),
            text_chars: item.text.as_ref().map(|t| t.chars().count()),
            summary: item.summary.clone(),
            audio_bytes: item.audio.as_ref().map(|a| a.len()),
            audio_path: None,
            error: item.error.clone(),
        }
    }
}

/// Aggregate counts over a whole session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total: usize,
    pub ready: usize,
    pub completed: usize,
    pub failed: usize,
    pub in_flight: usize,
    pub total_duration_ms: u64,
}

/// A report over every item in a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub items: Vec<ItemReport>,
    pub stats: SessionStats,
}

impl SessionReport {
    pub fn new(items: Vec<ItemReport>, total_duration_ms: u64) -> Self {
        let mut stats = SessionStats {
            total: items.len(),
            total_duration_ms,
            ..Default::default()
        };
        for item in &items {
            match item.status {
                ItemStatus::Ready => stats.ready += 1,
                ItemStatus::Completed => stats.completed += 1,
                ItemStatus::Error => stats.failed += 1,
                ItemStatus::Uploading
                | ItemStatus::Processing
                | ItemStatus::Summarizing
                | ItemStatus::GeneratingVoice => stats.in_flight += 1,
            }
        }
        Self { items, stats }
    }

    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a TrackedItem>, total_duration_ms: u64) -> Self {
        Self::new(items.into_iter().map(ItemReport::from).collect(), total_duration_ms)
    }

    /// True when any item ended in `error`.
    pub fn has_failures(&self) -> bool {
        self.stats.failed > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StageError;
    use crate::item::SourceFile;
    use crate::status::StageEvent;

    fn completed(name: &str) -> TrackedItem {
        let mut it = TrackedItem::new(SourceFile::new(name, b"%PDF".to_vec()));
        it.apply(StageEvent::Accepted).unwrap();
        it.record_text("Cells are the basic unit of life.".into()).unwrap();
        it
    }

    #[test]
    fn report_counts_by_status() {
        let ok = completed("a.pdf");
        let mut bad = TrackedItem::new(SourceFile::new("b.pdf", Vec::new()));
        bad.apply(StageEvent::Accepted).unwrap();
        bad.record_failure(&StageError::Extraction("empty".into())).unwrap();

        let report = SessionReport::from_items([&ok, &bad], 12);
        assert_eq!(report.stats.total, 2);
        assert_eq!(report.stats.completed, 1);
        assert_eq!(report.stats.failed, 1);
        assert!(report.has_failures());
        assert_eq!(report.items[1].error.as_deref(), Some("Text extraction failed: empty"));
    }

    #[test]
    fn json_omits_absent_outputs() {
        let report = ItemReport::from(&completed("c.pdf"));
        let v = serde_json::to_value(&report).unwrap();
        assert_eq!(v["status"], "completed");
        assert_eq!(v["label"], "Text extracted - Ready for summary");
        assert!(v["preview"].as_str().unwrap().ends_with("..."));
        assert!(v.get("summary").is_none());
        assert!(v.get("error").is_none());
    }
}
