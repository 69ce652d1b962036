//! Observer trait for per-item pipeline events.
//!
//! Inject an [`Arc<dyn PipelineObserver>`] into
//! [`crate::controller::PipelineController::with_observer`] to be told when
//! items are accepted, change status, become playable or fail. The CLI drives
//! its progress bars from these; a GUI would raise toast notifications.
//!
//! # Example
//!
//! ```rust
//! use edusummarize::{ItemId, ItemStatus, PipelineObserver};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! struct FailureCounter(AtomicUsize);
//!
//! impl PipelineObserver for FailureCounter {
//!     fn on_item_error(&self, _id: ItemId, name: &str, error: &str) {
//!         self.0.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{name}: {error}");
//!     }
//! }
//! ```

use crate::item::ItemId;
use crate::status::ItemStatus;
use std::sync::Arc;

/// Called by the controller as items move through the pipeline.
///
/// Stage tasks for different items run concurrently, so methods may be
/// called from several threads at once. All methods default to no-ops.
/// Calls are never made while the item collection is locked.
pub trait PipelineObserver: Send + Sync {
    /// A file was accepted into the collection.
    fn on_item_accepted(&self, id: ItemId, name: &str) {
        let _ = (id, name);
    }

    /// An item moved from `from` to `to`.
    fn on_status_change(&self, id: ItemId, from: ItemStatus, to: ItemStatus) {
        let _ = (id, from, to);
    }

    /// Extraction finished; `chars` is the length of the extracted text.
    fn on_extraction_complete(&self, id: ItemId, chars: usize) {
        let _ = (id, chars);
    }

    /// Summary and audio are attached; the item is playable.
    fn on_item_ready(&self, id: ItemId, name: &str) {
        let _ = (id, name);
    }

    /// A stage failed; `error` is the message stored on the item.
    fn on_item_error(&self, id: ItemId, name: &str, error: &str) {
        let _ = (id, name, error);
    }
}

/// Observer that ignores every event. The controller default.
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Shared observer handle as stored by the controller.
pub type SharedObserver = Arc<dyn PipelineObserver>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        accepted: AtomicUsize,
        changes: Mutex<Vec<(ItemStatus, ItemStatus)>>,
        errors: AtomicUsize,
    }

    impl PipelineObserver for Recorder {
        fn on_item_accepted(&self, _id: ItemId, _name: &str) {
            self.accepted.fetch_add(1, Ordering::SeqCst);
        }

        fn on_status_change(&self, _id: ItemId, from: ItemStatus, to: ItemStatus) {
            self.changes.lock().unwrap().push((from, to));
        }

        fn on_item_error(&self, _id: ItemId, _name: &str, _error: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_observer_does_not_panic() {
        let o = NoopObserver;
        let id = ItemId::from_raw(1);
        o.on_item_accepted(id, "a.pdf");
        o.on_status_change(id, ItemStatus::Uploading, ItemStatus::Processing);
        o.on_extraction_complete(id, 42);
        o.on_item_ready(id, "a.pdf");
        o.on_item_error(id, "a.pdf", "boom");
    }

    #[test]
    fn overridden_methods_receive_events() {
        let r = Recorder::default();
        let id = ItemId::from_raw(2);
        r.on_item_accepted(id, "b.pdf");
        r.on_status_change(id, ItemStatus::Uploading, ItemStatus::Processing);
        r.on_status_change(id, ItemStatus::Processing, ItemStatus::Error);
        r.on_item_error(id, "b.pdf", "corrupt");
        r.on_item_ready(id, "b.pdf");

        assert_eq!(r.accepted.load(Ordering::SeqCst), 1);
        assert_eq!(r.errors.load(Ordering::SeqCst), 1);
        assert_eq!(
            r.changes.lock().unwrap().last(),
            Some(&(ItemStatus::Processing, ItemStatus::Error))
        );
    }

    #[test]
    fn shared_observer_is_object_safe() {
        let o: SharedObserver = Arc::new(NoopObserver);
        o.on_item_accepted(ItemId::from_raw(3), "c.pdf");
    }
}
