//! The upload pipeline controller.
//!
//! Owns the collection of [`TrackedItem`]s and drives each one through
//! extraction, then (on explicit request) summarization and synthesis.
//!
//! ## Concurrency
//!
//! Every stage run is its own `tokio::spawn`ed task, so items progress
//! independently: a slow or failing document never holds up another. The
//! collection sits behind a `std::sync::Mutex` that is only ever held for a
//! short synchronous update and never across an `.await`. Items are always
//! located by [`ItemId`], never by position, because the collection can change
//! while a stage is in flight.
//!
//! ## Removal while in flight
//!
//! Requests are not cancelled. When a stage finishes for an item that has
//! since been removed, its result is dropped on the floor; an audio handle
//! created for it is released immediately.

use crate::audio::AudioHandle;
use crate::config::SummaryLength;
use crate::error::{ControllerError, StageError, SynthesisError};
use crate::item::{ItemId, SourceFile, TrackedItem};
use crate::observer::{NoopObserver, SharedObserver};
use crate::pipeline::postprocess::speech_text;
use crate::pipeline::{SpeechSynthesizer, Summarizer, TextExtractor};
use crate::status::{InvalidTransition, ItemStatus, StageEvent};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// The three stage implementations a controller drives.
#[derive(Clone)]
pub struct Stages {
    pub extractor: Arc<dyn TextExtractor>,
    pub summarizer: Arc<dyn Summarizer>,
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
}

/// Cheaply cloneable handle to a shared item collection.
#[derive(Clone)]
pub struct PipelineController {
    inner: Arc<Inner>,
}

struct Inner {
    items: Mutex<Vec<TrackedItem>>,
    stages: Stages,
    observer: SharedObserver,
    tasks: Mutex<Vec<JoinHandle<()>>>,
    audio_dir: Option<PathBuf>,
}

type Change = (ItemStatus, ItemStatus);

impl PipelineController {
    pub fn new(stages: Stages) -> Self {
        Self::with_observer(stages, Arc::new(NoopObserver))
    }

    pub fn with_observer(stages: Stages, observer: SharedObserver) -> Self {
        Self::build(stages, observer, None)
    }

    /// Like [`Self::with_observer`], with playback files created in `audio_dir`
    /// instead of the system temp directory.
    pub fn with_audio_dir(stages: Stages, observer: SharedObserver, audio_dir: impl Into<PathBuf>) -> Self {
        Self::build(stages, observer, Some(audio_dir.into()))
    }

    fn build(stages: Stages, observer: SharedObserver, audio_dir: Option<PathBuf>) -> Self {
        Self {
            inner: Arc::new(Inner {
                items: Mutex::new(Vec::new()),
                stages,
                observer,
                tasks: Mutex::new(Vec::new()),
                audio_dir,
            }),
        }
    }

    /// Accept a file and start extracting its text.
    ///
    /// The item is `processing` by the time this returns. Must be called from
    /// within a Tokio runtime.
    pub fn submit(&self, file: SourceFile) -> ItemId {
        let mut item = TrackedItem::new(file.clone());
        let id = item.id;
        let name = file.name().to_string();
        let change = item.apply(StageEvent::Accepted);

        self.inner.lock_items().push(item);
        info!("Accepted '{}' as item {}", name, id);
        self.inner.observer.on_item_accepted(id, &name);
        self.inner.report(id, change);

        let inner = Arc::clone(&self.inner);
        self.inner
            .track(tokio::spawn(async move { inner.run_extraction(id, file).await }));
        id
    }

    /// Request summary and voice generation for a `completed` item.
    pub fn generate(&self, id: ItemId, length: SummaryLength) -> Result<(), ControllerError> {
        let (text, name, change) = {
            let mut items = self.inner.lock_items();
            let item = items
                .iter_mut()
                .find(|it| it.id == id)
                .ok_or(ControllerError::UnknownItem(id))?;

            if item.status != ItemStatus::Completed {
                return Err(ControllerError::NotReady {
                    id,
                    status: item.status,
                });
            }
            let text = item.text.clone().unwrap_or_default();
            let change = item.apply(StageEvent::SummaryRequested);
            (text, item.file.name().to_string(), change)
        };

        info!("Generating {} summary for '{}' ({})", length, name, id);
        self.inner.report(id, change);

        let inner = Arc::clone(&self.inner);
        self.inner.track(tokio::spawn(async move {
            inner.run_generation(id, name, text, length).await
        }));
        Ok(())
    }

    /// Remove exactly the item with this id. Any later stage result for it is discarded.
    pub fn remove(&self, id: ItemId) -> Option<TrackedItem> {
        let mut items = self.inner.lock_items();
        let pos = items.iter().position(|it| it.id == id)?;
        let removed = items.remove(pos);
        debug!("Removed item {} ('{}')", id, removed.file.name());
        Some(removed)
    }

    /// Copy of the item's current state.
    pub fn get(&self, id: ItemId) -> Option<TrackedItem> {
        self.inner.lock_items().iter().find(|it| it.id == id).cloned()
    }

    /// Copy of every item, in submission order.
    pub fn snapshot(&self) -> Vec<TrackedItem> {
        self.inner.lock_items().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.lock_items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock_items().is_empty()
    }

    /// Wait until no stage task is in flight, including tasks started while waiting.
    pub async fn wait_idle(&self) {
        loop {
            let pending = std::mem::take(&mut *self.inner.lock_tasks());
            if pending.is_empty() {
                return;
            }
            for task in pending {
                if let Err(e) = task.await {
                    error!("Stage task ended abnormally: {}", e);
                }
            }
        }
    }
}

impl Inner {
    fn lock_items(&self) -> MutexGuard<'_, Vec<TrackedItem>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_tasks(&self) -> MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn track(&self, task: JoinHandle<()>) {
        let mut tasks = self.lock_tasks();
        tasks.retain(|t| !t.is_finished());
        tasks.push(task);
    }

    /// Apply `f` to the item with `id`, if it is still tracked.
    fn update<R>(&self, id: ItemId, f: impl FnOnce(&mut TrackedItem) -> R) -> Option<R> {
        let mut items = self.lock_items();
        items.iter_mut().find(|it| it.id == id).map(f)
    }

    /// Run a transition on the item and notify the observer.
    ///
    /// Returns `false` when the item is gone or the edge does not exist.
    fn advance(
        &self,
        id: ItemId,
        f: impl FnOnce(&mut TrackedItem) -> Result<Change, InvalidTransition>,
    ) -> bool {
        match self.update(id, f) {
            Some(change) => self.report(id, change),
            None => {
                debug!("Item {} was removed; discarding stage result", id);
                false
            }
        }
    }

    fn report(&self, id: ItemId, change: Result<Change, InvalidTransition>) -> bool {
        match change {
            Ok((from, to)) => {
                debug!("Item {}: {} -> {}", id, from, to);
                self.observer.on_status_change(id, from, to);
                true
            }
            Err(e) => {
                error!("Item {}: {}", id, e);
                false
            }
        }
    }

    fn fail(&self, id: ItemId, name: &str, err: StageError) {
        warn!("'{}' ({}): {}", name, id, err);
        if self.advance(id, |it| it.record_failure(&err)) {
            self.observer.on_item_error(id, name, &err.to_string());
        }
    }

    async fn run_extraction(&self, id: ItemId, file: SourceFile) {
        let name = file.name().to_string();
        match self.stages.extractor.extract(&file).await {
            Ok(text) => {
                let chars = text.chars().count();
                if self.advance(id, |it| it.record_text(text)) {
                    info!("Extracted {} chars from '{}'", chars, name);
                    self.observer.on_extraction_complete(id, chars);
                }
            }
            Err(e) => self.fail(id, &name, e.into()),
        }
    }

    async fn run_generation(&self, id: ItemId, name: String, text: String, length: SummaryLength) {
        let summary = match self.stages.summarizer.summarize(&text, length).await {
            Ok(s) => s,
            Err(e) => return self.fail(id, &name, e.into()),
        };

        let spoken = speech_text(&summary);
        if !self.advance(id, |it| it.record_summary(summary)) {
            return;
        }

        let clip = match self.stages.synthesizer.synthesize(&spoken).await {
            Ok(c) => c,
            Err(e) => return self.fail(id, &name, e.into()),
        };

        let (clip, handle) = match AudioHandle::stage(clip, self.audio_dir.clone()).await {
            Ok((clip, h)) => (clip, Arc::new(h)),
            Err(e) => {
                return self.fail(id, &name, SynthesisError::Handle(e.to_string()).into())
            }
        };

        if self.advance(id, |it| it.record_audio(clip, handle)) {
            info!("'{}' is ready to play", name);
            self.observer.on_item_ready(id, &name);
        }
    }
}

impl std::fmt::Debug for PipelineController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineController")
            .field("items", &self.len())
            .finish_non_exhaustive()
    }
}
