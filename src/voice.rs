//! Standalone text-to-speech session, independent of the file pipeline.
//!
//! Unlike pipeline items, a voice session synthesizes as soon as it is asked
//! to; there is no intermediate "ready for summary" gate.

use crate::audio::{save_clip, AudioClip, AudioHandle, DEFAULT_DOWNLOAD_NAME};
use crate::error::{EduError, SynthesisError};
use crate::pipeline::SpeechSynthesizer;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Built-in sample texts offered for a quick try.
pub const SAMPLE_TEXTS: [&str; 3] = [
    "Welcome to EduSummarize! This is a sample of how our AI voice technology can transform your learning experience with natural, clear speech generation.",
    "Artificial Intelligence is revolutionizing education by providing personalized learning experiences, automated grading, and intelligent tutoring systems that adapt to individual student needs.",
    "The study of photosynthesis reveals how plants convert light energy into chemical energy, producing glucose and oxygen through a complex series of reactions in chloroplasts.",
];

/// One text box, one clip, one play/pause toggle.
pub struct VoiceSession {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    clip: Option<AudioClip>,
    handle: Option<AudioHandle>,
    playing: bool,
    audio_dir: Option<PathBuf>,
}

impl VoiceSession {
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        Self {
            synthesizer,
            clip: None,
            handle: None,
            playing: false,
            audio_dir: None,
        }
    }

    /// Place playback files in `dir` instead of the system temp directory.
    pub fn with_audio_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.audio_dir = Some(dir.into());
        self
    }

    /// Synthesize `text`, replacing any earlier clip.
    ///
    /// On failure, including a failure to stage the new playback file, the
    /// previous clip and handle stay as they were.
    pub async fn generate(&mut self, text: &str) -> Result<&AudioHandle, SynthesisError> {
        let clip = self.synthesizer.synthesize(text).await?;
        let (clip, handle) = AudioHandle::stage(clip, self.audio_dir.clone())
            .await
            .map_err(|e| SynthesisError::Handle(e.to_string()))?;
        info!("Speech generated: {} bytes", clip.len());

        self.playing = false;
        self.clip = Some(clip);
        Ok(&*self.handle.insert(handle))
    }

    pub fn clip(&self) -> Option<&AudioClip> {
        self.clip.as_ref()
    }

    pub fn handle(&self) -> Option<&AudioHandle> {
        self.handle.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Flip between playing and paused. Returns the new state; `None` when
    /// there is nothing to play.
    pub fn toggle_playback(&mut self) -> Option<bool> {
        self.handle.as_ref()?;
        self.playing = !self.playing;
        Some(self.playing)
    }

    /// Playback reached the end of the clip.
    pub fn playback_ended(&mut self) {
        self.playing = false;
    }

    /// Write the clip into `dir` as [`DEFAULT_DOWNLOAD_NAME`].
    pub async fn download(&self, dir: impl AsRef<Path>) -> Result<PathBuf, EduError> {
        self.download_to(dir.as_ref().join(DEFAULT_DOWNLOAD_NAME)).await
    }

    /// Write the clip to an explicit path.
    pub async fn download_to(&self, path: impl AsRef<Path>) -> Result<PathBuf, EduError> {
        let clip = self.clip.as_ref().ok_or(EduError::NoAudio)?;
        save_clip(clip, path).await
    }
}

impl std::fmt::Debug for VoiceSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoiceSession")
            .field("clip", &self.clip)
            .field("handle", &self.handle)
            .field("playing", &self.playing)
            .field("audio_dir", &self.audio_dir)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::MPEG_AUDIO;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting(AtomicUsize);

    #[async_trait]
    impl SpeechSynthesizer for Counting {
        async fn synthesize(&self, text: &str) -> Result<AudioClip, SynthesisError> {
            if text.trim().is_empty() {
                return Err(SynthesisError::EmptyInput);
            }
            let n = self.0.fetch_add(1, Ordering::SeqCst);
            Ok(AudioClip::new(format!("clip-{n}").into_bytes(), MPEG_AUDIO))
        }
    }

    fn session() -> VoiceSession {
        VoiceSession::new(Arc::new(Counting(AtomicUsize::new(0))))
    }

    #[tokio::test]
    async fn regenerate_releases_previous_handle() {
        let mut s = session();
        let first = s.generate(SAMPLE_TEXTS[0]).await.unwrap().path().to_path_buf();
        assert!(first.exists());

        let second = s.generate(SAMPLE_TEXTS[1]).await.unwrap().path().to_path_buf();
        assert!(!first.exists(), "old handle must be released");
        assert!(second.exists());
        assert_eq!(s.clip().unwrap().bytes(), b"clip-1");
    }

    #[tokio::test]
    async fn failed_generation_keeps_previous_clip() {
        let mut s = session();
        s.generate("hello").await.unwrap();
        assert!(s.generate("   ").await.is_err());
        assert_eq!(s.clip().unwrap().bytes(), b"clip-0");
        assert!(s.handle().unwrap().path().exists());
    }

    #[tokio::test]
    async fn unwritable_audio_dir_keeps_previous_clip() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session().with_audio_dir(dir.path());
        s.generate("first").await.unwrap();
        s.toggle_playback();
        let kept = s.handle().unwrap().path().to_path_buf();

        let mut s = s.with_audio_dir(dir.path().join("missing"));
        assert!(matches!(
            s.generate("second").await,
            Err(SynthesisError::Handle(_))
        ));

        assert_eq!(s.clip().unwrap().bytes(), b"clip-0");
        assert_eq!(s.handle().unwrap().path(), kept);
        assert!(kept.exists());
        assert!(s.is_playing());

        let out = s.download(dir.path()).await.unwrap();
        assert_eq!(std::fs::read(out).unwrap(), b"clip-0");
    }

    #[tokio::test]
    async fn toggle_needs_audio() {
        let mut s = session();
        assert_eq!(s.toggle_playback(), None);
        s.generate("hi").await.unwrap();
        assert_eq!(s.toggle_playback(), Some(true));
        assert_eq!(s.toggle_playback(), Some(false));
        s.toggle_playback();
        s.playback_ended();
        assert!(!s.is_playing());
    }

    #[tokio::test]
    async fn download_uses_default_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session();
        assert!(matches!(s.download(dir.path()).await, Err(EduError::NoAudio)));

        s.generate("hi").await.unwrap();
        let path = s.download(dir.path()).await.unwrap();
        assert_eq!(path.file_name().unwrap(), DEFAULT_DOWNLOAD_NAME);
        assert_eq!(std::fs::read(path).unwrap(), b"clip-0");
    }
}
