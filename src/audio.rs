//! Synthesized audio payloads and the scoped handles derived from them.
//!
//! An [`AudioClip`] is the raw encoded payload returned by the speech
//! endpoint. An [`AudioHandle`] is the playable/downloadable resource made
//! from it: a temp file holding the clip. The file exists exactly as long as
//! the handle; dropping the handle (superseded by a new generation, item
//! dismissed, session torn down) deletes it.

use crate::error::EduError;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tracing::debug;

/// Default file name for a downloaded clip.
pub const DEFAULT_DOWNLOAD_NAME: &str = "summary-audio.mp3";

/// MIME type requested from the speech endpoint.
pub const MPEG_AUDIO: &str = "audio/mpeg";

static LIVE_HANDLES: AtomicUsize = AtomicUsize::new(0);

/// Encoded audio returned by a [`crate::pipeline::synthesize::SpeechSynthesizer`].
///
/// Cloning is cheap; the bytes are shared.
#[derive(Clone, PartialEq, Eq)]
pub struct AudioClip {
    data: Arc<[u8]>,
    mime_type: String,
}

impl AudioClip {
    pub fn new(data: impl Into<Vec<u8>>, mime_type: impl Into<String>) -> Self {
        let data: Vec<u8> = data.into();
        Self {
            data: Arc::from(data),
            mime_type: mime_type.into(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// File extension matching the MIME type; unknown types fall back to `mp3`.
    pub fn extension(&self) -> &'static str {
        match self.mime_type.split(';').next().unwrap_or("").trim() {
            "audio/wav" | "audio/x-wav" | "audio/wave" => "wav",
            "audio/ogg" => "ogg",
            "audio/flac" => "flac",
            "audio/pcm" => "pcm",
            _ => "mp3",
        }
    }
}

impl std::fmt::Debug for AudioClip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioClip")
            .field("bytes", &self.data.len())
            .field("mime_type", &self.mime_type)
            .finish()
    }
}

/// A playable handle to an [`AudioClip`], backed by a temp file.
///
/// Released on drop.
pub struct AudioHandle {
    file: NamedTempFile,
    len: usize,
}

impl AudioHandle {
    /// Stage `clip` into a fresh temp file in the system temp directory.
    pub fn create(clip: &AudioClip) -> std::io::Result<Self> {
        Self::create_in(clip, None)
    }

    /// Stage `clip` into a fresh temp file inside `dir`, or the system temp
    /// directory when `None`. Blocking.
    pub fn create_in(clip: &AudioClip, dir: Option<&Path>) -> std::io::Result<Self> {
        let suffix = format!(".{}", clip.extension());
        let mut builder = tempfile::Builder::new();
        builder.prefix("edusummarize-").suffix(&suffix);
        let mut file = match dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        file.write_all(clip.bytes())?;
        file.flush()?;

        let live = LIVE_HANDLES.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(
            "Audio handle acquired: {} ({} bytes, {} live)",
            file.path().display(),
            clip.len(),
            live
        );

        Ok(Self {
            file,
            len: clip.len(),
        })
    }

    /// [`AudioHandle::create_in`] on the blocking pool. The clip is handed
    /// back with the handle so callers can keep it.
    pub async fn stage(clip: AudioClip, dir: Option<PathBuf>) -> std::io::Result<(AudioClip, Self)> {
        tokio::task::spawn_blocking(move || {
            let handle = Self::create_in(&clip, dir.as_deref())?;
            Ok((clip, handle))
        })
        .await
        .map_err(std::io::Error::other)?
    }

    /// Path a player can open while the handle is alive.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Handles currently alive in this process.
    pub fn live_count() -> usize {
        LIVE_HANDLES.load(Ordering::SeqCst)
    }
}

impl Drop for AudioHandle {
    fn drop(&mut self) {
        let live = LIVE_HANDLES.fetch_sub(1, Ordering::SeqCst).saturating_sub(1);
        debug!(
            "Audio handle released: {} ({} live)",
            self.file.path().display(),
            live
        );
    }
}

impl std::fmt::Debug for AudioHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioHandle")
            .field("path", &self.file.path())
            .field("len", &self.len)
            .finish()
    }
}

/// Write `clip` to `path`.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn save_clip(clip: &AudioClip, path: impl AsRef<Path>) -> Result<PathBuf, EduError> {
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| EduError::OutputWriteFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
    }

    let tmp_path = path.with_extension(format!("{}.tmp", clip.extension()));
    tokio::fs::write(&tmp_path, clip.bytes())
        .await
        .map_err(|e| EduError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| EduError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    debug!("Saved {} bytes of audio to {}", clip.len(), path.display());
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip() -> AudioClip {
        AudioClip::new(b"ID3\x04fake-mpeg-frames".to_vec(), MPEG_AUDIO)
    }

    #[test]
    fn handle_file_lives_as_long_as_the_handle() {
        let handle = AudioHandle::create(&clip()).expect("create handle");
        let path = handle.path().to_path_buf();
        assert!(path.exists());
        assert_eq!(std::fs::read(&path).unwrap(), clip().bytes());
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("mp3"));

        drop(handle);
        assert!(!path.exists(), "handle file should be removed on drop");
    }

    #[test]
    fn superseding_a_handle_releases_the_old_one() {
        let mut slot = Some(AudioHandle::create(&clip()).unwrap());
        let first = slot.as_ref().unwrap().path().to_path_buf();

        slot = Some(AudioHandle::create(&clip()).unwrap());
        let second = slot.as_ref().unwrap().path().to_path_buf();

        assert!(!first.exists());
        assert!(second.exists());
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn staged_handle_lands_in_requested_dir() {
        let dir = tempfile::tempdir().unwrap();
        let (back, handle) = AudioHandle::stage(clip(), Some(dir.path().to_path_buf()))
            .await
            .unwrap();
        assert_eq!(back, clip());
        assert_eq!(handle.path().parent(), Some(dir.path()));

        let missing = dir.path().join("missing");
        assert!(AudioHandle::stage(clip(), Some(missing)).await.is_err());
    }

    #[test]
    fn extension_follows_mime_type() {
        assert_eq!(AudioClip::new(vec![1], "audio/mpeg").extension(), "mp3");
        assert_eq!(AudioClip::new(vec![1], "audio/wav").extension(), "wav");
        assert_eq!(
            AudioClip::new(vec![1], "audio/ogg; codecs=opus").extension(),
            "ogg"
        );
        assert_eq!(AudioClip::new(vec![1], "").extension(), "mp3");
    }

    #[tokio::test]
    async fn save_clip_writes_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join(DEFAULT_DOWNLOAD_NAME);

        let written = save_clip(&clip(), &target).await.expect("save");
        assert_eq!(written, target);
        assert_eq!(std::fs::read(&target).unwrap(), clip().bytes());
        assert!(!target.with_extension("mp3.tmp").exists());
    }
}
