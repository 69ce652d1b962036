//! PDF text extraction via pdfium.
//!
//! ## Why spawn_blocking?
//!
//! `pdfium-render` wraps the pdfium C++ library, which keeps thread-local
//! state and parses synchronously. [`PdfiumExtractor`] therefore moves the
//! whole parse onto Tokio's blocking pool so other items' network stages keep
//! running while a large document is being read.
//!
//! ## Validation before binding
//!
//! The `%PDF` signature is checked before the native library is touched.
//! Obviously wrong uploads (an empty file, a renamed image) are rejected
//! with a precise message and without needing libpdfium at all.

use crate::error::ExtractionError;
use crate::item::SourceFile;
use async_trait::async_trait;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Env var naming the pdfium shared library (file or containing directory).
pub const PDFIUM_LIB_ENV: &str = "PDFIUM_LIB_PATH";

/// Separator placed between the text of consecutive pages.
pub const PAGE_SEPARATOR: &str = "\n\n";

/// Turns a PDF upload into plain text.
///
/// Implementations must be all-or-nothing: either the full text of every
/// page, or an error.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, file: &SourceFile) -> Result<String, ExtractionError>;
}

/// Default [`TextExtractor`] backed by `pdfium-render`.
#[derive(Debug, Clone, Default)]
pub struct PdfiumExtractor {
    library_path: Option<PathBuf>,
}

impl PdfiumExtractor {
    /// Bind to the library at `PDFIUM_LIB_PATH` when set, else the system one.
    pub fn new() -> Self {
        Self {
            library_path: std::env::var_os(PDFIUM_LIB_ENV)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        }
    }

    /// Bind to an explicit library file or directory.
    pub fn with_library_path(path: impl Into<PathBuf>) -> Self {
        Self {
            library_path: Some(path.into()),
        }
    }

    fn bind(&self) -> Result<Pdfium, ExtractionError> {
        let bindings = match &self.library_path {
            Some(path) => Pdfium::bind_to_library(library_file(path)),
            None => Pdfium::bind_to_system_library(),
        }
        .map_err(|e| ExtractionError::EngineUnavailable(e.to_string()))?;
        Ok(Pdfium::new(bindings))
    }
}

#[async_trait]
impl TextExtractor for PdfiumExtractor {
    async fn extract(&self, file: &SourceFile) -> Result<String, ExtractionError> {
        check_magic(file)?;

        let this = self.clone();
        let name = file.name().to_string();
        let bytes = file.bytes().to_vec();

        info!("Extracting text from '{}' ({} bytes)", name, bytes.len());
        tokio::task::spawn_blocking(move || {
            let pdfium = this.bind()?;
            extract_blocking(&pdfium, &name, &bytes)
        })
        .await
        .map_err(|e| ExtractionError::TaskFailed(e.to_string()))?
    }
}

/// Reject content that cannot be a PDF before any parsing happens.
pub fn check_magic(file: &SourceFile) -> Result<(), ExtractionError> {
    let bytes = file.bytes();
    if bytes.is_empty() {
        return Err(ExtractionError::EmptyFile {
            name: file.name().to_string(),
        });
    }
    if !bytes.starts_with(b"%PDF") {
        return Err(ExtractionError::NotAPdf {
            name: file.name().to_string(),
            magic: bytes.iter().take(4).copied().collect(),
        });
    }
    Ok(())
}

fn extract_blocking(pdfium: &Pdfium, name: &str, bytes: &[u8]) -> Result<String, ExtractionError> {
    let document = pdfium
        .load_pdf_from_byte_slice(bytes, None)
        .map_err(|e| classify_load_error(name, e))?;

    let pages = document.pages();
    let total = pages.len();
    let mut texts = Vec::with_capacity(total as usize);

    for (idx, page) in pages.iter().enumerate() {
        let text = page
            .text()
            .map_err(|e| ExtractionError::Corrupt {
                name: name.to_string(),
                detail: format!("page {}: {}", idx + 1, e),
            })?
            .all();
        debug!("Page {}/{}: {} chars", idx + 1, total, text.chars().count());
        texts.push(text);
    }

    let joined = join_pages(texts);
    if joined.trim().is_empty() {
        return Err(ExtractionError::NoText {
            name: name.to_string(),
        });
    }

    info!(
        "Extracted {} chars from {} page(s) of '{}'",
        joined.chars().count(),
        total,
        name
    );
    Ok(joined)
}

/// Join per-page text with [`PAGE_SEPARATOR`], trimming each page.
pub fn join_pages<I, S>(pages: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    pages
        .into_iter()
        .map(|p| p.as_ref().trim().to_string())
        .collect::<Vec<_>>()
        .join(PAGE_SEPARATOR)
}

fn classify_load_error(name: &str, e: PdfiumError) -> ExtractionError {
    let detail = format!("{:?}", e);
    if detail.contains("Password") || detail.contains("password") {
        ExtractionError::Encrypted {
            name: name.to_string(),
        }
    } else {
        ExtractionError::Corrupt {
            name: name.to_string(),
            detail,
        }
    }
}

fn library_file(path: &Path) -> PathBuf {
    if path.is_dir() {
        Pdfium::pdfium_platform_library_name_at_path(path)
    } else {
        path.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_rejected() {
        let err = check_magic(&SourceFile::new("blank.pdf", Vec::new())).unwrap_err();
        assert_eq!(
            err,
            ExtractionError::EmptyFile {
                name: "blank.pdf".into()
            }
        );
    }

    #[test]
    fn non_pdf_is_rejected_with_magic() {
        let err = check_magic(&SourceFile::new("photo.pdf", b"\x89PNG\r\n".to_vec())).unwrap_err();
        match err {
            ExtractionError::NotAPdf { name, magic } => {
                assert_eq!(name, "photo.pdf");
                assert_eq!(magic, b"\x89PNG".to_vec());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn pdf_signature_passes() {
        assert!(check_magic(&SourceFile::new("a.pdf", b"%PDF-1.4\n".to_vec())).is_ok());
    }

    #[test]
    fn pages_join_with_blank_line() {
        assert_eq!(join_pages(["  one \n", "two", ""]), "one\n\ntwo\n\n");
        assert_eq!(join_pages(Vec::<String>::new()), "");
    }

    #[tokio::test]
    async fn garbage_fails_before_engine_is_bound() {
        let extractor = PdfiumExtractor::with_library_path("/nonexistent/libpdfium.so");
        let err = extractor
            .extract(&SourceFile::new("notes.txt", b"hello".to_vec()))
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::NotAPdf { .. }));
    }
}
