use crate::error::ExtractionError;
use log::{debug, info};
use lopdf::Document;
use std::path::{Path, PathBuf};

/// A paginated document: ordered pages, each yielding raw text or nothing.
///
/// The pipeline assumes nothing about the underlying format beyond this
/// trait. Implementations absorb their own per-page failures and report them
/// as `None`; only a source that cannot be opened at all should fail, and it
/// should do so at construction time with
/// [`ExtractionError::SourceUnreadable`].
pub trait PageSource {
    /// Stable identity of the source, used to derive cache keys and sidecar
    /// file locations.
    fn identity(&self) -> &Path;

    fn page_count(&self) -> usize;

    /// Raw text of the page at `index` (zero-based), or `None` when the page
    /// yields nothing.
    fn page_text(&self, index: usize) -> Option<String>;
}

/// PDF-backed page source using lopdf
///
/// Pages are read in document order; a page whose text layer cannot be
/// decoded is reported as empty rather than failing the run.
#[derive(Debug)]
pub struct PdfSource {
    path: PathBuf,
    document: Document,
    page_numbers: Vec<u32>,
}

impl PdfSource {
    /// Open a PDF file and index its pages.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ExtractionError> {
        let path = path.as_ref().to_path_buf();
        info!("Opening PDF source: {}", path.display());

        let document =
            Document::load(&path).map_err(|err| ExtractionError::SourceUnreadable {
                path: path.display().to_string(),
                reason: err.to_string(),
            })?;

        let page_numbers: Vec<u32> = document.get_pages().keys().copied().collect();
        info!("PDF loaded successfully. Pages: {}", page_numbers.len());

        Ok(PdfSource {
            path,
            document,
            page_numbers,
        })
    }
}

impl PageSource for PdfSource {
    fn identity(&self) -> &Path {
        &self.path
    }

    fn page_count(&self) -> usize {
        self.page_numbers.len()
    }

    fn page_text(&self, index: usize) -> Option<String> {
        let page_number = *self.page_numbers.get(index)?;

        match self.document.extract_text(&[page_number]) {
            Ok(text) if !text.trim().is_empty() => Some(text),
            Ok(_) => {
                debug!("Page {page_number} has an empty text layer");
                None
            }
            Err(err) => {
                debug!("Text extraction failed on page {page_number}: {err}");
                None
            }
        }
    }
}

/// In-memory page source
///
/// Used by tests and by callers that already hold per-page text from some
/// other extraction backend. The identity path does not need to exist on
/// disk, but cache sidecars are derived from it, so it should point at a
/// writable location when caching is wanted.
pub struct MemorySource {
    identity: PathBuf,
    pages: Vec<Option<String>>,
}

impl MemorySource {
    pub fn new(identity: impl Into<PathBuf>, pages: Vec<Option<String>>) -> Self {
        MemorySource {
            identity: identity.into(),
            pages,
        }
    }

    /// Convenience constructor for sources where every page has text.
    pub fn from_pages(identity: impl Into<PathBuf>, pages: &[&str]) -> Self {
        Self::new(
            identity,
            pages.iter().map(|page| Some(page.to_string())).collect(),
        )
    }
}

impl PageSource for MemorySource {
    fn identity(&self) -> &Path {
        &self.identity
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, index: usize) -> Option<String> {
        self.pages.get(index).cloned().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_source_pages() {
        let source = MemorySource::new(
            "book.pdf",
            vec![Some("first page".to_string()), None, Some(String::new())],
        );

        assert_eq!(source.page_count(), 3);
        assert_eq!(source.page_text(0).as_deref(), Some("first page"));
        assert_eq!(source.page_text(1), None);
        assert_eq!(source.page_text(2).as_deref(), Some(""));
        assert_eq!(source.page_text(3), None);
        assert_eq!(source.identity(), Path::new("book.pdf"));
    }

    #[test]
    fn test_missing_pdf_is_unreadable() {
        let err = PdfSource::open("/nonexistent/missing.pdf").unwrap_err();
        match err {
            ExtractionError::SourceUnreadable { path, .. } => {
                assert!(path.contains("missing.pdf"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
