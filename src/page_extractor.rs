use log::{error, info, warn};
use serde::{Deserialize, Serialize};

use crate::cache_store::CacheStore;
use crate::config::PipelineConfig;
use crate::error::ExtractionError;
use crate::noise_filter::NoiseFilter;
use crate::page_source::PageSource;
use crate::text_repair::TextRepairer;

/// The filtered, artifact-corrected text of a whole document, pages
/// concatenated in order
///
/// Serializes as the bare string, which is also the cache payload format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanedDocument(String);

impl CleanedDocument {
    pub fn new(text: String) -> Self {
        CleanedDocument(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Per-run extraction diagnostics handed back alongside the document.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractionReport {
    pub page_count: usize,
    pub pages_extracted: usize,
    /// 1-based numbers of pages that yielded no text.
    pub pages_skipped: Vec<usize>,
    pub from_cache: bool,
    pub warnings: Vec<String>,
}

/// A cleaned document plus the report describing how it was produced.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub document: CleanedDocument,
    pub report: ExtractionReport,
}

/// Pulls raw text out of a paginated source and turns it into one cleaned
/// document string
///
/// Process:
/// 1. Cache check: a valid sidecar entry is returned as-is, skipping
///    everything else (including noise-pattern changes)
/// 2. Per page in order: extract, drop noise lines, accumulate
/// 3. Structural repair passes over the accumulated text
/// 4. Persist to the cache sidecar and, optionally, a readable .txt copy
///
/// A page that yields nothing is logged and skipped; only a source with no
/// extractable text at all fails the run.
pub struct PageExtractor {
    noise_filter: NoiseFilter,
    repairer: TextRepairer,
    cache: CacheStore,
    write_text_sidecar: bool,
}

impl PageExtractor {
    pub fn new() -> Self {
        PageExtractor {
            noise_filter: NoiseFilter::new(),
            repairer: TextRepairer::new(),
            cache: CacheStore::new(),
            write_text_sidecar: true,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Result<Self, ExtractionError> {
        Ok(PageExtractor {
            noise_filter: NoiseFilter::with_patterns(&config.noise_patterns)?,
            repairer: TextRepairer::new(),
            cache: CacheStore::with_mode(config.cache_key),
            write_text_sidecar: config.write_text_sidecar,
        })
    }

    /// Extract the cleaned text of `source`.
    pub fn extract(&self, source: &dyn PageSource) -> Result<Extraction, ExtractionError> {
        let identity = source.identity().to_path_buf();
        let label = identity.display().to_string();

        if let Some(document) = self.cache.get(&identity) {
            info!("Loaded cached text for {label}");
            return Ok(Extraction {
                document,
                report: ExtractionReport {
                    page_count: source.page_count(),
                    from_cache: true,
                    ..ExtractionReport::default()
                },
            });
        }

        let page_count = source.page_count();
        if page_count == 0 {
            return Err(ExtractionError::EmptySource(label));
        }

        info!("Extracting {page_count} pages from {label}");
        let mut report = ExtractionReport {
            page_count,
            ..ExtractionReport::default()
        };
        let mut accumulated = String::new();

        for index in 0..page_count {
            match source.page_text(index) {
                Some(raw) if !raw.trim().is_empty() => {
                    accumulated.push_str(&self.noise_filter.filter_page(&raw));
                    accumulated.push('\n');
                    report.pages_extracted += 1;
                }
                _ => {
                    let page_number = index + 1;
                    warn!("Page {page_number} of {label} could not be extracted");
                    report.pages_skipped.push(page_number);
                    report
                        .warnings
                        .push(format!("page {page_number} yielded no text"));
                }
            }
        }

        let repaired = self.repairer.repair(&accumulated);
        if repaired.trim().is_empty() {
            return Err(ExtractionError::NoText(label));
        }

        let document = CleanedDocument::new(repaired);

        if let Err(err) = self.cache.put(&identity, &document) {
            // Non-fatal: the caller still gets the extraction.
            error!("Cache write failed for {label}: {err}");
            report.warnings.push(err.to_string());
        }

        if self.write_text_sidecar {
            if let Err(err) = CacheStore::write_text_sidecar(&identity, &document) {
                error!("Text sidecar write failed for {label}: {err}");
                report.warnings.push(err.to_string());
            }
        }

        info!(
            "Extraction complete for {label}: {} of {page_count} pages, {} characters",
            report.pages_extracted,
            document.len()
        );
        Ok(Extraction { document, report })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page_source::MemorySource;
    use tempfile::tempdir;

    fn source_in(dir: &std::path::Path, pages: Vec<Option<String>>) -> MemorySource {
        MemorySource::new(dir.join("book.pdf"), pages)
    }

    #[test]
    fn test_empty_source_fails_without_cache_write() {
        let dir = tempdir().unwrap();
        let source = source_in(dir.path(), vec![]);

        let err = PageExtractor::new().extract(&source).unwrap_err();
        assert!(matches!(err, ExtractionError::EmptySource(_)));
        assert!(!dir.path().join("book.doccache").exists());
    }

    #[test]
    fn test_all_pages_empty_fails_without_cache_write() {
        let dir = tempdir().unwrap();
        let source = source_in(dir.path(), vec![None, Some("   ".to_string())]);

        let err = PageExtractor::new().extract(&source).unwrap_err();
        assert!(matches!(err, ExtractionError::NoText(_)));
        assert!(!dir.path().join("book.doccache").exists());
    }

    #[test]
    fn test_failed_pages_are_skipped_not_fatal() {
        let dir = tempdir().unwrap();
        let source = source_in(
            dir.path(),
            vec![
                Some("CHAPTER 1\nFirst page body".to_string()),
                None,
                Some("Second page body".to_string()),
            ],
        );

        let extraction = PageExtractor::new().extract(&source).unwrap();
        assert_eq!(extraction.report.pages_extracted, 2);
        assert_eq!(extraction.report.pages_skipped, vec![2]);
        assert!(!extraction.report.from_cache);
        assert!(extraction.document.as_str().contains("First page body"));
        assert!(extraction.document.as_str().contains("Second page body"));
    }

    #[test]
    fn test_noise_lines_are_removed() {
        let dir = tempdir().unwrap();
        let source = source_in(
            dir.path(),
            vec![Some("Page 3\nThe body remains\nCopyright 1945".to_string())],
        );

        let extraction = PageExtractor::new().extract(&source).unwrap();
        assert_eq!(extraction.document.as_str(), "The body remains\n");
    }

    #[test]
    fn test_repair_passes_apply_to_accumulated_text() {
        let dir = tempdir().unwrap();
        let source = source_in(dir.path(), vec![Some("OrwellC 1 HAPTER".to_string())]);

        let extraction = PageExtractor::new().extract(&source).unwrap();
        assert!(extraction.document.as_str().contains("CHAPTER 1"));
    }

    #[test]
    fn test_second_extraction_is_cache_hit() {
        let dir = tempdir().unwrap();
        let extractor = PageExtractor::new();

        let source = source_in(dir.path(), vec![Some("CHAPTER 1\nThe body".to_string())]);
        let first = extractor.extract(&source).unwrap();

        // Same identity, different content: the cache still wins.
        let changed = source_in(dir.path(), vec![Some("totally different".to_string())]);
        let second = extractor.extract(&changed).unwrap();

        assert!(second.report.from_cache);
        assert_eq!(first.document, second.document);
    }

    #[test]
    fn test_cache_priority_over_pattern_changes() {
        let dir = tempdir().unwrap();

        let source = source_in(
            dir.path(),
            vec![Some("KEEPME header\nThe body".to_string())],
        );
        let first = PageExtractor::new().extract(&source).unwrap();
        assert!(first.document.as_str().contains("KEEPME"));

        // A filter that would now drop the header line; the cached text is
        // returned untouched (staleness is by design).
        let config = PipelineConfig {
            noise_patterns: vec![r"KEEPME.*$".to_string()],
            ..PipelineConfig::default()
        };
        let second = PageExtractor::from_config(&config)
            .unwrap()
            .extract(&source)
            .unwrap();

        assert!(second.report.from_cache);
        assert_eq!(first.document, second.document);
    }

    #[test]
    fn test_text_sidecar_is_written() {
        let dir = tempdir().unwrap();
        let source = source_in(dir.path(), vec![Some("The body".to_string())]);

        PageExtractor::new().extract(&source).unwrap();
        let sidecar = std::fs::read_to_string(dir.path().join("book.txt")).unwrap();
        assert_eq!(sidecar, "The body\n");
    }
}
