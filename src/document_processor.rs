use log::info;

use crate::chapter_segmenter::{ChapterBlock, ChapterSegmenter};
use crate::config::PipelineConfig;
use crate::error::ExtractionError;
use crate::page_extractor::{CleanedDocument, Extraction, ExtractionReport, PageExtractor};
use crate::page_source::PageSource;

/// Everything a book assembler needs: the ordered chapters, the full
/// cleaned document, and the extraction diagnostics.
///
/// Numbering, titling, markup escaping and container packaging are the
/// assembler's job, not this crate's.
#[derive(Debug, Clone)]
pub struct ProcessedDocument {
    pub document: CleanedDocument,
    pub chapters: Vec<ChapterBlock>,
    pub report: ExtractionReport,
}

/// Wires the page extractor and the chapter segmenter into the single entry
/// point most callers want
pub struct DocumentProcessor {
    extractor: PageExtractor,
    segmenter: ChapterSegmenter,
}

impl DocumentProcessor {
    /// Processor with the default pattern sets, thresholds and path-keyed
    /// caching.
    pub fn new() -> Self {
        DocumentProcessor {
            extractor: PageExtractor::new(),
            segmenter: ChapterSegmenter::new(),
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Result<Self, ExtractionError> {
        Ok(DocumentProcessor {
            extractor: PageExtractor::from_config(config)?,
            segmenter: ChapterSegmenter::from_config(config)?,
        })
    }

    /// Extract and segment `source` in one pass.
    pub fn process(&self, source: &dyn PageSource) -> Result<ProcessedDocument, ExtractionError> {
        info!("Processing {}", source.identity().display());

        let Extraction { document, report } = self.extractor.extract(source)?;
        let chapters = self.segmenter.segment(&document);

        info!(
            "Processing complete: {} chapters from {} characters",
            chapters.len(),
            document.len()
        );
        Ok(ProcessedDocument {
            document,
            chapters,
            report,
        })
    }
}
