//! Text segmentation pipeline for republishing paginated documents as
//! structured e-books.
//!
//! The pipeline pulls raw text out of a paginated source page by page,
//! strips header/footer noise, repairs extraction artifacts in chapter
//! headings, and splits the cleaned text into ordered chapter blocks:
//!
//! 1. [`PageExtractor`] — per-page extraction, noise filtering, structural
//!    repair, sidecar caching
//! 2. [`ChapterSegmenter`] — heading-driven segmentation with a
//!    paragraph-accumulation fallback for unstructured documents
//! 3. [`DocumentProcessor`] — both steps behind one call
//!
//! Sources implement [`PageSource`]; a PDF backend ([`PdfSource`]) and an
//! in-memory one ([`MemorySource`]) are provided. Packaging the resulting
//! chapters into an e-book container is left to the caller.

mod cache_store;
mod chapter_segmenter;
mod config;
mod document_processor;
mod error;
mod fallback_segmenter;
mod noise_filter;
mod page_extractor;
mod page_source;
mod sentence_boundary;
mod text_repair;

pub use cache_store::{CACHE_EXTENSION, CacheKeyMode, CacheStore, TEXT_EXTENSION};
pub use chapter_segmenter::{ChapterBlock, ChapterSegmenter};
pub use config::{
    DEFAULT_HEADING_PATTERNS, DEFAULT_MAX_CHAPTER_CHARS, DEFAULT_MIN_BREAK_WORDS,
    DEFAULT_NOISE_PATTERNS, DEFAULT_TOC_PATTERN, PipelineConfig,
};
pub use document_processor::{DocumentProcessor, ProcessedDocument};
pub use error::ExtractionError;
pub use fallback_segmenter::FallbackSegmenter;
pub use noise_filter::NoiseFilter;
pub use page_extractor::{CleanedDocument, Extraction, ExtractionReport, PageExtractor};
pub use page_source::{MemorySource, PageSource, PdfSource};
pub use sentence_boundary::{RuleBasedSplitter, SENTENCE_TERMINATORS, SentenceBoundary};
pub use text_repair::TextRepairer;
