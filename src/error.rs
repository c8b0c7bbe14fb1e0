use thiserror::Error;

/// Error taxonomy for the extraction pipeline
///
/// Only document-level failures surface here; a single page that yields no
/// text is logged and skipped, never raised.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("source {0} contains no pages")]
    EmptySource(String),

    #[error("no text could be extracted from any page of {0}")]
    NoText(String),

    #[error("source {path} could not be opened: {reason}")]
    SourceUnreadable { path: String, reason: String },

    #[error("pattern {pattern:?} failed to compile: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("failed to write cache file {path}: {reason}")]
    CacheWrite { path: String, reason: String },
}
