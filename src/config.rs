use regex::Regex;
use serde::Deserialize;

use crate::cache_store::CacheKeyMode;
use crate::error::ExtractionError;

/// Default noise rules: page-number lines, copyright lines, confidentiality
/// banners and "Last updated" footers. Title-header repeats are per-book and
/// added via [`crate::noise_filter::NoiseFilter::with_title_header`].
pub const DEFAULT_NOISE_PATTERNS: &[&str] = &[
    r"(Page \d+|\s*Copyright.*)$",
    r"\s*Confidential.*$",
    r"\s*Last updated.*$",
];

/// Default heading rules. Each one marks the start of a new chapter when it
/// matches at the beginning of a line.
pub const DEFAULT_HEADING_PATTERNS: &[&str] = &[
    r"\bChapter\s+\d+\b",
    r"\b\d+\.\s+",
    r"\bPart\s+\d+\b",
    r"\bSection\s+\d+\b",
    r"\b[A-Z][a-z]+\s+\d+\b",
    r"\bPrologue\b",
    r"\bEpilogue\b",
];

/// Marker that opens a Table-of-Contents region, which is dropped wholesale.
pub const DEFAULT_TOC_PATTERN: &str = r"\bTable of Contents\b";

/// Character budget after which the fallback segmenter closes a chapter.
pub const DEFAULT_MAX_CHAPTER_CHARS: usize = 5000;

/// Minimum word count for a paragraph to qualify as a thematic break.
pub const DEFAULT_MIN_BREAK_WORDS: usize = 50;

/// Pipeline configuration: the overridable ordered rule lists plus the
/// fallback thresholds and cache behavior.
///
/// Every field has a default, so a partial config (e.g. deserialized from a
/// JSON fragment that only overrides `noise_patterns`) is valid.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Ordered rules; effect: drop any fully matching line.
    pub noise_patterns: Vec<String>,
    /// Ordered rules; effect: start a new chapter at the matching line.
    pub heading_patterns: Vec<String>,
    pub toc_pattern: String,
    pub max_chapter_chars: usize,
    pub min_break_words: usize,
    pub cache_key: CacheKeyMode,
    pub write_text_sidecar: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            noise_patterns: DEFAULT_NOISE_PATTERNS.iter().map(|p| p.to_string()).collect(),
            heading_patterns: DEFAULT_HEADING_PATTERNS.iter().map(|p| p.to_string()).collect(),
            toc_pattern: DEFAULT_TOC_PATTERN.to_string(),
            max_chapter_chars: DEFAULT_MAX_CHAPTER_CHARS,
            min_break_words: DEFAULT_MIN_BREAK_WORDS,
            cache_key: CacheKeyMode::SourcePath,
            write_text_sidecar: true,
        }
    }
}

/// Compile a configured rule so it matches case-insensitively and anchored at
/// the start of a line. Rules that should match a full line carry their own
/// trailing `$`, as the defaults do.
pub(crate) fn compile_anchored(pattern: &str) -> Result<Regex, ExtractionError> {
    Regex::new(&format!("(?i)^(?:{pattern})")).map_err(|err| ExtractionError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{"max_chapter_chars": 1000}"#).unwrap();
        assert_eq!(config.max_chapter_chars, 1000);
        assert_eq!(config.min_break_words, DEFAULT_MIN_BREAK_WORDS);
        assert_eq!(config.noise_patterns.len(), DEFAULT_NOISE_PATTERNS.len());
        assert!(config.write_text_sidecar);
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let err = compile_anchored(r"(unclosed").unwrap_err();
        match err {
            ExtractionError::InvalidPattern { pattern, .. } => {
                assert_eq!(pattern, r"(unclosed");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_anchored_compilation_is_case_insensitive() {
        let rule = compile_anchored(DEFAULT_TOC_PATTERN).unwrap();
        assert!(rule.is_match("TABLE OF CONTENTS"));
        assert!(rule.is_match("Table of Contents"));
        assert!(!rule.is_match("see the Table of Contents"));
    }
}
