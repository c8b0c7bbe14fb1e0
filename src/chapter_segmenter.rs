use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::config::{DEFAULT_HEADING_PATTERNS, DEFAULT_TOC_PATTERN, PipelineConfig, compile_anchored};
use crate::error::ExtractionError;
use crate::fallback_segmenter::FallbackSegmenter;
use crate::page_extractor::CleanedDocument;

static DEFAULT_HEADING_RULES: Lazy<Vec<Regex>> = Lazy::new(|| {
    DEFAULT_HEADING_PATTERNS
        .iter()
        .map(|pattern| compile_anchored(pattern).expect("Invalid default heading pattern"))
        .collect()
});

static DEFAULT_TOC_RULE: Lazy<Regex> =
    Lazy::new(|| compile_anchored(DEFAULT_TOC_PATTERN).expect("Invalid default TOC pattern"));

/// One chapter's worth of text, in document order
///
/// `heading` is the line that opened the block when a heading rule did; the
/// downstream assembler uses it for titling and falls back to "Chapter N"
/// numbering when it is absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChapterBlock {
    pub index: usize,
    pub heading: Option<String>,
    pub text: String,
}

#[derive(Copy, Clone, Eq, PartialEq)]
enum ScanState {
    Scanning,
    InToc,
}

/// Splits a cleaned document into an ordered list of chapter blocks
///
/// Process:
/// 1. Single pass over lines: heading rules open new blocks, a
///    Table-of-Contents marker drops every line until the next blank line
/// 2. If that finds no real structure (at most one block), re-segment by
///    paragraph accumulation instead
/// 3. Degenerate input still yields exactly one block holding the raw text
///
/// Never returns an empty list.
pub struct ChapterSegmenter {
    heading_rules: Vec<Regex>,
    toc_rule: Regex,
    fallback: FallbackSegmenter,
}

impl ChapterSegmenter {
    pub fn new() -> Self {
        ChapterSegmenter {
            heading_rules: DEFAULT_HEADING_RULES.clone(),
            toc_rule: DEFAULT_TOC_RULE.clone(),
            fallback: FallbackSegmenter::new(),
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Result<Self, ExtractionError> {
        let heading_rules = config
            .heading_patterns
            .iter()
            .map(|pattern| compile_anchored(pattern))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ChapterSegmenter {
            heading_rules,
            toc_rule: compile_anchored(&config.toc_pattern)?,
            fallback: FallbackSegmenter::with_thresholds(
                config.max_chapter_chars,
                config.min_break_words,
            ),
        })
    }

    /// Segment `document` into ordered chapter blocks.
    pub fn segment(&self, document: &CleanedDocument) -> Vec<ChapterBlock> {
        let text = document.as_str();
        let primary = self.segment_by_headings(text);

        // At most one block and not a single heading anywhere: no real
        // structure was found, so the heading pass result is discarded.
        let structure_found = primary.iter().any(|(heading, _)| heading.is_some());
        let blocks = if primary.len() <= 1 && !structure_found {
            info!("No clear chapter headings detected, using paragraph fallback");
            self.fallback
                .segment(text)
                .into_iter()
                .map(|block_text| (None, block_text))
                .collect()
        } else {
            primary
        };

        if blocks.is_empty() {
            // Degenerate document: hand the raw input back as one block.
            debug!("Segmentation found nothing, returning the document as one block");
            return vec![ChapterBlock {
                index: 0,
                heading: None,
                text: text.to_string(),
            }];
        }

        blocks
            .into_iter()
            .enumerate()
            .map(|(index, (heading, block_text))| ChapterBlock {
                index,
                heading,
                text: block_text,
            })
            .collect()
    }

    /// Heading-driven pass. Returns `(heading, text)` pairs in order.
    fn segment_by_headings(&self, text: &str) -> Vec<(Option<String>, String)> {
        let mut blocks: Vec<(Option<String>, String)> = Vec::new();
        let mut current: Option<(Option<String>, Vec<&str>)> = None;
        let mut state = ScanState::Scanning;

        for line in text.lines() {
            if self.toc_rule.is_match(line) {
                // The marker line itself is dropped.
                state = ScanState::InToc;
                continue;
            }

            if state == ScanState::InToc {
                if line.trim().is_empty() {
                    state = ScanState::Scanning;
                }
                continue;
            }

            if self.is_heading(line) {
                if let Some((heading, lines)) = current.take() {
                    blocks.push((heading, lines.join("\n")));
                }
                current = Some((Some(line.to_string()), vec![line]));
            } else {
                match current.as_mut() {
                    Some((_, lines)) => lines.push(line),
                    None => current = Some((None, vec![line])),
                }
            }
        }

        if let Some((heading, lines)) = current {
            blocks.push((heading, lines.join("\n")));
        }

        debug!("Heading pass produced {} blocks", blocks.len());
        blocks
    }

    fn is_heading(&self, line: &str) -> bool {
        self.heading_rules.iter().any(|rule| rule.is_match(line))
    }
}
