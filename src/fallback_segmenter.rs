use log::debug;

use crate::config::{DEFAULT_MAX_CHAPTER_CHARS, DEFAULT_MIN_BREAK_WORDS};
use crate::sentence_boundary::{RuleBasedSplitter, SENTENCE_TERMINATORS, SentenceBoundary};

/// Length/semantics-based segmentation for documents with no detectable
/// chapter headings
///
/// Accumulates blank-line-delimited paragraphs into a running block and
/// closes the block when either:
/// - the accumulated length exceeds the character budget, or
/// - the current paragraph ends on terminal punctuation, is long enough to
///   read as a thematic break, and the sentence-boundary oracle confirms the
///   accumulated block contains a completed sentence.
///
/// The 5000-character budget and 50-word minimum are fixed; downstream
/// chapter sizing depends on them.
pub struct FallbackSegmenter {
    max_chapter_chars: usize,
    min_break_words: usize,
    oracle: Box<dyn SentenceBoundary>,
}

impl FallbackSegmenter {
    pub fn new() -> Self {
        Self::with_thresholds(DEFAULT_MAX_CHAPTER_CHARS, DEFAULT_MIN_BREAK_WORDS)
    }

    pub fn with_thresholds(max_chapter_chars: usize, min_break_words: usize) -> Self {
        FallbackSegmenter {
            max_chapter_chars,
            min_break_words,
            oracle: Box::new(RuleBasedSplitter::new()),
        }
    }

    /// Replace the default rule-based oracle.
    pub fn with_oracle(mut self, oracle: Box<dyn SentenceBoundary>) -> Self {
        self.oracle = oracle;
        self
    }

    /// Segment `text` into blocks of accumulated paragraphs.
    pub fn segment(&self, text: &str) -> Vec<String> {
        debug!(
            "Paragraph-accumulation segmentation: {} characters, budget {}",
            text.len(),
            self.max_chapter_chars
        );

        let mut blocks = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        let mut current_length = 0usize;

        for paragraph in text.split("\n\n") {
            current_length += paragraph.len();
            current.push(paragraph);

            let over_budget = current_length > self.max_chapter_chars;
            let thematic_break = ends_on_terminator(paragraph)
                && paragraph.split_whitespace().count() > self.min_break_words
                && self.oracle.has_complete_sentence(&current.join(" "));

            if over_budget || thematic_break {
                blocks.push(current.join("\n\n"));
                current.clear();
                current_length = 0;
            }
        }

        if !current.is_empty() {
            let block = current.join("\n\n");
            if !block.trim().is_empty() {
                blocks.push(block);
            }
        }

        debug!("Fallback produced {} blocks", blocks.len());
        blocks
    }
}

fn ends_on_terminator(paragraph: &str) -> bool {
    paragraph.trim_end().ends_with(SENTENCE_TERMINATORS)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A paragraph of `words` short words, five characters per word
    /// counting the separator, ending on a period.
    fn paragraph(words: usize) -> String {
        let mut text = vec!["word"; words].join(" ");
        text.push('.');
        text
    }

    #[test]
    fn test_budget_split_is_paragraph_aligned() {
        // 48 paragraphs of 250 characters, 50 words each: too short for the
        // thematic-break rule, so only the 5000-character budget closes
        // blocks, at the first paragraph boundary past it. Roughly
        // 5000/5000/2000 characters.
        let paragraphs: Vec<String> = (0..48).map(|_| paragraph(50)).collect();
        let text = paragraphs.join("\n\n");
        assert!(text.len() > 11000 && text.len() < 13000);

        let blocks = FallbackSegmenter::new().segment(&text);

        assert_eq!(blocks.len(), 3);
        for block in &blocks {
            // Paragraph-aligned: a block is a join of whole paragraphs.
            for piece in block.split("\n\n") {
                assert!(piece.starts_with("word"));
                assert!(piece.ends_with('.'));
            }
            // Never more than one paragraph of accumulated text over budget.
            let accumulated: usize = block.split("\n\n").map(|piece| piece.len()).sum();
            assert!(accumulated <= 5000 + paragraph(50).len());
        }
        assert_eq!(blocks.join("\n\n"), text);
    }

    #[test]
    fn test_long_terminated_paragraph_breaks_early() {
        // One paragraph over the 50-word minimum, ending on a period: the
        // thematic-break rule closes the block even under budget.
        let text = format!("{}\n\n{}", paragraph(60), paragraph(10));
        let blocks = FallbackSegmenter::new().segment(&text);

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0], paragraph(60));
    }

    #[test]
    fn test_short_paragraphs_stay_together() {
        let text = format!("{}\n\n{}", paragraph(10), paragraph(10));
        let blocks = FallbackSegmenter::new().segment(&text);
        assert_eq!(blocks.len(), 1);
    }

    #[test]
    fn test_unterminated_paragraphs_do_not_break() {
        // Over the word minimum but no terminal punctuation: only the
        // budget can close the block.
        let unterminated = vec!["word"; 60].join(" ");
        let text = format!("{unterminated}\n\n{unterminated}");
        let blocks = FallbackSegmenter::new().segment(&text);
        assert_eq!(blocks.len(), 1);
    }

    #[test]
    fn test_empty_input_produces_no_blocks() {
        assert!(FallbackSegmenter::new().segment("").is_empty());
        assert!(FallbackSegmenter::new().segment("   ").is_empty());
    }

    #[test]
    fn test_character_count_preserved() {
        let paragraphs: Vec<String> = (0..8).map(|_| paragraph(120)).collect();
        let text = paragraphs.join("\n\n");
        let blocks = FallbackSegmenter::new().segment(&text);

        let block_chars: usize = blocks.iter().map(|block| block.len()).sum();
        let separators = (blocks.len() - 1) * 2;
        assert_eq!(block_chars + separators, text.len());
    }
}
