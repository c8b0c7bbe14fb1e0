use once_cell::sync::Lazy;
use regex::Regex;

/// Characters that terminate a sentence.
pub const SENTENCE_TERMINATORS: [char; 3] = ['.', '!', '?'];

/// Sentence-boundary oracle used by the fallback segmenter
///
/// Abstracted as a capability so a heavier statistical splitter can be
/// plugged in; the default rule-based implementation is enough to confirm
/// that an accumulated block of prose ends somewhere on a real sentence.
pub trait SentenceBoundary {
    /// Split `text` into sentences, trimmed, empty ones dropped.
    fn sentences(&self, text: &str) -> Vec<String>;

    /// True when at least one detected sentence ends with terminal
    /// punctuation (ignoring trailing quotes and brackets).
    fn has_complete_sentence(&self, text: &str) -> bool {
        self.sentences(text).iter().any(|sentence| {
            sentence
                .trim_end_matches(['"', '\'', ')', ']'])
                .ends_with(SENTENCE_TERMINATORS)
        })
    }
}

static BOUNDARY_REGEX: Lazy<Regex> = Lazy::new(|| {
    // Terminal punctuation, optional closing quotes/brackets, then
    // whitespace. The next sentence starts after the whitespace.
    Regex::new(r#"[.!?]["')\]]*\s"#).expect("Invalid sentence boundary regex")
});

/// Rule-based sentence splitter
///
/// Splits after terminal punctuation followed by whitespace. No abbreviation
/// dictionary; recall on ordinary book prose is what matters here, not
/// precision on citations.
pub struct RuleBasedSplitter;

impl RuleBasedSplitter {
    pub fn new() -> Self {
        RuleBasedSplitter
    }
}

impl SentenceBoundary for RuleBasedSplitter {
    fn sentences(&self, text: &str) -> Vec<String> {
        let mut sentences = Vec::new();
        let mut start = 0;

        for boundary in BOUNDARY_REGEX.find_iter(text) {
            let sentence = text[start..boundary.end()].trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_string());
            }
            start = boundary.end();
        }

        let tail = text[start..].trim();
        if !tail.is_empty() {
            sentences.push(tail.to_string());
        }

        sentences
    }
}
