use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::{DEFAULT_NOISE_PATTERNS, compile_anchored};
use crate::error::ExtractionError;

static DEFAULT_RULES: Lazy<Vec<Regex>> = Lazy::new(|| {
    DEFAULT_NOISE_PATTERNS
        .iter()
        .map(|pattern| compile_anchored(pattern).expect("Invalid default noise pattern"))
        .collect()
});

/// Removes header/footer noise from page text, line by line
///
/// Rules are case-insensitive regular expressions anchored at the start of a
/// line; a line is dropped when ANY rule matches it. Rules are applied in
/// order but independently, so ordering only matters for logging.
pub struct NoiseFilter {
    rules: Vec<Regex>,
}

impl NoiseFilter {
    /// Filter with the default rule set: page numbers, copyright lines,
    /// confidentiality banners, "Last updated" footers.
    pub fn new() -> Self {
        NoiseFilter {
            rules: DEFAULT_RULES.clone(),
        }
    }

    /// Filter with a caller-supplied ordered rule list.
    pub fn with_patterns(patterns: &[String]) -> Result<Self, ExtractionError> {
        let rules = patterns
            .iter()
            .map(|pattern| compile_anchored(pattern))
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Loaded {} noise patterns", rules.len());
        Ok(NoiseFilter { rules })
    }

    /// Append a rule matching repeated title-header lines for a known book
    /// title, e.g. running heads like "Animal Farm, by George Orwell".
    pub fn with_title_header(mut self, title: &str) -> Self {
        let pattern = format!("{}.*$", regex::escape(title));
        // Escaping makes the pattern infallible to compile.
        let rule = compile_anchored(&pattern).expect("Invalid title header pattern");
        self.rules.push(rule);
        self
    }

    /// True when `line` is fully matched by any active rule.
    pub fn is_noise(&self, line: &str) -> bool {
        self.rules.iter().any(|rule| rule.is_match(line))
    }

    /// Drop noise lines from one page's text, preserving the order of the
    /// surviving lines, and rejoin with newlines.
    pub fn filter_page(&self, page_text: &str) -> String {
        let kept: Vec<&str> = page_text
            .lines()
            .filter(|line| !self.is_noise(line))
            .collect();

        kept.join("\n")
    }
}
