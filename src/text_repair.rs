use log::debug;
use regex::Regex;

/// Repairs heading artifacts that paginated extraction commonly mangles
///
/// Runs a fixed sequence of text-level rewrite passes over the whole
/// accumulated document:
/// 1. Re-insert the missing space when a chapter token is glued to the
///    preceding word ("OrwellC 1 HAPTER" -> "Orwell C 1 HAPTER")
/// 2. Collapse digit-interleaved chapter tokens ("C 1 HAPTER" -> "CHAPTER 1")
/// 3. Collapse letter-spaced chapter headings ("C H A P T E R 1" -> "CHAPTER 1")
/// 4. Canonicalize spaced-out "TABLE OF CONTENTS" variants
/// 5. Collapse any run of 2+ whitespace characters into one space
///
/// The passes are order-dependent: each assumes the canonical forms produced
/// by the ones before it.
pub struct TextRepairer {
    glued_chapter_regex: Regex,
    interleaved_chapter_regex: Regex,
    spaced_chapter_regex: Regex,
    toc_regex: Regex,
    whitespace_regex: Regex,
}

impl TextRepairer {
    pub fn new() -> Self {
        TextRepairer {
            glued_chapter_regex: Regex::new(r"([a-zA-Z])C\s*(\d+)\s*HAPTER")
                .expect("Invalid glued chapter regex"),
            interleaved_chapter_regex: Regex::new(r"(?i)C\s*(\d+)\s*HAPTER")
                .expect("Invalid interleaved chapter regex"),
            spaced_chapter_regex: Regex::new(r"(?i)C\s*H\s*A\s*P\s*T\s*E\s*R\s+(\d+)")
                .expect("Invalid spaced chapter regex"),
            toc_regex: Regex::new(r"\bT\s*C\s*ABLE\s*OF\s*ONTENTS\b")
                .expect("Invalid contents header regex"),
            whitespace_regex: Regex::new(r"\s{2,}").expect("Invalid whitespace regex"),
        }
    }

    /// Apply all repair passes in order and return the rewritten text.
    pub fn repair(&self, text: &str) -> String {
        debug!("Repairing structural artifacts: {} characters", text.len());

        let text = self
            .glued_chapter_regex
            .replace_all(text, "${1} C ${2} HAPTER");
        let text = self
            .interleaved_chapter_regex
            .replace_all(&text, "CHAPTER ${1}");
        let text = self.spaced_chapter_regex.replace_all(&text, "CHAPTER ${1}");
        let text = self.toc_regex.replace_all(&text, "TABLE OF CONTENTS");
        let text = self.whitespace_regex.replace_all(&text, " ");

        text.into_owned()
    }
}
