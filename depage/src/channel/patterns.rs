//! Prompt and pagination pattern matching.

use regex::bytes::{Regex, RegexBuilder};

/// Default device prompt pattern: a line ending in `#`, `$`, or `>`,
/// optionally followed by whitespace. Covers typical Cisco/Juniper/Unix
/// prompts.
pub const DEFAULT_PROMPT_PATTERN: &str = r"[#$>]\s*$";

/// Default pagination prompts, one per known vendor style.
/// Order is priority order.
pub const DEFAULT_PAGING_PATTERNS: &[&str] = &[
    r"--More--",
    r"-- MORE --",
    r"Press any key to continue",
    r"\[Continue\]",
    r"q to quit",
];

/// Compile a device prompt pattern.
///
/// The pattern is compiled multi-line so the prompt matches at the end of
/// any line in the accumulated output, and a `\s*$` anchor is appended
/// when the caller's pattern has none.
pub fn compile_prompt_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    let pattern = if pattern.ends_with('$') {
        pattern.to_string()
    } else {
        format!(r"{pattern}\s*$")
    };

    RegexBuilder::new(&pattern).multi_line(true).build()
}

/// Ordered set of pagination prompt matchers.
///
/// Each entry represents one vendor's "more output" marker. Matching is
/// case-insensitive and insertion order is priority order: the first
/// pattern that matches a chunk wins. The set is immutable for the
/// duration of a call.
#[derive(Debug, Clone)]
pub struct PagingPatterns {
    patterns: Vec<Regex>,
}

impl PagingPatterns {
    /// Compile a set of pagination patterns, preserving order.
    pub fn new<I, S>(patterns: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut compiled = Vec::new();
        for pattern in patterns {
            compiled.push(Self::compile(pattern.as_ref())?);
        }
        Ok(Self { patterns: compiled })
    }

    /// Append a pattern at the lowest priority.
    pub fn push(&mut self, pattern: &str) -> Result<(), regex::Error> {
        self.patterns.push(Self::compile(pattern)?);
        Ok(())
    }

    fn compile(pattern: &str) -> Result<Regex, regex::Error> {
        RegexBuilder::new(pattern).case_insensitive(true).build()
    }

    /// Index of the first pattern matching `chunk`, in insertion order.
    ///
    /// Pagination markers are transient, so this is checked against the
    /// chunk just read, not the accumulated output.
    pub fn first_match(&self, chunk: &[u8]) -> Option<usize> {
        self.patterns.iter().position(|p| p.is_match(chunk))
    }

    /// Number of patterns in the set.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl Default for PagingPatterns {
    fn default() -> Self {
        Self::new(DEFAULT_PAGING_PATTERNS).expect("default paging patterns are valid")
    }
}
