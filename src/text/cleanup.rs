//! Block text cleanup, noise filtering and title detection.

use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Boilerplate words that never carry a section on their own.
pub const DEFAULT_STOP_PHRASES: &[&str] = &[
    "continued",
    "figure",
    "table",
    "contents",
    "abstract",
    "references",
];

const LIGATURES: &[(&str, &str)] = &[
    ("\u{FB00}", "ff"),  // ﬀ
    ("\u{FB01}", "fi"),  // ﬁ
    ("\u{FB02}", "fl"),  // ﬂ
    ("\u{FB03}", "ffi"), // ﬃ
    ("\u{FB04}", "ffl"), // ﬄ
    ("\u{FB05}", "st"),  // ﬅ (long s + t)
    ("\u{FB06}", "st"),  // ﬆ
];

/// Whitespace, ellipsis and bullet normalization for block text.
#[derive(Debug, Clone)]
pub struct TextCleaner {
    whitespace: Regex,
    repeated_periods: Regex,
    bullet_prefix: Regex,
}

impl TextCleaner {
    /// Create a new cleaner.
    pub fn new() -> Self {
        Self {
            whitespace: Regex::new(r"\s+").unwrap(),
            repeated_periods: Regex::new(r"\.{2,}").unwrap(),
            bullet_prefix: Regex::new(r"^[•\-\*]+\s*").unwrap(),
        }
    }

    /// Collapse whitespace runs to one space, collapse runs of periods to
    /// one period, and trim.
    pub fn clean(&self, text: &str) -> String {
        let text = self.whitespace.replace_all(text, " ");
        let text = self.repeated_periods.replace_all(&text, ".");
        text.trim().to_string()
    }

    /// Remove a leading run of bullet glyphs and the whitespace after it.
    pub fn strip_bullet_prefix(&self, text: &str) -> String {
        self.bullet_prefix.replace(text, "").into_owned()
    }
}

impl Default for TextCleaner {
    fn default() -> Self {
        Self::new()
    }
}

/// Predicate for boilerplate text: empty, short, a stop phrase, or a
/// "page N" marker.
#[derive(Debug, Clone)]
pub struct NoiseFilter {
    /// Texts shorter than this (in characters, after trimming) are noise
    pub min_chars: usize,
    /// Lowercase phrases that are noise when they make up the whole text
    pub stop_phrases: Vec<String>,
    page_marker: Regex,
}

impl NoiseFilter {
    /// Create a filter with the default stop phrases and a 20 character floor.
    pub fn new() -> Self {
        Self {
            min_chars: 20,
            stop_phrases: DEFAULT_STOP_PHRASES.iter().map(|s| s.to_string()).collect(),
            page_marker: Regex::new(r"(?i)page \d+").unwrap(),
        }
    }

    /// Set the minimum length below which text is noise.
    pub fn with_min_chars(mut self, min_chars: usize) -> Self {
        self.min_chars = min_chars;
        self
    }

    /// Replace the stop phrase set.
    pub fn with_stop_phrases<I, S>(mut self, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop_phrases = phrases
            .into_iter()
            .map(|p| p.into().to_lowercase())
            .collect();
        self
    }

    /// Check whether text is boilerplate.
    pub fn is_noise(&self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() || text.chars().count() < self.min_chars {
            return true;
        }

        let lower = text.to_lowercase();
        if self.stop_phrases.iter().any(|p| *p == lower) {
            return true;
        }

        // Matches anywhere, e.g. "Continued on page 4"
        self.page_marker.is_match(text)
    }
}

impl Default for NoiseFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// Heuristic for short, capitalized, unpunctuated title lines.
#[derive(Debug, Clone, PartialEq)]
pub struct TitleRule {
    /// Titles must be strictly shorter than this many characters
    pub max_chars: usize,
    /// Characters a title may not end with
    pub terminators: Vec<char>,
    /// Require [`is_title_case`]
    pub require_title_case: bool,
}

impl TitleRule {
    /// Create the default rule: under 60 chars, title case, not ending in `.:;`.
    pub fn new() -> Self {
        Self {
            max_chars: 60,
            terminators: vec!['.', ':', ';'],
            require_title_case: true,
        }
    }

    /// Set the exclusive length limit.
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    /// Set the forbidden trailing characters.
    pub fn with_terminators(mut self, terminators: impl Into<Vec<char>>) -> Self {
        self.terminators = terminators.into();
        self
    }

    /// Enable or disable the title-case requirement.
    pub fn with_title_case(mut self, require: bool) -> Self {
        self.require_title_case = require;
        self
    }

    /// Check whether cleaned block text looks like a title.
    pub fn is_title(&self, text: &str) -> bool {
        if text.chars().count() >= self.max_chars {
            return false;
        }
        if self.require_title_case && !is_title_case(text) {
            return false;
        }
        !text
            .chars()
            .last()
            .is_some_and(|c| self.terminators.contains(&c))
    }
}

impl Default for TitleRule {
    fn default() -> Self {
        Self::new()
    }
}

fn default_cleaner() -> &'static TextCleaner {
    static CLEANER: OnceLock<TextCleaner> = OnceLock::new();
    CLEANER.get_or_init(TextCleaner::new)
}

fn default_noise_filter() -> &'static NoiseFilter {
    static FILTER: OnceLock<NoiseFilter> = OnceLock::new();
    FILTER.get_or_init(NoiseFilter::new)
}

/// Normalize whitespace and repeated periods. See [`TextCleaner::clean`].
pub fn clean(text: &str) -> String {
    default_cleaner().clean(text)
}

/// Check text against the default [`NoiseFilter`].
pub fn is_noise(text: &str) -> bool {
    default_noise_filter().is_noise(text)
}

/// Remove leading bullet glyphs. See [`TextCleaner::strip_bullet_prefix`].
pub fn strip_bullet_prefix(text: &str) -> String {
    default_cleaner().strip_bullet_prefix(text)
}

/// Title-case test: every run of cased letters starts with an uppercase letter
/// followed only by lowercase ones, and at least one cased letter exists.
///
/// Uncased characters (digits, punctuation, spaces) reset the run, so
/// "Hello-World 2024" passes while "ABSTRACT" and "Don't" do not.
pub fn is_title_case(text: &str) -> bool {
    let mut seen_cased = false;
    let mut prev_cased = false;

    for c in text.chars() {
        if c.is_uppercase() {
            if prev_cased {
                return false;
            }
            prev_cased = true;
            seen_cased = true;
        } else if c.is_lowercase() {
            if !prev_cased {
                return false;
            }
            prev_cased = true;
            seen_cased = true;
        } else {
            prev_cased = false;
        }
    }

    seen_cased
}

/// NFC-normalize decoded glyph text and expand Latin ligatures.
pub fn normalize_glyphs(text: &str) -> String {
    let mut result: String = text.nfc().collect();
    for (ligature, replacement) in LIGATURES {
        if result.contains(ligature) {
            result = result.replace(ligature, replacement);
        }
    }
    result
}
