//! Section extraction options.

use crate::text::{NoiseFilter, TitleRule};

/// Options for splitting documents into sections.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Error handling mode for individual pages
    pub error_mode: ErrorMode,

    /// Which blocks count as titles
    pub title_rule: TitleRule,

    /// Which blocks are dropped as boilerplate
    pub noise_filter: NoiseFilter,

    /// A section body must be longer than this many characters
    pub min_section_chars: usize,

    /// Strip leading bullet glyphs from body blocks
    pub strip_bullets: bool,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Fail the whole document when any page cannot be read.
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Set the title heuristic.
    pub fn with_title_rule(mut self, rule: TitleRule) -> Self {
        self.title_rule = rule;
        self
    }

    /// Set the noise filter.
    pub fn with_noise_filter(mut self, filter: NoiseFilter) -> Self {
        self.noise_filter = filter;
        self
    }

    /// Set the exclusive minimum body length.
    pub fn with_min_section_chars(mut self, chars: usize) -> Self {
        self.min_section_chars = chars;
        self
    }

    /// Enable or disable bullet stripping.
    pub fn with_strip_bullets(mut self, strip: bool) -> Self {
        self.strip_bullets = strip;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Lenient,
            title_rule: TitleRule::default(),
            noise_filter: NoiseFilter::default(),
            min_section_chars: 50,
            strip_bullets: false,
        }
    }
}

/// Error handling mode for unreadable pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// An unreadable page fails the document
    Strict,
    /// Skip the page and continue
    #[default]
    Lenient,
}
