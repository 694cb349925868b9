//! Section-level types.

use serde::{Deserialize, Serialize};

/// A positioned text fragment read from one page.
///
/// Blocks only live long enough to be grouped under titles.
#[derive(Debug, Clone, PartialEq)]
pub struct RawBlock {
    /// Text content of the block (lines joined with spaces)
    pub text: String,
    /// Distance of the block's first line from the top of the page, in points
    pub top: f32,
    /// Page number (1-indexed)
    pub page: u32,
    /// Text column the block sits in, 0 being the leftmost
    pub column: usize,
}

impl RawBlock {
    /// Create a new block in the first column.
    pub fn new(text: impl Into<String>, top: f32, page: u32) -> Self {
        Self {
            text: text.into(),
            top,
            page,
            column: 0,
        }
    }

    /// Place the block in a column.
    pub fn with_column(mut self, column: usize) -> Self {
        self.column = column;
        self
    }
}

/// A titled paragraph of body text extracted from one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Paragraph text
    pub text: String,
    /// Page number (1-indexed)
    pub page: u32,
    /// Nearest preceding title on the same page
    pub title: String,
}

impl Section {
    /// Create a new section.
    pub fn new(text: impl Into<String>, page: u32, title: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            page,
            title: title.into(),
        }
    }

    /// The text the lexical ranker indexes: `"{title}: {text}"`.
    pub fn indexed_text(&self) -> String {
        format!("{}: {}", self.title, self.text)
    }
}

/// A section together with the document it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSection {
    /// Source document file name
    pub document: String,
    /// The extracted section
    #[serde(flatten)]
    pub section: Section,
}

impl DocumentSection {
    /// Attach a document name to a section.
    pub fn new(document: impl Into<String>, section: Section) -> Self {
        Self {
            document: document.into(),
            section,
        }
    }
}
