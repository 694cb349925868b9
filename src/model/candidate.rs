//! Ranking-stage records.

use serde::Serialize;

use super::Section;

/// A section accepted by the lexical ranker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedSection {
    /// The accepted section
    pub section: Section,
    /// Magnitude-weighted relevance score (term weight sum x similarity)
    pub score: f64,
    /// Cosine similarity against the task description
    pub similarity: f64,
    /// Selection order (1-indexed)
    pub rank: usize,
}

/// A ranked section with its source document re-attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate {
    /// Source document file name
    pub document: String,
    /// The section
    pub section: Section,
    /// Lexical relevance score
    pub score: f64,
    /// Lexical selection order (1-indexed)
    pub rank: usize,
}

impl ScoredCandidate {
    /// Build a candidate from a ranked section and its document.
    pub fn from_ranked(document: impl Into<String>, ranked: RankedSection) -> Self {
        Self {
            document: document.into(),
            section: ranked.section,
            score: ranked.score,
            rank: ranked.rank,
        }
    }

    /// The refined text carried into the report.
    pub fn refined_text(&self) -> &str {
        &self.section.text
    }
}

/// A candidate that survived the semantic filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefinedItem {
    /// The lexical candidate
    pub candidate: ScoredCandidate,
    /// Second-pass similarity against the task description
    pub similarity: f64,
}

impl RefinedItem {
    /// Source document file name.
    pub fn document(&self) -> &str {
        &self.candidate.document
    }

    /// Page number (1-indexed).
    pub fn page(&self) -> u32 {
        self.candidate.section.page
    }

    /// Section title.
    pub fn title(&self) -> &str {
        &self.candidate.section.title
    }

    /// Refined paragraph text.
    pub fn refined_text(&self) -> &str {
        self.candidate.refined_text()
    }
}
