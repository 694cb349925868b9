//! The final analysis report.

use serde::{Deserialize, Serialize};

use super::RefinedItem;

/// Aggregate result of one run.
///
/// `extracted_sections` and `subsection_analysis` always have the same length
/// and are index-aligned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Run metadata
    pub metadata: ReportMetadata,
    /// Ranked section headers
    pub extracted_sections: Vec<ExtractedSection>,
    /// Refined paragraph text, one per extracted section
    pub subsection_analysis: Vec<SubsectionAnalysis>,
}

/// Run metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Document file names in configuration order
    pub input_documents: Vec<String>,
    /// Persona role
    pub persona: String,
    /// Task description
    pub job_to_be_done: String,
    /// ISO 8601 local time the run started
    pub processing_timestamp: String,
}

/// One ranked section header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedSection {
    pub document: String,
    pub page_number: u32,
    pub section_title: String,
    /// 1-based rank in final output order
    pub importance_rank: u32,
}

/// One refined paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsectionAnalysis {
    pub document: String,
    pub refined_text: String,
    pub page_number: u32,
}

impl Report {
    /// Shape the report from the semantic filter's output, assigning
    /// `importance_rank` 1..=n in the given order.
    pub fn from_refined(metadata: ReportMetadata, items: &[RefinedItem]) -> Self {
        let mut extracted_sections = Vec::with_capacity(items.len());
        let mut subsection_analysis = Vec::with_capacity(items.len());

        for (i, item) in items.iter().enumerate() {
            extracted_sections.push(ExtractedSection {
                document: item.document().to_string(),
                page_number: item.page(),
                section_title: item.title().to_string(),
                importance_rank: i as u32 + 1,
            });
            subsection_analysis.push(SubsectionAnalysis {
                document: item.document().to_string(),
                refined_text: item.refined_text().to_string(),
                page_number: item.page(),
            });
        }

        Self {
            metadata,
            extracted_sections,
            subsection_analysis,
        }
    }

    /// Number of ranked entries.
    pub fn len(&self) -> usize {
        self.extracted_sections.len()
    }

    /// Check if the report has no entries.
    pub fn is_empty(&self) -> bool {
        self.extracted_sections.is_empty()
    }
}
