//! # pdfrank
//!
//! Persona-driven section extraction and relevance ranking for PDF collections.
//!
//! Given a persona, a task ("job to be done") and a set of PDFs, the library
//! splits every document into titled sections, ranks them against the task in
//! two TF-IDF passes and produces a JSON report of the most relevant ones.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfrank::{analyze, Workspace};
//!
//! fn main() -> pdfrank::Result<()> {
//!     let workspace = Workspace::resolve(".");
//!     let report = analyze("input.json", &workspace)?;
//!
//!     for section in &report.extracted_sections {
//!         println!("{}. {} ({})", section.importance_rank, section.section_title, section.document);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Stages
//!
//! - **Extraction**: content stream text is laid out into blocks; blocks that
//!   look like titles open a section, the rest become its body
//! - **Lexical pass**: shared TF-IDF vocabulary over all sections, percentile
//!   cutoff, magnitude-weighted score, near-duplicate suppression
//! - **Semantic pass**: independent refit over the survivors with a fixed
//!   similarity threshold and a fallback count
//! - **Report**: `analysis.json` with index-aligned section and text entries

pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod rank;
pub mod render;
pub mod text;

// Re-export commonly used types
pub use detect::{is_pdf, pdf_version_from_bytes, pdf_version_from_path};
pub use error::{Error, Result};
pub use model::{
    DocumentSection, ExtractedSection, RankedSection, RefinedItem, Report, ReportMetadata,
    ScoredCandidate, Section, SubsectionAnalysis,
};
pub use parser::{ErrorMode, ExtractOptions, SectionExtractor};
pub use pipeline::{AnalysisConfig, Analyzer, AnalyzerOptions, PipelineEvent, Workspace};
pub use rank::{FilterOptions, LexicalRanker, RankOptions, SemanticFilter};
pub use render::JsonFormat;
pub use text::{NoiseFilter, TitleRule};

use std::path::{Path, PathBuf};

/// Extract the sections of a PDF file with default options.
///
/// # Example
///
/// ```no_run
/// let sections = pdfrank::extract_sections("guide.pdf").unwrap();
/// for s in &sections {
///     println!("p{} {}", s.page, s.title);
/// }
/// ```
pub fn extract_sections<P: AsRef<Path>>(path: P) -> Result<Vec<Section>> {
    SectionExtractor::default().extract_file(path)
}

/// Extract the sections of a PDF file with custom options.
pub fn extract_sections_with_options<P: AsRef<Path>>(
    path: P,
    options: ExtractOptions,
) -> Result<Vec<Section>> {
    SectionExtractor::new(options).extract_file(path)
}

/// Load a configuration file and build its report with default options.
///
/// Nothing is written to disk.
pub fn analyze<P: AsRef<Path>>(config_path: P, workspace: &Workspace) -> Result<Report> {
    let config = AnalysisConfig::load(config_path)?;
    Analyzer::default().run(&config, workspace)
}

/// Load a configuration file, build its report and write `analysis.json`.
///
/// Returns the path of the written report.
pub fn run<P: AsRef<Path>>(config_path: P, workspace: &Workspace) -> Result<PathBuf> {
    let config = AnalysisConfig::load(config_path)?;
    Analyzer::default().analyze_and_write(&config, workspace, |_| {})
}

/// Builder for configuring and running an analysis.
///
/// # Example
///
/// ```no_run
/// use pdfrank::{PdfRank, Workspace};
///
/// let path = PdfRank::new()
///     .with_top_n(15)
///     .with_threshold(0.2)
///     .parallel()
///     .run("input.json", &Workspace::new("docs", "out"))?;
/// # Ok::<(), pdfrank::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct PdfRank {
    options: AnalyzerOptions,
}

impl PdfRank {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail a document on its first unreadable page.
    pub fn strict(mut self) -> Self {
        self.options.extract = self.options.extract.strict();
        self
    }

    /// Extract documents in parallel.
    pub fn parallel(mut self) -> Self {
        self.options.parallel = true;
        self
    }

    /// Set extraction options.
    pub fn with_extract_options(mut self, options: ExtractOptions) -> Self {
        self.options.extract = options;
        self
    }

    /// Number of sections the lexical pass selects.
    pub fn with_top_n(mut self, n: usize) -> Self {
        self.options.rank = self.options.rank.with_top_n(n);
        self
    }

    /// Similarity percentile below which sections are dropped.
    pub fn with_relevance_percentile(mut self, percentile: f64) -> Self {
        self.options.rank = self.options.rank.with_relevance_percentile(percentile);
        self
    }

    /// Cosine similarity above which a section is a near-duplicate.
    pub fn with_duplicate_threshold(mut self, threshold: f64) -> Self {
        self.options.rank = self.options.rank.with_duplicate_threshold(threshold);
        self
    }

    /// Similarity the semantic pass requires.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.options.filter = self.options.filter.with_threshold(threshold);
        self
    }

    /// Fallback count and output cap of the semantic pass.
    pub fn with_fallback_count(mut self, count: usize) -> Self {
        self.options.filter = self.options.filter.with_fallback_count(count);
        self
    }

    /// Set the report JSON layout.
    pub fn with_json_format(mut self, format: JsonFormat) -> Self {
        self.options.json_format = format;
        self
    }

    /// The accumulated options.
    pub fn options(&self) -> &AnalyzerOptions {
        &self.options
    }

    /// Build the report for a configuration file.
    pub fn analyze<P: AsRef<Path>>(self, config_path: P, workspace: &Workspace) -> Result<Report> {
        let config = AnalysisConfig::load(config_path)?;
        Analyzer::new(self.options).run(&config, workspace)
    }

    /// Build and write the report for a configuration file.
    pub fn run<P: AsRef<Path>>(self, config_path: P, workspace: &Workspace) -> Result<PathBuf> {
        let config = AnalysisConfig::load(config_path)?;
        Analyzer::new(self.options).analyze_and_write(&config, workspace, |_| {})
    }
}
