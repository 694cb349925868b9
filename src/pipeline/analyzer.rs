//! The end-to-end run: extract, rank, filter, report.

use std::path::PathBuf;

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::model::{
    DocumentSection, RankedSection, Report, ReportMetadata, ScoredCandidate, Section,
};
use crate::parser::{ExtractOptions, SectionExtractor};
use crate::rank::{FilterOptions, LexicalRanker, RankOptions, SemanticFilter};
use crate::render::{write_report, JsonFormat};

use super::config::AnalysisConfig;
use super::workspace::Workspace;

/// Format of `processing_timestamp`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Options for a whole run.
#[derive(Debug, Clone, Default)]
pub struct AnalyzerOptions {
    /// Section extraction
    pub extract: ExtractOptions,
    /// Lexical pass
    pub rank: RankOptions,
    /// Semantic pass
    pub filter: FilterOptions,
    /// Extract documents on the rayon pool
    pub parallel: bool,
    /// Report JSON layout
    pub json_format: JsonFormat,
}

impl AnalyzerOptions {
    /// Create new analyzer options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set extraction options.
    pub fn with_extract(mut self, extract: ExtractOptions) -> Self {
        self.extract = extract;
        self
    }

    /// Set lexical ranking options.
    pub fn with_rank(mut self, rank: RankOptions) -> Self {
        self.rank = rank;
        self
    }

    /// Set semantic filter options.
    pub fn with_filter(mut self, filter: FilterOptions) -> Self {
        self.filter = filter;
        self
    }

    /// Enable or disable parallel extraction.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the report JSON layout.
    pub fn with_json_format(mut self, format: JsonFormat) -> Self {
        self.json_format = format;
        self
    }
}

/// Progress notifications from a run, emitted in pipeline order.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    /// Extraction is about to start
    ExtractionStarted { documents: usize },
    /// A document was read
    DocumentExtracted { document: String, sections: usize },
    /// A document could not be read and contributes no sections
    DocumentFailed { document: String, reason: String },
    /// The lexical pass finished
    Ranked { candidates: usize },
    /// The semantic pass finished
    Filtered { items: usize },
    /// The report was written
    ReportWritten { path: PathBuf },
}

/// Runs the full pipeline for one configuration.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    options: AnalyzerOptions,
}

impl Analyzer {
    /// Create an analyzer with the given options.
    pub fn new(options: AnalyzerOptions) -> Self {
        Self { options }
    }

    /// The options in use.
    pub fn options(&self) -> &AnalyzerOptions {
        &self.options
    }

    /// Build the report without writing it.
    pub fn run(&self, config: &AnalysisConfig, workspace: &Workspace) -> Result<Report> {
        self.run_with_progress(config, workspace, |_| {})
    }

    /// Build the report, reporting progress to `on_event`.
    pub fn run_with_progress<F>(
        &self,
        config: &AnalysisConfig,
        workspace: &Workspace,
        mut on_event: F,
    ) -> Result<Report>
    where
        F: FnMut(PipelineEvent),
    {
        let names = config.document_names();
        let missing = workspace.missing_documents(&names);
        if !missing.is_empty() {
            return Err(Error::MissingDocuments(missing));
        }

        let processing_timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
        let task = config.task();
        log::info!(
            "Analyzing {} documents for '{}'",
            names.len(),
            config.persona_role()
        );

        on_event(PipelineEvent::ExtractionStarted {
            documents: names.len(),
        });
        let corpus = self.extract_all(&names, workspace, &mut on_event)?;
        if corpus.is_empty() {
            return Err(Error::EmptyCorpus("no sections extracted".to_string()));
        }

        let sections: Vec<Section> = corpus.iter().map(|ds| ds.section.clone()).collect();
        let ranked = LexicalRanker::new(self.options.rank.clone()).rank(&sections, task)?;
        on_event(PipelineEvent::Ranked {
            candidates: ranked.len(),
        });

        let candidates = attach_documents(ranked, &corpus);
        let refined = SemanticFilter::new(self.options.filter.clone()).filter(candidates, task);
        on_event(PipelineEvent::Filtered {
            items: refined.len(),
        });

        let metadata = ReportMetadata {
            input_documents: names,
            persona: config.persona_role().to_string(),
            job_to_be_done: task.to_string(),
            processing_timestamp,
        };
        Ok(Report::from_refined(metadata, &refined))
    }

    /// Build the report and write it to the workspace's output directory.
    ///
    /// Nothing is written when the run fails.
    pub fn analyze_and_write<F>(
        &self,
        config: &AnalysisConfig,
        workspace: &Workspace,
        mut on_event: F,
    ) -> Result<PathBuf>
    where
        F: FnMut(PipelineEvent),
    {
        let report = self.run_with_progress(config, workspace, &mut on_event)?;
        let path = self.write(&report, workspace)?;
        on_event(PipelineEvent::ReportWritten { path: path.clone() });
        Ok(path)
    }

    /// Write a finished report to the workspace's output directory.
    pub fn write(&self, report: &Report, workspace: &Workspace) -> Result<PathBuf> {
        workspace.ensure_output_dir()?;
        let path = workspace.report_path();
        write_report(report, &path, self.options.json_format)?;
        log::info!("Wrote {} sections to {}", report.len(), path.display());
        Ok(path)
    }

    fn extract_all<F>(
        &self,
        names: &[String],
        workspace: &Workspace,
        on_event: &mut F,
    ) -> Result<Vec<DocumentSection>>
    where
        F: FnMut(PipelineEvent),
    {
        let extractor = SectionExtractor::new(self.options.extract.clone());
        let extract = |name: &String| extractor.extract_file(workspace.document_path(name));

        // Collected in listed order either way
        let results: Vec<Result<Vec<Section>>> = if self.options.parallel {
            names.par_iter().map(extract).collect()
        } else {
            names.iter().map(extract).collect()
        };

        collect_corpus(names, results, on_event)
    }
}

/// Concatenate per-document results in listed order.
///
/// Per-document read failures are reported and skipped; any fatal error
/// aborts the run.
fn collect_corpus<F>(
    names: &[String],
    results: Vec<Result<Vec<Section>>>,
    on_event: &mut F,
) -> Result<Vec<DocumentSection>>
where
    F: FnMut(PipelineEvent),
{
    let mut corpus = Vec::new();
    for (name, result) in names.iter().zip(results) {
        match result {
            Ok(sections) => {
                log::debug!("{}: {} sections", name, sections.len());
                on_event(PipelineEvent::DocumentExtracted {
                    document: name.clone(),
                    sections: sections.len(),
                });
                corpus.extend(
                    sections
                        .into_iter()
                        .map(|section| DocumentSection::new(name.clone(), section)),
                );
            }
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                log::warn!("{}", e);
                on_event(PipelineEvent::DocumentFailed {
                    document: name.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }
    Ok(corpus)
}

/// Re-attach each ranked section to the first document holding the same text.
fn attach_documents(
    ranked: Vec<RankedSection>,
    corpus: &[DocumentSection],
) -> Vec<ScoredCandidate> {
    ranked
        .into_iter()
        .map(|r| {
            let document = corpus
                .iter()
                .find(|ds| ds.section.text == r.section.text)
                .map(|ds| ds.document.clone())
                .unwrap_or_default();
            ScoredCandidate::from_ranked(document, r)
        })
        .collect()
}
