//! Orchestration of a full analysis run.

mod analyzer;
mod config;
mod workspace;

pub use analyzer::{Analyzer, AnalyzerOptions, PipelineEvent, TIMESTAMP_FORMAT};
pub use config::{AnalysisConfig, DocumentEntry, JobToBeDone, Persona, DEFAULT_PERSONA, DEFAULT_TASK};
pub use workspace::{Workspace, FALLBACK_INPUT_DIR, FALLBACK_OUTPUT_DIR, REPORT_FILE_NAME};
