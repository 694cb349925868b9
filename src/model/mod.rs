//! Data model shared by the extraction and ranking stages.
//!
//! Each stage consumes one of these sequences and produces a new, enriched
//! one; nothing is mutated in place once a stage has emitted it.

mod candidate;
mod report;
mod section;

pub use candidate::{RankedSection, RefinedItem, ScoredCandidate};
pub use report::{ExtractedSection, Report, ReportMetadata, SubsectionAnalysis};
pub use section::{DocumentSection, RawBlock, Section};
