//! Relevance ranking of extracted sections.
//!
//! Two independent passes run against the task description. The lexical pass
//! fits TF-IDF over every section, cuts by similarity percentile, weights by
//! term mass and drops near-duplicates. The semantic pass refits over the
//! survivors alone and keeps those above a fixed similarity threshold.

mod lexical;
mod options;
mod semantic;
pub mod tfidf;

pub use lexical::LexicalRanker;
pub use options::{FilterOptions, RankOptions};
pub use semantic::SemanticFilter;
pub use tfidf::{cosine_similarity, SparseVector, TfidfModel, TfidfVectorizer};
