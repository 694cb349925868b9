//! Second-pass similarity filter.

use crate::model::{RefinedItem, ScoredCandidate};

use super::options::FilterOptions;
use super::tfidf::{cosine_similarity, TfidfVectorizer};

/// Re-scores lexical candidates against the task with a fresh vocabulary.
///
/// Candidates are ordered by similarity alone; score magnitude from the first
/// pass plays no part. Items at or above the threshold are kept. When none
/// qualify the most similar `fallback_count` are taken instead, and the output
/// never exceeds `fallback_count` items.
#[derive(Debug, Clone, Default)]
pub struct SemanticFilter {
    options: FilterOptions,
}

impl SemanticFilter {
    /// Create a filter with the given options.
    pub fn new(options: FilterOptions) -> Self {
        Self { options }
    }

    /// The options in use.
    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    /// Filter `candidates` against `task`.
    ///
    /// Returns an empty vector only when `candidates` is empty.
    pub fn filter(&self, candidates: Vec<ScoredCandidate>, task: &str) -> Vec<RefinedItem> {
        if candidates.is_empty() {
            return Vec::new();
        }

        let similarities = self.similarities(&candidates, task);
        let mut items: Vec<RefinedItem> = candidates
            .into_iter()
            .zip(similarities)
            .map(|(candidate, similarity)| RefinedItem {
                candidate,
                similarity,
            })
            .collect();
        items.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let passing = items
            .iter()
            .take_while(|item| item.similarity >= self.options.threshold)
            .count();
        let keep = if passing == 0 {
            log::debug!(
                "No candidate reached similarity {}; taking top {}",
                self.options.threshold,
                self.options.fallback_count
            );
            self.options.fallback_count
        } else {
            passing.min(self.options.fallback_count)
        };
        items.truncate(keep);

        log::info!("Semantic pass kept {} items", items.len());
        items
    }

    fn similarities(&self, candidates: &[ScoredCandidate], task: &str) -> Vec<f64> {
        let mut corpus: Vec<&str> = candidates.iter().map(|c| c.refined_text()).collect();
        corpus.push(task);

        match TfidfVectorizer::new().fit_transform(&corpus) {
            Ok((_, mut rows)) => {
                let task_vector = rows.pop().unwrap_or_default();
                rows.iter()
                    .map(|row| cosine_similarity(row, &task_vector))
                    .collect()
            }
            Err(e) => {
                log::debug!("Semantic pass: {}", e);
                vec![0.0; candidates.len()]
            }
        }
    }
}
