//! First-pass lexical ranking with near-duplicate suppression.

use crate::error::{Error, Result};
use crate::model::{RankedSection, Section};

use super::options::RankOptions;
use super::tfidf::{cosine_similarity, percentile, SparseVector, TfidfVectorizer};

/// Ranks sections against a task description by TF-IDF relevance.
///
/// Sections and the task share one vocabulary fitted per call. Each section
/// gets `similarity` (cosine with the task) and `score` (sum of its term
/// weights times that similarity). Sections below the configured similarity
/// percentile are dropped; the rest are taken in descending score order,
/// skipping any that are near-duplicates of one already taken.
#[derive(Debug, Clone, Default)]
pub struct LexicalRanker {
    options: RankOptions,
}

impl LexicalRanker {
    /// Create a ranker with the given options.
    pub fn new(options: RankOptions) -> Self {
        Self { options }
    }

    /// The options in use.
    pub fn options(&self) -> &RankOptions {
        &self.options
    }

    /// Rank `sections` against `task`.
    ///
    /// Fails with [`Error::EmptyCorpus`] when there is nothing to rank or the
    /// corpus has no indexable terms.
    pub fn rank(&self, sections: &[Section], task: &str) -> Result<Vec<RankedSection>> {
        if sections.is_empty() {
            return Err(Error::EmptyCorpus("no sections extracted".to_string()));
        }

        let mut corpus: Vec<String> = sections.iter().map(Section::indexed_text).collect();
        corpus.push(task.to_string());

        let vectorizer = TfidfVectorizer::new().with_min_df(self.options.min_df);
        let (_, mut rows) = vectorizer.fit_transform(&corpus).map_err(|e| match e {
            Error::EmptyVocabulary => {
                Error::EmptyCorpus("sections contain no indexable terms".to_string())
            }
            other => other,
        })?;
        let task_vector = rows.pop().unwrap_or_default();

        let similarities: Vec<f64> = rows
            .iter()
            .map(|row| cosine_similarity(row, &task_vector))
            .collect();
        let scores: Vec<f64> = rows
            .iter()
            .zip(&similarities)
            .map(|(row, sim)| row.sum() * sim)
            .collect();

        let cutoff = percentile(&similarities, self.options.relevance_percentile).unwrap_or(0.0);
        let mut candidates: Vec<usize> = (0..sections.len())
            .filter(|&i| similarities[i] >= cutoff)
            .collect();
        // Stable: equal scores keep corpus order
        candidates.sort_by(|&a, &b| {
            scores[b]
                .partial_cmp(&scores[a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        log::debug!(
            "Lexical pass: {} sections, {} at or above percentile {} (cutoff {:.4})",
            sections.len(),
            candidates.len(),
            self.options.relevance_percentile,
            cutoff
        );

        let mut selected: Vec<&SparseVector> = Vec::new();
        let mut ranked = Vec::new();
        for i in candidates {
            if ranked.len() >= self.options.top_n {
                break;
            }
            let row = &rows[i];
            let duplicate = selected
                .iter()
                .any(|s| cosine_similarity(row, s) > self.options.duplicate_threshold);
            if duplicate {
                log::debug!("Skipping near-duplicate section '{}'", sections[i].title);
                continue;
            }
            selected.push(row);
            ranked.push(RankedSection {
                section: sections[i].clone(),
                score: scores[i],
                similarity: similarities[i],
                rank: ranked.len() + 1,
            });
        }

        log::info!("Lexical pass selected {} sections", ranked.len());
        Ok(ranked)
    }
}
