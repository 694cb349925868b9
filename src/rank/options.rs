//! Ranking options.

/// Options for the lexical ranking pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RankOptions {
    /// Maximum number of sections to select
    pub top_n: usize,

    /// Sections whose task similarity falls below this percentile of all
    /// similarities are dropped (0-100)
    pub relevance_percentile: f64,

    /// Candidates more similar than this to an already selected section are
    /// treated as duplicates
    pub duplicate_threshold: f64,

    /// Minimum document frequency for a term to enter the vocabulary
    pub min_df: usize,
}

impl RankOptions {
    /// Create new rank options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of sections to select.
    pub fn with_top_n(mut self, n: usize) -> Self {
        self.top_n = n;
        self
    }

    /// Set the relevance percentile cutoff.
    pub fn with_relevance_percentile(mut self, percentile: f64) -> Self {
        self.relevance_percentile = percentile.clamp(0.0, 100.0);
        self
    }

    /// Set the near-duplicate cosine threshold.
    pub fn with_duplicate_threshold(mut self, threshold: f64) -> Self {
        self.duplicate_threshold = threshold;
        self
    }

    /// Set the minimum document frequency.
    pub fn with_min_df(mut self, min_df: usize) -> Self {
        self.min_df = min_df.max(1);
        self
    }
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            top_n: 10,
            relevance_percentile: 50.0,
            duplicate_threshold: 0.95,
            min_df: 1,
        }
    }
}

/// Options for the semantic filtering pass.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOptions {
    /// Minimum similarity to the task for an item to pass
    pub threshold: f64,

    /// Items taken when none pass, and the hard cap on the output
    pub fallback_count: usize,
}

impl FilterOptions {
    /// Create new filter options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the similarity threshold.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the fallback count.
    pub fn with_fallback_count(mut self, count: usize) -> Self {
        self.fallback_count = count;
        self
    }
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            threshold: 0.25,
            fallback_count: 5,
        }
    }
}
