//! TF-IDF vectorization over a small in-memory corpus.
//!
//! Tokens are runs of two or more word characters after lowercasing, with
//! English stop words removed. Weights use raw term counts and smoothed
//! inverse document frequency, `ln((1 + n) / (1 + df)) + 1`, and every row is
//! L2-normalised, so the dot product of two rows is their cosine similarity.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};

/// English stop words removed before weighting.
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst",
    "amoungst", "amount", "an", "and", "another", "any", "anyhow", "anyone", "anything", "anyway",
    "anywhere", "are", "around", "as", "at", "back", "be", "became", "because", "become",
    "becomes", "becoming", "been", "before", "beforehand", "behind", "being", "below", "beside",
    "besides", "between", "beyond", "bill", "both", "bottom", "but", "by", "call", "can",
    "cannot", "cant", "co", "con", "could", "couldnt", "cry", "de", "describe", "detail", "do",
    "done", "down", "due", "during", "each", "eg", "eight", "either", "eleven", "else",
    "elsewhere", "empty", "enough", "etc", "even", "ever", "every", "everyone", "everything",
    "everywhere", "except", "few", "fifteen", "fifty", "fill", "find", "fire", "first", "five",
    "for", "former", "formerly", "forty", "found", "four", "from", "front", "full", "further",
    "get", "give", "go", "had", "has", "hasnt", "have", "he", "hence", "her", "here",
    "hereafter", "hereby", "herein", "hereupon", "hers", "herself", "him", "himself", "his",
    "how", "however", "hundred", "i", "ie", "if", "in", "inc", "indeed", "interest", "into",
    "is", "it", "its", "itself", "keep", "last", "latter", "latterly", "least", "less", "ltd",
    "made", "many", "may", "me", "meanwhile", "might", "mill", "mine", "more", "moreover",
    "most", "mostly", "move", "much", "must", "my", "myself", "name", "namely", "neither",
    "never", "nevertheless", "next", "nine", "no", "nobody", "none", "noone", "nor", "not",
    "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto",
    "or", "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own",
    "part", "per", "perhaps", "please", "put", "rather", "re", "same", "see", "seem", "seemed",
    "seeming", "seems", "serious", "several", "she", "should", "show", "side", "since",
    "sincere", "six", "sixty", "so", "some", "somehow", "someone", "something", "sometime",
    "sometimes", "somewhere", "still", "such", "system", "take", "ten", "than", "that", "the",
    "their", "them", "themselves", "then", "thence", "there", "thereafter", "thereby",
    "therefore", "therein", "thereupon", "these", "they", "thick", "thin", "third", "this",
    "those", "though", "three", "through", "throughout", "thru", "thus", "to", "together",
    "too", "top", "toward", "towards", "twelve", "twenty", "two", "un", "under", "until", "up",
    "upon", "us", "very", "via", "was", "we", "well", "were", "what", "whatever", "when",
    "whence", "whenever", "where", "whereafter", "whereas", "whereby", "wherein", "whereupon",
    "wherever", "whether", "which", "while", "whither", "who", "whoever", "whole", "whom",
    "whose", "why", "will", "with", "within", "without", "would", "yet", "you", "your", "yours",
    "yourself", "yourselves",
];

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b\w\w+\b").unwrap())
}

fn stop_word_set() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| ENGLISH_STOP_WORDS.iter().copied().collect())
}

/// Split text into lowercase tokens of at least two word characters.
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    token_regex()
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// A sparse row vector keyed by vocabulary index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: BTreeMap<usize, f64>,
}

impl SparseVector {
    /// Build from (index, weight) pairs. Zero weights are dropped.
    pub fn from_entries(entries: impl IntoIterator<Item = (usize, f64)>) -> Self {
        Self {
            entries: entries.into_iter().filter(|(_, w)| *w != 0.0).collect(),
        }
    }

    /// Number of non-zero entries.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    /// Check if every weight is zero.
    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    /// Weight at a vocabulary index.
    pub fn get(&self, index: usize) -> f64 {
        self.entries.get(&index).copied().unwrap_or(0.0)
    }

    /// Dot product with another vector.
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (small, large) = if self.nnz() <= other.nnz() {
            (self, other)
        } else {
            (other, self)
        };
        small
            .entries
            .iter()
            .map(|(i, w)| w * large.get(*i))
            .sum()
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.entries.values().map(|w| w * w).sum::<f64>().sqrt()
    }

    /// Sum of all weights.
    pub fn sum(&self) -> f64 {
        self.entries.values().sum()
    }

    fn normalized(mut self) -> Self {
        let norm = self.norm();
        if norm > 0.0 {
            for w in self.entries.values_mut() {
                *w /= norm;
            }
        }
        self
    }
}

/// Cosine similarity of two vectors; zero when either is all zeros.
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f64 {
    let denom = a.norm() * b.norm();
    if denom == 0.0 {
        0.0
    } else {
        a.dot(b) / denom
    }
}

/// Percentile with linear interpolation between closest ranks.
///
/// `p` is in `[0, 100]`. Returns `None` for an empty slice.
pub fn percentile(values: &[f64], p: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let p = p.clamp(0.0, 100.0);
    let pos = p / 100.0 * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

/// Fits a [`TfidfModel`] to a corpus.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    /// Remove English stop words
    pub stop_words: bool,
    /// Minimum number of documents a term must appear in
    pub min_df: usize,
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self {
            stop_words: true,
            min_df: 1,
        }
    }
}

impl TfidfVectorizer {
    /// Create a vectorizer with English stop words and `min_df` 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable stop word removal.
    pub fn with_stop_words(mut self, enabled: bool) -> Self {
        self.stop_words = enabled;
        self
    }

    /// Set the minimum document frequency.
    pub fn with_min_df(mut self, min_df: usize) -> Self {
        self.min_df = min_df.max(1);
        self
    }

    fn terms(&self, text: &str) -> Vec<String> {
        let tokens = tokenize(text);
        if !self.stop_words {
            return tokens;
        }
        let stop = stop_word_set();
        tokens
            .into_iter()
            .filter(|t| !stop.contains(t.as_str()))
            .collect()
    }

    /// Learn vocabulary and document frequencies.
    ///
    /// Fails with [`Error::EmptyVocabulary`] when no term survives.
    pub fn fit<S: AsRef<str>>(&self, corpus: &[S]) -> Result<TfidfModel> {
        let mut df: HashMap<String, usize> = HashMap::new();
        for doc in corpus {
            let unique: HashSet<String> = self.terms(doc.as_ref()).into_iter().collect();
            for term in unique {
                *df.entry(term).or_insert(0) += 1;
            }
        }

        let mut terms: Vec<(String, usize)> =
            df.into_iter().filter(|(_, n)| *n >= self.min_df).collect();
        if terms.is_empty() {
            return Err(Error::EmptyVocabulary);
        }
        terms.sort_by(|a, b| a.0.cmp(&b.0));

        let n = corpus.len() as f64;
        let mut vocabulary = HashMap::with_capacity(terms.len());
        let mut idf = Vec::with_capacity(terms.len());
        for (index, (term, doc_freq)) in terms.into_iter().enumerate() {
            idf.push(((1.0 + n) / (1.0 + doc_freq as f64)).ln() + 1.0);
            vocabulary.insert(term, index);
        }

        Ok(TfidfModel {
            vectorizer: self.clone(),
            vocabulary,
            idf,
        })
    }

    /// Fit on the corpus and return its rows in corpus order.
    pub fn fit_transform<S: AsRef<str>>(
        &self,
        corpus: &[S],
    ) -> Result<(TfidfModel, Vec<SparseVector>)> {
        let model = self.fit(corpus)?;
        let rows = corpus.iter().map(|d| model.transform(d.as_ref())).collect();
        Ok((model, rows))
    }
}

/// A fitted vocabulary with inverse document frequencies.
#[derive(Debug, Clone)]
pub struct TfidfModel {
    vectorizer: TfidfVectorizer,
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfModel {
    /// Number of terms in the vocabulary.
    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    /// Index of a term, if it is in the vocabulary.
    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    /// Inverse document frequency of a term.
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.term_index(term).map(|i| self.idf[i])
    }

    /// L2-normalised TF-IDF row for a text. Unknown terms are ignored.
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for term in self.vectorizer.terms(text) {
            if let Some(&i) = self.vocabulary.get(&term) {
                *counts.entry(i).or_insert(0.0) += 1.0;
            }
        }
        SparseVector::from_entries(counts.into_iter().map(|(i, tf)| (i, tf * self.idf[i])))
            .normalized()
    }
}
