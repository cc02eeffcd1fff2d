//! TF-IDF index builder.
//!
//! Consumes chunks from every document and fits a term-weighting model
//! over the full chunk corpus: smoothed inverse document frequency per
//! term, and one L2-normalized sparse weight vector per chunk. The fitted
//! vocabulary and IDF weights are frozen with the [`Index`]; they are the
//! only valid basis for vectorizing queries against it, so query
//! vectorization lives on the `Index` itself and a stale-vocabulary
//! mismatch cannot be constructed.
//!
//! The index is immutable once built and replaced wholesale on rebuild —
//! term weights are corpus-relative, so there is no incremental update of
//! a single document's vectors.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::chunk::{chunk_text, clamp_document, ChunkParams};
use crate::models::{Chunk, Document};

/// Fixed list of common English words removed before weighting.
///
/// Ubiquitous terms would be heavily down-weighted by IDF anyway; dropping
/// them outright keeps the vocabulary and the sparse rows small.
const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few", "for",
    "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers", "him", "his",
    "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just", "me", "more", "most",
    "my", "no", "nor", "not", "now", "of", "off", "on", "once", "only", "or", "other", "our",
    "ours", "out", "over", "own", "same", "she", "should", "so", "some", "such", "than", "that",
    "the", "their", "theirs", "them", "then", "there", "these", "they", "this", "those",
    "through", "to", "too", "under", "until", "up", "upon", "very", "was", "we", "were", "what",
    "when", "where", "which", "while", "who", "whom", "why", "will", "with", "within", "would",
    "you", "your", "yours",
];

/// Suffix-folding rules applied to tokens after stop-word removal, first
/// match wins. Maps inflected forms onto a shared vocabulary entry so a
/// query like "indemnification" meets a document's "indemnify".
const SUFFIX_RULES: &[(&str, &str)] = &[
    ("ifications", "ify"),
    ("ification", "ify"),
    ("izations", "ize"),
    ("ization", "ize"),
    ("ies", "y"),
    ("ing", ""),
    ("s", ""),
];

fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.binary_search(&token).is_ok()
}

/// Fold a lowercase token's suffix onto its base form.
fn fold_suffix(token: &str) -> String {
    for (suffix, replacement) in SUFFIX_RULES {
        if let Some(stem) = token.strip_suffix(suffix) {
            // Never fold down to fewer than three characters ("days" is
            // fine to fold, "is"-like shapes are not worth it) and leave
            // double-s endings alone ("process", "less").
            if stem.chars().count() >= 3 && !(*suffix == "s" && stem.ends_with('s')) {
                return format!("{stem}{replacement}");
            }
        }
    }
    token.to_string()
}

/// Tokenize text for indexing and querying: lowercase, split on
/// non-alphanumeric characters, drop single-character tokens and stop
/// words, fold suffixes.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() >= 2)
        .map(|w| w.to_lowercase())
        .filter(|w| !is_stop_word(w))
        .map(|w| fold_suffix(&w))
        .collect()
}

/// A sparse term-weight vector: `(term_id, weight)` pairs sorted by term.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    terms: Vec<(u32, f64)>,
}

impl SparseVector {
    /// Build an L2-normalized vector from raw term counts and IDF weights.
    fn from_counts(counts: &HashMap<u32, usize>, idf: &[f64]) -> Self {
        let mut terms: Vec<(u32, f64)> = counts
            .iter()
            .map(|(&t, &c)| (t, c as f64 * idf[t as usize]))
            .collect();
        terms.sort_by_key(|&(t, _)| t);

        let norm = terms.iter().map(|&(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut terms {
                *w /= norm;
            }
        }
        Self { terms }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Dot product of two sorted sparse vectors.
    ///
    /// Both sides are L2-normalized at construction, so this is cosine
    /// similarity, and non-negative weights keep it in `[0, 1]`.
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let mut sum = 0.0;
        let (mut i, mut j) = (0, 0);
        while i < self.terms.len() && j < other.terms.len() {
            let (ta, wa) = self.terms[i];
            let (tb, wb) = other.terms[j];
            match ta.cmp(&tb) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += wa * wb;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

/// Build report for an [`Index`]: what went in and what was clamped.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IndexStats {
    pub documents: usize,
    pub chunks: usize,
    pub vocabulary: usize,
    /// Documents shortened to the configured cap before chunking.
    pub truncated_documents: Vec<String>,
}

/// An immutable TF-IDF index over the chunks of a document corpus.
///
/// `rows` and `chunks` are parallel: row `i` is the weight vector of
/// chunk `i`, and chunk order is corpus insertion order (documents in the
/// order given, chunks left to right). A query never mutates the index,
/// so any number of readers may share one behind an `Arc`.
#[derive(Debug, Default)]
pub struct Index {
    vocab: HashMap<String, u32>,
    idf: Vec<f64>,
    rows: Vec<SparseVector>,
    chunks: Vec<Chunk>,
    stats: IndexStats,
}

impl Index {
    /// The sentinel index with no data. Queries against it report an
    /// empty corpus rather than failing.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of indexed chunks.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn chunk(&self, i: usize) -> &Chunk {
        &self.chunks[i]
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub(crate) fn row(&self, i: usize) -> &SparseVector {
        &self.rows[i]
    }

    pub fn stats(&self) -> &IndexStats {
        &self.stats
    }

    /// Vectorize query text against this index's frozen vocabulary and
    /// IDF weights. Out-of-vocabulary terms contribute nothing.
    pub fn vectorize_query(&self, text: &str) -> SparseVector {
        let mut counts: HashMap<u32, usize> = HashMap::new();
        for token in tokenize(text) {
            if let Some(&t) = self.vocab.get(&token) {
                *counts.entry(t).or_insert(0) += 1;
            }
        }
        SparseVector::from_counts(&counts, &self.idf)
    }
}

/// Build an index over a document corpus.
///
/// Chunks every document with the given parameters (clamping oversized
/// documents to `max_document_len` first, with a warning), then fits the
/// TF-IDF model over all chunks. An empty corpus produces the empty
/// sentinel index, not an error.
pub fn build(documents: &[Document], params: &ChunkParams) -> Index {
    let mut chunks: Vec<Chunk> = Vec::new();
    let mut truncated_documents = Vec::new();

    for doc in documents {
        let (text, truncated) = clamp_document(&doc.text, params.max_document_len);
        if truncated {
            warn!(
                document_id = %doc.id,
                original_len = doc.text.len(),
                clamped_len = text.len(),
                "document exceeds size cap; truncating before indexing"
            );
            truncated_documents.push(doc.id.clone());
        }
        chunks.extend(chunk_text(&doc.id, text, params));
    }

    if chunks.is_empty() {
        debug!(documents = documents.len(), "no chunks to index");
        return Index {
            stats: IndexStats {
                documents: documents.len(),
                truncated_documents,
                ..IndexStats::default()
            },
            ..Index::default()
        };
    }

    let tokenized: Vec<Vec<String>> = chunks.iter().map(|c| tokenize(&c.text)).collect();

    // Vocabulary in first-seen order, document frequency per term.
    let mut vocab: HashMap<String, u32> = HashMap::new();
    let mut df: Vec<usize> = Vec::new();
    let mut chunk_counts: Vec<HashMap<u32, usize>> = Vec::with_capacity(chunks.len());

    for tokens in &tokenized {
        let mut counts: HashMap<u32, usize> = HashMap::new();
        for token in tokens {
            let next_id = vocab.len() as u32;
            let t = *vocab.entry(token.clone()).or_insert_with(|| {
                df.push(0);
                next_id
            });
            *counts.entry(t).or_insert(0) += 1;
        }
        for &t in counts.keys() {
            df[t as usize] += 1;
        }
        chunk_counts.push(counts);
    }

    // Smoothed IDF: ln((1 + n) / (1 + df)) + 1. Terms present in nearly
    // every chunk approach weight 1; rare terms are boosted. Depends only
    // on counts, so it is independent of document order.
    let n = chunks.len() as f64;
    let idf: Vec<f64> = df
        .iter()
        .map(|&d| ((1.0 + n) / (1.0 + d as f64)).ln() + 1.0)
        .collect();

    let rows: Vec<SparseVector> = chunk_counts
        .iter()
        .map(|counts| SparseVector::from_counts(counts, &idf))
        .collect();

    let stats = IndexStats {
        documents: documents.len(),
        chunks: chunks.len(),
        vocabulary: vocab.len(),
        truncated_documents,
    };
    debug!(
        documents = stats.documents,
        chunks = stats.chunks,
        vocabulary = stats.vocabulary,
        "fitted TF-IDF index"
    );

    Index {
        vocab,
        idf,
        rows,
        chunks,
        stats,
    }
}
