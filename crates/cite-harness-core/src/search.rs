//! Cosine similarity search over a fitted [`Index`].
//!
//! `search` is a pure function with respect to the index: it never
//! mutates it, so any number of readers may call it concurrently against
//! the same `Arc<Index>`. The query is vectorized through the index's own
//! frozen vocabulary, which makes a vocabulary mismatch unrepresentable.

use crate::index::Index;

/// A chunk selected by [`search`], referenced by its position in the
/// index's chunk array.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedChunk {
    pub chunk_index: usize,
    /// Cosine similarity in `[0.0, 1.0]`.
    pub score: f64,
}

/// What a search produced. The two no-data cases are distinct so callers
/// can phrase "nothing indexed at all" differently from "nothing indexed
/// for the requested document".
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Chunks ranked by descending score; ties keep corpus insertion
    /// order. May be empty when `top_k` is zero.
    Ranked(Vec<RankedChunk>),
    /// The index holds no chunks.
    EmptyIndex,
    /// A document filter was given and no indexed chunk belongs to it.
    EmptyScope,
}

/// Rank the index's chunks against a query.
///
/// Out-of-vocabulary query terms contribute zero weight. `top_k` is
/// clamped to the candidate count; zero yields an empty ranking rather
/// than an error. With `document_id` set, candidates are restricted to
/// that document before ranking.
///
/// Repeated calls on the same index return identical results: scoring is
/// deterministic and the sort is stable.
pub fn search(
    index: &Index,
    query: &str,
    top_k: usize,
    document_id: Option<&str>,
) -> SearchOutcome {
    if index.is_empty() {
        return SearchOutcome::EmptyIndex;
    }

    let candidates: Vec<usize> = match document_id {
        Some(id) => (0..index.len())
            .filter(|&i| index.chunk(i).document_id == id)
            .collect(),
        None => (0..index.len()).collect(),
    };
    if candidates.is_empty() {
        return SearchOutcome::EmptyScope;
    }
    if top_k == 0 {
        return SearchOutcome::Ranked(Vec::new());
    }

    let query_vec = index.vectorize_query(query);

    let mut ranked: Vec<RankedChunk> = candidates
        .into_iter()
        .map(|i| RankedChunk {
            chunk_index: i,
            score: query_vec.dot(index.row(i)).max(0.0),
        })
        .collect();

    // Stable sort: equal scores keep corpus order, so results are
    // reproducible across calls.
    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked.truncate(top_k);

    SearchOutcome::Ranked(ranked)
}
