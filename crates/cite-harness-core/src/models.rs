//! Core data models used throughout Cite Harness.
//!
//! These types represent the documents, chunks, and citation-bearing
//! results that flow through the indexing and retrieval pipeline.

use serde::Serialize;

/// A document as handed over by a [`DocumentStore`](crate::store::DocumentStore).
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub text: String,
    pub metadata: serde_json::Value,
}

/// A contiguous window of a document's text, addressed by byte offsets.
///
/// `start_offset`/`end_offset` index into the owning document's original
/// text (`0 <= start < end <= text.len()`), snapped to UTF-8 character
/// boundaries so `text[start..end]` is always a valid slice. Chunks are
/// derived at build time and owned by the index; they are never persisted
/// independently.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub document_id: String,
    pub start_offset: usize,
    pub end_offset: usize,
    pub text: String,
}

/// A pointer back to the exact document range that justified part of an
/// answer.
///
/// `score` is the cosine similarity between the query vector and the
/// chunk vector, clamped to `[0.0, 1.0]` (term weights are non-negative).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Citation {
    pub document_id: String,
    pub start_offset: usize,
    pub end_offset: usize,
    pub score: f64,
}

/// The outcome of a retrieval query: composed answer text plus citations
/// ordered by descending score (ties keep original chunk order).
#[derive(Debug, Clone, Serialize)]
pub struct QueryResult {
    pub answer_text: String,
    pub citations: Vec<Citation>,
}
