//! Sliding-window text chunker with stable byte offsets.
//!
//! Splits document body text into overlapping fixed-size windows so that
//! every piece of an answer can be cited back to an exact byte range of
//! the source document. Windows start at offset 0 and advance by
//! `chunk_size - overlap` each step; the final window is truncated to the
//! end of the text rather than padded. Overlapping windows are kept as-is
//! (no de-duplication) so a query matching near a window boundary is not
//! lost.
//!
//! All offsets are byte offsets snapped to UTF-8 character boundaries,
//! which keeps `text[start..end]` a valid slice for any emitted chunk.
//!
//! # Example
//!
//! ```rust
//! use cite_harness_core::chunk::{chunk_text, ChunkParams};
//!
//! let chunks = chunk_text("doc-1", "Payment is due within 30 days.", &ChunkParams::default());
//! assert_eq!(chunks.len(), 1);
//! assert_eq!(chunks[0].start_offset, 0);
//! assert_eq!(chunks[0].end_offset, 30);
//! ```

use crate::models::Chunk;

/// Chunking parameters.
#[derive(Debug, Clone)]
pub struct ChunkParams {
    /// Window size in bytes.
    pub chunk_size: usize,
    /// Bytes shared between consecutive windows. Must be smaller than
    /// `chunk_size`; if it is not, the chunker still forces a step of at
    /// least one character so the loop always terminates.
    pub overlap: usize,
    /// Documents longer than this are truncated before chunking.
    pub max_document_len: usize,
}

impl Default for ChunkParams {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            overlap: 200,
            max_document_len: 2_000_000,
        }
    }
}

/// Split text into overlapping windows with stable offsets.
///
/// Returns chunks in the document's natural left-to-right order. Empty
/// text yields an empty vector, not an error.
///
/// # Guarantees
///
/// - Offsets are monotonically increasing and cover `[0, text.len())`
///   without gaps; the last chunk's `end_offset` equals `text.len()`.
/// - Consecutive chunks overlap by exactly `overlap` bytes except
///   possibly the final one (and where character boundaries force a
///   nearby snap).
/// - Re-chunking the same text yields identical offsets and content.
pub fn chunk_text(document_id: &str, text: &str, params: &ChunkParams) -> Vec<Chunk> {
    let n = text.len();
    let mut chunks = Vec::new();
    if n == 0 || params.chunk_size == 0 {
        return chunks;
    }

    let mut start = 0usize;
    loop {
        let mut end = snap_to_char_boundary(text, (start + params.chunk_size).min(n));
        if end <= start {
            // Window smaller than one character; take the next char whole.
            end = ceil_char_boundary(text, start + 1);
        }

        chunks.push(Chunk {
            document_id: document_id.to_string(),
            start_offset: start,
            end_offset: end,
            text: text[start..end].to_string(),
        });

        if end >= n {
            break;
        }

        let mut next = snap_to_char_boundary(text, end.saturating_sub(params.overlap));
        if next <= start {
            // overlap >= chunk_size would stall the loop; force progress.
            next = ceil_char_boundary(text, start + 1);
        }
        start = next;
    }

    chunks
}

/// Clamp a document to `max_len` bytes, snapping to a character boundary.
///
/// Returns the (possibly shortened) text and whether truncation occurred.
/// Callers are expected to surface the truncation to an operator.
pub fn clamp_document(text: &str, max_len: usize) -> (&str, bool) {
    if text.len() <= max_len {
        return (text, false);
    }
    let cut = snap_to_char_boundary(text, max_len);
    (&text[..cut], true)
}

/// Snap a byte index back to the nearest valid UTF-8 char boundary.
fn snap_to_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Snap a byte index forward to the nearest valid UTF-8 char boundary.
fn ceil_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while i < s.len() && !s.is_char_boundary(i) {
        i += 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(chunk_size: usize, overlap: usize) -> ChunkParams {
        ChunkParams {
            chunk_size,
            overlap,
            max_document_len: 2_000_000,
        }
    }

    #[test]
    fn test_empty_text() {
        let chunks = chunk_text("doc1", "", &ChunkParams::default());
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_short_text_single_chunk() {
        let text = "Payment is due within 30 days. Auto-renew after 12 months.";
        let chunks = chunk_text("A", text, &ChunkParams::default());
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].start_offset, 0);
        assert_eq!(chunks[0].end_offset, text.len());
        assert_eq!(chunks[0].text, text);
    }

    #[test]
    fn test_offsets_cover_text_without_gaps() {
        let text = "abcdefghij".repeat(10); // 100 bytes
        let chunks = chunk_text("doc1", &text, &params(30, 10));

        assert_eq!(chunks[0].start_offset, 0);
        assert_eq!(chunks.last().unwrap().end_offset, text.len());
        for pair in chunks.windows(2) {
            // Next window starts inside the previous one: no gaps.
            assert!(pair[1].start_offset <= pair[0].end_offset);
            assert!(pair[1].start_offset > pair[0].start_offset);
        }
    }

    #[test]
    fn test_exact_overlap_between_windows() {
        let text = "x".repeat(100);
        let chunks = chunk_text("doc1", &text, &params(30, 10));
        for pair in chunks.windows(2) {
            if pair[0].end_offset < text.len() {
                assert_eq!(pair[0].end_offset - pair[1].start_offset, 10);
            }
        }
    }

    #[test]
    fn test_final_window_truncated_not_padded() {
        let text = "y".repeat(45);
        let chunks = chunk_text("doc1", &text, &params(20, 5));
        let last = chunks.last().unwrap();
        assert_eq!(last.end_offset, 45);
        assert!(last.text.len() <= 20);
    }

    #[test]
    fn test_overlap_ge_chunk_size_still_terminates() {
        let text = "abcdefghijklmnopqrstuvwxyz";
        let chunks = chunk_text("doc1", text, &params(4, 4));
        assert!(!chunks.is_empty());
        for pair in chunks.windows(2) {
            assert!(pair[1].start_offset > pair[0].start_offset);
        }
        assert_eq!(chunks.last().unwrap().end_offset, text.len());
    }

    #[test]
    fn test_chunk_slices_match_source() {
        let text = "The quick brown fox jumps over the lazy dog. ".repeat(8);
        let chunks = chunk_text("doc1", &text, &params(50, 12));
        for c in &chunks {
            assert_eq!(c.text, &text[c.start_offset..c.end_offset]);
        }
    }

    #[test]
    fn test_multibyte_boundaries() {
        let text = "héllo wörld ünïcödé ".repeat(12);
        let chunks = chunk_text("doc1", &text, &params(17, 5));
        for c in &chunks {
            assert!(text.is_char_boundary(c.start_offset));
            assert!(text.is_char_boundary(c.end_offset));
            assert!(c.end_offset > c.start_offset);
        }
        assert_eq!(chunks.last().unwrap().end_offset, text.len());
    }

    #[test]
    fn test_deterministic() {
        let text = "alpha beta gamma delta epsilon ".repeat(20);
        let a = chunk_text("doc1", &text, &params(40, 15));
        let b = chunk_text("doc1", &text, &params(40, 15));
        assert_eq!(a, b);
    }

    #[test]
    fn test_clamp_document() {
        let (text, truncated) = clamp_document("short", 100);
        assert_eq!(text, "short");
        assert!(!truncated);

        let long = "z".repeat(150);
        let (text, truncated) = clamp_document(&long, 100);
        assert_eq!(text.len(), 100);
        assert!(truncated);
    }

    #[test]
    fn test_clamp_document_snaps_multibyte() {
        let long = "é".repeat(60); // 120 bytes
        let (text, truncated) = clamp_document(&long, 101);
        assert!(truncated);
        assert_eq!(text.len(), 100);
        assert!(long.is_char_boundary(text.len()));
    }
}
