//! Streaming response events.
//!
//! A streamed answer is the same ranking and composition as a
//! synchronous one, delivered as whitespace-delimited token events
//! followed by exactly one terminal citations event. The events are
//! derived from an already-finished [`QueryResult`]: the stream only
//! reads the published index, so a consumer cancelling mid-stream leaves
//! no partial state behind.

use serde::Serialize;

use cite_harness_core::models::{Citation, QueryResult};

/// One event of a streamed answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum StreamEvent {
    /// A single whitespace-delimited token of the answer text.
    Token(String),
    /// Terminal event carrying the full ordered citation list.
    Citations(Vec<Citation>),
}

/// Turn a finished result into its ordered, append-only event sequence.
pub fn events(result: QueryResult) -> impl Iterator<Item = StreamEvent> {
    let tokens: Vec<String> = result
        .answer_text
        .split_whitespace()
        .map(str::to_string)
        .collect();
    tokens
        .into_iter()
        .map(StreamEvent::Token)
        .chain(std::iter::once(StreamEvent::Citations(result.citations)))
}
