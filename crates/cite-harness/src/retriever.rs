//! Retrieval coordinator: index lifecycle, query answering, metrics.
//!
//! The coordinator owns a single slot holding the current [`Index`]
//! behind an `Arc`. The lifecycle is a two-state machine: no index
//! (initial, or after invalidation) and indexed. A query arriving with no
//! index triggers a synchronous build before answering; an ingest
//! notification or explicit invalidation empties the slot.
//!
//! Rebuilds construct a complete new index off to the side and publish it
//! with a single slot store, so concurrent readers always observe either
//! the old index or the new one, never a partially built one. Readers
//! capture the `Arc` once per request and keep scoring against that
//! snapshot even if a rebuild publishes mid-flight. Rebuilds themselves
//! are serialized behind an async mutex (running two identical builds
//! concurrently is wasteful, not unsafe); reads never take that lock.
//!
//! Build failures are contained here: the slot degrades to empty, the
//! condition is logged, and queries answer "no data" instead of
//! propagating an error mid-request.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{error, info};

use cite_harness_core::chunk::ChunkParams;
use cite_harness_core::index::{self, Index};
use cite_harness_core::models::{Citation, Document, QueryResult};
use cite_harness_core::search::{search, SearchOutcome};
use cite_harness_core::store::DocumentStore;
use cite_harness_core::synth::{ConcatSynthesizer, Synthesizer};

use crate::stream::{self, StreamEvent};

/// Answer text served when nothing is indexed.
pub const NO_DATA_ANSWER: &str = "No indexed data available.";

#[derive(Default)]
struct Metrics {
    builds_performed: AtomicU64,
    queries_served: AtomicU64,
    empty_responses: AtomicU64,
}

/// Point-in-time copy of the coordinator's counters.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub builds_performed: u64,
    pub queries_served: u64,
    pub empty_responses: u64,
}

/// The retrieval coordinator.
pub struct Retriever {
    store: Arc<dyn DocumentStore>,
    synthesizer: Arc<dyn Synthesizer>,
    chunking: ChunkParams,
    current: RwLock<Option<Arc<Index>>>,
    rebuild_gate: Mutex<()>,
    built_at: RwLock<Option<DateTime<Utc>>>,
    metrics: Metrics,
}

impl Retriever {
    pub fn new(store: Arc<dyn DocumentStore>, chunking: ChunkParams) -> Self {
        Self {
            store,
            synthesizer: Arc::new(ConcatSynthesizer),
            chunking,
            current: RwLock::new(None),
            rebuild_gate: Mutex::new(()),
            built_at: RwLock::new(None),
            metrics: Metrics::default(),
        }
    }

    /// Replace the default snippet-concatenation synthesizer.
    pub fn with_synthesizer(mut self, synthesizer: Arc<dyn Synthesizer>) -> Self {
        self.synthesizer = synthesizer;
        self
    }

    /// The currently published index, if any. Callers hold the returned
    /// `Arc` for the duration of their operation.
    pub fn current_index(&self) -> Option<Arc<Index>> {
        self.current.read().unwrap().clone()
    }

    /// When the current index was published.
    pub fn built_at(&self) -> Option<DateTime<Utc>> {
        *self.built_at.read().unwrap()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            builds_performed: self.metrics.builds_performed.load(Ordering::Relaxed),
            queries_served: self.metrics.queries_served.load(Ordering::Relaxed),
            empty_responses: self.metrics.empty_responses.load(Ordering::Relaxed),
        }
    }

    /// Drop the current index. The next query rebuilds lazily.
    pub fn invalidate(&self) {
        *self.current.write().unwrap() = None;
        info!("index invalidated");
    }

    /// Fire-and-forget ingest signal: documents changed, so the current
    /// index no longer reflects the corpus.
    pub fn notify_documents_changed(&self) {
        self.invalidate();
    }

    /// Build and publish a fresh index now, regardless of current state.
    pub async fn rebuild(&self) -> Result<Arc<Index>> {
        let _gate = self.rebuild_gate.lock().await;
        self.build_and_publish().await
    }

    /// Return the current index, building one first if the slot is empty.
    async fn ensure_index(&self) -> Result<Arc<Index>> {
        if let Some(index) = self.current_index() {
            return Ok(index);
        }
        let _gate = self.rebuild_gate.lock().await;
        // Double-check: another request may have built while we waited.
        if let Some(index) = self.current_index() {
            return Ok(index);
        }
        self.build_and_publish().await
    }

    async fn build_and_publish(&self) -> Result<Arc<Index>> {
        let result = self.gather_and_build().await;
        match result {
            Ok(index) => {
                *self.current.write().unwrap() = Some(index.clone());
                *self.built_at.write().unwrap() = Some(Utc::now());
                self.metrics.builds_performed.fetch_add(1, Ordering::Relaxed);
                let stats = index.stats();
                info!(
                    documents = stats.documents,
                    chunks = stats.chunks,
                    vocabulary = stats.vocabulary,
                    "index published"
                );
                Ok(index)
            }
            Err(e) => {
                // Degrade to the unavailable state rather than serving a
                // stale view of a corpus we failed to read.
                *self.current.write().unwrap() = None;
                error!(error = %e, "index build failed; retrieval unavailable");
                Err(e)
            }
        }
    }

    async fn gather_and_build(&self) -> Result<Arc<Index>> {
        let ids = self.store.list_document_ids().await?;
        let mut documents: Vec<Document> = Vec::with_capacity(ids.len());
        for id in &ids {
            // Absent documents are skipped, not fatal.
            if let Some(doc) = self.store.load_document(id).await? {
                documents.push(doc);
            }
        }
        Ok(Arc::new(index::build(&documents, &self.chunking)))
    }

    /// Answer a question with ranked snippets and citations.
    ///
    /// Never returns an error: a missing or unbuildable index produces an
    /// explicit "no data" result, since retrieval is best-effort.
    pub async fn ask(
        &self,
        question: &str,
        top_k: usize,
        document_id: Option<&str>,
    ) -> QueryResult {
        self.metrics.queries_served.fetch_add(1, Ordering::Relaxed);

        let index = match self.ensure_index().await {
            Ok(index) => index,
            Err(_) => return self.no_data_result(NO_DATA_ANSWER),
        };

        match search(&index, question, top_k, document_id) {
            SearchOutcome::EmptyIndex => self.no_data_result(NO_DATA_ANSWER),
            SearchOutcome::EmptyScope => {
                let id = document_id.unwrap_or_default();
                self.no_data_result(&format!("No data found for document {id}"))
            }
            SearchOutcome::Ranked(ranked) => {
                let snippets: Vec<&str> = ranked
                    .iter()
                    .map(|r| index.chunk(r.chunk_index).text.trim())
                    .collect();
                let citations: Vec<Citation> = ranked
                    .iter()
                    .map(|r| {
                        let chunk = index.chunk(r.chunk_index);
                        Citation {
                            document_id: chunk.document_id.clone(),
                            start_offset: chunk.start_offset,
                            end_offset: chunk.end_offset,
                            score: r.score,
                        }
                    })
                    .collect();

                let answer_text = match self.synthesizer.synthesize(question, &snippets).await {
                    Ok(text) => text,
                    Err(e) => {
                        // Best-effort: fall back to plain concatenation.
                        error!(error = %e, "synthesizer failed; falling back to snippet concatenation");
                        snippets.join("\n\n")
                    }
                };

                QueryResult {
                    answer_text,
                    citations,
                }
            }
        }
    }

    /// Answer a question as an ordered event stream: one event per
    /// whitespace-delimited answer token, then a terminal citations
    /// event. The stream reads a finished result, so dropping it mid-way
    /// leaves no partial state anywhere.
    pub async fn ask_stream(
        &self,
        question: &str,
        top_k: usize,
        document_id: Option<&str>,
    ) -> impl Iterator<Item = StreamEvent> {
        let result = self.ask(question, top_k, document_id).await;
        stream::events(result)
    }

    fn no_data_result(&self, answer: &str) -> QueryResult {
        self.metrics.empty_responses.fetch_add(1, Ordering::Relaxed);
        QueryResult {
            answer_text: answer.to_string(),
            citations: Vec::new(),
        }
    }
}
