//! End-to-end retrieval tests: filesystem store → index build →
//! similarity search → citations, driven through the public library API.

use std::fs;
use std::sync::Arc;

use cite_harness::config::StoreConfig;
use cite_harness::retriever::{Retriever, NO_DATA_ANSWER};
use cite_harness::store_fs::FsStore;
use cite_harness::stream::StreamEvent;
use cite_harness_core::chunk::ChunkParams;
use cite_harness_core::models::Document;
use cite_harness_core::store::memory::InMemoryStore;
use tempfile::TempDir;

fn doc(id: &str, text: &str) -> Document {
    Document {
        id: id.to_string(),
        text: text.to_string(),
        metadata: serde_json::json!({}),
    }
}

fn memory_retriever(docs: &[(&str, &str)]) -> Retriever {
    let store = InMemoryStore::new();
    for (id, text) in docs {
        store.upsert(doc(id, text));
    }
    Retriever::new(Arc::new(store), ChunkParams::default())
}

fn fs_retriever(root: &std::path::Path) -> Retriever {
    let config = StoreConfig {
        root: root.to_path_buf(),
        include_globs: vec!["**/*.txt".to_string(), "**/*.md".to_string()],
        exclude_globs: vec![],
        follow_symlinks: false,
    };
    let store = FsStore::new(&config).unwrap();
    Retriever::new(Arc::new(store), ChunkParams::default())
}

#[tokio::test]
async fn single_chunk_document_cited_with_full_range() {
    let text = "Payment is due within 30 days. Auto-renew after 12 months.";
    let retriever = memory_retriever(&[("A", text)]);

    let result = retriever.ask("payment terms", 3, None).await;
    assert_eq!(result.citations.len(), 1);
    let citation = &result.citations[0];
    assert_eq!(citation.document_id, "A");
    assert_eq!(citation.start_offset, 0);
    assert_eq!(citation.end_offset, text.len());
    assert!(citation.score > 0.0);
    assert_eq!(result.answer_text, text);
}

#[tokio::test]
async fn term_frequency_drives_ranking() {
    let heavy = "The vendor shall indemnify the client. To indemnify means to \
                 compensate for harm. Failure to indemnify is a breach. The duty \
                 to indemnify survives termination. Indemnify promptly upon notice.";
    let unrelated = "Deliveries are made on the first business day of each month \
                     to the warehouse address on file.";
    let retriever = memory_retriever(&[("indemnity-doc", heavy), ("delivery-doc", unrelated)]);

    let result = retriever.ask("indemnification obligations", 2, None).await;
    assert_eq!(result.citations.len(), 2);
    assert_eq!(result.citations[0].document_id, "indemnity-doc");
    assert!(result.citations[0].score > result.citations[1].score);
}

#[tokio::test]
async fn document_filter_never_leaks_other_documents() {
    let retriever = memory_retriever(&[
        ("a", "payment obligations and late fees"),
        ("b", "payment schedule for services rendered"),
        ("c", "warranty disclaimers and remedies"),
    ]);

    let result = retriever.ask("payment", 10, Some("b")).await;
    assert!(!result.citations.is_empty());
    for c in &result.citations {
        assert_eq!(c.document_id, "b");
    }
}

#[tokio::test]
async fn filter_on_unknown_document_is_scoped_no_data() {
    let retriever = memory_retriever(&[("a", "some indexed text")]);
    let result = retriever.ask("anything", 3, Some("ghost")).await;
    assert_eq!(result.answer_text, "No data found for document ghost");
    assert!(result.citations.is_empty());
}

#[tokio::test]
async fn empty_corpus_is_explicit_no_data() {
    let retriever = memory_retriever(&[]);
    let result = retriever.ask("anything", 3, None).await;
    assert_eq!(result.answer_text, NO_DATA_ANSWER);
    assert!(result.citations.is_empty());
}

#[tokio::test]
async fn rebuild_after_invalidate_reproduces_chunk_layout() {
    let a = "Clause text for the first agreement. ".repeat(80);
    let b = "Second agreement body text. ".repeat(50);
    let retriever = memory_retriever(&[("a", a.as_str()), ("b", b.as_str())]);

    let first = retriever.rebuild().await.unwrap();
    retriever.notify_documents_changed();
    let second = retriever.rebuild().await.unwrap();

    assert_eq!(first.chunks(), second.chunks());
}

#[tokio::test]
async fn overlapping_chunks_may_both_be_cited() {
    // A term sitting inside the overlap region belongs to two windows;
    // both are legitimate citations and neither is deduplicated.
    let mut text = "filler words here. ".repeat(43); // 817 bytes
    text.push_str("arbitration venue selection "); // lands in [800, 1000)
    text.push_str(&"filler words here. ".repeat(20)); // push past one window
    let store = InMemoryStore::new();
    store.upsert(doc("long", &text));
    let retriever = Retriever::new(Arc::new(store), ChunkParams::default());

    let result = retriever.ask("arbitration venue", 5, None).await;
    assert_eq!(result.citations.len(), 2);
    for c in &result.citations {
        assert_eq!(c.document_id, "long");
        assert!(c.end_offset <= text.len());
    }
}

#[tokio::test]
async fn scores_are_clamped_to_unit_interval() {
    let retriever = memory_retriever(&[
        ("a", "payment payment payment"),
        ("b", "unrelated warehouse logistics"),
    ]);
    let result = retriever.ask("payment", 2, None).await;
    for c in &result.citations {
        assert!((0.0..=1.0).contains(&c.score), "score {}", c.score);
    }
}

#[tokio::test]
async fn streaming_emits_tokens_then_terminal_citations() {
    let retriever = memory_retriever(&[("A", "Payment is due within 30 days.")]);

    let events: Vec<StreamEvent> = retriever.ask_stream("payment", 3, None).await.collect();
    assert!(events.len() >= 2);
    let (last, tokens) = events.split_last().unwrap();
    for event in tokens {
        assert!(matches!(event, StreamEvent::Token(_)));
    }
    match last {
        StreamEvent::Citations(citations) => {
            assert_eq!(citations.len(), 1);
            assert_eq!(citations[0].document_id, "A");
        }
        other => panic!("expected terminal citations event, got {other:?}"),
    }
    // Token events reassemble the synchronous answer.
    let reassembled: Vec<&str> = tokens
        .iter()
        .map(|e| match e {
            StreamEvent::Token(t) => t.as_str(),
            _ => unreachable!(),
        })
        .collect();
    assert_eq!(reassembled.join(" "), "Payment is due within 30 days.");
}

#[tokio::test]
async fn filesystem_corpus_end_to_end() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("alpha.md"),
        "# Alpha Document\n\nThis is the alpha document about Rust programming.\n\nIt contains information about cargo and crates.",
    )
    .unwrap();
    fs::write(
        tmp.path().join("beta.md"),
        "# Beta Document\n\nThis document discusses Python and machine learning.\n\nDeep learning frameworks like PyTorch are covered.",
    )
    .unwrap();
    fs::write(
        tmp.path().join("notes.rs"),
        "// not part of the corpus",
    )
    .unwrap();

    let retriever = fs_retriever(tmp.path());
    let result = retriever.ask("rust cargo crates", 1, None).await;
    assert_eq!(result.citations.len(), 1);
    assert_eq!(result.citations[0].document_id, "alpha.md");

    let result = retriever.ask("machine learning frameworks", 1, None).await;
    assert_eq!(result.citations[0].document_id, "beta.md");
}

#[tokio::test]
async fn ingest_signal_picks_up_new_documents() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("one.txt"), "original corpus text").unwrap();

    let retriever = fs_retriever(tmp.path());
    let result = retriever.ask("solar panels", 3, None).await;
    assert!(result.citations.iter().all(|c| c.document_id == "one.txt"));

    fs::write(tmp.path().join("two.txt"), "solar panels and batteries").unwrap();
    retriever.notify_documents_changed();

    let result = retriever.ask("solar panels", 1, None).await;
    assert_eq!(result.citations.len(), 1);
    assert_eq!(result.citations[0].document_id, "two.txt");
}
