//! # Cite Harness
//!
//! **A local-first passage retrieval engine with byte-offset citations.**
//!
//! Cite Harness indexes a corpus of plain-text documents into overlapping
//! chunks, fits a TF-IDF model over them, and answers natural-language
//! questions with the most similar passages — every passage cited back to
//! the exact byte range of its source document.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────┐   ┌──────────────┐   ┌───────────────┐
//! │ DocumentStore │──▶│ Chunk + Fit  │──▶│  Index (Arc)  │
//! │  FS / memory  │   │   TF-IDF     │   │ replace-on-   │
//! └───────────────┘   └──────────────┘   │   rebuild     │
//!                                        └───────┬───────┘
//!                                                │
//!                           ┌────────────────────┤
//!                           ▼                    ▼
//!                     ┌───────────┐        ┌───────────┐
//!                     │  ask()    │        │ask_stream()│
//!                     │ snippets  │        │ tokens +  │
//!                     │+citations │        │ citations │
//!                     └───────────┘        └───────────┘
//! ```
//!
//! ## Data Flow
//!
//! 1. A [`DocumentStore`](cite_harness_core::store::DocumentStore)
//!    enumerates and loads documents (filesystem via [`store_fs::FsStore`],
//!    or in-memory for embedding).
//! 2. The [`Retriever`](retriever::Retriever) chunks every document and
//!    fits a TF-IDF index, publishing it atomically; an ingest signal
//!    invalidates it and the next query rebuilds lazily.
//! 3. Queries are vectorized against the index's frozen vocabulary and
//!    ranked by cosine similarity; results carry byte-offset
//!    [`Citation`](cite_harness_core::models::Citation)s.
//! 4. Answer text is composed by a pluggable
//!    [`Synthesizer`](cite_harness_core::synth::Synthesizer)
//!    (snippet concatenation by default) and can be delivered whole or as
//!    a token stream ([`stream`]).
//!
//! ## Quick Start
//!
//! ```bash
//! citeq ask "what are the payment terms"     # ranked snippets + citations
//! citeq ask "auto renewal" --stream          # token stream
//! citeq docs                                 # list indexable documents
//! citeq stats                                # index shape and counters
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration loading and validation |
//! | [`retriever`] | Index lifecycle, query answering, metrics |
//! | [`store_fs`] | Filesystem-backed document store |
//! | [`stream`] | Token/citation streaming events |
//! | [`stats`] | Index and session statistics |

pub mod config;
pub mod retriever;
pub mod stats;
pub mod store_fs;
pub mod stream;

pub use cite_harness_core::{chunk, index, models, search, store, synth};
