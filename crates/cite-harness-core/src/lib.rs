//! # Cite Harness Core
//!
//! Shared logic for Cite Harness: data models, the sliding-window chunker,
//! the TF-IDF index builder, cosine similarity search, the document store
//! abstraction, and the answer synthesizer trait.
//!
//! This crate contains no tokio, filesystem I/O, or other runtime
//! dependencies. The store and synthesizer traits are async (via
//! `async-trait`) so implementations may perform I/O; the bundled
//! in-memory implementations return immediately-ready futures.

pub mod chunk;
pub mod index;
pub mod models;
pub mod search;
pub mod store;
pub mod synth;
