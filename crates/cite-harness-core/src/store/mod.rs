//! Document storage abstraction.
//!
//! The [`DocumentStore`] trait is the boundary between the retrieval
//! engine and whatever holds ingested documents (filesystem, database,
//! object store). The engine only needs two operations: enumerate
//! document IDs and load a document by ID. How documents got there, and
//! in what format they persist, is the store's business.
//!
//! Implementations must be `Send + Sync`; operations are async via
//! `async-trait` so backends may perform I/O.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::Document;

/// Abstract source of ingested documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Enumerate the IDs of all stored documents, in a stable order.
    async fn list_document_ids(&self) -> Result<Vec<String>>;

    /// Load a document by ID. Returns `Ok(None)` when absent — a missing
    /// document is not an error, it is simply skipped at index time.
    async fn load_document(&self, id: &str) -> Result<Option<Document>>;
}
