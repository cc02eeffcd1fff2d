//! In-memory [`DocumentStore`] implementation for testing and embedding.
//!
//! Uses a `HashMap` behind `std::sync::RwLock` for thread safety. IDs are
//! listed in sorted order so index builds over this store are
//! deterministic.

use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::Document;

use super::DocumentStore;

/// In-memory store for tests and programmatic ingestion.
#[derive(Default)]
pub struct InMemoryStore {
    docs: RwLock<HashMap<String, Document>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a document.
    pub fn upsert(&self, doc: Document) {
        let mut docs = self.docs.write().unwrap();
        docs.insert(doc.id.clone(), doc);
    }

    /// Remove a document; returns whether it existed.
    pub fn remove(&self, id: &str) -> bool {
        let mut docs = self.docs.write().unwrap();
        docs.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.docs.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn list_document_ids(&self) -> Result<Vec<String>> {
        let docs = self.docs.read().unwrap();
        let mut ids: Vec<String> = docs.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    async fn load_document(&self, id: &str) -> Result<Option<Document>> {
        let docs = self.docs.read().unwrap();
        Ok(docs.get(id).cloned())
    }
}
