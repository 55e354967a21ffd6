//! Normalized catalog store
//!
//! In-process, id-keyed store of canonical catalog documents. Rebuilt
//! wholesale by the index writer; read concurrently by the exact filter
//! engine and the hybrid retriever's metadata lookup. Insertion order is
//! preserved so unranked scans are deterministic.

use parking_lot::RwLock;
use std::collections::HashMap;

use bedding_agent_core::CanonicalDocument;

#[derive(Default)]
struct Inner {
    documents: Vec<CanonicalDocument>,
    by_id: HashMap<String, usize>,
}

/// Shared normalized catalog store
#[derive(Default)]
pub struct CatalogStore {
    inner: RwLock<Inner>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole store with a fresh catalog build.
    ///
    /// A later document with a duplicate id wins, matching the upsert
    /// semantics of the indexes.
    pub fn replace_all(&self, documents: Vec<CanonicalDocument>) {
        let mut guard = self.inner.write();
        let inner = &mut *guard;
        inner.documents.clear();
        inner.by_id.clear();

        for doc in documents {
            if let Some(&pos) = inner.by_id.get(&doc.id) {
                inner.documents[pos] = doc;
            } else {
                inner.by_id.insert(doc.id.clone(), inner.documents.len());
                inner.documents.push(doc);
            }
        }

        tracing::info!(documents = inner.documents.len(), "Catalog store rebuilt");
    }

    /// Look up one document by id
    pub fn get(&self, id: &str) -> Option<CanonicalDocument> {
        let inner = self.inner.read();
        inner.by_id.get(id).map(|&pos| inner.documents[pos].clone())
    }

    /// Scan in insertion order, keeping documents the predicate accepts,
    /// bounded by `limit`.
    pub fn select<F>(&self, limit: usize, predicate: F) -> Vec<CanonicalDocument>
    where
        F: Fn(&CanonicalDocument) -> bool,
    {
        self.inner
            .read()
            .documents
            .iter()
            .filter(|doc| predicate(doc))
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().documents.is_empty()
    }
}
