use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::Result;
use crate::index::{Index, Metadata, Stats};
use crate::posting::PostingList;
use crate::DocId;

/// An `Index` behind a single read-write lock.
///
/// Ingestion and skip refreshes take the write lock; lookups, intersections
/// and stats share the read lock and never mutate.
#[derive(Clone, Default)]
pub struct SharedIndex {
    inner: Arc<RwLock<Index>>,
}

impl SharedIndex {
    pub fn new(index: Index) -> Self {
        Self { inner: Arc::new(RwLock::new(index)) }
    }

    pub fn ingest(&self, doc_id: DocId, text: &str, metadata: Metadata) -> Result<()> {
        self.inner.write().ingest(doc_id, text, metadata)
    }

    /// Owned copy of a term's posting list.
    pub fn lookup(&self, term: &str) -> Option<PostingList> {
        self.inner.read().lookup(term).cloned()
    }

    pub fn intersect(&self, term_a: &str, term_b: &str) -> Vec<DocId> {
        self.inner.read().intersect(term_a, term_b)
    }

    pub fn stats(&self) -> Stats { self.inner.read().stats() }

    pub fn refresh_skips(&self) -> usize { self.inner.write().refresh_skips() }

    /// Run `f` with shared access to the whole index.
    pub fn read<R>(&self, f: impl FnOnce(&Index) -> R) -> R { f(&self.inner.read()) }
}
