use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::config::IndexConfig;
use crate::error::{IndexError, Result};
use crate::intersect::intersect;
use crate::posting::{Posting, PostingList};
use crate::tokenizer::tokenize;
use crate::{DocId, Position};

/// Caller-supplied document attributes, stored verbatim.
pub type Metadata = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Token count at ingestion time.
    pub length: u32,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stats {
    pub document_count: usize,
    pub vocabulary_size: usize,
    pub average_document_length: f64,
    pub total_term_occurrences: u64,
}

/// Positional inverted index: term -> posting list, plus per-document records.
#[derive(Debug, Default)]
pub struct Index {
    config: IndexConfig,
    terms: HashMap<String, PostingList>,
    docs: HashMap<DocId, DocumentRecord>,
    total_term_occurrences: u64,
}

impl Index {
    pub fn new() -> Self { Self::default() }

    pub fn with_config(config: IndexConfig) -> Self {
        Self { config, ..Self::default() }
    }

    pub(crate) fn from_parts(
        config: IndexConfig,
        terms: HashMap<String, PostingList>,
        docs: HashMap<DocId, DocumentRecord>,
    ) -> Self {
        let total_term_occurrences = docs.values().map(|d| d.length as u64).sum();
        Self { config, terms, docs, total_term_occurrences }
    }

    pub fn config(&self) -> &IndexConfig { &self.config }

    /// Tokenize `text` and add its postings under `doc_id`.
    ///
    /// Fails without touching the index if `doc_id` was ingested before. Ids
    /// may arrive in any order; ascending ids take the append path.
    pub fn ingest(&mut self, doc_id: DocId, text: &str, metadata: Metadata) -> Result<()> {
        if self.docs.contains_key(&doc_id) {
            tracing::warn!(doc_id, "rejecting duplicate document");
            return Err(IndexError::DuplicateDocument(doc_id));
        }

        let tokens = tokenize(text);
        let length = tokens.len() as u32;

        // Group positions per term, keeping first-occurrence order.
        let mut slot: HashMap<&str, usize> = HashMap::new();
        let mut grouped: Vec<(&str, Vec<Position>)> = Vec::new();
        for (pos, term) in tokens.iter().enumerate() {
            let i = *slot.entry(term.as_str()).or_insert_with(|| {
                grouped.push((term.as_str(), Vec::new()));
                grouped.len() - 1
            });
            grouped[i].1.push(pos as Position);
        }

        let mut new_terms = 0usize;
        for (term, positions) in grouped {
            if !self.terms.contains_key(term) {
                new_terms += 1;
            }
            let list = self.terms.entry(term.to_string()).or_default();
            list.insert(Posting::new(doc_id, positions));
            if self.config.eager_skip_rebuild {
                list.refresh_skips(self.config.skip_stride);
            }
        }

        self.docs.insert(doc_id, DocumentRecord { length, metadata });
        self.total_term_occurrences += length as u64;
        tracing::debug!(doc_id, tokens = length, new_terms, "ingested document");
        Ok(())
    }

    pub fn lookup(&self, term: &str) -> Option<&PostingList> { self.terms.get(term) }

    /// Doc ids containing both terms, ascending. Terms are matched exactly as
    /// produced by the tokenizer; an unknown term yields an empty result.
    pub fn intersect(&self, term_a: &str, term_b: &str) -> Vec<DocId> {
        match (self.terms.get(term_a), self.terms.get(term_b)) {
            (Some(a), Some(b)) => intersect(a, b, self.config.skip_stride),
            _ => Vec::new(),
        }
    }

    /// Rebuild every stale skip table. Returns how many were rebuilt.
    pub fn refresh_skips(&mut self) -> usize {
        let policy = self.config.skip_stride;
        let mut rebuilt = 0;
        for list in self.terms.values_mut() {
            if !list.is_skip_fresh(policy) {
                list.refresh_skips(policy);
                rebuilt += 1;
            }
        }
        rebuilt
    }

    pub fn stats(&self) -> Stats {
        let document_count = self.docs.len();
        let average_document_length = if document_count == 0 {
            0.0
        } else {
            self.total_term_occurrences as f64 / document_count as f64
        };
        Stats {
            document_count,
            vocabulary_size: self.terms.len(),
            average_document_length,
            total_term_occurrences: self.total_term_occurrences,
        }
    }

    pub fn document(&self, doc_id: DocId) -> Option<&DocumentRecord> { self.docs.get(&doc_id) }

    pub fn document_length(&self, doc_id: DocId) -> Option<u32> {
        self.docs.get(&doc_id).map(|d| d.length)
    }

    pub fn contains_document(&self, doc_id: DocId) -> bool { self.docs.contains_key(&doc_id) }

    pub fn terms(&self) -> impl Iterator<Item = &str> { self.terms.keys().map(String::as_str) }

    pub(crate) fn posting_lists(&self) -> &HashMap<String, PostingList> { &self.terms }

    pub(crate) fn documents(&self) -> &HashMap<DocId, DocumentRecord> { &self.docs }
}
