use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::config::SkipStride;
use crate::skip::{build_skip_table, SkipTable};
use crate::{DocId, Position};

/// One document's occurrences of a single term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    positions: Vec<Position>,
}

impl Posting {
    /// `positions` must be strictly increasing.
    pub fn new(doc_id: DocId, positions: Vec<Position>) -> Self {
        debug_assert!(
            positions.windows(2).all(|w| w[0] < w[1]),
            "positions must be strictly increasing"
        );
        Self { doc_id, positions }
    }

    pub fn term_freq(&self) -> u32 { self.positions.len() as u32 }

    pub fn positions(&self) -> &[Position] { &self.positions }
}

/// All postings of one term, ordered by ascending unique doc id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostingList {
    pub(crate) postings: Vec<Posting>,
    /// Bumped on every insertion.
    pub(crate) generation: u64,
    pub(crate) skips: Option<SkipTable>,
}

impl PostingList {
    pub fn new() -> Self { Self::default() }

    pub fn postings(&self) -> &[Posting] { &self.postings }

    pub fn len(&self) -> usize { self.postings.len() }

    pub fn is_empty(&self) -> bool { self.postings.is_empty() }

    pub fn document_frequency(&self) -> u32 { self.postings.len() as u32 }

    pub fn generation(&self) -> u64 { self.generation }

    pub fn doc_ids(&self) -> impl Iterator<Item = DocId> + '_ {
        self.postings.iter().map(|p| p.doc_id)
    }

    /// Add the posting for a document not yet in this list.
    ///
    /// Appends when `posting.doc_id` is past the current last id, otherwise
    /// places it with an ordered insert.
    pub fn insert(&mut self, posting: Posting) {
        match self.postings.last() {
            Some(last) if last.doc_id >= posting.doc_id => {
                let at = self.postings.partition_point(|p| p.doc_id < posting.doc_id);
                debug_assert!(
                    self.postings.get(at).map_or(true, |p| p.doc_id != posting.doc_id),
                    "doc {} already present in posting list",
                    posting.doc_id
                );
                self.postings.insert(at, posting);
            }
            _ => self.postings.push(posting),
        }
        self.generation += 1;
    }

    pub fn is_skip_fresh(&self, policy: SkipStride) -> bool {
        matches!(&self.skips, Some(t) if t.generation == self.generation && t.policy() == policy)
    }

    /// Rebuild the cached skip table if it is missing or stale.
    pub fn refresh_skips(&mut self, policy: SkipStride) {
        if self.is_skip_fresh(policy) {
            return;
        }
        let mut table = build_skip_table(&self.postings, policy);
        table.generation = self.generation;
        self.skips = Some(table);
    }

    /// The skip table for the current postings: the cached one when fresh,
    /// otherwise a newly built one that is not stored.
    pub fn skips(&self, policy: SkipStride) -> Cow<'_, SkipTable> {
        match &self.skips {
            Some(t) if self.is_skip_fresh(policy) => Cow::Borrowed(t),
            _ => {
                let mut table = build_skip_table(&self.postings, policy);
                table.generation = self.generation;
                Cow::Owned(table)
            }
        }
    }

    /// Doc ids strictly increasing, every posting non-empty, and a cached
    /// skip table that claims to be current matches the postings exactly.
    pub fn check_invariants(&self) -> bool {
        self.postings.windows(2).all(|w| w[0].doc_id < w[1].doc_id)
            && self.postings.iter().all(|p| {
                p.term_freq() > 0 && p.positions.windows(2).all(|w| w[0] < w[1])
            })
            && self.skips_consistent()
    }

    /// A cached table stamped with the current generation must be the one
    /// `build_skip_table` produces. Older tables are never read, only rebuilt.
    pub fn skips_consistent(&self) -> bool {
        match &self.skips {
            Some(t) if t.generation == self.generation => {
                let mut expected = build_skip_table(&self.postings, t.policy());
                expected.generation = self.generation;
                *t == expected
            }
            _ => true,
        }
    }
}
