use serde::{Deserialize, Serialize};

use crate::config::SkipStride;
use crate::posting::Posting;

/// Skip pointers over a posting list, one entry at every multiple of `stride`.
///
/// Entry `k` is the target of list index `k * stride`: `k * stride + stride`
/// when that is in bounds, otherwise the last index of the list. A table is a
/// snapshot of the list it was built from and records that list's generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipTable {
    policy: SkipStride,
    pub(crate) stride: usize,
    pub(crate) targets: Vec<usize>,
    pub(crate) generation: u64,
}

/// Build the skip table for the current contents of `postings`.
pub fn build_skip_table(postings: &[Posting], policy: SkipStride) -> SkipTable {
    let n = postings.len();
    let stride = policy.for_len(n);
    let targets = (0..n)
        .step_by(stride)
        .map(|i| if i + stride < n { i + stride } else { n - 1 })
        .collect();
    SkipTable { policy, stride, targets, generation: 0 }
}

impl SkipTable {
    pub fn stride(&self) -> usize { self.stride }

    pub fn policy(&self) -> SkipStride { self.policy }

    pub fn generation(&self) -> u64 { self.generation }

    pub fn len(&self) -> usize { self.targets.len() }

    pub fn is_empty(&self) -> bool { self.targets.is_empty() }

    /// Skip target for list index `i`, if `i` carries an entry that moves forward.
    #[inline]
    pub fn target(&self, i: usize) -> Option<usize> {
        if i % self.stride != 0 {
            return None;
        }
        match self.targets.get(i / self.stride) {
            Some(&t) if t > i => Some(t),
            _ => None,
        }
    }

    /// `(from, to)` pairs in ascending order of `from`.
    pub fn entries(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.targets.iter().enumerate().map(move |(k, &t)| (k * self.stride, t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn postings(n: u32) -> Vec<Posting> {
        (0..n).map(|d| Posting::new(d, vec![0])).collect()
    }

    #[test]
    fn nine_postings() {
        let table = build_skip_table(&postings(9), SkipStride::Sqrt);
        assert_eq!(table.stride(), 3);
        let entries: Vec<_> = table.entries().collect();
        assert_eq!(entries, vec![(0, 3), (3, 6), (6, 8)]);
        assert_eq!(table.target(6), Some(8));
        assert_eq!(table.target(1), None);
    }

    #[test]
    fn last_entry_on_final_index_is_not_a_skip() {
        // n = 10, stride 3: entries at 0, 3, 6, 9; index 9 targets itself.
        let table = build_skip_table(&postings(10), SkipStride::Sqrt);
        let entries: Vec<_> = table.entries().collect();
        assert_eq!(entries, vec![(0, 3), (3, 6), (6, 9), (9, 9)]);
        assert_eq!(table.target(9), None);
    }

    #[test]
    fn empty_and_single() {
        assert!(build_skip_table(&[], SkipStride::Sqrt).is_empty());
        let table = build_skip_table(&postings(1), SkipStride::Sqrt);
        assert_eq!(table.entries().collect::<Vec<_>>(), vec![(0, 0)]);
        assert_eq!(table.target(0), None);
    }

    #[test]
    fn fixed_stride_larger_than_list() {
        let table = build_skip_table(&postings(4), SkipStride::Fixed(10));
        assert_eq!(table.entries().collect::<Vec<_>>(), vec![(0, 3)]);
    }
}
