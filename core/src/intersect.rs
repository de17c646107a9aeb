use crate::config::SkipStride;
use crate::posting::PostingList;
use crate::DocId;

/// Doc ids present in both lists, ascending, using skip pointers.
///
/// A skip from `i` is taken only when the target's doc id is still `<=` the
/// other list's current id, so nothing jumped over can be a match. Skip
/// tables are taken from `PostingList::skips`, which never hands out a table
/// older than the list.
pub fn intersect(a: &PostingList, b: &PostingList, policy: SkipStride) -> Vec<DocId> {
    let (pa, pb) = (a.postings(), b.postings());
    if pa.is_empty() || pb.is_empty() {
        return Vec::new();
    }
    let (sa, sb) = (a.skips(policy), b.skips(policy));
    debug_assert_eq!(sa.generation(), a.generation());
    debug_assert_eq!(sb.generation(), b.generation());

    let mut out = Vec::with_capacity(pa.len().min(pb.len()));
    let (mut i, mut j) = (0, 0);
    while i < pa.len() && j < pb.len() {
        let (da, db) = (pa[i].doc_id, pb[j].doc_id);
        if da == db {
            out.push(da);
            i += 1;
            j += 1;
        } else if da < db {
            i = match sa.target(i) {
                Some(t) if pa[t].doc_id <= db => t,
                _ => i + 1,
            };
        } else {
            j = match sb.target(j) {
                Some(t) if pb[t].doc_id <= da => t,
                _ => j + 1,
            };
        }
    }
    out
}

/// Plain linear merge without skips.
pub fn intersect_naive(a: &PostingList, b: &PostingList) -> Vec<DocId> {
    let (pa, pb) = (a.postings(), b.postings());
    let (mut i, mut j) = (0, 0);
    let mut out = Vec::new();
    while i < pa.len() && j < pb.len() {
        if pa[i].doc_id == pb[j].doc_id {
            out.push(pa[i].doc_id);
            i += 1;
            j += 1;
        } else if pa[i].doc_id < pb[j].doc_id {
            i += 1;
        } else {
            j += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::posting::Posting;

    fn list(ids: &[DocId]) -> PostingList {
        let mut l = PostingList::new();
        for &d in ids {
            l.insert(Posting::new(d, vec![0]));
        }
        l
    }

    #[test]
    fn skips_over_long_gaps() {
        let a = list(&(0..100).collect::<Vec<_>>());
        let b = list(&[50, 99]);
        assert_eq!(intersect(&a, &b, SkipStride::Sqrt), vec![50, 99]);
        assert_eq!(intersect(&b, &a, SkipStride::Sqrt), vec![50, 99]);
    }

    #[test]
    fn disjoint_and_empty() {
        let a = list(&[1, 3, 5]);
        let b = list(&[2, 4, 6]);
        assert!(intersect(&a, &b, SkipStride::Sqrt).is_empty());
        assert!(intersect(&a, &PostingList::new(), SkipStride::Sqrt).is_empty());
    }

    #[test]
    fn agrees_with_naive_for_several_strides() {
        let a = list(&[1, 2, 4, 8, 16, 17, 18, 30, 31, 64, 65, 90]);
        let b = list(&[0, 2, 3, 8, 17, 29, 31, 33, 65, 66, 91]);
        let expected = intersect_naive(&a, &b);
        assert_eq!(expected, vec![2, 8, 17, 31, 65]);
        let strides = [
            SkipStride::Sqrt,
            SkipStride::Fixed(1),
            SkipStride::Fixed(2),
            SkipStride::Fixed(5),
            SkipStride::Fixed(50),
        ];
        for stride in strides {
            assert_eq!(intersect(&a, &b, stride), expected, "{stride:?}");
        }
    }

    #[test]
    fn stale_cache_is_not_used() {
        let mut a = list(&[1, 2, 3, 4]);
        a.refresh_skips(SkipStride::Sqrt);
        a.insert(Posting::new(10, vec![0]));
        a.insert(Posting::new(11, vec![0]));
        let b = list(&[4, 11]);
        assert_eq!(intersect(&a, &b, SkipStride::Sqrt), vec![4, 11]);
    }
}
