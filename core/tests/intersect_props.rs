use proptest::prelude::*;
use skipindex_core::{
    intersect, intersect_naive, Index, IndexConfig, Metadata, Posting, PostingList, SkipStride,
};
use std::collections::BTreeSet;

fn list_of(ids: &BTreeSet<u32>) -> PostingList {
    let mut l = PostingList::new();
    for &d in ids {
        l.insert(Posting::new(d, vec![0]));
    }
    l
}

fn stride() -> impl Strategy<Value = SkipStride> {
    prop_oneof![Just(SkipStride::Sqrt), (0usize..40).prop_map(SkipStride::Fixed)]
}

proptest! {
    #[test]
    fn skip_intersection_matches_naive(
        a in prop::collection::btree_set(0u32..500, 0..200),
        b in prop::collection::btree_set(0u32..500, 0..200),
        policy in stride(),
    ) {
        let (la, lb) = (list_of(&a), list_of(&b));
        let expected: Vec<u32> = a.intersection(&b).copied().collect();
        prop_assert_eq!(intersect_naive(&la, &lb), expected.clone());
        prop_assert_eq!(intersect(&la, &lb, policy), expected.clone());
        prop_assert_eq!(intersect(&lb, &la, policy), expected);
    }

    #[test]
    fn invariants_hold_for_any_ingest_order(
        docs in prop::collection::vec((0u32..300, prop::collection::vec(0usize..6, 0..12)), 1..60),
        policy in stride(),
        eager in any::<bool>(),
    ) {
        const WORDS: [&str; 6] = ["alpha", "beta", "gamma", "delta", "eps", "zeta"];
        let config = IndexConfig { skip_stride: policy, eager_skip_rebuild: eager };
        let mut idx = Index::with_config(config);
        let mut seen = BTreeSet::new();
        let mut lengths = 0usize;
        for (id, words) in &docs {
            let text: Vec<&str> = words.iter().map(|&w| WORDS[w]).collect();
            let res = idx.ingest(*id, &text.join(" "), Metadata::new());
            if seen.insert(*id) {
                prop_assert!(res.is_ok());
                lengths += words.len();
            } else {
                prop_assert!(res.is_err());
            }
        }

        let stats = idx.stats();
        prop_assert_eq!(stats.document_count, seen.len());
        prop_assert_eq!(stats.total_term_occurrences, lengths as u64);

        for a in WORDS {
            let Some(la) = idx.lookup(a) else { continue };
            prop_assert!(la.check_invariants());
            prop_assert_eq!(la.document_frequency() as usize, la.postings().len());
            for p in la.postings() {
                prop_assert_eq!(p.term_freq() as usize, p.positions().len());
            }
            for b in WORDS {
                let hits = idx.intersect(a, b);
                let naive = idx.lookup(b).map(|lb| intersect_naive(la, lb)).unwrap_or_default();
                prop_assert_eq!(&hits, &naive);
                prop_assert_eq!(&hits, &idx.intersect(b, a));
            }
        }
    }
}
