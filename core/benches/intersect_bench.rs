use criterion::{black_box, criterion_group, criterion_main, Criterion};
use skipindex_core::{intersect, intersect_naive, Index, Metadata};

fn build() -> Index {
    let mut idx = Index::new();
    for id in 0..50_000u32 {
        let text = if id % 1000 == 0 { "common rare" } else { "common" };
        idx.ingest(id, text, Metadata::new()).unwrap();
    }
    idx
}

fn bench_intersect(c: &mut Criterion) {
    let idx = build();
    let (common, rare) = (idx.lookup("common").unwrap(), idx.lookup("rare").unwrap());
    let policy = idx.config().skip_stride;
    c.bench_function("intersect_skip", |b| {
        b.iter(|| intersect(black_box(common), black_box(rare), policy))
    });
    c.bench_function("intersect_naive", |b| {
        b.iter(|| intersect_naive(black_box(common), black_box(rare)))
    });
}

criterion_group!(benches, bench_intersect);
criterion_main!(benches);
