use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use stockroom_collections::{KeyIndex, PriorityHeap};

fn sku(i: usize) -> String {
    format!("SKU-{i:06}")
}

/// Lookup cost as the fixed-capacity index fills up, against a right-sized one.
fn bench_key_index_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("key_index_get");

    for n in [100usize, 1_000, 10_000] {
        group.throughput(Throughput::Elements(n as u64));

        let mut fixed: KeyIndex<String, usize> = KeyIndex::new();
        let mut sized: KeyIndex<String, usize> = KeyIndex::with_buckets(n);
        for i in 0..n {
            fixed.put(sku(i), i);
            sized.put(sku(i), i);
        }
        let keys: Vec<String> = (0..n).map(sku).collect();

        group.bench_with_input(BenchmarkId::new("default_buckets", n), &keys, |b, keys| {
            b.iter(|| {
                for k in keys {
                    black_box(fixed.get(k.as_str()));
                }
            })
        });
        group.bench_with_input(BenchmarkId::new("sized_buckets", n), &keys, |b, keys| {
            b.iter(|| {
                for k in keys {
                    black_box(sized.get(k.as_str()));
                }
            })
        });
    }

    group.finish();
}

/// Bulk heapify versus repeated insertion, both followed by a top-10 extraction.
fn bench_heap_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("priority_heap_top10");

    for n in [1_000usize, 10_000, 100_000] {
        group.throughput(Throughput::Elements(n as u64));
        let priorities: Vec<i64> = (0..n).map(|i| ((i * 7919) % 1_000) as i64).collect();

        group.bench_with_input(BenchmarkId::new("build_from", n), &priorities, |b, p| {
            b.iter(|| {
                let mut heap = PriorityHeap::new();
                heap.build_from(0..p.len(), p.iter().copied())
                    .expect("equal lengths");
                black_box(heap.extract_up_to(10))
            })
        });
        group.bench_with_input(BenchmarkId::new("insert", n), &priorities, |b, p| {
            b.iter(|| {
                let mut heap = PriorityHeap::with_capacity(p.len());
                for (i, prio) in p.iter().enumerate() {
                    heap.insert(i, *prio);
                }
                black_box(heap.extract_up_to(10))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_key_index_lookup, bench_heap_build);
criterion_main!(benches);
