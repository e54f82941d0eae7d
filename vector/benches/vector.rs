use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lazivec_vector::Vector;

pub fn push_and_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("vector");

    group.bench_function("push 10k, N=32", |b| {
        b.iter(|| {
            let mut vec: Vector<u32, 32> = Vector::new();
            for i in 0..10_000 {
                vec.push(i);
            }
            black_box(vec.len())
        });
    });

    group.bench_function("updated 1k times in 10k, N=32", |b| {
        let vec: Vector<u32, 32> = (0..10_000).collect();
        b.iter(|| {
            let mut cur = vec.clone();
            for i in 0..1_000 {
                cur = cur.updated(i * 7 % 10_000, 0).unwrap();
            }
            black_box(cur.len())
        });
    });

    group.bench_function("iterate 10k, N=32", |b| {
        let vec: Vector<u32, 32> = (0..10_000).collect();
        b.iter(|| black_box(vec.iter().count()));
    });

    group.bench_function("concat 1k + 1k, N=32", |b| {
        let left: Vector<u32, 32> = (0..1_000).collect();
        let right: Vector<u32, 32> = (0..1_000).collect();
        b.iter(|| black_box(left.concat(&right).len()));
    });
}

criterion_group!(benches, push_and_update);
criterion_main!(benches);
