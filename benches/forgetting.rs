use std::thread;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use forgetkit::{ForgettingCore, ForgettingMap};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const CAPACITY: i64 = 1024;

fn filled_core() -> ForgettingCore<u64, u64> {
    let mut cache = ForgettingCore::new(CAPACITY).unwrap();
    for i in 0..CAPACITY as u64 {
        cache.write(i, i);
    }
    cache
}

fn bench_write_read_hits(c: &mut Criterion) {
    c.bench_function("forgetting_write_read_hits", |b| {
        b.iter_batched(
            filled_core,
            |mut cache| {
                for i in 0..CAPACITY as u64 {
                    cache.write(std::hint::black_box(i), i + 1);
                    let _ = std::hint::black_box(cache.read(&std::hint::black_box(i)));
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_eviction_churn(c: &mut Criterion) {
    c.bench_function("forgetting_eviction_churn", |b| {
        b.iter_batched(
            filled_core,
            |mut cache| {
                for i in 0..4096u64 {
                    cache.write(std::hint::black_box(10_000 + i), i);
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_random_reads(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let keys: Vec<u64> = (0..4096).map(|_| rng.gen_range(0..2 * CAPACITY as u64)).collect();

    c.bench_function("forgetting_random_reads", |b| {
        b.iter_batched(
            filled_core,
            |mut cache| {
                for key in &keys {
                    let _ = std::hint::black_box(cache.read(key));
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_contended_writes(c: &mut Criterion) {
    c.bench_function("forgetting_contended_writes_4_threads", |b| {
        b.iter(|| {
            let cache = ForgettingMap::new(CAPACITY).unwrap();
            let handles: Vec<_> = (0..4u64)
                .map(|t| {
                    let cache = cache.clone();
                    thread::spawn(move || {
                        for i in 0..1024u64 {
                            cache.write(t * 1024 + i, i);
                        }
                    })
                })
                .collect();
            for handle in handles {
                handle.join().unwrap();
            }
            std::hint::black_box(cache.size())
        })
    });
}

criterion_group!(
    benches,
    bench_write_read_hits,
    bench_eviction_churn,
    bench_random_reads,
    bench_contended_writes
);
criterion_main!(benches);
