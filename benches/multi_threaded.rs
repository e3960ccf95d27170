use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use criterion::{BenchmarkId, Criterion, Throughput};

use crate::variants::Variant;

pub fn bench_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("multi_threaded/acquire");
    group.throughput(Throughput::Elements(1));
    for v in Variant::ALL {
        group.bench_with_input(BenchmarkId::from_parameter(format!("{:?}", v)), v, |b, v| {
            bench_with_variants!(v, throttler, {
                let throttler = Arc::new(throttler);
                b.iter_custom(|iters| contended(&throttler, iters));
            });
        });
    }
    group.finish();
}

/// Runs `iters` acquisitions spread over 20 threads and returns the
/// total time taken.
fn contended<C>(throttler: &Arc<window_throttle::Throttler<C>>, iters: u64) -> Duration
where
    C: window_throttle::clock::Clock + 'static,
{
    const THREADS: u64 = 20;
    let start = Instant::now();
    let children: Vec<_> = (0..THREADS)
        .map(|t| {
            let throttler = throttler.clone();
            let n = iters / THREADS + if t < iters % THREADS { 1 } else { 0 };
            thread::spawn(move || {
                for _i in 0..n {
                    throttler.acquire();
                }
            })
        })
        .collect();
    for child in children {
        child.join().unwrap();
    }
    start.elapsed()
}
