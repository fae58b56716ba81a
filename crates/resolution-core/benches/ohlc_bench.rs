// File: crates/resolution-core/benches/ohlc_bench.rs
// Summary: Candle aggregation throughput across series sizes and timeframes.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, black_box};
use resolution_core::downsample::aggregate_ohlc;
use resolution_core::{OhlcPoint, Timeframe};

fn gen_ohlc(n: usize) -> Vec<OhlcPoint> {
    let mut v = Vec::with_capacity(n);
    let mut t = 1_704_067_200_i64;
    let mut price = 100.0f64;
    for _ in 0..n {
        t += 60;
        let o = price;
        let h = o + 1.0;
        let l = o - 1.0;
        let c = o + 0.2;
        price = c;
        v.push(OhlcPoint::new(t, o, h, l, c));
    }
    v
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate_ohlc");
    for &n in &[50_000usize, 100_000usize] {
        let data = gen_ohlc(n);
        for tf in [Timeframe::Min5, Timeframe::Hour1, Timeframe::Day1] {
            group.bench_with_input(BenchmarkId::from_parameter(format!("n{n}_{tf}")), &tf, |b, &tf| {
                b.iter_batched(
                    || data.clone(),
                    |d| { let _ = black_box(aggregate_ohlc(&d, tf, 60)); },
                    BatchSize::SmallInput,
                );
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_aggregate);
criterion_main!(benches);
