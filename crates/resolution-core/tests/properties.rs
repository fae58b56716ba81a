// File: crates/resolution-core/tests/properties.rs
// Purpose: Property checks for bucket counts, mean/OHLC reduction, identity and idempotence.

use proptest::prelude::*;
use resolution_core::{
    aggregate_line, aggregate_ohlc, aggregate_ohlc_buckets, points_per_bucket, prepare_series, EngineOptions,
    OhlcPoint, RawSeries, TimePoint, Timeframe,
};

const T0: i64 = 1_704_067_200;

fn intervals() -> impl Strategy<Value = i64> {
    prop::sample::select(vec![60_i64, 300, 900, 1800, 3600, 14_400, 86_400])
}

fn timeframes() -> impl Strategy<Value = Timeframe> {
    prop::sample::select(Timeframe::ALL.to_vec())
}

fn line(values: &[f64], interval: i64) -> Vec<TimePoint> {
    values.iter().enumerate().map(|(i, &v)| TimePoint::new(T0 + i as i64 * interval, v)).collect()
}

fn candle_strategy() -> impl Strategy<Value = (f64, f64, f64, f64)> {
    // (open, close, up-wick, down-wick) -> consistent candle
    (1.0f64..1000.0, 1.0f64..1000.0, 0.0f64..50.0, 0.0f64..50.0)
}

fn candles(raw: &[(f64, f64, f64, f64)], interval: i64) -> Vec<OhlcPoint> {
    raw.iter()
        .enumerate()
        .map(|(i, &(o, c, up, down))| OhlcPoint::new(T0 + i as i64 * interval, o, o.max(c) + up, o.min(c) - down, c))
        .collect()
}

proptest! {
    #[test]
    fn bucket_count_is_ceil_of_n_over_bucket(
        values in prop::collection::vec(-1e6f64..1e6, 1..400),
        interval in intervals(),
        tf in timeframes(),
    ) {
        prop_assume!(tf.seconds() >= interval);
        let pts = line(&values, interval);
        let bucket = points_per_bucket(tf, interval);
        let out = aggregate_line(&pts, tf, interval, 2);
        prop_assert_eq!(out.len(), values.len().div_ceil(bucket));
        prop_assert!(out.windows(2).all(|w| w[0].time < w[1].time));

        let cs: Vec<_> = pts.iter().map(|p| OhlcPoint::new(p.time, p.value, p.value, p.value, p.value)).collect();
        prop_assert_eq!(aggregate_ohlc(&cs, tf, interval).len(), values.len().div_ceil(bucket));
    }

    #[test]
    fn bucket_mean_ignores_order_within_bucket(
        ints in prop::collection::vec(0u32..1_000_000, 4),
        rot in 0usize..4,
    ) {
        // whole numbers keep the sums exact, so rounding cannot flip
        let mut values: Vec<f64> = ints.into_iter().map(f64::from).collect();
        let before = aggregate_line(&line(&values, 3600), Timeframe::Hour4, 3600, 2);
        values.rotate_left(rot);
        let after = aggregate_line(&line(&values, 3600), Timeframe::Hour4, 3600, 2);
        prop_assert_eq!(before.len(), 1);
        prop_assert!((before[0].value - after[0].value).abs() < 1e-9);
    }

    #[test]
    fn candle_extremes_are_bucket_extremes(
        raw in prop::collection::vec(candle_strategy(), 1..200),
        bucket in 1usize..30,
    ) {
        let data = candles(&raw, 60);
        let out = aggregate_ohlc_buckets(&data, bucket);
        for (agg, slice) in out.iter().zip(data.chunks(bucket)) {
            let hi = slice.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
            let lo = slice.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
            prop_assert_eq!(agg.high, hi);
            prop_assert_eq!(agg.low, lo);
            prop_assert_eq!(agg.open, slice[0].open);
            prop_assert_eq!(agg.close, slice[slice.len() - 1].close);
            prop_assert_eq!(agg.time, slice[0].time);
            prop_assert!(agg.is_consistent());
        }
    }

    #[test]
    fn native_resolution_is_identity(
        values in prop::collection::vec(-1e3f64..1e3, 1..100),
        raw in prop::collection::vec(candle_strategy(), 1..100),
    ) {
        let pts = line(&values, 3600);
        prop_assert_eq!(points_per_bucket(Timeframe::Hour1, 3600), 1);
        prop_assert_eq!(aggregate_line(&pts, Timeframe::Hour1, 3600, 2), pts);

        let cs = candles(&raw, 3600);
        prop_assert_eq!(aggregate_ohlc(&cs, Timeframe::Hour1, 3600), cs);
    }

    #[test]
    fn repeated_preparation_is_deterministic(
        values in prop::collection::vec(1.0f64..1e5, 2..300),
        interval in intervals(),
    ) {
        let ts: Vec<String> = (0..values.len() as i64).map(|i| (T0 + i * interval).to_string()).collect();
        let raw = RawSeries::line(ts, values);
        let opts = EngineOptions::default();
        let first = prepare_series(&raw, &opts).expect("prepared");
        let second = prepare_series(&raw, &opts).expect("prepared");
        prop_assert_eq!(&first, &second);
        for name in first.names() {
            prop_assert_eq!(first.get(name), second.get(name));
        }
    }
}
