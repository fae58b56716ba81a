// File: crates/resolution-core/src/downsample.rs
// Summary: Downsampling utilities (mean buckets for lines; OHLC bucket aggregation for candles).

use crate::series::{OhlcPoint, TimePoint};
use crate::timeframe::Timeframe;
use crate::types::MAX_VALUE_DECIMALS;

/// Source points folded into one bucket: `round(duration / interval)`, at least 1.
pub fn points_per_bucket(timeframe: Timeframe, source_interval: i64) -> usize {
    if source_interval <= 0 {
        return 1;
    }
    let ratio = (timeframe.seconds() as f64 / source_interval as f64).round();
    if ratio < 1.0 { 1 } else { ratio as usize }
}

/// Split `data` into consecutive slices of `bucket` points (the last may be
/// shorter) and reduce each slice to one point. `reduce` receives the bucket
/// ordinal and the slice.
pub fn bucket_reduce<P, Q, F>(data: &[P], bucket: usize, mut reduce: F) -> Vec<Q>
where
    F: FnMut(usize, &[P]) -> Q,
{
    let bucket = bucket.max(1);
    let mut out = Vec::with_capacity(data.len().div_ceil(bucket));
    for (i, slice) in data.chunks(bucket).enumerate() {
        out.push(reduce(i, slice));
    }
    out
}

/// Round `v` to `decimals` fractional digits, at most [`MAX_VALUE_DECIMALS`].
pub fn round_to(v: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals.min(MAX_VALUE_DECIMALS) as i32);
    (v * scale).round() / scale
}

/// Mean-aggregate a line series into `timeframe` buckets.
/// Bucket `i` is stamped `floor(t0 / duration) * duration + i * duration`,
/// independent of the slice's own timestamps.
pub fn aggregate_line(
    data: &[TimePoint],
    timeframe: Timeframe,
    source_interval: i64,
    decimals: u32,
) -> Vec<TimePoint> {
    let bucket = points_per_bucket(timeframe, source_interval);
    if bucket <= 1 || data.is_empty() {
        return data.to_vec();
    }
    let duration = timeframe.seconds();
    let origin = data[0].time.div_euclid(duration) * duration;
    bucket_reduce(data, bucket, |i, slice| {
        let sum: f64 = slice.iter().map(|p| p.value).sum();
        let mean = sum / slice.len() as f64;
        TimePoint::new(origin + i as i64 * duration, round_to(mean, decimals))
    })
}

/// Aggregate OHLC candles into fixed-size buckets of `bucket` width.
/// For each bucket: open=first.open, close=last.close, high=max high, low=min low, time=first.time
pub fn aggregate_ohlc_buckets(data: &[OhlcPoint], bucket: usize) -> Vec<OhlcPoint> {
    if bucket <= 1 { return data.to_vec(); }
    bucket_reduce(data, bucket, |_, slice| {
        let first = slice[0];
        let last = slice[slice.len() - 1];
        let mut low = first.low;
        let mut high = first.high;
        for c in &slice[1..] {
            low = low.min(c.low);
            high = high.max(c.high);
        }
        OhlcPoint { time: first.time, open: first.open, high, low, close: last.close }
    })
}

/// Candle aggregation sized from a timeframe, mirroring [`aggregate_line`].
pub fn aggregate_ohlc(data: &[OhlcPoint], timeframe: Timeframe, source_interval: i64) -> Vec<OhlcPoint> {
    aggregate_ohlc_buckets(data, points_per_bucket(timeframe, source_interval))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_size_rounds_to_nearest() {
        assert_eq!(points_per_bucket(Timeframe::Hour4, 3600), 4);
        // 45-minute source into 1h: 1.33 rounds to 1
        assert_eq!(points_per_bucket(Timeframe::Hour1, 2700), 1);
        // 40-minute source into 1h: 1.5 rounds up
        assert_eq!(points_per_bucket(Timeframe::Hour1, 2400), 2);
        assert_eq!(points_per_bucket(Timeframe::Min1, 3600), 1);
    }

    #[test]
    fn line_rounds_means_to_two_decimals() {
        let data = vec![
            TimePoint::new(0, 1.0),
            TimePoint::new(3600, 1.0),
            TimePoint::new(7200, 2.0),
        ];
        let out = aggregate_line(&data, Timeframe::Hour4, 3600, 2);
        assert_eq!(out, vec![TimePoint::new(0, 1.33)]);
    }

    #[test]
    fn line_bucket_times_are_epoch_aligned() {
        // Starts at 01:00, 4h buckets align to 00:00 and 04:00.
        let data: Vec<_> = (1..=8).map(|h| TimePoint::new(h * 3600, h as f64)).collect();
        let out = aggregate_line(&data, Timeframe::Hour4, 3600, 2);
        let times: Vec<_> = out.iter().map(|p| p.time).collect();
        assert_eq!(times, vec![0, 4 * 3600]);
    }

    #[test]
    fn candle_buckets_keep_first_raw_time() {
        let data: Vec<_> = (1..=5)
            .map(|h| OhlcPoint::new(h * 3600, 1.0, 2.0, 0.5, 1.5))
            .collect();
        let out = aggregate_ohlc(&data, Timeframe::Hour4, 3600);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].time, 3600);
        assert_eq!(out[1].time, 5 * 3600);
    }
}
