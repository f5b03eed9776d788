use chrono::{DateTime, NaiveDateTime};

use crate::types::Candle;

/// Running aggregate for one output bucket.
#[derive(Default)]
struct BucketAgg {
    open: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    close: Option<f64>,
    value: f64,
    volume: f64,
}

impl BucketAgg {
    fn seed(candle: &Candle) -> Self {
        let mut agg = Self::default();
        agg.absorb(candle);
        agg
    }

    /// Fold one candle into the bucket. Candles arrive in chronological
    /// order, so "first present" and "last present" reduce to simple
    /// keep-if-unset / overwrite-if-present rules.
    fn absorb(&mut self, candle: &Candle) {
        if self.open.is_none() {
            self.open = candle.open;
        }
        if let Some(high) = candle.high {
            self.high = Some(self.high.map_or(high, |cur| cur.max(high)));
        }
        if let Some(low) = candle.low {
            self.low = Some(self.low.map_or(low, |cur| cur.min(low)));
        }
        if candle.close.is_some() {
            self.close = candle.close;
        }
        if let Some(value) = candle.value {
            self.value += value;
        }
        if let Some(volume) = candle.volume {
            self.volume += volume;
        }
    }
}

fn bucket_start(ts: NaiveDateTime, step_seconds: i64) -> Option<NaiveDateTime> {
    let seconds = ts.and_utc().timestamp();
    let floored = seconds - seconds.rem_euclid(step_seconds);
    DateTime::from_timestamp(floored, 0).map(|dt| dt.naive_utc())
}

/// A bucket contributes an output candle only when it saw a complete OHLC
/// set; turnover and volume sums over absent-only inputs resolve to zero.
fn finalize_bucket(out: &mut Vec<Candle>, bucket: NaiveDateTime, agg: BucketAgg) {
    let (Some(open), Some(high), Some(low), Some(close)) =
        (agg.open, agg.high, agg.low, agg.close)
    else {
        return;
    };
    out.push(Candle {
        begin: bucket,
        open: Some(open),
        high: Some(high),
        low: Some(low),
        close: Some(close),
        value: Some(agg.value),
        volume: Some(agg.volume),
    });
}

/// Resample candles into `minutes`-sized buckets with OHLCV semantics.
///
/// - Candles are grouped by epoch-floored bucket start; the output candle's
///   `begin` is the bucket start.
/// - Open = first present open, high = max high, low = min low,
///   close = last present close, value/volume = sum of present values.
/// - Buckets that never see a complete open/high/low/close set are dropped.
/// - An empty input or a non-positive `minutes` returns the input unchanged.
#[must_use]
pub fn resample_to_minutes(mut candles: Vec<Candle>, minutes: i64) -> Vec<Candle> {
    if candles.is_empty() || minutes <= 0 {
        return candles;
    }
    candles.sort_by_key(|c| c.begin);
    let step = minutes * 60;

    let mut out = Vec::new();
    let mut iter = candles.into_iter();
    let Some((mut cur_bucket, first)) =
        iter.find_map(|c| bucket_start(c.begin, step).map(|b| (b, c)))
    else {
        return Vec::new();
    };
    let mut agg = BucketAgg::seed(&first);

    for candle in iter {
        let Some(bucket) = bucket_start(candle.begin, step) else {
            continue;
        };
        if bucket == cur_bucket {
            agg.absorb(&candle);
        } else {
            finalize_bucket(&mut out, cur_bucket, agg);
            cur_bucket = bucket;
            agg = BucketAgg::seed(&candle);
        }
    }
    finalize_bucket(&mut out, cur_bucket, agg);

    out
}
