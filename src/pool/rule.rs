//! Rule record and canonicalization (§3, §4.3).

use crate::data::Timestamp;
use serde::{Deserialize, Serialize};

pub const CANONICAL_WIDTH: usize = 8;

/// sorted, zero-padded 8-wide array of 1-based attribute ids identifying
/// a rule up to attribute permutation.
pub type CanonicalKey = [u16; CANONICAL_WIDTH];

/// quadrant of the (x_{t+1}, x_{t+2}) pair under the zero-inclusive-positive
/// convention of §4.4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quadrant {
    /// (+, +)
    UpUp,
    /// (-, +)
    DownUp,
    /// (-, -)
    DownDown,
    /// (+, -)
    UpDown,
}

impl Quadrant {
    pub fn classify(x1: f64, x2: f64) -> Self {
        match (x1 >= 0.0, x2 >= 0.0) {
            (true, true) => Quadrant::UpUp,
            (false, true) => Quadrant::DownUp,
            (false, false) => Quadrant::DownDown,
            (true, false) => Quadrant::UpDown,
        }
    }
}

/// one bucket's one-pass mean/variance of x_{i+1} plus its witness count (§4.8).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BucketStats {
    pub count: u64,
    pub mean: f64,
    pub sigma: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemporalSummary {
    pub month_stats: std::collections::BTreeMap<u32, BucketStats>,
    pub quarter_stats: std::collections::BTreeMap<u32, BucketStats>,
    pub weekday_stats: std::collections::BTreeMap<u32, BucketStats>,
    pub dominant_month: u32,
    pub dominant_quarter: u32,
    pub dominant_weekday: u32,
    pub start_timestamp: Option<Timestamp>,
    pub end_timestamp: Option<Timestamp>,
    pub span_days: i64,
}

#[derive(Default)]
struct Moments {
    count: u64,
    sum: f64,
    sum_sq: f64,
}

impl Moments {
    fn witness(&mut self, x: f64) {
        self.count += 1;
        self.sum += x;
        self.sum_sq += x * x;
    }

    fn stats(&self) -> BucketStats {
        let n = self.count as f64;
        let mean = self.sum / n;
        let variance = (self.sum_sq / n - mean * mean).max(0.0);
        BucketStats {
            count: self.count,
            mean,
            sigma: variance.sqrt(),
        }
    }
}

fn finalize_buckets(moments: std::collections::BTreeMap<u32, Moments>) -> (std::collections::BTreeMap<u32, BucketStats>, u32) {
    let mut stats = std::collections::BTreeMap::new();
    let mut dominant = 0u32;
    let mut dominant_count = 0u64;
    for (&bucket, m) in moments.iter() {
        if m.count > dominant_count {
            dominant_count = m.count;
            dominant = bucket;
        }
        stats.insert(bucket, m.stats());
    }
    (stats, dominant)
}

/// Per-bucket means/variances of x_{i+1} and the argmax-count dominant
/// bucket, for each of month/quarter/weekday, plus the matched span
/// (§4.8). Purely descriptive; never consulted by acceptance.
pub fn summarize_temporal(matched_indices: &[usize], dataset: &crate::data::Dataset) -> Option<TemporalSummary> {
    if matched_indices.is_empty() {
        return None;
    }

    let mut months: std::collections::BTreeMap<u32, Moments> = std::collections::BTreeMap::new();
    let mut quarters: std::collections::BTreeMap<u32, Moments> = std::collections::BTreeMap::new();
    let mut weekdays: std::collections::BTreeMap<u32, Moments> = std::collections::BTreeMap::new();
    let mut start = None;
    let mut end = None;

    for &i in matched_indices {
        let ts = *dataset.timestamp(i);
        let x1 = dataset.x(i + 1);
        months.entry(ts.month).or_default().witness(x1);
        quarters.entry(ts.quarter).or_default().witness(x1);
        weekdays.entry(ts.weekday).or_default().witness(x1);
        start = Some(start.map_or(ts, |s: Timestamp| s.min(ts)));
        end = Some(end.map_or(ts, |e: Timestamp| e.max(ts)));
    }

    let (month_stats, dominant_month) = finalize_buckets(months);
    let (quarter_stats, dominant_quarter) = finalize_buckets(quarters);
    let (weekday_stats, dominant_weekday) = finalize_buckets(weekdays);
    let start_timestamp = start;
    let end_timestamp = end;
    let span_days = match (start_timestamp, end_timestamp) {
        (Some(s), Some(e)) => e.ordinal - s.ordinal,
        _ => 0,
    };

    Some(TemporalSummary {
        month_stats,
        quarter_stats,
        weekday_stats,
        dominant_month,
        dominant_quarter,
        dominant_weekday,
        start_timestamp,
        end_timestamp,
        span_days,
    })
}

/// Superset struct for both dialects (§9: tagged variant, not subclassed types).
/// Dialect A leaves the Dialect-B-only fields at their defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    /// sorted, zero-padded 1-based attribute ids
    pub attributes: CanonicalKey,
    /// lag observed at each attribute's first occurrence in the chain,
    /// indexed in parallel with `attributes` (0 for padding slots)
    pub lags: [u32; CANONICAL_WIDTH],
    pub num_attributes: usize,

    pub mean1: f64,
    pub sigma1: f64,
    pub mean2: Option<f64>,
    pub sigma2: Option<f64>,

    pub support_count: u64,
    pub effective_denominator: u64,

    pub high_support: bool,
    pub low_variance: bool,

    pub concentration: Option<f64>,
    pub dominant_quadrant: Option<Quadrant>,
    pub temporal: Option<TemporalSummary>,
}

/// Canonicalize a depth-`j` prefix of a traversal chain into a sorted,
/// zero-padded attribute key plus the lag observed at each attribute's
/// first occurrence (§4.3). `zero_based_attrs`/`lags` are parallel
/// arrays of length `j` in traversal order.
pub fn canonicalize(zero_based_attrs: &[usize], lags: &[usize]) -> (CanonicalKey, [u32; CANONICAL_WIDTH], usize) {
    let mut first_lag: std::collections::BTreeMap<u16, u32> = std::collections::BTreeMap::new();
    for (&attr, &lag) in zero_based_attrs.iter().zip(lags.iter()) {
        let one_based = (attr + 1) as u16;
        first_lag.entry(one_based).or_insert(lag as u32);
    }
    let num_attributes = first_lag.len().min(CANONICAL_WIDTH);
    let mut attributes = [0u16; CANONICAL_WIDTH];
    let mut rule_lags = [0u32; CANONICAL_WIDTH];
    for (i, (&attr, &lag)) in first_lag.iter().enumerate().take(CANONICAL_WIDTH) {
        attributes[i] = attr;
        rule_lags[i] = lag;
    }
    (attributes, rule_lags, num_attributes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalizes_sorted_unique_with_first_lag() {
        // chain visits attr 4 (lag 1), attr 2 (lag 0), attr 4 again (lag 3, ignored)
        let attrs = [4, 2, 4];
        let lags = [1, 0, 3];
        let (key, rule_lags, n) = canonicalize(&attrs, &lags);
        assert_eq!(n, 2);
        assert_eq!(&key[0..2], &[3, 5]); // 1-based: attr2+1=3, attr4+1=5
        assert_eq!(rule_lags[0], 0); // attr 3 (orig 2) first seen at lag 0
        assert_eq!(rule_lags[1], 1); // attr 5 (orig 4) first seen at lag 1, not 3
        assert_eq!(&key[2..], &[0u16; 6]);
    }

    #[test]
    fn summarize_temporal_picks_the_highest_count_bucket_and_spans_the_matched_range() {
        use crate::data::{Dataset, Row, Trinary};

        // three matches in January (x1 = 1.0) and one in February (x1 = -1.0);
        // January should win the dominant-month argmax.
        let rows = vec![
            Row { attrs: vec![Trinary::True], x: 0.0, timestamp: Timestamp::parse("2024-01-05").unwrap() },
            Row { attrs: vec![Trinary::True], x: 1.0, timestamp: Timestamp::parse("2024-01-06").unwrap() },
            Row { attrs: vec![Trinary::True], x: 0.0, timestamp: Timestamp::parse("2024-01-10").unwrap() },
            Row { attrs: vec![Trinary::True], x: 1.0, timestamp: Timestamp::parse("2024-01-11").unwrap() },
            Row { attrs: vec![Trinary::True], x: 0.0, timestamp: Timestamp::parse("2024-01-20").unwrap() },
            Row { attrs: vec![Trinary::True], x: 1.0, timestamp: Timestamp::parse("2024-01-21").unwrap() },
            Row { attrs: vec![Trinary::True], x: 0.0, timestamp: Timestamp::parse("2024-02-15").unwrap() },
            Row { attrs: vec![Trinary::True], x: -1.0, timestamp: Timestamp::parse("2024-02-16").unwrap() },
        ];
        let dataset = Dataset::new(vec!["a".into()], rows);
        let matched = [0usize, 2, 4, 6];

        let summary = summarize_temporal(&matched, &dataset).unwrap();
        assert_eq!(summary.dominant_month, 1);
        let january = summary.month_stats[&1];
        assert_eq!(january.count, 3);
        assert!((january.mean - 1.0).abs() < 1e-9);
        assert!(january.sigma.abs() < 1e-9);
        assert_eq!(summary.start_timestamp.unwrap(), Timestamp::parse("2024-01-05").unwrap());
        assert_eq!(summary.end_timestamp.unwrap(), Timestamp::parse("2024-02-15").unwrap());
        assert_eq!(summary.span_days, 41);
    }

    #[test]
    fn summarize_temporal_is_none_for_no_matches() {
        use crate::data::Dataset;
        let dataset = Dataset::new(vec!["a".into()], vec![]);
        assert!(summarize_temporal(&[], &dataset).is_none());
    }

    #[test]
    fn quadrant_classification_is_zero_inclusive_positive() {
        assert_eq!(Quadrant::classify(0.0, 0.0), Quadrant::UpUp);
        assert_eq!(Quadrant::classify(-0.1, 0.0), Quadrant::DownUp);
        assert_eq!(Quadrant::classify(-0.1, -0.1), Quadrant::DownDown);
        assert_eq!(Quadrant::classify(0.1, -0.1), Quadrant::UpDown);
    }
}
