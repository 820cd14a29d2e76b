//! Descriptive statistics over a category's difference samples.

use serde::Serialize;

use crate::model::DiffSeries;

/// Upper edges of the half-open minute buckets; the last bucket is open.
const BUCKET_EDGES: [f64; 4] = [5.0, 15.0, 30.0, 60.0];

const BUCKET_LABELS: [&str; 5] = [
    "< 5 minutes",
    "5-15 minutes",
    "15-30 minutes",
    "30-60 minutes",
    "> 60 minutes",
];

#[derive(Debug, Clone, Serialize)]
pub struct Bucket {
    pub label: &'static str,
    pub count: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiffStats {
    pub count: usize,
    pub max_diff: f64,
    pub avg_diff: f64,
    pub median_diff: f64,
    pub distribution: [Bucket; 5],
}

/// Aggregate a series. `None` when there are no samples, so callers never
/// divide by zero or report a NaN.
pub fn compute(series: &DiffSeries) -> Option<DiffStats> {
    if series.records.is_empty() {
        return None;
    }

    let mut samples: Vec<f64> = series.records.iter().map(|r| r.minutes).collect();
    let count = samples.len();
    let avg_diff = samples.iter().sum::<f64>() / count as f64;

    samples.sort_by(|a, b| a.total_cmp(b));
    let median_diff = if count % 2 == 1 {
        samples[count / 2]
    } else {
        (samples[count / 2 - 1] + samples[count / 2]) / 2.0
    };

    let mut counts = [0usize; 5];
    for sample in &samples {
        counts[bucket_index(*sample)] += 1;
    }
    let distribution = std::array::from_fn(|i| Bucket {
        label: BUCKET_LABELS[i],
        count: counts[i],
        percent: counts[i] as f64 * 100.0 / count as f64,
    });

    Some(DiffStats {
        count,
        max_diff: series.max_diff,
        avg_diff,
        median_diff,
        distribution,
    })
}

fn bucket_index(minutes: f64) -> usize {
    BUCKET_EDGES
        .iter()
        .position(|edge| minutes < *edge)
        .unwrap_or(BUCKET_EDGES.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DiffRecord, TimeField};
    use chrono::NaiveDate;

    fn series(minutes: &[f64]) -> DiffSeries {
        let mut s = DiffSeries::default();
        for m in minutes {
            s.push(DiffRecord {
                day: NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
                name: None,
                field: TimeField::Sunrise,
                original: String::new(),
                computed: String::new(),
                minutes: *m,
            });
        }
        s
    }

    #[test]
    fn empty_series_has_no_stats() {
        assert!(compute(&DiffSeries::default()).is_none());
    }

    #[test]
    fn buckets_sum_to_count() {
        let stats = compute(&series(&[0.0, 4.9, 5.0, 14.9, 15.0, 29.9, 30.0, 59.9, 60.0, 120.0]))
            .unwrap();
        let bucket_total: usize = stats.distribution.iter().map(|b| b.count).sum();
        assert_eq!(bucket_total, stats.count);
        assert_eq!(stats.count, 10);
    }

    #[test]
    fn bucket_edges_are_half_open() {
        let stats = compute(&series(&[5.0, 15.0, 30.0, 60.0])).unwrap();
        // Each boundary value falls into the bucket to its right.
        assert_eq!(stats.distribution[0].count, 0);
        assert_eq!(stats.distribution[1].count, 1);
        assert_eq!(stats.distribution[2].count, 1);
        assert_eq!(stats.distribution[3].count, 1);
        assert_eq!(stats.distribution[4].count, 1);
    }

    #[test]
    fn mean_median_and_max() {
        let stats = compute(&series(&[2.0, 8.0, 4.0])).unwrap();
        assert!((stats.avg_diff - 14.0 / 3.0).abs() < 1e-6);
        assert_eq!(stats.median_diff, 4.0);
        assert_eq!(stats.max_diff, 8.0);
    }

    #[test]
    fn even_count_median_averages_middle_pair() {
        let stats = compute(&series(&[1.0, 9.0, 3.0, 5.0])).unwrap();
        assert_eq!(stats.median_diff, 4.0);
    }

    #[test]
    fn percentages_total_one_hundred() {
        let stats = compute(&series(&[1.0, 1.0, 20.0, 90.0])).unwrap();
        let percent_total: f64 = stats.distribution.iter().map(|b| b.percent).sum();
        assert!((percent_total - 100.0).abs() < 1e-9);
        assert_eq!(stats.distribution[0].percent, 50.0);
    }
}
