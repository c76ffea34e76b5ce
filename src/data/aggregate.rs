use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;

use super::model::Record;

// ---------------------------------------------------------------------------
// SentimentSummary – label → count
// ---------------------------------------------------------------------------

/// Occurrence count per sentiment label. Unlabelled records are not counted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SentimentSummary {
    counts: BTreeMap<String, usize>,
}

impl SentimentSummary {
    pub fn get(&self, label: &str) -> usize {
        self.counts.get(label).copied().unwrap_or(0)
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Entries by descending count, ties broken by label.
    pub fn ranked(&self) -> Vec<(&str, usize)> {
        let mut entries: Vec<(&str, usize)> = self
            .counts
            .iter()
            .map(|(label, count)| (label.as_str(), *count))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }
}

/// Count each distinct sentiment label present in `records`.
pub fn summarize<'a, I>(records: I) -> SentimentSummary
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut counts = BTreeMap::new();
    for label in records.into_iter().filter_map(|r| r.sentiment.as_ref()) {
        *counts.entry(label.clone()).or_insert(0) += 1;
    }
    SentimentSummary { counts }
}

// ---------------------------------------------------------------------------
// TimeSentimentSummary – (date, label) → count, dense
// ---------------------------------------------------------------------------

/// Dense date × label table. `labels` is sorted; every row has one count per
/// label, zero where that label did not occur on the date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TimeSentimentSummary {
    pub labels: Vec<String>,
    pub rows: Vec<(NaiveDate, Vec<usize>)>,
}

impl TimeSentimentSummary {
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.rows.iter().map(|(date, _)| *date)
    }

    /// Per-date counts of a single label, in date order.
    pub fn series(&self, label: &str) -> Option<Vec<(NaiveDate, usize)>> {
        let col = self.labels.iter().position(|l| l == label)?;
        Some(self.rows.iter().map(|(date, counts)| (*date, counts[col])).collect())
    }
}

/// Group labelled records by calendar date of their timestamp, then by label.
/// Records missing either the timestamp or the label are left out.
pub fn summarize_by_time<'a, I>(records: I) -> TimeSentimentSummary
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut grouped: BTreeMap<NaiveDate, BTreeMap<&str, usize>> = BTreeMap::new();
    let mut labels: BTreeSet<&str> = BTreeSet::new();

    for r in records {
        let (Some(ts), Some(label)) = (r.timestamp, r.sentiment.as_deref()) else {
            continue;
        };
        labels.insert(label);
        *grouped.entry(ts.date()).or_default().entry(label).or_insert(0) += 1;
    }

    let rows = grouped
        .into_iter()
        .map(|(date, by_label)| {
            let counts = labels
                .iter()
                .map(|l| by_label.get(l).copied().unwrap_or(0))
                .collect();
            (date, counts)
        })
        .collect();

    TimeSentimentSummary {
        labels: labels.into_iter().map(str::to_string).collect(),
        rows,
    }
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Equal-width histogram over the range of `values`.
///
/// Bins are half-open `[start, end)` except the last, which also takes the
/// maximum. A single distinct value produces one bin of width 1.
pub fn histogram<I>(values: I, nbins: usize) -> Vec<HistogramBin>
where
    I: IntoIterator<Item = f64>,
{
    let values: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
    if values.is_empty() || nbins == 0 {
        return Vec::new();
    }

    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if max - min < f64::EPSILON {
        return vec![HistogramBin {
            start: min - 0.5,
            end: min + 0.5,
            count: values.len(),
        }];
    }

    // Scale before subtracting so extremes near f64::MAX stay finite.
    let n = nbins as f64;
    let width = max / n - min / n;
    let mut bins: Vec<HistogramBin> = (0..nbins)
        .map(|i| HistogramBin {
            start: min + i as f64 * width,
            end: min + (i + 1) as f64 * width,
            count: 0,
        })
        .collect();
    bins[nbins - 1].end = max;

    for v in values {
        let idx = ((v / width - min / width) as usize).min(nbins - 1);
        bins[idx].count += 1;
    }
    bins
}

// ---------------------------------------------------------------------------
// Scatter groups – (retweets, likes) per label
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterGroup {
    pub label: String,
    /// `[retweets, likes]` pairs.
    pub points: Vec<[f64; 2]>,
}

/// Collect `[retweets, likes]` points per label. Records without a label or
/// with either coordinate missing contribute no point.
pub fn scatter_groups<'a, I>(records: I) -> Vec<ScatterGroup>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut groups: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
    for r in records {
        if let (Some(label), Some(retweets), Some(likes)) =
            (r.sentiment.as_deref(), r.retweets, r.likes)
        {
            groups.entry(label).or_default().push([retweets, likes]);
        }
    }
    groups
        .into_iter()
        .map(|(label, points)| ScatterGroup {
            label: label.to_string(),
            points,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;

    use super::*;
    use crate::data::loader::to_datetime;

    fn rec(label: Option<&str>, likes: Option<f64>, ts: Option<&str>) -> Record {
        Record {
            sentiment: label.map(str::to_string),
            likes,
            retweets: likes.map(|l| l / 2.0),
            timestamp: ts.and_then(to_datetime),
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn scenario_positive_negative_counts() {
        // Likes "bad" coerces to missing but the label still counts.
        let records = vec![
            rec(Some("Positive"), Some(5.0), None),
            rec(Some("Negative"), None, None),
            rec(Some("Positive"), Some(3.0), None),
        ];
        let summary = summarize(&records);
        assert_eq!(summary.get("Positive"), 2);
        assert_eq!(summary.get("Negative"), 1);
        assert_eq!(summary.ranked().len(), 2);

        let bins = histogram(records.iter().filter_map(|r| r.likes), 30);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 2);
    }

    #[test]
    fn summarize_total_excludes_unlabelled() {
        let records = vec![
            rec(Some("Positive"), None, None),
            rec(None, Some(1.0), None),
            rec(Some("Neutral"), None, None),
            rec(Some("Neutral"), None, None),
            rec(None, None, None),
        ];
        let summary = summarize(&records);
        let unlabelled = records.iter().filter(|r| r.sentiment.is_none()).count();
        assert_eq!(summary.total(), records.len() - unlabelled);
    }

    #[test]
    fn summarize_empty_is_empty() {
        let summary = summarize(std::iter::empty::<&Record>());
        assert_eq!(summary, SentimentSummary::default());
        assert_eq!(summary.total(), 0);
        assert!(summary.ranked().is_empty());
    }

    #[test]
    fn ranked_orders_by_count_then_label() {
        let records = vec![
            rec(Some("Neutral"), None, None),
            rec(Some("Positive"), None, None),
            rec(Some("Positive"), None, None),
            rec(Some("Negative"), None, None),
        ];
        let summary = summarize(&records);
        assert_eq!(
            summary.ranked(),
            vec![("Positive", 2), ("Negative", 1), ("Neutral", 1)]
        );
    }

    #[test]
    fn by_time_is_dense_and_sorted() {
        let records = vec![
            rec(Some("Positive"), None, Some("2024-01-02 10:00:00")),
            rec(Some("Negative"), None, Some("2024-01-01 09:00:00")),
            rec(Some("Positive"), None, Some("2024-01-01 23:59:59")),
            rec(Some("Positive"), None, Some("2024-01-02 00:00:00")),
        ];
        let table = summarize_by_time(&records);
        assert_eq!(table.labels, ["Negative", "Positive"]);
        assert_eq!(
            table.rows,
            vec![
                (date("2024-01-01"), vec![1, 1]),
                (date("2024-01-02"), vec![0, 2]),
            ]
        );
        assert_eq!(
            table.series("Negative").unwrap(),
            vec![(date("2024-01-01"), 1), (date("2024-01-02"), 0)]
        );
        assert!(table.series("Neutral").is_none());
    }

    #[test]
    fn by_time_rows_sum_to_daily_counts() {
        let records = vec![
            rec(Some("Positive"), None, Some("2024-05-01 10:00:00")),
            rec(Some("Neutral"), None, Some("2024-05-01 11:00:00")),
            rec(Some("Negative"), None, Some("2024-05-03 12:00:00")),
            rec(Some("Neutral"), None, Some("2024-05-03 13:00:00")),
            rec(Some("Neutral"), None, Some("2024-05-03 14:00:00")),
        ];
        let table = summarize_by_time(&records);
        let labels: BTreeSet<String> = records.iter().filter_map(|r| r.sentiment.clone()).collect();
        assert_eq!(table.labels, labels.into_iter().collect::<Vec<_>>());

        for (day, counts) in &table.rows {
            let on_day = records
                .iter()
                .filter(|r| r.timestamp.map(|t: NaiveDateTime| t.date()) == Some(*day))
                .count();
            assert_eq!(counts.iter().sum::<usize>(), on_day);
        }
    }

    #[test]
    fn by_time_skips_missing_timestamps_and_labels() {
        let records = vec![
            rec(Some("Positive"), None, None),
            rec(None, None, Some("2024-01-01 10:00:00")),
            rec(Some("Negative"), None, Some("2024-01-01 10:00:00")),
        ];
        let table = summarize_by_time(&records);
        assert_eq!(table.labels, ["Negative"]);
        assert_eq!(table.rows, vec![(date("2024-01-01"), vec![1])]);
    }

    #[test]
    fn histogram_covers_min_and_max() {
        let bins = histogram(vec![0.0, 10.0, 5.0, 10.0], 10);
        assert_eq!(bins.len(), 10);
        assert_eq!(bins[0].start, 0.0);
        assert_eq!(bins[9].end, 10.0);
        assert_eq!(bins[0].count, 1);
        assert_eq!(bins[5].count, 1);
        assert_eq!(bins[9].count, 2);
    }

    #[test]
    fn histogram_degenerate_inputs() {
        assert!(histogram(Vec::new(), 30).is_empty());
        assert!(histogram(vec![1.0], 0).is_empty());
        let single = histogram(vec![4.0, 4.0], 30);
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].count, 2);
    }

    #[test]
    fn histogram_edges_stay_finite_at_extremes() {
        let bins = histogram(vec![-1e308, 1e308], 30);
        assert_eq!(bins.len(), 30);
        assert!(bins.iter().all(|b| b.start.is_finite() && b.end.is_finite()));
        assert_eq!(bins[0].start, -1e308);
        assert_eq!(bins[29].end, 1e308);
        assert_eq!(bins[0].count, 1);
        assert_eq!(bins[29].count, 1);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 2);
    }

    #[test]
    fn scatter_drops_incomplete_points() {
        let mut partial = rec(Some("Positive"), Some(4.0), None);
        partial.retweets = None;
        let records = vec![
            rec(Some("Positive"), Some(10.0), None),
            partial,
            rec(None, Some(6.0), None),
            rec(Some("Negative"), Some(2.0), None),
        ];
        let groups = scatter_groups(&records);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].label, "Negative");
        assert_eq!(groups[0].points, vec![[1.0, 2.0]]);
        assert_eq!(groups[1].label, "Positive");
        assert_eq!(groups[1].points, vec![[5.0, 10.0]]);
    }
}
