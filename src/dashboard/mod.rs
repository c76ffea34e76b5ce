//! The dashboard context: the loaded dataset plus everything derived from it
//! at startup, and the handler that rebuilds the one dynamic chart.

pub mod layout;

use std::collections::BTreeMap;

use crate::chart::{self, ChartId, ChartSpec};
use crate::color::ColorMap;
use crate::data::aggregate::{
    histogram, scatter_groups, summarize, summarize_by_time, SentimentSummary,
};
use crate::data::filter::filtered_records;
use crate::data::model::{Dataset, SentimentFilter};

pub use layout::Layout;

/// Number of bins in the likes histogram.
pub const LIKES_BINS: usize = 30;

/// Immutable dashboard context, built once from the dataset.
#[derive(Debug, Clone)]
pub struct Dashboard {
    dataset: Dataset,
    summary: SentimentSummary,
    colors: ColorMap,
    charts: BTreeMap<ChartId, ChartSpec>,
    layout: Layout,
}

impl Dashboard {
    /// Derive the static charts and the layout from the dataset.
    pub fn build(dataset: Dataset) -> Self {
        let colors = ColorMap::new(&dataset.labels());
        let records = dataset.records();

        let summary = summarize(records);
        let by_time = summarize_by_time(records);
        let likes = histogram(records.iter().filter_map(|r| r.likes), LIKES_BINS);
        let static_charts = [
            chart::pie_chart(&summary, &colors),
            chart::stacked_bar_chart(&by_time, &colors),
            chart::histogram_chart(likes),
            chart::scatter_chart(scatter_groups(records), &colors),
            chart::line_chart(&by_time, &colors),
        ];
        let charts = static_charts.into_iter().map(|c| (c.id, c)).collect();

        if dataset.is_empty() {
            log::warn!("Dataset has no records; every chart will be empty");
        }
        log::info!(
            "Dashboard built: {} records ({} labelled), {} days, labels {:?}",
            dataset.len(),
            summary.total(),
            by_time.rows.len(),
            by_time.labels
        );

        Dashboard {
            dataset,
            summary,
            colors,
            charts,
            layout: Layout::compose(),
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Label counts over the whole dataset.
    pub fn summary(&self) -> &SentimentSummary {
        &self.summary
    }

    pub fn colors(&self) -> &ColorMap {
        &self.colors
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// A chart computed at startup. The dynamic chart is not stored here.
    pub fn chart(&self, id: ChartId) -> Option<&ChartSpec> {
        self.charts.get(&id)
    }

    /// Static charts in layout order.
    pub fn static_charts(&self) -> impl Iterator<Item = &ChartSpec> {
        ChartId::STATIC.into_iter().filter_map(|id| self.charts.get(&id))
    }

    /// Rebuild the sentiment insights chart for `filter`.
    ///
    /// Always recomputes from the dataset. A label with no matching records
    /// yields a bar chart with no bars.
    pub fn update_insights(&self, filter: &SentimentFilter) -> ChartSpec {
        let summary = summarize(filtered_records(&self.dataset, filter));
        log::debug!(
            "Insights for {filter}: {} of {} records",
            summary.total(),
            self.dataset.len()
        );
        chart::bar_chart(&summary, filter.as_str(), &self.colors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartData;
    use crate::data::loader::to_datetime;
    use crate::data::model::Record;

    fn rec(label: &str, likes: Option<f64>, ts: &str) -> Record {
        Record {
            sentiment: Some(label.to_string()),
            likes,
            retweets: likes.map(|l| l + 1.0),
            timestamp: to_datetime(ts),
        }
    }

    fn dashboard() -> Dashboard {
        Dashboard::build(Dataset::from_records(vec![
            rec("Positive", Some(5.0), "2024-01-01 09:00:00"),
            rec("Negative", None, "2024-01-01 10:00:00"),
            rec("Positive", Some(3.0), "2024-01-02 11:00:00"),
        ]))
    }

    fn bars(chart: &ChartSpec) -> Vec<(String, usize)> {
        match &chart.data {
            ChartData::Bar { bars } => bars.iter().map(|b| (b.label.clone(), b.value)).collect(),
            other => panic!("expected bar chart, got {other:?}"),
        }
    }

    #[test]
    fn all_static_charts_are_built() {
        let dash = dashboard();
        let ids: Vec<ChartId> = dash.static_charts().map(|c| c.id).collect();
        assert_eq!(ids, ChartId::STATIC);
        assert!(dash.chart(ChartId::SentimentInsights).is_none());
    }

    #[test]
    fn all_matches_full_summary() {
        let dash = dashboard();
        let chart = dash.update_insights(&SentimentFilter::All);
        assert_eq!(chart.title, "Sentiment Insights (All)");
        assert_eq!(
            bars(&chart),
            vec![("Positive".to_string(), 2), ("Negative".to_string(), 1)]
        );

        let full = summarize(dash.dataset().records());
        assert_eq!(dash.summary(), &full);
        let expected: Vec<(String, usize)> =
            full.ranked().into_iter().map(|(l, c)| (l.to_string(), c)).collect();
        assert_eq!(bars(&chart), expected);
    }

    #[test]
    fn label_filter_counts_only_that_label() {
        let chart = dashboard().update_insights(&SentimentFilter::Label("Negative".into()));
        assert_eq!(chart.title, "Sentiment Insights (Negative)");
        assert_eq!(bars(&chart), vec![("Negative".to_string(), 1)]);
    }

    #[test]
    fn absent_label_gives_empty_chart() {
        let chart = dashboard().update_insights(&SentimentFilter::Label("Neutral".into()));
        assert!(chart.is_empty());
        assert_eq!(chart.title, "Sentiment Insights (Neutral)");
    }

    #[test]
    fn update_is_idempotent_and_leaves_static_charts_alone() {
        let dash = dashboard();
        let before: Vec<ChartSpec> = dash.static_charts().cloned().collect();
        let filter = SentimentFilter::Label("Positive".into());
        let first = dash.update_insights(&filter);
        let second = dash.update_insights(&filter);
        assert_eq!(first, second);
        let after: Vec<ChartSpec> = dash.static_charts().cloned().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn empty_dataset_builds_empty_charts() {
        let dash = Dashboard::build(Dataset::from_records(Vec::new()));
        assert_eq!(dash.summary().total(), 0);
        assert!(dash.static_charts().all(|c| c.is_empty()));
        assert!(dash.update_insights(&SentimentFilter::All).is_empty());
    }

    #[test]
    fn missing_likes_are_left_out_of_histogram() {
        let dash = dashboard();
        let chart = dash.chart(ChartId::LikesDistribution).unwrap();
        let ChartData::Histogram { bins, .. } = &chart.data else {
            panic!("expected histogram");
        };
        assert_eq!(bins.len(), LIKES_BINS);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 2);
    }
}
