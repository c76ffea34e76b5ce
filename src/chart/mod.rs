//! Chart layer: renderer-neutral chart specifications.
//!
//! Architecture:
//! ```text
//!   summaries (data::aggregate)
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ builders  │  summary + ColorMap → ChartSpec
//!   └──────────┘
//!        │
//!        ├──────────────► ui::plot   (egui_plot, native window)
//!        ▼
//!   ┌──────────┐
//!   │   vega    │  ChartSpec → Vega-Lite JSON (browser)
//!   └──────────┘
//! ```

pub mod vega;

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use crate::color::{ColorMap, Rgb};
use crate::data::aggregate::{HistogramBin, ScatterGroup, SentimentSummary, TimeSentimentSummary};

// ---------------------------------------------------------------------------
// Chart identifiers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartId {
    SentimentDistribution,
    SentimentOverTime,
    LikesDistribution,
    RetweetsVsLikes,
    SentimentTrend,
    SentimentInsights,
}

impl ChartId {
    /// Charts computed once at startup, in layout order.
    pub const STATIC: [ChartId; 5] = [
        ChartId::SentimentDistribution,
        ChartId::SentimentOverTime,
        ChartId::LikesDistribution,
        ChartId::RetweetsVsLikes,
        ChartId::SentimentTrend,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ChartId::SentimentDistribution => "sentiment-distribution",
            ChartId::SentimentOverTime => "sentiment-over-time",
            ChartId::LikesDistribution => "likes-distribution",
            ChartId::RetweetsVsLikes => "retweets-vs-likes",
            ChartId::SentimentTrend => "sentiment-trend",
            ChartId::SentimentInsights => "sentiment-insights",
        }
    }
}

impl fmt::Display for ChartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown chart '{0}'")]
pub struct UnknownChart(pub String);

impl FromStr for ChartId {
    type Err = UnknownChart;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartId::STATIC
            .into_iter()
            .chain(std::iter::once(ChartId::SentimentInsights))
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownChart(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// ChartSpec
// ---------------------------------------------------------------------------

/// One category and its count, e.g. a pie slice or a bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    pub label: String,
    pub value: usize,
    pub color: Rgb,
}

/// A per-label count series aligned with a shared date axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub label: String,
    pub values: Vec<usize>,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterSeries {
    pub label: String,
    pub points: Vec<[f64; 2]>,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartData {
    Pie { slices: Vec<Slice> },
    Bar { bars: Vec<Slice> },
    /// Bars over time, one stacked segment per label.
    StackedBar {
        dates: Vec<NaiveDate>,
        series: Vec<Series>,
    },
    Line {
        dates: Vec<NaiveDate>,
        series: Vec<Series>,
    },
    Histogram {
        bins: Vec<HistogramBin>,
        color: Rgb,
    },
    Scatter {
        groups: Vec<ScatterSeries>,
    },
}

/// A renderable chart: kind, data and axis bindings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub id: ChartId,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub data: ChartData,
}

impl ChartSpec {
    /// Whether the chart has nothing to draw.
    pub fn is_empty(&self) -> bool {
        match &self.data {
            ChartData::Pie { slices } => slices.is_empty(),
            ChartData::Bar { bars } => bars.is_empty(),
            ChartData::StackedBar { dates, .. } | ChartData::Line { dates, .. } => dates.is_empty(),
            ChartData::Histogram { bins, .. } => bins.is_empty(),
            ChartData::Scatter { groups } => groups.iter().all(|g| g.points.is_empty()),
        }
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

fn slices(summary: &SentimentSummary, colors: &ColorMap) -> Vec<Slice> {
    summary
        .ranked()
        .into_iter()
        .map(|(label, value)| Slice {
            label: label.to_string(),
            value,
            color: colors.color_for(label),
        })
        .collect()
}

fn series(table: &TimeSentimentSummary, colors: &ColorMap) -> (Vec<NaiveDate>, Vec<Series>) {
    let dates = table.dates().collect();
    let series = table
        .labels
        .iter()
        .map(|label| Series {
            label: label.clone(),
            values: table
                .series(label)
                .unwrap_or_default()
                .into_iter()
                .map(|(_, count)| count)
                .collect(),
            color: colors.color_for(label),
        })
        .collect();
    (dates, series)
}

/// Proportion of each sentiment.
pub fn pie_chart(summary: &SentimentSummary, colors: &ColorMap) -> ChartSpec {
    ChartSpec {
        id: ChartId::SentimentDistribution,
        title: "Sentiment Distribution".into(),
        x_label: "Sentiment".into(),
        y_label: "Count".into(),
        data: ChartData::Pie {
            slices: slices(summary, colors),
        },
    }
}

/// Daily counts per sentiment, stacked.
pub fn stacked_bar_chart(table: &TimeSentimentSummary, colors: &ColorMap) -> ChartSpec {
    let (dates, series) = series(table, colors);
    ChartSpec {
        id: ChartId::SentimentOverTime,
        title: "Sentiment Distribution Over Time".into(),
        x_label: "Timestamp".into(),
        y_label: "Count".into(),
        data: ChartData::StackedBar { dates, series },
    }
}

/// Distribution of like counts.
pub fn histogram_chart(bins: Vec<HistogramBin>) -> ChartSpec {
    ChartSpec {
        id: ChartId::LikesDistribution,
        title: "Likes Distribution".into(),
        x_label: "Likes".into(),
        y_label: "count".into(),
        data: ChartData::Histogram {
            bins,
            color: Rgb::STEEL_BLUE,
        },
    }
}

/// Retweets against likes, coloured by sentiment.
pub fn scatter_chart(groups: Vec<ScatterGroup>, colors: &ColorMap) -> ChartSpec {
    let groups = groups
        .into_iter()
        .map(|g| ScatterSeries {
            color: colors.color_for(&g.label),
            label: g.label,
            points: g.points,
        })
        .collect();
    ChartSpec {
        id: ChartId::RetweetsVsLikes,
        title: "Retweets vs Likes by Sentiment".into(),
        x_label: "Retweets".into(),
        y_label: "Likes".into(),
        data: ChartData::Scatter { groups },
    }
}

/// Daily counts per sentiment as lines.
pub fn line_chart(table: &TimeSentimentSummary, colors: &ColorMap) -> ChartSpec {
    let (dates, series) = series(table, colors);
    ChartSpec {
        id: ChartId::SentimentTrend,
        title: "Sentiment Over Time".into(),
        x_label: "Timestamp".into(),
        y_label: "value".into(),
        data: ChartData::Line { dates, series },
    }
}

/// Sentiment counts for the current filter selection.
pub fn bar_chart(summary: &SentimentSummary, selection: &str, colors: &ColorMap) -> ChartSpec {
    ChartSpec {
        id: ChartId::SentimentInsights,
        title: format!("Sentiment Insights ({selection})"),
        x_label: "Sentiment Category".into(),
        y_label: "Tweet Count".into(),
        data: ChartData::Bar {
            bars: slices(summary, colors),
        },
    }
}
