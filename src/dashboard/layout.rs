use serde::Serialize;

use crate::chart::ChartId;
use crate::data::model::SentimentFilter;

pub const DASHBOARD_TITLE: &str = "Sentiment Analysis Dashboard";
pub const FILTER_LABEL: &str = "Select Sentiment Category:";

/// Grid columns per row.
pub const GRID_COLUMNS: u8 = 12;

// ---------------------------------------------------------------------------
// Layout – fixed grid of regions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Region {
    /// A chart computed once at startup.
    Chart { chart: ChartId },
    /// The sentiment dropdown.
    Filter {
        label: String,
        options: Vec<SentimentFilter>,
        default: SentimentFilter,
    },
    /// Placeholder replaced on every filter change.
    Dynamic { chart: ChartId },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    /// Width in grid columns (out of [`GRID_COLUMNS`]).
    pub width: u8,
    pub region: Region,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: String,
    pub rows: Vec<Row>,
}

fn chart(width: u8, chart: ChartId) -> Cell {
    Cell {
        width,
        region: Region::Chart { chart },
    }
}

impl Layout {
    /// The dashboard grid: two paired rows, a full-width trend, the filter,
    /// then the full-width dynamic chart.
    pub fn compose() -> Self {
        let rows = vec![
            Row {
                cells: vec![
                    chart(6, ChartId::SentimentDistribution),
                    chart(6, ChartId::SentimentOverTime),
                ],
            },
            Row {
                cells: vec![
                    chart(6, ChartId::LikesDistribution),
                    chart(6, ChartId::RetweetsVsLikes),
                ],
            },
            Row {
                cells: vec![chart(12, ChartId::SentimentTrend)],
            },
            Row {
                cells: vec![Cell {
                    width: 4,
                    region: Region::Filter {
                        label: FILTER_LABEL.to_string(),
                        options: SentimentFilter::options(),
                        default: SentimentFilter::default(),
                    },
                }],
            },
            Row {
                cells: vec![Cell {
                    width: 12,
                    region: Region::Dynamic {
                        chart: ChartId::SentimentInsights,
                    },
                }],
            },
        ];

        Layout {
            title: DASHBOARD_TITLE.to_string(),
            rows,
        }
    }
}
