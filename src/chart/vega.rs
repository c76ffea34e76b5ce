//! Vega-Lite writer for [`ChartSpec`].
//!
//! The browser page hands each document straight to `vegaEmbed`, so every
//! chart carries its own inline data and a colour scale pinned to the
//! dashboard's [`ColorMap`](crate::color::ColorMap) assignments.

use serde_json::{json, Value};

use super::{ChartData, ChartSpec, ScatterSeries, Series, Slice};
use crate::color::Rgb;

const SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";
const CHART_HEIGHT: u32 = 320;

/// Render a chart specification as a Vega-Lite document.
pub fn to_vega_lite(spec: &ChartSpec) -> Value {
    let (mark, values, encoding) = match &spec.data {
        ChartData::Pie { slices } => (
            json!({ "type": "arc", "tooltip": true }),
            slice_values(slices),
            json!({
                "theta": { "field": "value", "type": "quantitative", "title": spec.y_label },
                "color": color_encoding(&spec.x_label, slice_colors(slices)),
            }),
        ),
        ChartData::Bar { bars } => (
            json!({ "type": "bar", "tooltip": true }),
            slice_values(bars),
            json!({
                "x": { "field": "label", "type": "nominal", "title": spec.x_label, "sort": null },
                "y": { "field": "value", "type": "quantitative", "title": spec.y_label },
                "color": color_encoding(&spec.x_label, slice_colors(bars)),
            }),
        ),
        ChartData::StackedBar { dates, series } => (
            json!({ "type": "bar", "tooltip": true }),
            series_values(dates, series),
            json!({
                "x": {
                    "field": "date",
                    "type": "temporal",
                    "timeUnit": "yearmonthdate",
                    "title": spec.x_label,
                },
                "y": {
                    "field": "value",
                    "type": "quantitative",
                    "stack": "zero",
                    "title": spec.y_label,
                },
                "color": color_encoding("Sentiment Category", series_colors(series)),
            }),
        ),
        ChartData::Line { dates, series } => (
            json!({ "type": "line", "point": true, "tooltip": true }),
            series_values(dates, series),
            json!({
                "x": { "field": "date", "type": "temporal", "title": spec.x_label },
                "y": { "field": "value", "type": "quantitative", "title": spec.y_label },
                "color": color_encoding("Sentiment Category", series_colors(series)),
            }),
        ),
        ChartData::Histogram { bins, color } => (
            json!({ "type": "bar", "color": color.to_hex(), "tooltip": true }),
            bins.iter()
                .map(|b| json!({ "start": b.start, "end": b.end, "count": b.count }))
                .collect(),
            json!({
                "x": {
                    "field": "start",
                    "bin": { "binned": true },
                    "type": "quantitative",
                    "title": spec.x_label,
                },
                "x2": { "field": "end" },
                "y": { "field": "count", "type": "quantitative", "title": spec.y_label },
            }),
        ),
        ChartData::Scatter { groups } => (
            json!({ "type": "point", "filled": true, "tooltip": true }),
            scatter_values(groups),
            json!({
                "x": { "field": "x", "type": "quantitative", "title": spec.x_label },
                "y": { "field": "y", "type": "quantitative", "title": spec.y_label },
                "color": color_encoding("Sentiment Category", scatter_colors(groups)),
            }),
        ),
    };

    json!({
        "$schema": SCHEMA,
        "title": spec.title,
        "width": "container",
        "height": CHART_HEIGHT,
        "data": { "values": values },
        "mark": mark,
        "encoding": encoding,
    })
}

fn color_encoding(title: &str, entries: Vec<(&str, Rgb)>) -> Value {
    let (domain, range): (Vec<&str>, Vec<String>) = entries
        .into_iter()
        .map(|(label, rgb)| (label, rgb.to_hex()))
        .unzip();
    json!({
        "field": "label",
        "type": "nominal",
        "title": title,
        "scale": { "domain": domain, "range": range },
    })
}

fn slice_values(slices: &[Slice]) -> Vec<Value> {
    slices
        .iter()
        .map(|s| json!({ "label": s.label, "value": s.value }))
        .collect()
}

fn slice_colors(slices: &[Slice]) -> Vec<(&str, Rgb)> {
    slices.iter().map(|s| (s.label.as_str(), s.color)).collect()
}

/// Long format: one `{date, label, value}` row per (date, series) cell.
fn series_values(dates: &[chrono::NaiveDate], series: &[Series]) -> Vec<Value> {
    series
        .iter()
        .flat_map(|s| {
            dates.iter().zip(&s.values).map(move |(date, value)| {
                json!({
                    "date": date.format("%Y-%m-%d").to_string(),
                    "label": s.label,
                    "value": value,
                })
            })
        })
        .collect()
}

fn series_colors(series: &[Series]) -> Vec<(&str, Rgb)> {
    series.iter().map(|s| (s.label.as_str(), s.color)).collect()
}

fn scatter_values(groups: &[ScatterSeries]) -> Vec<Value> {
    groups
        .iter()
        .flat_map(|g| {
            g.points
                .iter()
                .map(move |[x, y]| json!({ "x": x, "y": y, "label": g.label }))
        })
        .collect()
}

fn scatter_colors(groups: &[ScatterSeries]) -> Vec<(&str, Rgb)> {
    groups.iter().map(|g| (g.label.as_str(), g.color)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{bar_chart, histogram_chart, ChartId};
    use crate::color::ColorMap;
    use crate::data::aggregate::{histogram, SentimentSummary};

    #[test]
    fn bar_chart_keeps_ranked_order_and_colours() {
        let spec = ChartSpec {
            id: ChartId::SentimentInsights,
            title: "Sentiment Insights (All)".into(),
            x_label: "Sentiment Category".into(),
            y_label: "Tweet Count".into(),
            data: ChartData::Bar {
                bars: vec![
                    Slice {
                        label: "Positive".into(),
                        value: 3,
                        color: Rgb(0, 255, 0),
                    },
                    Slice {
                        label: "Negative".into(),
                        value: 1,
                        color: Rgb(255, 0, 0),
                    },
                ],
            },
        };
        let doc = to_vega_lite(&spec);
        assert_eq!(doc["mark"]["type"], "bar");
        assert_eq!(doc["title"], "Sentiment Insights (All)");
        assert_eq!(doc["data"]["values"][0], json!({ "label": "Positive", "value": 3 }));
        assert_eq!(doc["encoding"]["color"]["scale"]["range"], json!(["#00ff00", "#ff0000"]));
        assert_eq!(doc["encoding"]["y"]["title"], "Tweet Count");
    }

    #[test]
    fn empty_bar_chart_has_no_rows() {
        let colors = ColorMap::new(&Default::default());
        let doc = to_vega_lite(&bar_chart(&SentimentSummary::default(), "Neutral", &colors));
        assert_eq!(doc["data"]["values"], json!([]));
        assert_eq!(doc["encoding"]["color"]["scale"]["domain"], json!([]));
    }

    #[test]
    fn series_are_flattened_to_long_format() {
        let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let spec = ChartSpec {
            id: ChartId::SentimentTrend,
            title: "Sentiment Over Time".into(),
            x_label: "Timestamp".into(),
            y_label: "value".into(),
            data: ChartData::Line {
                dates: vec![date],
                series: vec![
                    Series {
                        label: "Negative".into(),
                        values: vec![0],
                        color: Rgb::GRAY,
                    },
                    Series {
                        label: "Positive".into(),
                        values: vec![4],
                        color: Rgb::GRAY,
                    },
                ],
            },
        };
        let doc = to_vega_lite(&spec);
        assert_eq!(doc["mark"]["type"], "line");
        assert_eq!(
            doc["data"]["values"],
            json!([
                { "date": "2024-01-01", "label": "Negative", "value": 0 },
                { "date": "2024-01-01", "label": "Positive", "value": 4 },
            ])
        );
    }

    #[test]
    fn histogram_uses_prebinned_edges() {
        let doc = to_vega_lite(&histogram_chart(histogram(vec![1.0, 2.0, 3.0], 2)));
        assert_eq!(doc["encoding"]["x"]["bin"]["binned"], true);
        assert_eq!(doc["data"]["values"].as_array().unwrap().len(), 2);
        assert_eq!(doc["data"]["values"][1]["count"], 2);
    }
}
