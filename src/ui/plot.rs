use std::f64::consts::TAU;
use std::ops::RangeInclusive;

use chrono::{Datelike, NaiveDate};
use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints, PlotUi, Points, Polygon,
};

use crate::chart::{ChartData, ChartSpec, ScatterSeries, Series, Slice};

pub const CHART_HEIGHT: f32 = 300.0;

/// Segments per full circle when drawing pie slices.
const PIE_RESOLUTION: usize = 120;

// ---------------------------------------------------------------------------
// ChartSpec → egui_plot
// ---------------------------------------------------------------------------

/// Render one chart: a title line followed by the plot.
pub fn chart(ui: &mut Ui, spec: &ChartSpec) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(RichText::new(&spec.title).strong());
        if spec.is_empty() {
            ui.weak("(no data)");
        }
    });

    let plot = Plot::new(spec.id.as_str())
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label(spec.x_label.clone())
        .y_axis_label(spec.y_label.clone())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true);

    match &spec.data {
        ChartData::Pie { slices } => {
            plot.data_aspect(1.0)
                .show_axes(false)
                .show_grid(false)
                .show(ui, |plot_ui| pie(plot_ui, slices));
        }
        ChartData::Bar { bars } => {
            let labels: Vec<String> = bars.iter().map(|b| b.label.clone()).collect();
            plot.x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
                category_label(&labels, mark.value)
            })
            .show(ui, |plot_ui| category_bars(plot_ui, bars));
        }
        ChartData::StackedBar { dates, series } => {
            plot.x_axis_formatter(date_axis)
                .show(ui, |plot_ui| stacked_bars(plot_ui, dates, series));
        }
        ChartData::Line { dates, series } => {
            plot.x_axis_formatter(date_axis)
                .show(ui, |plot_ui| lines(plot_ui, dates, series));
        }
        ChartData::Histogram { bins, color } => {
            plot.show(ui, |plot_ui| {
                let bars = bins
                    .iter()
                    .map(|b| {
                        Bar::new((b.start + b.end) / 2.0, b.count as f64)
                            .width(b.end - b.start)
                            .fill(color.to_color32())
                    })
                    .collect();
                plot_ui.bar_chart(BarChart::new(bars).name(&spec.x_label));
            });
        }
        ChartData::Scatter { groups } => {
            plot.show(ui, |plot_ui| scatter(plot_ui, groups));
        }
    }
}

// ---------------------------------------------------------------------------
// Axis helpers
// ---------------------------------------------------------------------------

fn date_to_x(date: &NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn date_axis(mark: GridMark, _range: &RangeInclusive<f64>) -> String {
    if mark.value.fract().abs() > f64::EPSILON {
        return String::new();
    }
    NaiveDate::from_num_days_from_ce_opt(mark.value as i32)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn category_label(labels: &[String], x: f64) -> String {
    if x.fract().abs() > f64::EPSILON || x < 0.0 {
        return String::new();
    }
    labels.get(x as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Chart kinds
// ---------------------------------------------------------------------------

fn pie(plot_ui: &mut PlotUi, slices: &[Slice]) {
    let total: usize = slices.iter().map(|s| s.value).sum();
    if total == 0 {
        return;
    }

    let mut start = 0.0;
    for slice in slices {
        let sweep = TAU * slice.value as f64 / total as f64;
        let steps = ((PIE_RESOLUTION as f64 * sweep / TAU).ceil() as usize).max(1);

        let mut outline = vec![[0.0, 0.0]];
        outline.extend((0..=steps).map(|i| {
            let angle = start + sweep * i as f64 / steps as f64;
            [angle.sin(), angle.cos()]
        }));

        let share = 100.0 * slice.value as f64 / total as f64;
        let polygon = Polygon::new(PlotPoints::from(outline))
            .name(format!("{} ({share:.1}%)", slice.label))
            .fill_color(slice.color.to_color32())
            .stroke(Stroke::new(1.0, Color32::WHITE));
        plot_ui.polygon(polygon);

        start += sweep;
    }
}

fn category_bars(plot_ui: &mut PlotUi, bars: &[Slice]) {
    for (i, slice) in bars.iter().enumerate() {
        let bar = Bar::new(i as f64, slice.value as f64)
            .width(0.6)
            .fill(slice.color.to_color32());
        plot_ui.bar_chart(
            BarChart::new(vec![bar])
                .name(&slice.label)
                .color(slice.color.to_color32()),
        );
    }
}

fn stacked_bars(plot_ui: &mut PlotUi, dates: &[NaiveDate], series: &[Series]) {
    let mut charts: Vec<BarChart> = Vec::with_capacity(series.len());
    for s in series {
        let bars = dates
            .iter()
            .zip(&s.values)
            .map(|(date, &count)| Bar::new(date_to_x(date), count as f64).width(0.8))
            .collect();
        let below: Vec<&BarChart> = charts.iter().collect();
        let chart = BarChart::new(bars)
            .name(&s.label)
            .color(s.color.to_color32())
            .stack_on(&below);
        charts.push(chart);
    }
    for chart in charts {
        plot_ui.bar_chart(chart);
    }
}

fn lines(plot_ui: &mut PlotUi, dates: &[NaiveDate], series: &[Series]) {
    for s in series {
        let points: PlotPoints = dates
            .iter()
            .zip(&s.values)
            .map(|(date, &count)| [date_to_x(date), count as f64])
            .collect();
        plot_ui.line(
            Line::new(points)
                .name(&s.label)
                .color(s.color.to_color32())
                .width(1.5),
        );
    }
}

fn scatter(plot_ui: &mut PlotUi, groups: &[ScatterSeries]) {
    for g in groups {
        let points: PlotPoints = g.points.iter().copied().collect();
        plot_ui.points(
            Points::new(points)
                .name(&g.label)
                .color(g.color.to_color32())
                .radius(2.5),
        );
    }
}
