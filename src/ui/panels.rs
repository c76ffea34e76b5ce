use std::sync::Arc;

use eframe::egui::{self, RichText, Ui};
use egui_extras::{Size, StripBuilder};

use crate::dashboard::layout::{Cell, Region, Row, GRID_COLUMNS};
use crate::data::model::SentimentFilter;
use crate::state::AppState;

use super::plot;

const CHART_ROW_HEIGHT: f32 = plot::CHART_HEIGHT + 40.0;
const FILTER_ROW_HEIGHT: f32 = 60.0;
const ROW_SPACING: f32 = 16.0;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the dashboard title and dataset counters.
pub fn top_bar(ui: &mut Ui, state: &AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(&state.dashboard.layout().title);
    });
    ui.horizontal(|ui: &mut Ui| {
        ui.label(format!(
            "{} tweets loaded, {} match \"{}\"",
            state.dashboard.dataset().len(),
            state.visible_indices.len(),
            state.filter
        ));
        ui.separator();
        let summary = state.dashboard.summary();
        for (label, color) in state.dashboard.colors().legend_entries() {
            let text = format!("{label} ({})", summary.get(&label));
            ui.label(RichText::new(text).color(color.to_color32()));
        }
    });
}

// ---------------------------------------------------------------------------
// Dashboard grid
// ---------------------------------------------------------------------------

/// Render every layout row, top to bottom.
pub fn dashboard_grid(ui: &mut Ui, state: &mut AppState) {
    let dashboard = Arc::clone(&state.dashboard);
    for row in &dashboard.layout().rows {
        grid_row(ui, row, state);
        ui.add_space(ROW_SPACING);
    }
}

fn row_height(row: &Row) -> f32 {
    let only_filter = row
        .cells
        .iter()
        .all(|c| matches!(c.region, Region::Filter { .. }));
    if only_filter {
        FILTER_ROW_HEIGHT
    } else {
        CHART_ROW_HEIGHT
    }
}

fn grid_row(ui: &mut Ui, row: &Row, state: &mut AppState) {
    let used: u8 = row.cells.iter().map(|c| c.width).sum();
    let size = egui::vec2(ui.available_width(), row_height(row));

    ui.allocate_ui(size, |ui: &mut Ui| {
        let mut builder = StripBuilder::new(ui);
        for cell in &row.cells {
            builder = builder.size(Size::relative(cell.width as f32 / GRID_COLUMNS as f32));
        }
        if used < GRID_COLUMNS {
            builder = builder.size(Size::remainder());
        }
        builder.horizontal(|mut strip| {
            for cell in &row.cells {
                strip.cell(|ui: &mut Ui| region(ui, cell, state));
            }
            if used < GRID_COLUMNS {
                strip.empty();
            }
        });
    });
}

fn region(ui: &mut Ui, cell: &Cell, state: &mut AppState) {
    match &cell.region {
        Region::Chart { chart } => match state.dashboard.chart(*chart) {
            Some(spec) => plot::chart(ui, spec),
            None => {
                ui.label(format!("Chart '{chart}' is unavailable"));
            }
        },
        Region::Filter {
            label, options, ..
        } => filter_dropdown(ui, label, options, state),
        Region::Dynamic { .. } => plot::chart(ui, &state.insights),
    }
}

// ---------------------------------------------------------------------------
// Filter control
// ---------------------------------------------------------------------------

/// The sentiment dropdown. Every click is dispatched to [`AppState::select`].
fn filter_dropdown(ui: &mut Ui, label: &str, options: &[SentimentFilter], state: &mut AppState) {
    ui.label(label);

    let mut picked: Option<SentimentFilter> = None;
    egui::ComboBox::from_id_salt("sentiment_filter")
        .selected_text(state.filter.to_string())
        .width(ui.available_width() * 0.9)
        .show_ui(ui, |ui: &mut Ui| {
            for option in options {
                if ui
                    .selectable_label(state.filter == *option, option.to_string())
                    .clicked()
                {
                    picked = Some(option.clone());
                }
            }
        });

    if let Some(filter) = picked {
        state.select(filter);
    }
}
