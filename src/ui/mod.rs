//! egui rendering of the dashboard: layout panels and chart plots.

pub mod panels;
pub mod plot;
