use std::sync::Arc;

use crate::chart::ChartSpec;
use crate::dashboard::Dashboard;
use crate::data::filter::filtered_indices;
use crate::data::model::SentimentFilter;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The viewer's UI state, independent of rendering.
///
/// Owns the single mutable [`SentimentFilter`]; everything else is read from
/// the shared [`Dashboard`].
pub struct AppState {
    pub dashboard: Arc<Dashboard>,

    /// Current dropdown selection.
    pub filter: SentimentFilter,

    /// Chart for the current selection, replaced on every selection event.
    pub insights: ChartSpec,

    /// Indices of records passing the current filter.
    pub visible_indices: Vec<usize>,
}

impl AppState {
    pub fn new(dashboard: Arc<Dashboard>) -> Self {
        let filter = SentimentFilter::default();
        let insights = dashboard.update_insights(&filter);
        let visible_indices = filtered_indices(dashboard.dataset(), &filter);
        Self {
            dashboard,
            filter,
            insights,
            visible_indices,
        }
    }

    /// Handle a dropdown selection: store it and rebuild the insights chart.
    pub fn select(&mut self, filter: SentimentFilter) {
        log::debug!("Filter changed: {} -> {}", self.filter, filter);
        self.insights = self.dashboard.update_insights(&filter);
        self.visible_indices = filtered_indices(self.dashboard.dataset(), &filter);
        self.filter = filter;
    }
}
