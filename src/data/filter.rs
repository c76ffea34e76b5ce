use super::model::{Dataset, Record, SentimentFilter};

// ---------------------------------------------------------------------------
// Subset selection for the dynamic chart
// ---------------------------------------------------------------------------

/// Return the records passing `filter`, in dataset order.
///
/// * `SentimentFilter::All` → every record, including unlabelled ones
/// * `SentimentFilter::Label(l)` → records whose label equals `l` exactly
pub fn filtered_records<'a>(dataset: &'a Dataset, filter: &SentimentFilter) -> Vec<&'a Record> {
    dataset
        .records()
        .iter()
        .filter(|r| filter.matches(r))
        .collect()
}

/// Return indices of the records passing `filter`.
pub fn filtered_indices(dataset: &Dataset, filter: &SentimentFilter) -> Vec<usize> {
    dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, r)| filter.matches(r))
        .map(|(i, _)| i)
        .collect()
}
