use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, AsArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{
    Dataset, LIKES_COLUMN, Record, RETWEETS_COLUMN, SENTIMENT_COLUMN, TIMESTAMP_COLUMN,
};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a tweet dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with `Sentiment Category`, `Likes`, `Retweets`, `Timestamp`
/// * `.json`    – `[{ "Sentiment Category": "...", "Likes": 3, ... }, ...]`
/// * `.parquet` – the same four columns, any scalar type
///
/// Cells that cannot be coerced become `None`; only I/O problems and missing
/// columns fail the load.
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log_coercion_stats(&dataset);
    Ok(dataset)
}

fn log_coercion_stats(dataset: &Dataset) {
    let records = dataset.records();
    let missing = |f: fn(&Record) -> bool| records.iter().filter(|r| f(r)).count();
    log::debug!(
        "Missing values: sentiment={} likes={} retweets={} timestamp={}",
        missing(|r| r.sentiment.is_none()),
        missing(|r| r.likes.is_none()),
        missing(|r| r.retweets.is_none()),
        missing(|r| r.timestamp.is_none()),
    );
}

// ---------------------------------------------------------------------------
// Cell coercion
// ---------------------------------------------------------------------------

/// Parse a numeric cell. Unparsable or non-finite values are missing.
pub fn to_numeric(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Parse a timestamp cell. Offsets are dropped, keeping the wall-clock time.
pub fn to_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(dt.naive_local());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Cell texts read as missing rather than as a label. Matched exactly.
const MISSING_MARKERS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// A label cell: empty or a missing marker means missing, anything else is
/// kept verbatim.
pub fn to_label(s: &str) -> Option<String> {
    if MISSING_MARKERS.contains(&s) {
        None
    } else {
        Some(s.to_string())
    }
}

fn record_from_cells(
    sentiment: Option<&str>,
    likes: Option<&str>,
    retweets: Option<&str>,
    timestamp: Option<&str>,
) -> Record {
    Record {
        sentiment: sentiment.and_then(to_label),
        likes: likes.and_then(to_numeric),
        retweets: retweets.and_then(to_numeric),
        timestamp: timestamp.and_then(to_datetime),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names; extra columns are ignored.
/// Short rows are accepted and their absent cells count as missing.
fn load_csv(path: &Path) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;
    let headers = reader.headers().context("reading CSV headers")?.clone();

    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .with_context(|| format!("CSV missing '{name}' column"))
    };
    let sentiment_idx = column(SENTIMENT_COLUMN)?;
    let likes_idx = column(LIKES_COLUMN)?;
    let retweets_idx = column(RETWEETS_COLUMN)?;
    let timestamp_idx = column(TIMESTAMP_COLUMN)?;

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;
        records.push(record_from_cells(
            row.get(sentiment_idx),
            row.get(likes_idx),
            row.get(retweets_idx),
            row.get(timestamp_idx),
        ));
    }

    Ok(Dataset::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Sentiment Category": "Positive", "Likes": 12, "Retweets": 3,
///     "Timestamp": "2024-01-15 10:30:00" },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let cell = |name: &str| obj.get(name).and_then(json_cell_text);
        records.push(record_from_cells(
            cell(SENTIMENT_COLUMN).as_deref(),
            cell(LIKES_COLUMN).as_deref(),
            cell(RETWEETS_COLUMN).as_deref(),
            cell(TIMESTAMP_COLUMN).as_deref(),
        ));
    }

    Ok(Dataset::from_records(records))
}

/// Render a JSON scalar as the text a CSV cell would have held.
fn json_cell_text(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        JsonValue::Null | JsonValue::Array(_) | JsonValue::Object(_) => None,
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file. Each of the four columns is cast to UTF-8 and then
/// coerced like a CSV cell, so numeric, string, date and timestamp physical
/// types are all accepted.
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let text_column = |name: &str| -> Result<Vec<Option<String>>> {
            let idx = schema
                .index_of(name)
                .map_err(|_| anyhow::anyhow!("Parquet file missing '{name}' column"))?;
            let as_text = cast(batch.column(idx), &DataType::Utf8)
                .with_context(|| format!("casting '{name}' to text"))?;
            let strings = as_text.as_string::<i32>();
            Ok((0..strings.len())
                .map(|row| (!strings.is_null(row)).then(|| strings.value(row).to_string()))
                .collect())
        };

        let sentiment = text_column(SENTIMENT_COLUMN)?;
        let likes = text_column(LIKES_COLUMN)?;
        let retweets = text_column(RETWEETS_COLUMN)?;
        let timestamp = text_column(TIMESTAMP_COLUMN)?;

        for row in 0..batch.num_rows() {
            records.push(record_from_cells(
                sentiment[row].as_deref(),
                likes[row].as_deref(),
                retweets[row].as_deref(),
                timestamp[row].as_deref(),
            ));
        }
    }

    Ok(Dataset::from_records(records))
}
