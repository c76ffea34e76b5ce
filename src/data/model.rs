use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Column names the loader depends on
// ---------------------------------------------------------------------------

pub const SENTIMENT_COLUMN: &str = "Sentiment Category";
pub const LIKES_COLUMN: &str = "Likes";
pub const RETWEETS_COLUMN: &str = "Retweets";
pub const TIMESTAMP_COLUMN: &str = "Timestamp";

/// The fixed sentiment labels offered by the filter control.
pub const SENTIMENT_LABELS: [&str; 3] = ["Positive", "Negative", "Neutral"];

// ---------------------------------------------------------------------------
// Record – one row of the source table
// ---------------------------------------------------------------------------

/// A single tweet. `None` marks a cell that was empty or failed coercion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub sentiment: Option<String>,
    pub likes: Option<f64>,
    pub retweets: Option<f64>,
    pub timestamp: Option<NaiveDateTime>,
}

impl Record {
    /// Whether this record carries the given sentiment label.
    pub fn has_label(&self, label: &str) -> bool {
        self.sentiment.as_deref() == Some(label)
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The loaded records. Built once by the loader and only read afterwards.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn from_records(records: Vec<Record>) -> Self {
        Dataset { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted set of distinct sentiment labels present in the data.
    pub fn labels(&self) -> BTreeSet<String> {
        self.records
            .iter()
            .filter_map(|r| r.sentiment.clone())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// SentimentFilter – the single piece of user-controlled state
// ---------------------------------------------------------------------------

/// Which record subset feeds the dynamic chart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SentimentFilter {
    #[default]
    All,
    Label(String),
}

impl SentimentFilter {
    pub const ALL: &'static str = "All";

    /// The dropdown options in display order: the fixed labels, then "All".
    pub fn options() -> Vec<SentimentFilter> {
        SENTIMENT_LABELS
            .iter()
            .map(|l| SentimentFilter::Label((*l).to_string()))
            .chain(std::iter::once(SentimentFilter::All))
            .collect()
    }

    /// Does the record pass this filter?
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            SentimentFilter::All => true,
            SentimentFilter::Label(label) => record.has_label(label),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SentimentFilter::All => Self::ALL,
            SentimentFilter::Label(label) => label,
        }
    }
}

impl fmt::Display for SentimentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sentiment option '{0}' (expected one of Positive, Negative, Neutral, All)")]
pub struct UnknownSentiment(pub String);

impl FromStr for SentimentFilter {
    type Err = UnknownSentiment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == Self::ALL {
            return Ok(SentimentFilter::All);
        }
        if SENTIMENT_LABELS.contains(&s) {
            return Ok(SentimentFilter::Label(s.to_string()));
        }
        Err(UnknownSentiment(s.to_string()))
    }
}

impl TryFrom<String> for SentimentFilter {
    type Error = UnknownSentiment;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SentimentFilter> for String {
    fn from(filter: SentimentFilter) -> Self {
        filter.as_str().to_string()
    }
}
