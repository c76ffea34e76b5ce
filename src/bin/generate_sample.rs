use std::sync::Arc;

use arrow::array::StringArray;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Duration, NaiveDate};
use parquet::arrow::ArrowWriter;

const HEADERS: [&str; 5] = ["Text", "Sentiment Category", "Likes", "Retweets", "Timestamp"];
const LABELS: [&str; 3] = ["Positive", "Negative", "Neutral"];
const DAYS: i64 = 21;
const TWEETS: usize = 600;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    /// Heavy-tailed engagement count: most tweets get a few, some go viral.
    fn engagement(&mut self, scale: f64) -> u64 {
        let u = self.next_f64().max(1e-9);
        (scale * (1.0 / u - 1.0)).min(50_000.0) as u64
    }
}

/// Generate the sample table as rows of text cells.
fn generate_rows(rng: &mut SimpleRng) -> Vec<[String; 5]> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid start date");

    (0..TWEETS)
        .map(|i| {
            // Skew the mix so the pie chart is not uniform.
            let label = match rng.below(10) {
                0..=4 => LABELS[0],
                5..=7 => LABELS[1],
                _ => LABELS[2],
            };
            let likes = rng.engagement(if label == "Positive" { 40.0 } else { 15.0 });
            let retweets = likes / 4 + rng.below(5);
            let offset = Duration::minutes(rng.below((DAYS * 24 * 60) as u64) as i64);
            let timestamp = (start + offset).format("%Y-%m-%d %H:%M:%S").to_string();

            // Sprinkle malformed cells the loader must tolerate.
            let likes = if i % 97 == 0 { "N/A".to_string() } else { likes.to_string() };
            let retweets = if i % 89 == 0 { String::new() } else { retweets.to_string() };
            let timestamp = if i % 113 == 0 { "unknown".to_string() } else { timestamp };

            [
                format!("sample tweet #{i}"),
                label.to_string(),
                likes,
                retweets,
                timestamp,
            ]
        })
        .collect()
}

fn write_csv(path: &str, rows: &[[String; 5]]) -> csv::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(HEADERS)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &str, rows: &[[String; 5]]) {
    let schema = Arc::new(Schema::new(
        HEADERS
            .iter()
            .map(|name| Field::new(*name, DataType::Utf8, true))
            .collect::<Vec<_>>(),
    ));

    let columns = (0..HEADERS.len())
        .map(|col| {
            let values: Vec<&str> = rows.iter().map(|r| r[col].as_str()).collect();
            Arc::new(StringArray::from(values)) as arrow::array::ArrayRef
        })
        .collect();

    let batch =
        RecordBatch::try_new(schema.clone(), columns).expect("Failed to create RecordBatch");

    let file = std::fs::File::create(path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");
}

fn main() {
    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_tweets.csv".to_string());

    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(&mut rng);

    if output_path.ends_with(".parquet") || output_path.ends_with(".pq") {
        write_parquet(&output_path, &rows);
    } else {
        write_csv(&output_path, &rows).expect("Failed to write CSV");
    }

    println!("Wrote {} tweets over {DAYS} days to {output_path}", rows.len());
}
