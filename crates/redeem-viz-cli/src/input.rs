use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use ndarray::{Array, ArrayD, IxDyn};
use redeem_viz::TimerRecord;

use crate::util::{validate_input_file, validate_tsv_or_csv_file};

/// Load a JSON object of stage label to seconds, keeping the file's key order.
pub fn load_timer_record<P: AsRef<Path>>(path: P) -> Result<TimerRecord> {
    let path = path.as_ref();
    validate_input_file(path, &["json"])?;
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read timings: {}", path.display()))?;
    let record: TimerRecord = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse timings: {}", path.display()))?;
    Ok(record)
}

/// Shape of each row's image in a flattened image table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageShape {
    pub height: usize,
    pub width: usize,
    pub channels: usize,
}

impl ImageShape {
    pub fn values_per_image(&self) -> usize {
        self.height * self.width * self.channels
    }
}

/// Load a CSV/TSV table with one flattened image per row (row-major, channel
/// last). Single-channel tables load as `(N, H, W)`, others as `(N, H, W, C)`.
pub fn load_image_batch<P: AsRef<Path>>(
    path: P,
    shape: ImageShape,
    has_headers: bool,
) -> Result<ArrayD<f32>> {
    let path = path.as_ref();
    validate_tsv_or_csv_file(path)?;
    if shape.values_per_image() == 0 {
        anyhow::bail!("Image height, width and channels must all be non-zero");
    }

    let file = File::open(path).with_context(|| format!("Failed to open file: {:?}", path))?;
    let reader = BufReader::new(file);

    let is_tsv = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("tsv"))
        .unwrap_or(false);
    let delimiter = if is_tsv { b'\t' } else { b',' };

    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(has_headers)
        .flexible(true)
        .from_reader(reader);

    let expected = shape.values_per_image();
    let mut values = Vec::new();
    let mut count = 0usize;

    for (row, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read row {}", row + 1))?;
        if record.len() != expected {
            anyhow::bail!(
                "Row {} has {} values, expected {} ({}x{}x{})",
                row + 1,
                record.len(),
                expected,
                shape.height,
                shape.width,
                shape.channels
            );
        }
        for (col, field) in record.iter().enumerate() {
            let v: f32 = field.trim().parse().with_context(|| {
                format!("Row {} column {}: not a number: {:?}", row + 1, col + 1, field)
            })?;
            values.push(v);
        }
        count += 1;
    }

    log::info!("Loaded {} images from {}", count, path.display());

    let dims = if shape.channels == 1 {
        vec![count, shape.height, shape.width]
    } else {
        vec![count, shape.height, shape.width, shape.channels]
    };
    let batch = Array::from_shape_vec(IxDyn(&dims), values)
        .context("Failed to assemble image batch")?;
    Ok(batch)
}
