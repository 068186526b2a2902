use std::io::ErrorKind;
use std::path::Path;

use crate::error::{DiagramError, Result};

use super::model::{Dataset, Sample, Trace};
use super::splitter::parse_datasets;

const REQUIRED_COLUMNS: [&str; 2] = ["angles", "dbm"];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Read a multi-block pattern file and split it into datasets.
pub fn load_file(path: &Path) -> Result<Vec<Dataset>> {
    let text = std::fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => DiagramError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => DiagramError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let datasets = parse_datasets(&text)?;
    for ds in &datasets {
        log::debug!(
            "line {}: title={:?} color={:?} bold={:?} ({} body lines)",
            ds.line,
            ds.title,
            ds.color,
            ds.bold,
            ds.data.lines().count()
        );
    }
    Ok(datasets)
}

/// Decode every dataset's CSV body. Stops at the first malformed one.
pub fn load_traces(datasets: &[Dataset]) -> Result<Vec<Trace>> {
    datasets
        .iter()
        .enumerate()
        .map(|(idx, ds)| {
            Ok(Trace {
                title: ds.title.clone(),
                color: ds.color.clone(),
                bold: ds.bold,
                samples: read_samples(ds, idx)?,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// CSV body decoding
// ---------------------------------------------------------------------------

/// Decode the CSV body of `dataset` (the `index`-th block of the file).
///
/// The body needs a header row with at least `angles` and `dbm`, and one
/// or more numeric rows.
pub fn read_samples(dataset: &Dataset, index: usize) -> Result<Vec<Sample>> {
    let malformed = |reason: String| DiagramError::MalformedDataset {
        dataset: dataset.display_name(index),
        reason,
    };

    if dataset.data.trim().is_empty() {
        return Err(malformed(format!(
            "empty CSV body after marker on line {}",
            dataset.line
        )));
    }

    // csv only skips truly empty lines; whitespace-only ones would be short records
    let body = dataset
        .data
        .lines()
        .filter(|l| !l.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| malformed(format!("reading CSV header: {e}")))?;
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(malformed(format!("CSV missing '{column}' column")));
        }
    }

    let samples = reader
        .deserialize::<Sample>()
        .enumerate()
        .map(|(row, result)| result.map_err(|e| malformed(format!("CSV row {}: {e}", row + 1))))
        .collect::<Result<Vec<_>>>()?;

    if samples.is_empty() {
        return Err(malformed("CSV body has a header but no rows".to_string()));
    }
    Ok(samples)
}
