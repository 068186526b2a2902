use crate::error::Result;

use super::metadata::parse_metadata;
use super::model::Dataset;

// ---------------------------------------------------------------------------
// Block splitter
// ---------------------------------------------------------------------------

/// A raw block: the marker line followed by its CSV body lines.
#[derive(Debug, Clone, PartialEq)]
pub struct Block<'a> {
    /// 1-based line number of the marker.
    pub line_no: usize,
    pub marker: &'a str,
    pub body: Vec<&'a str>,
}

fn is_marker(line: &str) -> bool {
    line.starts_with('#')
}

/// Partition `text` into one block per marker line.
///
/// A block runs from its marker up to the next marker or end of input.
/// Text before the first marker belongs to no block and is dropped.
pub fn split_blocks(text: &str) -> Vec<Block<'_>> {
    let lines: Vec<&str> = text.lines().collect();
    let markers: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| is_marker(line))
        .map(|(idx, _)| idx)
        .collect();

    let preamble_end = markers.first().copied().unwrap_or(lines.len());
    if lines[..preamble_end].iter().any(|l| !l.trim().is_empty()) {
        log::warn!("ignoring {preamble_end} line(s) before the first '#' marker");
    }

    markers
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = markers.get(i + 1).copied().unwrap_or(lines.len());
            Block {
                line_no: start + 1,
                marker: lines[start],
                body: lines[start + 1..end].to_vec(),
            }
        })
        .collect()
}

/// Split `text` into blocks and bind each marker's metadata to its body.
pub fn parse_datasets(text: &str) -> Result<Vec<Dataset>> {
    split_blocks(text)
        .into_iter()
        .map(|block| {
            let meta = parse_metadata(block.marker, block.line_no)?;
            Ok(Dataset::from_metadata(meta, block.body.join("\n"), block.line_no))
        })
        .collect()
}
