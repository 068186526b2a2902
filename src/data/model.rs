use std::fmt;

use serde::Deserialize;

// ---------------------------------------------------------------------------
// Metadata – what a marker line declares
// ---------------------------------------------------------------------------

/// Values parsed from a marker line such as `# title: "A", color: red`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    pub title: String,
    pub color: String,
    /// Line weight; `None` means the renderer default.
    pub bold: Option<f64>,
}

// ---------------------------------------------------------------------------
// Dataset – one CSV block of the input file
// ---------------------------------------------------------------------------

/// One marker line plus the raw CSV body that follows it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub title: String,
    pub color: String,
    pub bold: Option<f64>,
    /// Raw CSV text, header row included. May be empty.
    pub data: String,
    /// 1-based line number of the marker in the source file.
    pub line: usize,
}

impl Dataset {
    pub fn from_metadata(meta: Metadata, data: String, line: usize) -> Self {
        Dataset {
            title: meta.title,
            color: meta.color,
            bold: meta.bold,
            data,
            line,
        }
    }

    pub fn display_name(&self, index: usize) -> String {
        display_name(&self.title, index)
    }
}

/// Name used in error messages: the title, or the 1-based position.
pub fn display_name(title: &str, index: usize) -> String {
    if title.is_empty() {
        format!("#{}", index + 1)
    } else {
        format!("'{title}'")
    }
}

// ---------------------------------------------------------------------------
// Sample / Trace – decoded CSV rows
// ---------------------------------------------------------------------------

/// One CSV row. Columns other than `angles` and `dbm` are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Sample {
    /// Degrees.
    pub angles: f64,
    /// Signal strength in dB.
    pub dbm: f64,
}

/// A dataset whose CSV body has been decoded.
#[derive(Debug, Clone)]
pub struct Trace {
    pub title: String,
    pub color: String,
    pub bold: Option<f64>,
    pub samples: Vec<Sample>,
}

impl Trace {
    pub fn max_dbm(&self) -> Option<f64> {
        self.samples
            .iter()
            .map(|s| s.dbm)
            .fold(None, |acc, v| Some(acc.map_or(v, |a: f64| a.max(v))))
    }
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.title.is_empty() {
            write!(f, "<untitled> ({} samples)", self.samples.len())
        } else {
            write!(f, "{} ({} samples)", self.title, self.samples.len())
        }
    }
}
