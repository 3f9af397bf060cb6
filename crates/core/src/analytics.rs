//! Tabular health reports loaded from CSV, and the line series plotted from
//! them.
//!
//! A column counts as numeric when every non-missing cell parses as a number
//! and at least one cell is present. Missing cells (blank, an `NA`-style
//! token, a non-finite number, or absent from a short row) are skipped when a
//! series is built, leaving a gap in the chart. Repeated header names get a
//! `.1`, `.2`, ... suffix so every column stays addressable by name.

use std::{collections::HashSet, fs::File, io::Read, path::Path};

use thiserror::Error;
use tracing::debug;

const MISSING: [&str; 4] = ["", "NA", "N/A", "null"];

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("{0}")]
    Csv(#[from] csv::Error),
    #[error("cannot open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("file has no header row")]
    Empty,
    #[error("line {line}: found {found} fields, but the header has {expected}")]
    TooManyFields {
        line: u64,
        found: usize,
        expected: usize,
    },
    #[error("no column named '{0}'")]
    UnknownColumn(String),
    #[error("column '{0}' is not numeric")]
    NotNumeric(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    pub column: String,
    /// (row index, value), in row order.
    pub points: Vec<(f64, f64)>,
}

// `inf` and any-case `nan` parse as f64 but cannot be plotted.
fn is_missing(cell: &str) -> bool {
    let cell = cell.trim();
    MISSING.contains(&cell) || cell.parse::<f64>().is_ok_and(|v| !v.is_finite())
}

fn dedup_headers(raw: &csv::StringRecord) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::new();
    let mut out = Vec::with_capacity(raw.len());
    for name in raw.iter() {
        let mut candidate = name.to_string();
        let mut n = 0;
        while used.contains(&candidate) {
            n += 1;
            candidate = format!("{}.{}", name, n);
        }
        used.insert(candidate.clone());
        out.push(candidate);
    }
    out
}

fn parse_cell(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok()
}

impl Table {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, AnalyticsError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| AnalyticsError::Open {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_reader(file)
    }

    /// Short rows are accepted and their trailing cells count as missing;
    /// a row longer than the header is rejected.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, AnalyticsError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        let headers = dedup_headers(rdr.headers()?);
        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(AnalyticsError::Empty);
        }
        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            if record.len() > headers.len() {
                return Err(AnalyticsError::TooManyFields {
                    line: record.position().map_or(0, |p| p.line()),
                    found: record.len(),
                    expected: headers.len(),
                });
            }
            rows.push(record.iter().map(str::to_string).collect());
        }
        debug!(columns = headers.len(), rows = rows.len(), "parsed csv table");
        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn preview(&self, n: usize) -> &[Vec<String>] {
        &self.rows[..n.min(self.rows.len())]
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    fn is_numeric(&self, idx: usize) -> bool {
        let mut seen = false;
        for row in &self.rows {
            let cell = row.get(idx).map(String::as_str).unwrap_or("");
            if is_missing(cell) {
                continue;
            }
            if parse_cell(cell).is_none() {
                return false;
            }
            seen = true;
        }
        seen
    }

    pub fn numeric_columns(&self) -> Vec<String> {
        (0..self.headers.len())
            .filter(|&i| self.is_numeric(i))
            .map(|i| self.headers[i].clone())
            .collect()
    }

    pub fn series(&self, column: &str) -> Result<Series, AnalyticsError> {
        let idx = self
            .column_index(column)
            .ok_or_else(|| AnalyticsError::UnknownColumn(column.to_string()))?;
        if !self.is_numeric(idx) {
            return Err(AnalyticsError::NotNumeric(column.to_string()));
        }
        let points = self
            .rows
            .iter()
            .enumerate()
            .filter_map(|(i, row)| {
                let cell = row.get(idx)?;
                if is_missing(cell) {
                    return None;
                }
                parse_cell(cell).map(|v| (i as f64, v))
            })
            .collect();
        Ok(Series {
            column: column.to_string(),
            points,
        })
    }
}

impl Series {
    pub fn title(&self) -> String {
        format!("{} Trend", self.column)
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|&(_, y)| y).collect()
    }

    /// Axis bounds as `([x_min, x_max], [y_min, y_max])`, widened so that
    /// neither range is empty.
    pub fn bounds(&self) -> ([f64; 2], [f64; 2]) {
        let x_max = self.points.last().map(|&(x, _)| x).unwrap_or(0.0).max(1.0);
        let finite = self.points.iter().map(|&(_, y)| y).filter(|y| y.is_finite());
        let (mut lo, mut hi) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| {
            (lo.min(y), hi.max(y))
        });
        if lo > hi {
            lo = 0.0;
            hi = 1.0;
        } else if lo == hi {
            lo -= 1.0;
            hi += 1.0;
        }
        ([0.0, x_max], [lo, hi])
    }
}
