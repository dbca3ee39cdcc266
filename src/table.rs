//! Raw CSV loading and extraction of the name/feature columns.

use csv::StringRecord;
use ndarray::Array2;
use std::fmt::Write as _;
use std::path::Path;

use crate::error::{Error, Result};

/// Cell spellings read as a missing value.
const MISSING_MARKERS: [&str; 6] = ["NA", "N/A", "NaN", "nan", "null", "None"];

/// The dataset exactly as read from disk: header plus string cells.
#[derive(Debug, Clone)]
pub struct CreatureTable {
    pub columns: Vec<String>,
    rows: Vec<StringRecord>,
}

/// Name column plus numeric features; missing cells are `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct Creatures {
    pub names: Vec<String>,
    pub feature_names: Vec<String>,
    pub features: Array2<f64>,
}

impl CreatureTable {
    pub fn from_path(path: &Path) -> Result<Self> {
        let reader = csv::Reader::from_path(path)?;
        Self::from_reader(reader)
    }

    pub fn from_reader<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Self> {
        let columns = reader.headers()?.iter().map(|h| h.to_string()).collect();
        let rows = reader.records().collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(CreatureTable { columns, rows })
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| Error::MissingColumn(name.to_string()))
    }

    /// Pulls out the name column and the numeric feature columns, in the
    /// order given.
    pub fn creatures(&self, name_column: &str, feature_columns: &[String]) -> Result<Creatures> {
        let name_idx = self.column_index(name_column)?;
        let feature_idx = feature_columns
            .iter()
            .map(|c| self.column_index(c))
            .collect::<Result<Vec<_>>>()?;

        let names = self
            .rows
            .iter()
            .map(|r| r.get(name_idx).unwrap_or("").to_string())
            .collect();

        let mut values = Vec::with_capacity(self.rows.len() * feature_idx.len());
        for (row_no, record) in self.rows.iter().enumerate() {
            for (&col, column) in feature_idx.iter().zip(feature_columns) {
                values.push(parse_cell(record.get(col).unwrap_or(""), row_no, column)?);
            }
        }
        let features = Array2::from_shape_vec((self.rows.len(), feature_idx.len()), values)?;

        Ok(Creatures {
            names,
            feature_names: feature_columns.to_vec(),
            features,
        })
    }

    /// Aligned text preview of the first `n` rows, index column first.
    pub fn head(&self, n: usize) -> String {
        let shown = &self.rows[..n.min(self.rows.len())];
        let index_width = shown.len().saturating_sub(1).to_string().len();
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, header)| {
                shown
                    .iter()
                    .map(|r| r.get(i).unwrap_or("").chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = String::new();
        let _ = write!(out, "{:index_width$}", "");
        for (header, w) in self.columns.iter().zip(&widths) {
            let _ = write!(out, "  {header:>w$}");
        }
        for (i, record) in shown.iter().enumerate() {
            let _ = write!(out, "\n{i:>index_width$}");
            for (col, w) in widths.iter().enumerate() {
                let _ = write!(out, "  {:>w$}", record.get(col).unwrap_or(""));
            }
        }
        out
    }
}

impl Creatures {
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn parse_cell(raw: &str, row: usize, column: &str) -> Result<f64> {
    let cell = raw.trim();
    if cell.is_empty() || MISSING_MARKERS.contains(&cell) {
        return Ok(f64::NAN);
    }
    cell.parse::<f64>().map_err(|_| Error::InvalidNumber {
        row,
        column: column.to_string(),
        value: cell.to_string(),
    })
}
