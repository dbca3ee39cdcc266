use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;

use crate::error::Result;

/// One line of the predictions file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    #[serde(rename = "Pokemon")]
    pub name: String,
    #[serde(rename = "Mega_Evolution")]
    pub mega_evolution: &'static str,
}

pub fn export_rows(names: &[String], predicted: &[bool]) -> Vec<ExportRow> {
    names
        .iter()
        .zip(predicted)
        .map(|(name, &p)| ExportRow {
            name: name.clone(),
            mega_evolution: if p { "Yes" } else { "No" },
        })
        .collect()
}

/// Writes `Pokemon,Mega_Evolution`, one row per creature, input order kept.
pub fn write_predictions(path: &Path, rows: &[ExportRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush().map_err(|source| crate::error::Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Name-level agreement between the labelled and the predicted positives.
#[derive(Debug, Clone, PartialEq)]
pub struct NameOverlap {
    pub actual: Vec<String>,
    pub predicted: Vec<String>,
    /// Distinct names present in both lists.
    pub shared: usize,
}

impl NameOverlap {
    pub fn new(names: &[String], actual: &[bool], predicted: &[bool]) -> Self {
        let pick = |flags: &[bool]| -> Vec<String> {
            names
                .iter()
                .zip(flags)
                .filter(|&(_, &f)| f)
                .map(|(n, _)| n.clone())
                .collect()
        };
        let actual = pick(actual);
        let predicted = pick(predicted);
        let actual_set: HashSet<&String> = actual.iter().collect();
        let predicted_set: HashSet<&String> = predicted.iter().collect();
        let shared = actual_set.intersection(&predicted_set).count();
        NameOverlap {
            actual,
            predicted,
            shared,
        }
    }

    /// Shared names over the length of the actual list; `None` if it is empty.
    pub fn recall(&self) -> Option<f64> {
        (!self.actual.is_empty()).then(|| self.shared as f64 / self.actual.len() as f64)
    }

    /// Shared names over the length of the predicted list; `None` if it is empty.
    pub fn precision(&self) -> Option<f64> {
        (!self.predicted.is_empty()).then(|| self.shared as f64 / self.predicted.len() as f64)
    }
}
