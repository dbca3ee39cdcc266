use ndarray::{Array2, ArrayView1, Axis};

use crate::error::{Error, Result};

/// One column that needed filling.
#[derive(Debug, Clone, PartialEq)]
pub struct FilledColumn {
    pub column: usize,
    pub filled: usize,
    pub median: f64,
}

/// Returns a copy of `features` where every `NaN` is replaced by its column's
/// median over all rows. Columns without gaps are copied unchanged.
pub fn fill_missing_with_median(
    features: &Array2<f64>,
    feature_names: &[String],
) -> Result<(Array2<f64>, Vec<FilledColumn>)> {
    let mut filled = features.to_owned();
    let mut summary = Vec::new();

    for (col, mut column) in filled.axis_iter_mut(Axis(1)).enumerate() {
        let missing = column.iter().filter(|v| v.is_nan()).count();
        if missing == 0 {
            continue;
        }
        let name = feature_names
            .get(col)
            .cloned()
            .unwrap_or_else(|| col.to_string());
        let median = median(column.view()).ok_or(Error::EmptyColumn(name.clone()))?;
        column.mapv_inplace(|v| if v.is_nan() { median } else { v });
        log::debug!("Filled {missing} missing value(s) in '{name}' with median {median}");
        summary.push(FilledColumn {
            column: col,
            filled: missing,
            median,
        });
    }

    Ok((filled, summary))
}

/// Median of the non-`NaN` entries; the mean of the middle pair for even counts.
pub fn median(values: ArrayView1<f64>) -> Option<f64> {
    let mut present: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if present.is_empty() {
        return None;
    }
    present.sort_by(f64::total_cmp);
    let mid = present.len() / 2;
    if present.len() % 2 == 0 {
        Some((present[mid - 1] + present[mid]) / 2.0)
    } else {
        Some(present[mid])
    }
}
