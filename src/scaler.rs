use ndarray::{Array1, Array2, Axis};

use crate::error::{Error, Result};

/// Zero-mean, unit-variance standardization learned from one matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    mean: Array1<f64>,
    /// Population standard deviation; `1.0` where a column is constant.
    scale: Array1<f64>,
}

impl StandardScaler {
    pub fn fit(x: &Array2<f64>) -> Result<Self> {
        if x.nrows() == 0 {
            return Err(Error::Model("cannot fit a scaler on zero rows".to_string()));
        }
        let mean = x
            .mean_axis(Axis(0))
            .ok_or_else(|| Error::Model("cannot fit a scaler on zero rows".to_string()))?;
        let scale = x
            .std_axis(Axis(0), 0.0)
            .mapv(|s| if s > f64::EPSILON { s } else { 1.0 });
        Ok(StandardScaler { mean, scale })
    }

    pub fn fit_transform(x: &Array2<f64>) -> Result<(Self, Array2<f64>)> {
        let scaler = Self::fit(x)?;
        let scaled = scaler.transform(x)?;
        Ok((scaler, scaled))
    }

    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        if x.ncols() != self.mean.len() {
            return Err(Error::Model(format!(
                "scaler fitted on {} features, got {}",
                self.mean.len(),
                x.ncols()
            )));
        }
        Ok((x - &self.mean) / &self.scale)
    }

    pub fn mean(&self) -> &Array1<f64> {
        &self.mean
    }

    pub fn scale(&self) -> &Array1<f64> {
        &self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn train_is_centered_and_unit_variance() {
        let x = array![[1.0, 100.0], [2.0, 300.0], [3.0, 200.0], [6.0, 400.0]];
        let (_, scaled) = StandardScaler::fit_transform(&x).unwrap();
        for col in scaled.axis_iter(Axis(1)) {
            assert!(col.mean().unwrap().abs() < 1e-12);
            assert!((col.std(0.0) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn transform_is_affine_in_fit_parameters() {
        let train = array![[0.0, 10.0], [2.0, 30.0]];
        let scaler = StandardScaler::fit(&train).unwrap();
        let close = |a: &Array2<f64>, b: &Array2<f64>| {
            a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-9)
        };
        assert!(close(&scaler.mean().clone().insert_axis(Axis(0)), &array![[1.0, 20.0]]));
        assert!(close(&scaler.scale().clone().insert_axis(Axis(0)), &array![[1.0, 10.0]]));

        let before = scaler.clone();
        let other = array![[5.0, 0.0], [1.0, 20.0]];
        assert!(close(&scaler.transform(&other).unwrap(), &array![[4.0, -2.0], [0.0, 0.0]]));
        assert_eq!(scaler, before, "transform must not refit");
    }

    #[test]
    fn constant_column_is_left_unscaled() {
        let x = array![[7.0], [7.0], [7.0]];
        let (scaler, scaled) = StandardScaler::fit_transform(&x).unwrap();
        assert_eq!(scaler.scale()[0], 1.0);
        assert!(scaled.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn width_mismatch_is_rejected() {
        let scaler = StandardScaler::fit(&array![[1.0, 2.0], [3.0, 4.0]]).unwrap();
        assert!(scaler.transform(&array![[1.0]]).is_err());
    }
}
