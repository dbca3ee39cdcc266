//! Bagged ensemble of `linfa-trees` decision trees.
//!
//! Each tree is grown on a bootstrap resample of the rows and a random subset
//! of the feature columns. The forest's probability for a row is the share of
//! trees voting `true`.

use linfa::prelude::*;
use linfa_trees::{DecisionTree, SplitQuality};
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};

use crate::error::{Error, Result};

/// How many feature columns each tree gets to see.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaxFeatures {
    All,
    /// `ceil(sqrt(n_features))`
    Sqrt,
}

impl MaxFeatures {
    fn count(self, n_features: usize) -> usize {
        match self {
            MaxFeatures::All => n_features,
            MaxFeatures::Sqrt => ((n_features as f64).sqrt().ceil() as usize).clamp(1, n_features),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RandomForestParams {
    pub n_trees: usize,
    pub seed: u64,
    pub max_features: MaxFeatures,
}

impl Default for RandomForestParams {
    fn default() -> Self {
        RandomForestParams {
            n_trees: 100,
            seed: 42,
            max_features: MaxFeatures::Sqrt,
        }
    }
}

struct Member {
    tree: DecisionTree<f64, bool>,
    /// Global indices of the columns this tree was trained on.
    features: Vec<usize>,
}

/// A fitted forest. Lives for one pipeline run only.
pub struct RandomForest {
    members: Vec<Member>,
    n_features: usize,
    importances: Array1<f64>,
}

impl RandomForestParams {
    pub fn n_trees(mut self, n_trees: usize) -> Self {
        self.n_trees = n_trees;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn max_features(mut self, max_features: MaxFeatures) -> Self {
        self.max_features = max_features;
        self
    }

    pub fn fit(&self, x: &Array2<f64>, y: &Array1<bool>) -> Result<RandomForest> {
        let (n_rows, n_features) = x.dim();
        if self.n_trees == 0 {
            return Err(Error::Model("a forest needs at least one tree".to_string()));
        }
        if n_rows == 0 || n_features == 0 {
            return Err(Error::Model("cannot train on an empty matrix".to_string()));
        }
        if y.len() != n_rows {
            return Err(Error::Model(format!(
                "{n_rows} feature rows but {} labels",
                y.len()
            )));
        }
        let positives = y.iter().filter(|&&l| l).count();
        if positives == 0 || positives == n_rows {
            return Err(Error::Model(
                "training labels contain a single class".to_string(),
            ));
        }

        let per_tree = self.max_features.count(n_features);
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut members = Vec::with_capacity(self.n_trees);
        let mut importances = Array1::<f64>::zeros(n_features);

        for t in 0..self.n_trees {
            let rows: Vec<usize> = (0..n_rows).map(|_| rng.random_range(0..n_rows)).collect();
            let mut features = sample(&mut rng, n_features, per_tree).into_vec();
            features.sort_unstable();

            let records = x.select(Axis(0), &rows).select(Axis(1), &features);
            let targets = y.select(Axis(0), &rows);
            let dataset = Dataset::new(records, targets);

            let tree = DecisionTree::params()
                .split_quality(SplitQuality::Gini)
                .max_depth(None)
                .fit(&dataset)?;

            for (local, value) in tree.feature_importance().into_iter().enumerate() {
                if value.is_finite() {
                    importances[features[local]] += value;
                }
            }
            log::debug!("Tree {t}: features {features:?}");
            members.push(Member { tree, features });
        }

        let total = importances.sum();
        if total > 0.0 {
            importances /= total;
        }

        Ok(RandomForest {
            members,
            n_features,
            importances,
        })
    }
}

impl RandomForest {
    pub fn params() -> RandomForestParams {
        RandomForestParams::default()
    }

    /// Share of trees voting `true`, per row.
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if x.ncols() != self.n_features {
            return Err(Error::Model(format!(
                "forest trained on {} features, got {}",
                self.n_features,
                x.ncols()
            )));
        }
        let mut votes = Array1::<f64>::zeros(x.nrows());
        for member in &self.members {
            let view = x.select(Axis(1), &member.features);
            let predicted: Array1<bool> = member.tree.predict(&view);
            for (v, &p) in votes.iter_mut().zip(predicted.iter()) {
                if p {
                    *v += 1.0;
                }
            }
        }
        Ok(votes / self.members.len() as f64)
    }

    /// Majority vote; an exact tie goes to `false`.
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<bool>> {
        Ok(self.predict_proba(x)?.mapv(|p| p > 0.5))
    }

    /// Mean impurity decrease per feature, normalized to sum to one.
    pub fn feature_importances(&self) -> &Array1<f64> {
        &self.importances
    }

    /// `(feature name, importance)` pairs, most important first.
    pub fn ranked_importances(&self, feature_names: &[String]) -> Vec<(String, f64)> {
        let mut ranked: Vec<(String, f64)> = feature_names
            .iter()
            .cloned()
            .zip(self.importances.iter().copied())
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }

    pub fn n_trees(&self) -> usize {
        self.members.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }
}
