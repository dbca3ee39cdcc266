use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Stat columns used as model features, in the order they are fed to the forest.
pub const DEFAULT_FEATURES: [&str; 7] = [
    "HP", "Attack", "Defense", "Sp. Atk", "Sp. Def", "Speed", "Total",
];

/// Every knob of a pipeline run. `Default` reproduces the stock analysis.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// CSV with one creature per row.
    pub input: PathBuf,
    /// Directory receiving the charts and the predictions CSV.
    pub output_dir: PathBuf,
    pub name_column: String,
    /// Case-insensitive substring that marks a positive row.
    pub label_pattern: String,
    pub features: Vec<String>,
    pub test_fraction: f64,
    pub seed: u64,
    pub n_trees: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            input: PathBuf::from("venv/Pokemon.csv"),
            output_dir: PathBuf::from("."),
            name_column: "Name".to_string(),
            label_pattern: "Mega".to_string(),
            features: DEFAULT_FEATURES.iter().map(|f| f.to_string()).collect(),
            test_fraction: 0.25,
            seed: 42,
            n_trees: 100,
        }
    }
}

impl PipelineConfig {
    /// Reads a TOML file; keys it leaves out keep their default value.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_str(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_constants() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.test_fraction, 0.25);
        assert_eq!(cfg.seed, 42);
        assert_eq!(cfg.n_trees, 100);
        assert_eq!(cfg.features.len(), 7);
        assert_eq!(cfg.features[3], "Sp. Atk");
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let cfg = PipelineConfig::from_toml_str(
            r#"
            input = "data/creatures.csv"
            n_trees = 10
            "#,
        )
        .unwrap();
        assert_eq!(cfg.input, PathBuf::from("data/creatures.csv"));
        assert_eq!(cfg.n_trees, 10);
        assert_eq!(cfg.seed, 42);
        assert_eq!(cfg.label_pattern, "Mega");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(PipelineConfig::from_toml_str("trees = 3").is_err());
    }
}
