//! # megadex
//!
//! Spot Mega evolutions from raw creature stats with a random forest.
//!
//! The label is derived from the name (`"Mega"` anywhere in it, any case),
//! the model only ever sees the numeric stat columns. A run loads a creature
//! CSV, fills gaps with column medians, makes a stratified train/test split,
//! standardizes features, fits a [`linfa-trees`](https://crates.io/crates/linfa-trees)
//! based forest, prints a classification report, draws four PNG charts and
//! exports a `Yes`/`No` verdict for every creature.
//!
//! ## Features
//! - Stratified, seeded train/test split
//! - Bagged decision-tree ensemble with per-tree feature subsets
//! - ROC and precision-recall curves with AUC
//! - Confusion matrix and feature importance charts
//! - TOML configuration with defaults matching the stock analysis
//!
//! ## Example
//! ```no_run
//! use megadex::{PipelineConfig, pipeline};
//! let config = PipelineConfig::default();
//! let outcome = pipeline::run(&config).unwrap();
//! println!("{} creatures scored", outcome.exported.len());
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod forest;
pub mod impute;
pub mod label;
pub mod metrics;
pub mod pipeline;
pub mod plot;
pub mod scaler;
pub mod split;
pub mod synthetic;
pub mod table;

pub use config::PipelineConfig;
pub use error::{Error, Result};
pub use forest::{MaxFeatures, RandomForest, RandomForestParams};
pub use pipeline::{PipelineOutcome, PredictionRecord, TrainedModel};
pub use scaler::StandardScaler;
pub use table::{CreatureTable, Creatures};
