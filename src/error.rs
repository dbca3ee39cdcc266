use std::path::PathBuf;

/// Errors raised by any stage of the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Invalid config file {path}: {source}")]
    Config {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Column '{0}' not found in dataset")]
    MissingColumn(String),
    #[error("Row {row}, column '{column}': '{value}' is not a number")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },
    /// Every value of the column is missing, so there is no median to fill with.
    #[error("Column '{0}' has no values to compute a median from")]
    EmptyColumn(String),
    #[error("Cannot split dataset: {0}")]
    Split(String),
    #[error("Model error: {0}")]
    Model(String),
    #[error("Decision tree training failed: {0}")]
    Fit(#[from] linfa::Error),
    #[error("Failed to write image {path}: {source}")]
    Image {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("Shape mismatch: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

pub type Result<T> = std::result::Result<T, Error>;
