//! Error types for the housing preprocessing pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for preprocessing operations
pub type Result<T> = std::result::Result<T, PrepError>;

/// Main error type for the preprocessing pipeline
#[derive(Error, Debug)]
pub enum PrepError {
    #[error("Input file not found: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("Unhandled missing values after imputation: {}", describe_columns(.0))]
    UnhandledMissing(Vec<(String, usize)>),

    #[error("Invalid target value at row {row}: {reason}")]
    InvalidTarget { row: usize, reason: String },

    #[error("Feature not found: {0}")]
    FeatureNotFound(String),

    #[error("Row count changed during {stage}: expected {expected}, got {actual}")]
    RowCountChanged {
        stage: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Stage not fitted: {0}")]
    NotFitted(&'static str),
}

fn describe_columns(columns: &[(String, usize)]) -> String {
    columns
        .iter()
        .map(|(name, nulls)| format!("{name} ({nulls} missing)"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<polars::error::PolarsError> for PrepError {
    fn from(err: polars::error::PolarsError) -> Self {
        PrepError::DataError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for PrepError {
    fn from(err: ndarray::ShapeError) -> Self {
        PrepError::ShapeError {
            expected: "rows x features".to_string(),
            actual: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for PrepError {
    fn from(err: serde_json::Error) -> Self {
        PrepError::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PrepError::DataError("test error".to_string());
        assert_eq!(err.to_string(), "Data error: test error");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: PrepError = io_err.into();
        assert!(matches!(err, PrepError::IoError(_)));
    }

    #[test]
    fn test_error_from_shape() {
        let shape_err = ndarray::Array2::<f64>::from_shape_vec((2, 2), vec![1.0]).unwrap_err();
        let err: PrepError = shape_err.into();
        assert!(matches!(err, PrepError::ShapeError { .. }));
    }

    #[test]
    fn test_unhandled_missing_lists_columns() {
        let err = PrepError::UnhandledMissing(vec![
            ("Heating".to_string(), 2),
            ("Street".to_string(), 1),
        ]);
        let msg = err.to_string();
        assert!(msg.contains("Heating (2 missing)"));
        assert!(msg.contains("Street (1 missing)"));
    }

    #[test]
    fn test_missing_input_shows_path() {
        let err = PrepError::MissingInput(PathBuf::from("data/train.csv"));
        assert_eq!(err.to_string(), "Input file not found: data/train.csv");
    }
}
