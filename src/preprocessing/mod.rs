//! Housing data preprocessing
//!
//! Turns the raw training and evaluation tables into model-ready numeric
//! matrices:
//! - Training-only outlier removal
//! - Log transform of the sale price
//! - Catalog-driven missing value imputation
//! - Ordinal ranking and one-hot expansion of categorical fields
//! - log1p correction of skewed numeric features
//! - Split back into training and evaluation features

mod config;
mod encoder;
mod frame;
mod imputer;
mod outlier;
mod pipeline;
mod skew;
mod target;
pub mod schema;

pub use config::{IndicatorSkew, OutlierRule, OutputFiles, PreprocessingConfig};
pub use encoder::{CategoricalEncoder, EncodingSummary};
pub use frame::{missing_summary, UnifiedTable};
pub use imputer::{
    median, most_frequent_label, most_frequent_number, FillValue, ImputationSummary, Imputer,
};
pub use outlier::OutlierFilter;
pub use pipeline::{HousingPreprocessor, PipelineReport, ProcessedDataset};
pub use schema::{Category, ImputeStrategy, OrdinalScale};
pub use skew::{skewness, SkewCorrector, SkewSummary, SkewedColumn};
pub use target::TargetTransformer;

use crate::error::Result;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Column data type for profiling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnType {
    Numeric,
    Categorical,
    Unknown,
}

/// Per-column statistics shown by `inspect`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureStats {
    pub name: String,
    pub dtype: ColumnType,
    pub count: usize,
    pub null_count: usize,
    pub unique_count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub median: Option<f64>,
}

impl FeatureStats {
    /// Create new feature statistics
    pub fn new(name: impl Into<String>, dtype: ColumnType) -> Self {
        Self {
            name: name.into(),
            dtype,
            count: 0,
            null_count: 0,
            unique_count: 0,
            mean: None,
            std: None,
            min: None,
            max: None,
            median: None,
        }
    }

    /// Compute statistics for one column
    pub fn from_column(column: &Column) -> Result<Self> {
        let series = column.as_materialized_series();
        let dtype = if frame::is_numeric_dtype(series.dtype()) {
            ColumnType::Numeric
        } else if frame::is_string_column(column) {
            ColumnType::Categorical
        } else {
            ColumnType::Unknown
        };

        let mut stats = Self::new(column.name().as_str(), dtype);
        stats.count = series.len();
        stats.null_count = series.null_count();
        stats.unique_count = series.drop_nulls().n_unique()?;

        if stats.dtype == ColumnType::Numeric {
            let cast = series.cast(&DataType::Float64)?;
            let ca = cast.f64()?;
            stats.mean = ca.mean();
            stats.std = ca.std(1);
            stats.min = ca.min();
            stats.max = ca.max();
            stats.median = ca.median();
        }

        Ok(stats)
    }
}

/// Statistics for every column of a frame
pub fn profile(df: &DataFrame) -> Result<Vec<FeatureStats>> {
    df.get_columns().iter().map(FeatureStats::from_column).collect()
}
