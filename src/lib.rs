//! homeprice-prep - preprocessing for residential sale price modeling
//!
//! Turns raw property records (a training table carrying the sale price and
//! an evaluation table without it) into fully numeric, gap-free feature
//! matrices plus a log-transformed target.
//!
//! # Modules
//!
//! - [`preprocessing`] - Outlier removal, imputation, encoding, skew correction
//! - [`utils`] - CSV loading and writing
//! - [`cli`] - Command-line interface
//! - [`error`] - Error types

// Core error handling
pub mod error;

// Preprocessing stages and schema catalog
pub mod preprocessing;

// Utilities
pub mod utils;

// Services
pub mod cli;

pub use error::{PrepError, Result};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{PrepError, Result};

    // Pipeline
    pub use crate::preprocessing::{
        HousingPreprocessor, IndicatorSkew, OutlierRule, PipelineReport, PreprocessingConfig,
        ProcessedDataset,
    };

    // Stages
    pub use crate::preprocessing::{
        CategoricalEncoder, Imputer, OutlierFilter, SkewCorrector, TargetTransformer,
        UnifiedTable,
    };

    // Loading
    pub use crate::utils::DataLoader;
}
