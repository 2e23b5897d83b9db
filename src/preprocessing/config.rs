//! Preprocessing configuration

use crate::error::{PrepError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Whether generated 0/1 indicator columns take part in skew correction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IndicatorSkew {
    /// Indicator columns are corrected like any other numeric column
    #[default]
    Transform,
    /// Indicator columns are left as 0/1
    Exempt,
}

/// Rule removing known bad training records
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlierRule {
    /// Large-area field checked against `area_threshold`
    pub area_column: String,
    /// Records with area strictly above this are suspect
    pub area_threshold: f64,
    /// Suspect records with target strictly below this are removed
    pub target_threshold: f64,
}

impl Default for OutlierRule {
    fn default() -> Self {
        Self {
            area_column: "GrLivArea".to_string(),
            area_threshold: 4000.0,
            target_threshold: 300_000.0,
        }
    }
}

/// Names of the three processed output files
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputFiles {
    pub train_features: String,
    pub train_target: String,
    pub eval_features: String,
}

impl Default for OutputFiles {
    fn default() -> Self {
        Self {
            train_features: "train_processed_X.csv".to_string(),
            train_target: "train_processed_y.csv".to_string(),
            eval_features: "test_processed_X.csv".to_string(),
        }
    }
}

/// Configuration for the housing preprocessing pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessingConfig {
    /// Price column, present only in the training input
    pub target_column: String,

    /// Name of the single column in the target output
    pub target_output_name: String,

    /// Row identifier dropped before unification
    pub id_column: Option<String>,

    /// Training-only outlier rule
    pub outlier: OutlierRule,

    /// Absolute skewness above which a column is log1p-transformed
    pub skew_threshold: f64,

    /// Policy for indicator columns during skew correction
    pub indicator_skew: IndicatorSkew,

    /// Cell values read as missing
    pub null_tokens: Vec<String>,

    /// Field delimiter of the input tables
    pub separator: u8,

    /// Output file names inside the output directory
    pub outputs: OutputFiles,
}

impl Default for PreprocessingConfig {
    fn default() -> Self {
        Self {
            target_column: "SalePrice".to_string(),
            target_output_name: "SalePrice_log".to_string(),
            id_column: Some("Id".to_string()),
            outlier: OutlierRule::default(),
            skew_threshold: 0.75,
            indicator_skew: IndicatorSkew::Transform,
            null_tokens: ["NA", "N/A", "NaN", "null", ""]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            separator: b',',
            outputs: OutputFiles::default(),
        }
    }
}

impl PreprocessingConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a JSON file; absent keys keep their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(PrepError::MissingInput(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.target_column.is_empty() {
            return Err(PrepError::ConfigError("target_column is empty".to_string()));
        }
        if self.target_output_name.is_empty() {
            return Err(PrepError::ConfigError(
                "target_output_name is empty".to_string(),
            ));
        }
        if !self.skew_threshold.is_finite() || self.skew_threshold < 0.0 {
            return Err(PrepError::ConfigError(format!(
                "skew_threshold must be a non-negative number, got {}",
                self.skew_threshold
            )));
        }
        Ok(())
    }

    /// Builder method to set the target column
    pub fn with_target(mut self, column: impl Into<String>) -> Self {
        self.target_column = column.into();
        self
    }

    /// Builder method to set or clear the id column
    pub fn with_id_column(mut self, column: Option<&str>) -> Self {
        self.id_column = column.map(str::to_string);
        self
    }

    /// Builder method to set the skew threshold
    pub fn with_skew_threshold(mut self, threshold: f64) -> Self {
        self.skew_threshold = threshold;
        self
    }

    /// Builder method to set the indicator skew policy
    pub fn with_indicator_skew(mut self, policy: IndicatorSkew) -> Self {
        self.indicator_skew = policy;
        self
    }

    /// Builder method to replace the outlier rule
    pub fn with_outlier_rule(mut self, rule: OutlierRule) -> Self {
        self.outlier = rule;
        self
    }
}
