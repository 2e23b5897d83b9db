//! Target transformation (log1p) and its inverse

use super::frame::numeric_values;
use crate::error::{PrepError, Result};
use polars::prelude::*;
use tracing::info;

/// Moves the price column out of the training frame and into log space
#[derive(Debug, Clone)]
pub struct TargetTransformer {
    target_column: String,
    output_name: String,
}

impl TargetTransformer {
    pub fn new(target_column: impl Into<String>, output_name: impl Into<String>) -> Self {
        Self {
            target_column: target_column.into(),
            output_name: output_name.into(),
        }
    }

    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    /// `ln(1 + value)`
    pub fn transform(value: f64) -> f64 {
        value.ln_1p()
    }

    /// `exp(value) - 1`, recovers a price from a model output
    pub fn invert(value: f64) -> f64 {
        value.exp_m1()
    }

    pub fn invert_all(values: &[f64]) -> Vec<f64> {
        values.iter().map(|v| Self::invert(*v)).collect()
    }

    /// Split the target off the training frame.
    ///
    /// Returns the remaining features and the transformed target as a series
    /// named after the configured output name. Every target must be present,
    /// finite and non-negative.
    pub fn extract(&self, df: &DataFrame) -> Result<(DataFrame, Series)> {
        let column = df
            .column(&self.target_column)
            .map_err(|_| PrepError::FeatureNotFound(self.target_column.clone()))?;

        let mut transformed = Vec::with_capacity(df.height());
        for (row, value) in numeric_values(column)?.into_iter().enumerate() {
            let value = value.ok_or_else(|| PrepError::InvalidTarget {
                row,
                reason: "missing value".to_string(),
            })?;
            if !value.is_finite() || value < 0.0 {
                return Err(PrepError::InvalidTarget {
                    row,
                    reason: format!("expected a non-negative price, got {}", value),
                });
            }
            transformed.push(Self::transform(value));
        }

        let features = df.drop(&self.target_column)?;
        let target = Series::new(self.output_name.as_str().into(), transformed);
        info!(
            target = %self.target_column,
            output = %self.output_name,
            rows = target.len(),
            "Log-transformed target"
        );
        Ok((features, target))
    }
}
