//! Training-only outlier removal
//!
//! Removes the handful of very large properties that sold far below what
//! their size implies. Evaluation records are never filtered.

use super::config::OutlierRule;
use super::frame::numeric_values;
use crate::error::Result;
use polars::prelude::*;
use tracing::{info, warn};

/// Outlier filter applied to the training partition
#[derive(Debug, Clone)]
pub struct OutlierFilter {
    rule: OutlierRule,
    target_column: String,
}

impl OutlierFilter {
    /// Create a new filter for the given rule and target column
    pub fn new(rule: OutlierRule, target_column: impl Into<String>) -> Self {
        Self {
            rule,
            target_column: target_column.into(),
        }
    }

    /// True when a record matches the removal rule.
    ///
    /// Both comparisons are strict; a missing value never matches.
    pub fn is_outlier(&self, area: Option<f64>, target: Option<f64>) -> bool {
        match (area, target) {
            (Some(area), Some(target)) => {
                area > self.rule.area_threshold && target < self.rule.target_threshold
            }
            _ => false,
        }
    }

    /// Rule columns absent from the frame; any absence disables the filter
    pub fn missing_columns(&self, df: &DataFrame) -> Vec<String> {
        [&self.rule.area_column, &self.target_column]
            .into_iter()
            .filter(|name| df.column(name).is_err())
            .cloned()
            .collect()
    }

    /// Drop matching records, returning the filtered frame and the number removed
    pub fn filter(&self, df: &DataFrame) -> Result<(DataFrame, usize)> {
        let (area, target) = match (
            df.column(&self.rule.area_column),
            df.column(&self.target_column),
        ) {
            (Ok(area), Ok(target)) => (numeric_values(area)?, numeric_values(target)?),
            _ => {
                warn!(
                    area_column = %self.rule.area_column,
                    target_column = %self.target_column,
                    "Outlier rule columns not present, skipping outlier removal"
                );
                return Ok((df.clone(), 0));
            }
        };

        let mask: Vec<bool> = area
            .iter()
            .zip(target.iter())
            .map(|(a, t)| !self.is_outlier(*a, *t))
            .collect();
        let removed = mask.iter().filter(|keep| !**keep).count();

        if removed == 0 {
            return Ok((df.clone(), 0));
        }

        let mask = BooleanChunked::from_slice("keep".into(), &mask);
        let filtered = df.filter(&mask)?;
        info!(
            removed,
            remaining = filtered.height(),
            "Removed training outliers"
        );
        Ok((filtered, removed))
    }
}
