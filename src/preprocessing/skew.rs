//! Skew correction for numeric features
//!
//! Columns whose sample skewness exceeds the threshold in absolute value are
//! replaced by `ln(1 + x)`. Skewness is measured once over the unified table.

use super::config::IndicatorSkew;
use super::frame::{float_column, is_string_column, numeric_values};
use crate::error::{PrepError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Values whose magnitude falls below this are treated as zero
const FP_NOISE: f64 = 1e-14;

/// Adjusted Fisher-Pearson sample skewness (G1).
///
/// `None` for fewer than three values, `Some(0.0)` for a constant column.
pub fn skewness(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 3 {
        return None;
    }
    let count = n as f64;
    let mean = values.iter().sum::<f64>() / count;

    let (mut m2, mut m3) = (0.0, 0.0);
    for value in values {
        let d = value - mean;
        m2 += d * d;
        m3 += d * d * d;
    }
    if m2.abs() < FP_NOISE {
        return Some(0.0);
    }
    if m3.abs() < FP_NOISE {
        m3 = 0.0;
    }

    Some(count * (count - 1.0).sqrt() / (count - 2.0) * (m3 / m2.powf(1.5)))
}

/// Result of measuring one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkewedColumn {
    pub name: String,
    pub skewness: f64,
}

/// What a skew correction pass did
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkewSummary {
    /// Columns selected for log1p, with their skewness before the transform
    pub transformed: Vec<SkewedColumn>,
    /// Skewed columns left alone because they hold values <= -1
    pub unsafe_columns: Vec<SkewedColumn>,
}

/// Selects and log-transforms heavily skewed numeric columns
#[derive(Debug, Clone)]
pub struct SkewCorrector {
    threshold: f64,
    indicator_policy: IndicatorSkew,
    summary: SkewSummary,
    is_fitted: bool,
}

impl SkewCorrector {
    pub fn new(threshold: f64, indicator_policy: IndicatorSkew) -> Self {
        Self {
            threshold,
            indicator_policy,
            summary: SkewSummary::default(),
            is_fitted: false,
        }
    }

    /// Strictly above the threshold in absolute value
    pub fn should_transform(&self, skewness: f64) -> bool {
        skewness.abs() > self.threshold
    }

    pub fn summary(&self) -> &SkewSummary {
        &self.summary
    }

    /// Names of the columns the transform will rewrite
    pub fn skewed_columns(&self) -> Vec<&str> {
        self.summary
            .transformed
            .iter()
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Measure every numeric column.
    ///
    /// `indicator_columns` names the generated 0/1 columns so the exemption
    /// policy can be applied to them.
    pub fn fit(&mut self, df: &DataFrame, indicator_columns: &[String]) -> Result<&mut Self> {
        self.summary = SkewSummary::default();

        for column in df.get_columns() {
            let name = column.name().as_str();
            if is_string_column(column) {
                continue;
            }
            if self.indicator_policy == IndicatorSkew::Exempt
                && indicator_columns.iter().any(|c| c == name)
            {
                continue;
            }

            let values: Vec<f64> = numeric_values(column)?.into_iter().flatten().collect();
            let Some(skew) = skewness(&values) else {
                debug!(column = name, "Too few values to measure skewness");
                continue;
            };
            if !self.should_transform(skew) {
                continue;
            }

            let entry = SkewedColumn {
                name: name.to_string(),
                skewness: skew,
            };
            if values.iter().any(|v| *v <= -1.0) {
                warn!(
                    column = name,
                    skewness = skew,
                    "Skewed column holds values <= -1, log1p not applied"
                );
                self.summary.unsafe_columns.push(entry);
            } else {
                debug!(column = name, skewness = skew, "Column selected for log1p");
                self.summary.transformed.push(entry);
            }
        }

        self.is_fitted = true;
        Ok(self)
    }

    /// Apply log1p to every selected column
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(PrepError::NotFitted("skew corrector"));
        }

        let mut result = df.clone();
        for skewed in &self.summary.transformed {
            let column = df
                .column(&skewed.name)
                .map_err(|_| PrepError::FeatureNotFound(skewed.name.clone()))?;
            let values = numeric_values(column)?
                .into_iter()
                .map(|v| v.map(f64::ln_1p))
                .collect();
            result.with_column(float_column(&skewed.name, values))?;
        }

        info!(
            threshold = self.threshold,
            transformed = self.summary.transformed.len(),
            unsafe_columns = self.summary.unsafe_columns.len(),
            "Corrected skewed features"
        );
        Ok(result)
    }

    /// Fit and transform in one step
    pub fn fit_transform(
        &mut self,
        df: &DataFrame,
        indicator_columns: &[String],
    ) -> Result<DataFrame> {
        self.fit(df, indicator_columns)?;
        self.transform(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corrector() -> SkewCorrector {
        SkewCorrector::new(0.75, IndicatorSkew::Transform)
    }

    #[test]
    fn test_skewness_matches_adjusted_estimator() {
        let skew = skewness(&[1.0, 2.0, 3.0, 10.0]).unwrap();
        assert!((skew - 1.763632614803888).abs() < 1e-12);
        assert_eq!(skewness(&[1.0, 2.0, 3.0]), Some(0.0));
    }

    #[test]
    fn test_skewness_edge_cases() {
        assert_eq!(skewness(&[1.0, 2.0]), None);
        assert_eq!(skewness(&[5.0, 5.0, 5.0, 5.0]), Some(0.0));
        assert_eq!(skewness(&[0.1, 0.1, 0.1]), Some(0.0));
    }

    #[test]
    fn test_threshold_is_strict() {
        let c = corrector();
        assert!(c.should_transform(0.9));
        assert!(c.should_transform(-0.9));
        assert!(!c.should_transform(0.5));
        assert!(!c.should_transform(0.75));
    }

    #[test]
    fn test_transforms_only_skewed_columns() {
        let df = df!(
            "LotArea" => &[1.0, 2.0, 3.0, 10.0],
            "YearBuilt" => &[1990.0, 2000.0, 2010.0, 2000.0],
        )
        .unwrap();

        let mut c = corrector();
        let out = c.fit_transform(&df, &[]).unwrap();
        assert_eq!(c.skewed_columns(), vec!["LotArea"]);

        let area = numeric_values(out.column("LotArea").unwrap()).unwrap();
        assert_eq!(area[3], Some(10.0_f64.ln_1p()));
        let year = numeric_values(out.column("YearBuilt").unwrap()).unwrap();
        assert_eq!(year[0], Some(1990.0));
    }

    #[test]
    fn test_indicator_policy() {
        let df = df!("Street_Grvl" => &[0.0, 0.0, 0.0, 0.0, 1.0]).unwrap();
        let indicators = vec!["Street_Grvl".to_string()];

        let mut transform = corrector();
        transform.fit(&df, &indicators).unwrap();
        assert_eq!(transform.skewed_columns(), vec!["Street_Grvl"]);

        let mut exempt = SkewCorrector::new(0.75, IndicatorSkew::Exempt);
        exempt.fit(&df, &indicators).unwrap();
        assert!(exempt.skewed_columns().is_empty());
    }

    #[test]
    fn test_values_below_minus_one_are_reported() {
        let df = df!("Delta" => &[-2.0, 0.0, 0.0, 0.0, 30.0]).unwrap();
        let mut c = corrector();
        let out = c.fit_transform(&df, &[]).unwrap();

        assert!(c.skewed_columns().is_empty());
        assert_eq!(c.summary().unsafe_columns[0].name, "Delta");
        let values = numeric_values(out.column("Delta").unwrap()).unwrap();
        assert_eq!(values[0], Some(-2.0));
    }

    #[test]
    fn test_string_columns_ignored() {
        let df = df!("Zone" => &["RL", "RL", "FV"]).unwrap();
        let mut c = corrector();
        c.fit(&df, &[]).unwrap();
        assert!(c.skewed_columns().is_empty());
    }
}
