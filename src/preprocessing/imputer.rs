//! Missing value imputation driven by the schema catalog
//!
//! Fill values are learned from the unified table (both partitions) and then
//! applied strategy by strategy in catalog order.

use super::frame::{
    float_column, format_number, is_string_column, missing_summary, numeric_values,
    string_column, string_values,
};
use super::schema::{imputation_plan, Category, ImputeStrategy};
use crate::error::{PrepError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info, warn};

/// Learned fill value for one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FillValue {
    Category(String),
    Numeric(f64),
    GroupMedian {
        group_by: String,
        medians: BTreeMap<String, f64>,
        /// Median over all observed values; `None` when nothing was observed
        fallback: Option<f64>,
    },
}

/// What a transform pass filled
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImputationSummary {
    /// Field -> number of cells filled
    pub filled: BTreeMap<String, usize>,
    /// Catalog fields absent from the data
    pub skipped_fields: Vec<String>,
    /// Groups (or `<missing>`) whose rows fell back to the global median
    pub fallback_groups: Vec<String>,
}

/// Imputer for the housing catalog strategies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Imputer {
    plan: Vec<(ImputeStrategy, Vec<String>)>,
    fill_values: Vec<(String, FillValue)>,
    skipped_fields: Vec<String>,
    is_fitted: bool,
}

impl Default for Imputer {
    fn default() -> Self {
        Self::from_catalog()
    }
}

impl Imputer {
    /// Create a new imputer with an explicit plan
    pub fn new(plan: Vec<(ImputeStrategy, Vec<String>)>) -> Self {
        Self {
            plan,
            fill_values: Vec::new(),
            skipped_fields: Vec::new(),
            is_fitted: false,
        }
    }

    /// Imputer using the static catalog field lists
    pub fn from_catalog() -> Self {
        let plan = imputation_plan()
            .into_iter()
            .map(|(strategy, fields)| {
                (strategy, fields.into_iter().map(str::to_string).collect())
            })
            .collect();
        Self::new(plan)
    }

    /// Learned fill value for a field
    pub fn fill_value(&self, field: &str) -> Option<&FillValue> {
        self.fill_values
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    /// Learn fill values from the unified table
    pub fn fit(&mut self, df: &DataFrame) -> Result<&mut Self> {
        self.fill_values.clear();
        self.skipped_fields.clear();
        let mut handled: HashSet<String> = HashSet::new();

        for (strategy, fields) in &self.plan {
            for field in fields {
                if !handled.insert(field.clone()) {
                    debug!(field = %field, "Field already handled by an earlier strategy");
                    continue;
                }
                let column = match df.column(field) {
                    Ok(column) => column,
                    Err(_) => {
                        warn!(field = %field, ?strategy, "Catalog field not present, skipping");
                        self.skipped_fields.push(field.clone());
                        continue;
                    }
                };

                let value = match strategy {
                    ImputeStrategy::AbsentCategory => {
                        Some(FillValue::Category(Category::ABSENT_LABEL.to_string()))
                    }
                    ImputeStrategy::Zero => Some(FillValue::Numeric(0.0)),
                    ImputeStrategy::GroupMedian { group_by } => {
                        Some(Self::group_medians(df, column, group_by)?)
                    }
                    ImputeStrategy::MostFrequent => Self::most_frequent(column)?,
                };

                match value {
                    Some(value) => {
                        debug!(field = %field, ?value, "Learned fill value");
                        self.fill_values.push((field.clone(), value));
                    }
                    None => warn!(field = %field, "No observed values to learn a fill from"),
                }
            }
        }

        self.is_fitted = true;
        Ok(self)
    }

    /// Fill missing values
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        self.transform_with_summary(df).map(|(df, _)| df)
    }

    /// Fill missing values and report what was filled
    pub fn transform_with_summary(&self, df: &DataFrame) -> Result<(DataFrame, ImputationSummary)> {
        if !self.is_fitted {
            return Err(PrepError::NotFitted("imputer"));
        }

        let mut result = df.clone();
        let mut summary = ImputationSummary {
            skipped_fields: self.skipped_fields.clone(),
            ..Default::default()
        };

        for (field, value) in &self.fill_values {
            let column = match df.column(field) {
                Ok(column) => column,
                Err(_) => continue,
            };
            let missing = column.null_count();
            if missing == 0 {
                continue;
            }

            let filled = match value {
                FillValue::Category(label) => fill_strings(column, label)?,
                FillValue::Numeric(number) if is_string_column(column) => {
                    fill_strings(column, &format_number(*number))?
                }
                FillValue::Numeric(number) => {
                    let values = numeric_values(column)?
                        .into_iter()
                        .map(|v| Some(v.unwrap_or(*number)))
                        .collect();
                    float_column(field, values)
                }
                FillValue::GroupMedian {
                    group_by,
                    medians,
                    fallback,
                } => {
                    let keys = match df.column(group_by) {
                        Ok(groups) => string_values(groups)?,
                        Err(_) => vec![None; df.height()],
                    };
                    let values = numeric_values(column)?;
                    let mut out = Vec::with_capacity(values.len());
                    for (value, key) in values.into_iter().zip(keys) {
                        if value.is_some() {
                            out.push(value);
                            continue;
                        }
                        let group_value = key.as_ref().and_then(|k| medians.get(k)).copied();
                        if group_value.is_none() {
                            let group = key.unwrap_or_else(|| "<missing>".to_string());
                            if !summary.fallback_groups.contains(&group) {
                                summary.fallback_groups.push(group);
                            }
                        }
                        out.push(group_value.or(*fallback));
                    }
                    float_column(field, out)
                }
            };

            let remaining = filled.null_count();
            summary.filled.insert(field.clone(), missing - remaining);
            result.with_column(filled)?;
        }

        if !summary.fallback_groups.is_empty() {
            warn!(
                groups = ?summary.fallback_groups,
                "Group median unavailable, used the global median"
            );
        }
        info!(
            fields = summary.filled.len(),
            cells = summary.filled.values().sum::<usize>(),
            "Imputed missing values"
        );
        Ok((result, summary))
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, df: &DataFrame) -> Result<(DataFrame, ImputationSummary)> {
        self.fit(df)?;
        self.transform_with_summary(df)
    }

    /// Fail when any column still holds a missing value
    pub fn ensure_complete(df: &DataFrame) -> Result<()> {
        let missing = missing_summary(df);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(PrepError::UnhandledMissing(missing))
        }
    }

    fn group_medians(df: &DataFrame, column: &Column, group_by: &str) -> Result<FillValue> {
        let values = numeric_values(column)?;
        let keys = match df.column(group_by) {
            Ok(groups) => string_values(groups)?,
            Err(_) => {
                warn!(group_by, "Grouping field not present, using the global median");
                vec![None; values.len()]
            }
        };

        let mut grouped: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        let mut all = Vec::new();
        for (value, key) in values.into_iter().zip(keys) {
            if let Some(value) = value {
                all.push(value);
                if let Some(key) = key {
                    grouped.entry(key).or_default().push(value);
                }
            }
        }

        let medians = grouped
            .into_iter()
            .filter_map(|(key, mut group)| median(&mut group).map(|m| (key, m)))
            .collect();
        Ok(FillValue::GroupMedian {
            group_by: group_by.to_string(),
            medians,
            fallback: median(&mut all),
        })
    }

    fn most_frequent(column: &Column) -> Result<Option<FillValue>> {
        if is_string_column(column) {
            let labels = string_values(column)?.into_iter().flatten();
            return Ok(most_frequent_label(labels).map(FillValue::Category));
        }
        let mut values: Vec<f64> = numeric_values(column)?.into_iter().flatten().collect();
        Ok(most_frequent_number(&mut values).map(FillValue::Numeric))
    }
}

fn fill_strings(column: &Column, label: &str) -> Result<Column> {
    let values = string_values(column)?
        .into_iter()
        .map(|v| Some(v.unwrap_or_else(|| label.to_string())))
        .collect();
    Ok(string_column(column.name().as_str(), values))
}

/// Median of the values; the mean of the two middle values for an even count
pub fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

/// Most frequent label; ties go to the lexicographically smallest
pub fn most_frequent_label(labels: impl IntoIterator<Item = String>) -> Option<String> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }
    let top = counts.values().copied().max()?;
    counts
        .into_iter()
        .find(|(_, count)| *count == top)
        .map(|(label, _)| label)
}

/// Most frequent number; ties go to the smallest
pub fn most_frequent_number(values: &mut [f64]) -> Option<f64> {
    values.sort_by(|a, b| a.total_cmp(b));
    let mut best: Option<(f64, usize)> = None;
    let mut i = 0;
    while i < values.len() {
        let mut j = i;
        while j < values.len() && values[j] == values[i] {
            j += 1;
        }
        let run = j - i;
        if best.map_or(true, |(_, count)| run > count) {
            best = Some((values[i], run));
        }
        i = j;
    }
    best.map(|(value, _)| value)
}
