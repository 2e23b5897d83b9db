//! Unified table and column access helpers
//!
//! The training and evaluation partitions are stacked into one frame so every
//! statistic (modes, medians, categories, skewness) sees both. The partition
//! boundary travels with the frame and is only used by [`UnifiedTable::split`].

use crate::error::{PrepError, Result};
use polars::prelude::*;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Check if dtype is numeric
pub(crate) fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

pub(crate) fn is_string_column(column: &Column) -> bool {
    matches!(column.dtype(), DataType::String)
}

/// Render a number the way a categorical code reads (`20`, not `20.0`)
pub(crate) fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Column values as `f64`, nulls preserved
pub(crate) fn numeric_values(column: &Column) -> Result<Vec<Option<f64>>> {
    let series = column.as_materialized_series().cast(&DataType::Float64)?;
    Ok(series.f64()?.into_iter().collect())
}

/// Column values as strings, nulls preserved
pub(crate) fn string_values(column: &Column) -> Result<Vec<Option<String>>> {
    let series = column.as_materialized_series();
    if is_string_column(column) {
        return Ok(series
            .str()?
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect());
    }
    if is_numeric_dtype(series.dtype()) {
        return Ok(numeric_values(column)?
            .into_iter()
            .map(|v| v.map(format_number))
            .collect());
    }
    let cast = series.cast(&DataType::String)?;
    Ok(cast
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

pub(crate) fn float_column(name: &str, values: Vec<Option<f64>>) -> Column {
    Column::from(Series::new(name.into(), values))
}

pub(crate) fn dense_float_column(name: &str, values: Vec<f64>) -> Column {
    Column::from(Series::new(name.into(), values))
}

pub(crate) fn string_column(name: &str, values: Vec<Option<String>>) -> Column {
    Column::from(Series::new(name.into(), values))
}

pub(crate) fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect()
}

/// Columns that still hold nulls, with their null counts
pub fn missing_summary(df: &DataFrame) -> Vec<(String, usize)> {
    df.get_columns()
        .iter()
        .filter(|c| c.null_count() > 0)
        .map(|c| (c.name().to_string(), c.null_count()))
        .collect()
}

/// Fail if a stage changed the number of rows
pub(crate) fn ensure_height(stage: &'static str, expected: usize, df: &DataFrame) -> Result<()> {
    if df.height() != expected {
        return Err(PrepError::RowCountChanged {
            stage,
            expected,
            actual: df.height(),
        });
    }
    Ok(())
}

/// Both partitions stacked, with the boundary carried explicitly
#[derive(Debug, Clone)]
pub struct UnifiedTable {
    frame: DataFrame,
    n_train: usize,
}

impl UnifiedTable {
    /// Stack training rows above evaluation rows.
    ///
    /// Columns are aligned by name in training order, evaluation-only columns
    /// appended. A column is stored as `String` when either side holds string
    /// values in it, otherwise as `Float64`. A column missing from one side is
    /// null-filled there.
    pub fn unify(train: &DataFrame, eval: &DataFrame) -> Result<Self> {
        let n_train = train.height();
        let n_eval = eval.height();

        let mut names = column_names(train);
        let mut seen: HashSet<String> = names.iter().cloned().collect();
        for name in column_names(eval) {
            if seen.insert(name.clone()) {
                names.push(name);
            }
        }

        let mut columns = Vec::with_capacity(names.len());
        for name in &names {
            let left = train.column(name).ok();
            let right = eval.column(name).ok();
            if left.is_none() || right.is_none() {
                warn!(
                    column = %name,
                    in_train = left.is_some(),
                    in_eval = right.is_some(),
                    "Column present in only one partition, null-filling the other"
                );
            }

            let as_string = [left, right]
                .into_iter()
                .flatten()
                .any(|c| is_string_column(c) && c.null_count() < c.len());

            let column = if as_string {
                let mut values = match left {
                    Some(c) => string_values(c)?,
                    None => vec![None; n_train],
                };
                values.extend(match right {
                    Some(c) => string_values(c)?,
                    None => vec![None; n_eval],
                });
                string_column(name, values)
            } else {
                let mut values = match left {
                    Some(c) => numeric_values(c)?,
                    None => vec![None; n_train],
                };
                values.extend(match right {
                    Some(c) => numeric_values(c)?,
                    None => vec![None; n_eval],
                });
                float_column(name, values)
            };
            columns.push(column);
        }

        let frame = DataFrame::new(columns)?;
        info!(
            train_rows = n_train,
            eval_rows = n_eval,
            columns = frame.width(),
            "Unified training and evaluation records"
        );
        Ok(Self { frame, n_train })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn n_train(&self) -> usize {
        self.n_train
    }

    pub fn n_eval(&self) -> usize {
        self.frame.height() - self.n_train
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    /// Replace the frame with the output of a stage.
    ///
    /// The row count may not change after unification.
    pub fn apply<F>(&mut self, stage: &'static str, f: F) -> Result<()>
    where
        F: FnOnce(&DataFrame) -> Result<DataFrame>,
    {
        let next = f(&self.frame)?;
        self.replace(stage, next)
    }

    /// Install a stage output computed from [`UnifiedTable::frame`]
    pub fn replace(&mut self, stage: &'static str, next: DataFrame) -> Result<()> {
        ensure_height(stage, self.frame.height(), &next)?;
        debug!(stage, columns = next.width(), "Stage applied");
        self.frame = next;
        Ok(())
    }

    /// Split back into (training features, evaluation features)
    pub fn split(self) -> (DataFrame, DataFrame) {
        let n_eval = self.n_eval();
        let train = self.frame.slice(0, self.n_train);
        let eval = self.frame.slice(self.n_train as i64, n_eval);
        (train, eval)
    }
}
