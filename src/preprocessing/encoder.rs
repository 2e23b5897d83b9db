//! Categorical encoding
//!
//! Forced categoricals are cast to strings first, ordinal fields are replaced
//! in place by their scale rank, and every remaining string column is expanded
//! into 0/1 indicator columns appended after the numeric block.

use super::frame::{dense_float_column, is_string_column, string_column, string_values};
use super::schema::{
    is_forced_categorical, FieldDescriptor, FieldRole, OrdinalScale, FORCED_CATEGORICAL_FIELDS,
    ORDINAL_FIELDS,
};
use crate::error::{PrepError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

/// What an encoding pass produced
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EncodingSummary {
    /// Fields ranked on an ordinal scale
    pub ordinal_fields: Vec<String>,
    /// Field -> labels the scale did not know (ranked 0)
    pub unknown_labels: BTreeMap<String, BTreeSet<String>>,
    /// Field -> number of cells with an unknown label
    pub unknown_counts: BTreeMap<String, usize>,
    /// Nominal fields expanded into indicators
    pub nominal_fields: Vec<String>,
    /// Names of the generated indicator columns
    pub indicator_columns: Vec<String>,
    /// Catalog fields (ordinal or forced categorical) absent from the frame
    pub skipped_fields: Vec<String>,
}

/// Categorical encoder for the housing schema
#[derive(Debug, Clone, Default)]
pub struct CategoricalEncoder {
    /// Nominal field -> sorted categories seen during fit
    categories: Vec<(String, Vec<String>)>,
    skipped_fields: Vec<String>,
    is_fitted: bool,
}

impl CategoricalEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Categories learned for a nominal field
    pub fn categories(&self, field: &str) -> Option<&[String]> {
        self.categories
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, categories)| categories.as_slice())
    }

    /// Cast forced categorical fields (integer codes) to strings
    pub fn force_categoricals(df: &DataFrame) -> Result<DataFrame> {
        let mut result = df.clone();
        for column in df.get_columns() {
            let name = column.name().as_str();
            if is_forced_categorical(name) && !is_string_column(column) {
                debug!(field = name, "Casting code field to categorical");
                result.with_column(string_column(name, string_values(column)?))?;
            }
        }
        Ok(result)
    }

    /// Catalog fields the last fit did not find
    pub fn skipped_fields(&self) -> &[String] {
        &self.skipped_fields
    }

    /// Learn the category set of every nominal field
    pub fn fit(&mut self, df: &DataFrame) -> Result<&mut Self> {
        let df = Self::force_categoricals(df)?;
        self.categories.clear();
        self.skipped_fields.clear();

        let catalog = ORDINAL_FIELDS
            .iter()
            .map(|(field, _)| *field)
            .chain(FORCED_CATEGORICAL_FIELDS.iter().copied());
        for field in catalog {
            if df.column(field).is_err() {
                warn!(field, "Catalog field not present, skipping encoding");
                self.skipped_fields.push(field.to_string());
            }
        }

        for column in df.get_columns() {
            let descriptor =
                FieldDescriptor::classify(column.name().as_str(), is_string_column(column));
            if let FieldRole::Nominal = descriptor.role {
                let categories: BTreeSet<String> =
                    string_values(column)?.into_iter().flatten().collect();
                debug!(
                    field = %descriptor.name,
                    categories = categories.len(),
                    "Learned nominal categories"
                );
                self.categories
                    .push((descriptor.name, categories.into_iter().collect()));
            }
        }

        self.is_fitted = true;
        Ok(self)
    }

    /// Encode the frame
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        self.transform_with_summary(df).map(|(df, _)| df)
    }

    /// Encode the frame and report what was produced
    pub fn transform_with_summary(
        &self,
        df: &DataFrame,
    ) -> Result<(DataFrame, EncodingSummary)> {
        if !self.is_fitted {
            return Err(PrepError::NotFitted("categorical encoder"));
        }

        let df = Self::force_categoricals(df)?;
        let mut summary = EncodingSummary {
            skipped_fields: self.skipped_fields.clone(),
            ..Default::default()
        };
        let mut leading = Vec::with_capacity(df.width());
        let mut indicators = Vec::new();

        for column in df.get_columns() {
            let descriptor =
                FieldDescriptor::classify(column.name().as_str(), is_string_column(column));
            match descriptor.role {
                FieldRole::Numeric => leading.push(column.clone()),
                FieldRole::Ordinal(scale) => {
                    leading.push(Self::rank_column(column, scale, &mut summary)?);
                    summary.ordinal_fields.push(descriptor.name);
                }
                FieldRole::Nominal => {
                    let categories = self.categories(&descriptor.name).ok_or_else(|| {
                        PrepError::FeatureNotFound(format!(
                            "{} (not seen when the encoder was fitted)",
                            descriptor.name
                        ))
                    })?;
                    let values = string_values(column)?;
                    for category in categories {
                        let name = format!("{}_{}", descriptor.name, category);
                        let flags = values
                            .iter()
                            .map(|v| {
                                if v.as_deref() == Some(category.as_str()) {
                                    1.0
                                } else {
                                    0.0
                                }
                            })
                            .collect();
                        summary.indicator_columns.push(name.clone());
                        indicators.push(dense_float_column(&name, flags));
                    }
                    summary.nominal_fields.push(descriptor.name);
                }
            }
        }

        leading.extend(indicators);
        let encoded = DataFrame::new(leading)?;
        info!(
            ordinal = summary.ordinal_fields.len(),
            nominal = summary.nominal_fields.len(),
            indicators = summary.indicator_columns.len(),
            width = encoded.width(),
            "Encoded categorical fields"
        );
        Ok((encoded, summary))
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, df: &DataFrame) -> Result<(DataFrame, EncodingSummary)> {
        self.fit(df)?;
        self.transform_with_summary(df)
    }

    fn rank_column(
        column: &Column,
        scale: &OrdinalScale,
        summary: &mut EncodingSummary,
    ) -> Result<Column> {
        let name = column.name().to_string();
        let mut unknown = 0usize;
        let ranks: Vec<f64> = string_values(column)?
            .into_iter()
            .map(|value| match value.as_deref().and_then(|v| scale.rank_of(v)) {
                Some(rank) => f64::from(rank),
                None => {
                    unknown += 1;
                    if let Some(label) = value {
                        summary
                            .unknown_labels
                            .entry(name.clone())
                            .or_default()
                            .insert(label);
                    }
                    0.0
                }
            })
            .collect();

        if unknown > 0 {
            warn!(
                field = %name,
                scale = scale.name,
                cells = unknown,
                labels = ?summary.unknown_labels.get(&name),
                "Labels outside the ordinal scale ranked 0"
            );
            summary.unknown_counts.insert(name.clone(), unknown);
        }
        Ok(dense_float_column(&name, ranks))
    }
}
