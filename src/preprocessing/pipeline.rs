//! Housing preprocessing pipeline

use super::{
    config::{OutputFiles, PreprocessingConfig},
    encoder::CategoricalEncoder,
    frame::{numeric_values, UnifiedTable},
    imputer::Imputer,
    outlier::OutlierFilter,
    skew::{SkewCorrector, SkewedColumn},
    target::TargetTransformer,
};
use crate::error::{PrepError, Result};
use crate::utils::DataLoader;
use ndarray::{Array1, Array2};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// Counters collected while the pipeline runs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineReport {
    pub raw_train_rows: usize,
    pub raw_eval_rows: usize,
    pub outliers_removed: usize,
    pub train_rows: usize,
    pub eval_rows: usize,
    /// Catalog fields absent from the data
    pub skipped_fields: Vec<String>,
    /// Field -> cells filled
    pub filled: BTreeMap<String, usize>,
    pub fallback_groups: Vec<String>,
    pub unknown_ordinal_labels: BTreeMap<String, BTreeSet<String>>,
    pub unknown_ordinal_counts: BTreeMap<String, usize>,
    pub indicator_columns: usize,
    pub skewed_columns: Vec<SkewedColumn>,
    pub log1p_unsafe_columns: Vec<SkewedColumn>,
    pub feature_count: usize,
    pub elapsed_secs: f64,
}

impl PipelineReport {
    /// Write the report as pretty JSON
    pub fn to_json_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Model-ready output of a pipeline run
#[derive(Debug, Clone)]
pub struct ProcessedDataset {
    pub train_features: DataFrame,
    pub eval_features: DataFrame,
    /// Log-transformed training target
    pub target: Series,
    pub train_ids: Option<Series>,
    pub eval_ids: Option<Series>,
    pub report: PipelineReport,
}

impl ProcessedDataset {
    pub fn feature_names(&self) -> Vec<String> {
        self.train_features
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }

    pub fn train_matrix(&self) -> Result<Array2<f64>> {
        frame_to_matrix(&self.train_features)
    }

    pub fn eval_matrix(&self) -> Result<Array2<f64>> {
        frame_to_matrix(&self.eval_features)
    }

    pub fn target_vector(&self) -> Result<Array1<f64>> {
        let values = self
            .target
            .f64()?
            .into_iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect::<Vec<_>>();
        Ok(Array1::from_vec(values))
    }

    /// Write the three output tables into `out_dir`
    pub fn write_outputs(
        &self,
        out_dir: impl AsRef<Path>,
        files: &OutputFiles,
    ) -> Result<Vec<PathBuf>> {
        let out_dir = out_dir.as_ref();
        std::fs::create_dir_all(out_dir)?;

        let train_path = out_dir.join(&files.train_features);
        let target_path = out_dir.join(&files.train_target);
        let eval_path = out_dir.join(&files.eval_features);

        DataLoader::write_csv(&mut self.train_features.clone(), &train_path)?;
        let mut target = DataFrame::new(vec![Column::from(self.target.clone())])?;
        DataLoader::write_csv(&mut target, &target_path)?;
        DataLoader::write_csv(&mut self.eval_features.clone(), &eval_path)?;

        info!(dir = %out_dir.display(), "Wrote processed datasets");
        Ok(vec![train_path, target_path, eval_path])
    }
}

fn frame_to_matrix(df: &DataFrame) -> Result<Array2<f64>> {
    let (n_rows, n_cols) = df.shape();
    let columns = df
        .get_columns()
        .iter()
        .map(numeric_values)
        .collect::<Result<Vec<_>>>()?;

    // Row-major flattening
    let mut flat = Vec::with_capacity(n_rows * n_cols);
    for i in 0..n_rows {
        for column in &columns {
            flat.push(column.get(i).copied().flatten().unwrap_or(f64::NAN));
        }
    }
    Ok(Array2::from_shape_vec((n_rows, n_cols), flat)?)
}

/// End-to-end preprocessor for the housing dataset
#[derive(Debug, Clone, Default)]
pub struct HousingPreprocessor {
    config: PreprocessingConfig,
}

impl HousingPreprocessor {
    /// Create a new preprocessor with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new preprocessor with custom configuration
    pub fn with_config(config: PreprocessingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PreprocessingConfig {
        &self.config
    }

    /// Load both CSV files and run the pipeline
    pub fn run_files(
        &self,
        train_path: impl AsRef<Path>,
        eval_path: impl AsRef<Path>,
    ) -> Result<ProcessedDataset> {
        let loader = DataLoader::from_config(&self.config);
        let train = loader.load_csv(train_path)?;
        let eval = loader.load_csv(eval_path)?;
        self.run(&train, &eval)
    }

    /// Run every stage on a training frame (with target) and an evaluation frame
    pub fn run(&self, train: &DataFrame, eval: &DataFrame) -> Result<ProcessedDataset> {
        self.config.validate()?;
        let start = Instant::now();
        let mut report = PipelineReport {
            raw_train_rows: train.height(),
            raw_eval_rows: eval.height(),
            ..Default::default()
        };

        let outliers = OutlierFilter::new(self.config.outlier.clone(), &self.config.target_column);
        let mut skipped = outliers.missing_columns(train);
        let (train, removed) = outliers.filter(train)?;
        report.outliers_removed = removed;

        let target = TargetTransformer::new(
            &self.config.target_column,
            &self.config.target_output_name,
        );
        let (train, target) = target.extract(&train)?;

        let mut eval = eval.clone();
        if eval.column(&self.config.target_column).is_ok() {
            warn!(
                column = %self.config.target_column,
                "Evaluation records carry the target column, dropping it"
            );
            eval = eval.drop(&self.config.target_column)?;
        }

        let (train, train_ids) = self.take_id(train)?;
        let (eval, eval_ids) = self.take_id(eval)?;

        let mut table = UnifiedTable::unify(&train, &eval)?;

        let mut imputer = Imputer::from_catalog();
        let (imputed, imputation) = imputer.fit_transform(table.frame())?;
        table.replace("imputation", imputed)?;
        Imputer::ensure_complete(table.frame())?;
        skipped.extend(imputation.skipped_fields);
        report.filled = imputation.filled;
        report.fallback_groups = imputation.fallback_groups;

        let mut encoder = CategoricalEncoder::new();
        let (encoded, encoding) = encoder.fit_transform(table.frame())?;
        table.replace("encoding", encoded)?;
        report.unknown_ordinal_labels = encoding.unknown_labels;
        report.unknown_ordinal_counts = encoding.unknown_counts;
        report.indicator_columns = encoding.indicator_columns.len();
        skipped.extend(encoding.skipped_fields);
        let mut seen = BTreeSet::new();
        skipped.retain(|field| seen.insert(field.clone()));
        if !skipped.is_empty() {
            info!(fields = skipped.len(), "Catalog fields absent from the data");
        }
        report.skipped_fields = skipped;

        let mut skew = SkewCorrector::new(self.config.skew_threshold, self.config.indicator_skew);
        table.apply("skew correction", |df| {
            skew.fit_transform(df, &encoding.indicator_columns)
        })?;
        report.skewed_columns = skew.summary().transformed.clone();
        report.log1p_unsafe_columns = skew.summary().unsafe_columns.clone();

        let (train_features, eval_features) = table.split();
        if train_features.height() != target.len() {
            return Err(PrepError::ShapeError {
                expected: format!("{} target values", train_features.height()),
                actual: format!("{} target values", target.len()),
            });
        }

        report.train_rows = train_features.height();
        report.eval_rows = eval_features.height();
        report.feature_count = train_features.width();
        report.elapsed_secs = start.elapsed().as_secs_f64();

        info!(
            train_rows = report.train_rows,
            eval_rows = report.eval_rows,
            features = report.feature_count,
            elapsed_secs = report.elapsed_secs,
            "Preprocessing complete"
        );

        Ok(ProcessedDataset {
            train_features,
            eval_features,
            target,
            train_ids,
            eval_ids,
            report,
        })
    }

    /// Remove the id column, returning it separately
    fn take_id(&self, df: DataFrame) -> Result<(DataFrame, Option<Series>)> {
        let Some(id) = self.config.id_column.as_deref() else {
            return Ok((df, None));
        };
        match df.column(id) {
            Ok(column) => {
                let ids = column.as_materialized_series().clone();
                Ok((df.drop(id)?, Some(ids)))
            }
            Err(_) => Ok((df, None)),
        }
    }
}
