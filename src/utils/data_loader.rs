//! Data loading utilities

use crate::error::{PrepError, Result};
use crate::preprocessing::PreprocessingConfig;
use polars::prelude::*;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};

/// CSV loader for the housing tables
#[derive(Debug, Clone)]
pub struct DataLoader {
    separator: u8,
    null_tokens: Vec<String>,
    /// Rows used for type inference; `None` scans the whole file
    infer_schema_length: Option<usize>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    /// Create a new data loader
    pub fn new() -> Self {
        Self {
            separator: b',',
            null_tokens: vec!["NA".to_string()],
            infer_schema_length: None,
        }
    }

    /// Loader using the separator and null tokens of a pipeline configuration
    pub fn from_config(config: &PreprocessingConfig) -> Self {
        Self::new()
            .with_separator(config.separator)
            .with_null_tokens(config.null_tokens.clone())
    }

    /// Set the field separator
    pub fn with_separator(mut self, separator: u8) -> Self {
        self.separator = separator;
        self
    }

    /// Set the cell values read as missing
    pub fn with_null_tokens(mut self, tokens: Vec<String>) -> Self {
        self.null_tokens = tokens;
        self
    }

    /// Load a CSV file with a header row
    pub fn load_csv(&self, path: impl AsRef<Path>) -> Result<DataFrame> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(PrepError::MissingInput(path.to_path_buf()));
        }

        let null_values = NullValues::AllColumns(
            self.null_tokens.iter().map(|t| t.as_str().into()).collect(),
        );
        let parse_opts = CsvParseOptions::default()
            .with_separator(self.separator)
            .with_null_values(Some(null_values));

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(self.infer_schema_length)
            .with_parse_options(parse_opts)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()?;

        info!(
            path = %path.display(),
            rows = df.height(),
            columns = df.width(),
            "Loaded CSV"
        );
        Ok(df)
    }

    /// Write a frame as CSV with a header row
    pub fn write_csv(df: &mut DataFrame, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut file = File::create(path)?;
        CsvWriter::new(&mut file).include_header(true).finish(df)?;
        debug!(path = %path.display(), rows = df.height(), "Wrote CSV");
        Ok(())
    }

    /// Get file info without loading full data
    pub fn get_file_info(&self, path: impl AsRef<Path>) -> Result<FileInfo> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(PrepError::MissingInput(path.to_path_buf()));
        }
        let file_size = std::fs::metadata(path)?.len();

        let mut lines = BufReader::new(File::open(path)?).lines();
        let header = lines.next().transpose()?.unwrap_or_default();
        let separator = char::from(self.separator);
        let columns: Vec<String> = header
            .split(separator)
            .map(|s| s.trim().trim_matches('"').to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let n_rows = lines.count();

        Ok(FileInfo {
            path: path.display().to_string(),
            file_size,
            n_rows,
            n_cols: columns.len(),
            columns,
        })
    }
}

/// File information
#[derive(Debug, Clone)]
pub struct FileInfo {
    pub path: String,
    pub file_size: u64,
    pub n_rows: usize,
    pub n_cols: usize,
    pub columns: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_fixture(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("train.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "Id,LotFrontage,Alley,SalePrice").unwrap();
        writeln!(file, "1,65,NA,208500").unwrap();
        writeln!(file, "2,NA,Grvl,181500").unwrap();
        writeln!(file, "3,68,NA,223500").unwrap();
        path
    }

    #[test]
    fn test_load_csv_reads_na_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(dir.path());

        let df = DataLoader::new().load_csv(&path).unwrap();
        assert_eq!(df.height(), 3);
        assert_eq!(df.column("LotFrontage").unwrap().null_count(), 1);
        assert_eq!(df.column("Alley").unwrap().null_count(), 2);
        assert!(df.column("LotFrontage").unwrap().dtype().is_primitive_numeric());
    }

    #[test]
    fn test_missing_file() {
        let result = DataLoader::new().load_csv("/nonexistent/train.csv");
        assert!(matches!(result, Err(PrepError::MissingInput(_))));
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let mut df = df!("a" => &[1.5, 2.0], "b" => &[0.0, 1.0]).unwrap();

        DataLoader::write_csv(&mut df, &path).unwrap();
        let back = DataLoader::new().load_csv(&path).unwrap();
        assert_eq!(back.shape(), (2, 2));
    }

    #[test]
    fn test_config_loader_reads_all_null_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eval.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "Id,MSZoning,LotFrontage").unwrap();
        writeln!(file, "1,RL,65").unwrap();
        writeln!(file, "2,null,NaN").unwrap();
        writeln!(file, "3,N/A,70").unwrap();
        drop(file);

        let df = DataLoader::from_config(&PreprocessingConfig::default())
            .load_csv(&path)
            .unwrap();
        assert_eq!(df.column("MSZoning").unwrap().null_count(), 2);
        assert_eq!(df.column("LotFrontage").unwrap().null_count(), 1);
    }

    #[test]
    fn test_file_info() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(dir.path());

        let info = DataLoader::new().get_file_info(&path).unwrap();
        assert_eq!(info.n_rows, 3);
        assert_eq!(info.n_cols, 4);
        assert_eq!(info.columns[0], "Id");
    }
}
