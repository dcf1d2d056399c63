//! CSV Data Loader Module
//! Reads the raw student performance table using Polars.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Default location of the dataset, relative to the working directory.
pub const DEFAULT_INPUT: &str = "StudentsPerformance.csv";

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("data unavailable at {}: {reason}", path.display())]
    DataUnavailable { path: PathBuf, reason: String },
}

impl LoaderError {
    fn unavailable(path: &Path, reason: impl Into<String>) -> Self {
        LoaderError::DataUnavailable {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}

/// Loads the raw table from a delimited file.
pub struct DataLoader {
    file_path: PathBuf,
}

impl DataLoader {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    /// Load the CSV file into a DataFrame.
    pub fn load(&self) -> Result<DataFrame, LoaderError> {
        let path = self.file_path.as_path();
        if !path.is_file() {
            return Err(LoaderError::unavailable(path, "file not found"));
        }

        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .finish()
            .and_then(|lazy| lazy.collect())
            .map_err(|e| LoaderError::unavailable(path, e.to_string()))?;

        if df.width() == 0 || df.height() == 0 {
            return Err(LoaderError::unavailable(path, "no rows"));
        }

        debug!(columns = ?Self::column_names(&df), "parsed header");
        info!(rows = df.height(), path = %path.display(), "loaded dataset");
        Ok(df)
    }

    /// Get list of column names from a DataFrame.
    pub fn column_names(df: &DataFrame) -> Vec<String> {
        df.get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_is_data_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let loader = DataLoader::new(dir.path().join("absent.csv"));
        let err = loader.load().unwrap_err();
        assert!(matches!(err, LoaderError::DataUnavailable { .. }));
        assert!(err.to_string().contains("absent.csv"));
    }

    #[test]
    fn test_header_only_file_is_data_unavailable() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "gender,math score").unwrap();
        let err = DataLoader::new(file.path()).load().unwrap_err();
        assert!(matches!(err, LoaderError::DataUnavailable { .. }));
    }

    #[test]
    fn test_loads_raw_columns_verbatim() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "\"gender\",\"race/ethnicity\",\"math score\"").unwrap();
        writeln!(file, "\"female\",\"group B\",\"72\"").unwrap();
        writeln!(file, "\"male\",\"group C\",\"69\"").unwrap();

        let df = DataLoader::new(file.path()).load().unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(
            DataLoader::column_names(&df),
            vec!["gender", "race/ethnicity", "math score"]
        );
    }
}
