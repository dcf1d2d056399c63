//! Data Processor Module
//! Column-name normalization and numeric re-encoding of categorical fields.

use crate::data::schema::{
    normalize_column_name, BinaryField, CategoricalField, BINARY_FIELDS, EXPECTED_COLUMNS,
    ONE_HOT_FIELDS, SCORE_COLUMNS,
};
use polars::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("missing column '{0}'")]
    MissingColumn(String),
    #[error("unmapped category '{value}' in column '{column}' at row {row}")]
    UnmappedCategory {
        column: String,
        value: String,
        row: usize,
    },
    #[error("non-numeric value in column '{column}' at row {row}")]
    InvalidScore { column: String, row: usize },
}

/// What to do with a categorical value outside its declared domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryPolicy {
    /// Fail with `UnmappedCategory`.
    #[default]
    Strict,
    /// Encode the cell as missing and carry on.
    Lenient,
}

/// Handles data cleaning and transformation operations.
pub struct DataProcessor;

impl DataProcessor {
    /// Rename every column to its canonical form and check the expected set is present.
    ///
    /// Idempotent: normalizing an already normalized table returns an equal table.
    pub fn normalize_columns(df: &DataFrame) -> Result<DataFrame, ProcessorError> {
        let columns: Vec<Column> = df
            .get_columns()
            .iter()
            .map(|column| {
                let mut renamed = column.clone();
                renamed.rename(normalize_column_name(column.name().as_str()).into());
                renamed
            })
            .collect();
        let normalized = DataFrame::new(columns)?;

        for expected in EXPECTED_COLUMNS {
            if normalized.column(expected).is_err() {
                return Err(ProcessorError::MissingColumn(expected.to_string()));
            }
        }

        Ok(normalized)
    }

    /// Re-encode a normalized raw table into an all-numeric table.
    ///
    /// Binary fields become `Int32` codes in place, scores become `Float64`, and the
    /// multi-valued fields are replaced by `Int32` indicator columns appended at the end.
    /// Columns outside the expected schema are not carried over.
    pub fn encode(df: &DataFrame, policy: CategoryPolicy) -> Result<DataFrame, ProcessorError> {
        let mut columns: Vec<Column> = Vec::new();

        for name in df.get_column_names() {
            let name = name.as_str();
            if let Some(field) = BINARY_FIELDS.iter().find(|f| f.column == name) {
                columns.push(Self::encode_binary(df, field, policy)?);
            } else if SCORE_COLUMNS.contains(&name) {
                columns.push(Self::encode_score(df, name)?);
            } else if !ONE_HOT_FIELDS.iter().any(|f| f.column == name) {
                debug!(column = name, "dropping column outside schema");
            }
        }

        for field in &ONE_HOT_FIELDS {
            columns.extend(Self::encode_one_hot(df, field, policy)?);
        }

        let encoded = DataFrame::new(columns)?;
        info!(
            rows = encoded.height(),
            columns = encoded.width(),
            "encoded categorical fields"
        );
        Ok(encoded)
    }

    /// Read a string column as owned optional values.
    pub fn string_values(df: &DataFrame, column: &str) -> Result<Vec<Option<String>>, ProcessorError> {
        let series = df
            .column(column)
            .map_err(|_| ProcessorError::MissingColumn(column.to_string()))?;
        let as_str = series.cast(&DataType::String)?;
        let values = as_str
            .str()?
            .into_iter()
            .map(|v| v.map(|s| s.to_string()))
            .collect();
        Ok(values)
    }

    fn encode_binary(
        df: &DataFrame,
        field: &BinaryField,
        policy: CategoryPolicy,
    ) -> Result<Column, ProcessorError> {
        let values = Self::string_values(df, field.column)?;
        let mut codes: Vec<Option<i32>> = Vec::with_capacity(values.len());

        for (row, value) in values.iter().enumerate() {
            let code = value.as_deref().and_then(|v| field.code(v));
            if code.is_none() {
                Self::unmapped(field.column, value.as_deref(), row, policy)?;
            }
            codes.push(code);
        }

        Ok(Column::new(field.column.into(), codes))
    }

    fn encode_one_hot(
        df: &DataFrame,
        field: &CategoricalField,
        policy: CategoryPolicy,
    ) -> Result<Vec<Column>, ProcessorError> {
        let values = Self::string_values(df, field.column)?;
        let levels = field.encoded_levels();
        let mut indicators: Vec<Vec<Option<i32>>> =
            vec![Vec::with_capacity(values.len()); levels.len()];

        for (row, value) in values.iter().enumerate() {
            let known = value.as_deref().filter(|v| field.contains(v));
            if known.is_none() {
                Self::unmapped(field.column, value.as_deref(), row, policy)?;
            }
            for (level, column) in levels.iter().zip(indicators.iter_mut()) {
                column.push(known.map(|v| i32::from(v == *level)));
            }
        }

        Ok(levels
            .iter()
            .zip(indicators)
            .map(|(level, values)| Column::new(field.indicator_name(level).into(), values))
            .collect())
    }

    fn encode_score(df: &DataFrame, column: &str) -> Result<Column, ProcessorError> {
        let original = df
            .column(column)
            .map_err(|_| ProcessorError::MissingColumn(column.to_string()))?;
        let cast = original.cast(&DataType::Float64)?;

        let ca = cast.f64()?;
        if let Some(row) = ca.into_iter().position(|v| v.is_none()) {
            return Err(ProcessorError::InvalidScore {
                column: column.to_string(),
                row,
            });
        }

        Ok(cast)
    }

    fn unmapped(
        column: &str,
        value: Option<&str>,
        row: usize,
        policy: CategoryPolicy,
    ) -> Result<(), ProcessorError> {
        let value = value.unwrap_or("<null>");
        match policy {
            CategoryPolicy::Strict => Err(ProcessorError::UnmappedCategory {
                column: column.to_string(),
                value: value.to_string(),
                row,
            }),
            CategoryPolicy::Lenient => {
                warn!(column, value, row, "unmapped category encoded as missing");
                Ok(())
            }
        }
    }

    /// Names of the indicator columns produced for a field, in table order.
    pub fn indicator_columns(field: &CategoricalField) -> Vec<String> {
        field
            .encoded_levels()
            .iter()
            .map(|level| field.indicator_name(level))
            .collect()
    }
}
