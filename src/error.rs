use std::path::PathBuf;

use thiserror::Error;

/// Fatal problems with input tables or snapshot files.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("input file not found: {}", path.display())]
    MissingFile { path: PathBuf },

    #[error("{} is missing required columns: {}", path.display(), columns.join(", "))]
    MissingColumns { path: PathBuf, columns: Vec<String> },

    #[error("{} contains no usable rows", path.display())]
    EmptyInput { path: PathBuf },

    #[error("CSV error in {}: {source}", path.display())]
    Csv { path: PathBuf, source: csv::Error },

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parquet error in {}: {source}", path.display())]
    Parquet {
        path: PathBuf,
        source: parquet::errors::ParquetError,
    },

    #[error("snapshot {} has no column `{column}`", path.display())]
    SnapshotColumn { path: PathBuf, column: String },
}

impl DataError {
    pub fn is_missing_input(&self) -> bool {
        matches!(
            self,
            DataError::MissingFile { .. } | DataError::MissingColumns { .. }
        )
    }
}
