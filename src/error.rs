use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed score table: {0}")]
    Csv(#[from] csv::Error),

    #[error("score row {row}: {reason}")]
    InvalidScore { row: u64, reason: String },

    #[error("score dataset {path} contains no usable rows")]
    EmptyDataset { path: PathBuf },

    #[error("no eligible test rows were selected; lower --min-matches or raise --fraction")]
    NoTestRows
}
