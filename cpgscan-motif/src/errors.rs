use thiserror::Error;

use cpgscan_core::SequenceFileError;

#[derive(Error, Debug)]
pub enum MotifError {
    #[error("Invalid motif pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("No records retained after filtering; cannot compute percentages")]
    NoRecordsRetained,

    #[error("Position {0} has no entry in the reference coordinate map")]
    UnmappedPosition(usize),

    #[error("Error parsing reference map at line {line}: {reason}")]
    ReferenceMapParse { line: usize, reason: String },

    #[error("Invalid run configuration: {0}")]
    InvalidRunConfig(String),

    #[error(transparent)]
    SequenceFile(#[from] SequenceFileError),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type MotifResult<T> = std::result::Result<T, MotifError>;
