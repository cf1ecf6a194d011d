use thiserror::Error;

use cpgscan_core::SequenceFileError;

#[derive(Error, Debug)]
pub enum SeqStatsError {
    #[error("Record {0} has no unambiguous bases")]
    NoUnambiguousBases(String),

    #[error("Record {record} has no {base} bases; observed/expected ratio is undefined")]
    ZeroBaseCount { record: String, base: char },

    #[error(transparent)]
    SequenceFile(#[from] SequenceFileError),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
