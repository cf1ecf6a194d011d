use thiserror::Error;

#[derive(Error, Debug)]
pub enum SequenceFileError {
    #[error("Can't read file: {0}")]
    FileReadError(String),

    #[error("Header has no pipe-delimited field {field}: {header}")]
    MalformedHeader { header: String, field: usize },

    #[error(transparent)]
    Fasta(#[from] seq_io::fasta::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
