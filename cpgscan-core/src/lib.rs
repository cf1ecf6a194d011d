//! # Core models and readers for cpgscan
//!
//! Shared building blocks for the cpgscan batch jobs:
//!
//! - [`models::SequenceRecord`]: an immutable header + bases pair, with helpers to pull the
//!   accession and collection date out of GISAID-style pipe-delimited headers
//! - [`fasta`]: readers for the rigid two-line alignment format and for standard multi-line FASTA
//! - [`utils`]: gzip-aware readers and small file helpers
//!
pub mod errors;
pub mod fasta;
pub mod models;
pub mod utils;

// re-exports
pub use errors::SequenceFileError;
pub use models::SequenceRecord;
