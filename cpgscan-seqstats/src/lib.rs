//! Nucleotide composition and CpG statistics per sequence record.
//!
//! For every record of a FASTA file this crate computes base counts, the number of ambiguous
//! bases, CpG and GpC counts, base and dinucleotide percentages, GC content and the
//! observed/expected ratios of CpG and GpC, and writes them as one CSV row per record.

pub mod errors;
pub mod extractor;
pub mod statistics;

// re-exports
pub use errors::SeqStatsError;
pub use extractor::{analyze_fasta_dir, analyze_fasta_file};
pub use statistics::{BaseCounts, SequenceStatistics, count_dinucleotide};
