//! # Motif location and positional frequency
//!
//! Scans aligned genomes for short regulatory motifs (CpG sites and the ZAP-binding motif family
//! `C n{m} G n C G`), keeps the sequences of interest and tabulates how often each alignment
//! position carries a hit, mapped back to reference coordinates.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use cpgscan_motif::{AllowList, ReferenceMap, analyze_motif, build_motif_pattern};
//!
//! let reference = ReferenceMap::from_file("mapping.csv").unwrap();
//! let allow_list = AllowList::from_file("accession_ids.txt").unwrap();
//!
//! let report = analyze_motif(
//!     Path::new("msa_0902.fasta"),
//!     &build_motif_pattern(4),
//!     Some(&allow_list),
//!     &reference,
//! )
//! .unwrap();
//!
//! report.table.write_csv("counter_file_zap_4_motif.csv").unwrap();
//! ```
pub mod analyzer;
pub mod config;
pub mod consts;
pub mod errors;
pub mod frequency;
pub mod pattern;
pub mod records;

// re-exports
pub use analyzer::*;
pub use config::*;
pub use errors::*;
pub use frequency::*;
pub use pattern::*;
pub use records::*;
