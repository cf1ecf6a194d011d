//! # Time-series correlation of CpG statistics
//!
//! Averages per-sequence statistics by collection date, pools the sparse early days into a
//! single seed point and joins the result with a cumulative case-count series. The joined
//! table is written as CSV together with SVG charts of the CpG count and CpG percentage
//! against the number of infections.
//!
//! ```rust,no_run
//! use std::path::Path;
//! use cpgscan_timeseries::{CorrelationConfig, run_correlation};
//!
//! let outputs = run_correlation(
//!     Path::new("csv_files/filtered_sars_cov2.csv"),
//!     Path::new("other_data_files/world_cases.csv"),
//!     Path::new("figures"),
//!     &CorrelationConfig::default(),
//! ).unwrap();
//! println!("{} days written to {}", outputs.days, outputs.table.display());
//! ```
pub mod cases;
pub mod consts;
pub mod correlate;
pub mod daily;
pub mod errors;
pub mod models;
pub mod plot;
pub mod rolling;

pub use cases::*;
pub use correlate::*;
pub use daily::*;
pub use errors::*;
pub use models::*;
pub use rolling::*;
