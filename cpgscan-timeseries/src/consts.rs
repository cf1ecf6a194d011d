/// Days averaged into the single seed point that opens the series.
pub const DEFAULT_SEED_ROWS: usize = 15;

/// Date given to the seed point; the case series starts the day after.
pub const DEFAULT_SEED_DATE: &str = "2020-01-21";

pub const DEFAULT_WINDOW: usize = 10;

/// Two-sided 95% t-value for a 10-day window (9 degrees of freedom).
pub const DEFAULT_T_VALUE: f64 = 2.262;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub const CORRELATION_TABLE_NAME: &str = "cpg_vs_cases.csv";
