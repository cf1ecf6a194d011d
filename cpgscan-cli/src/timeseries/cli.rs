use clap::{Arg, Command, arg};

use cpgscan_timeseries::consts::DEFAULT_SEED_DATE;

pub const TIMESERIES_CMD: &str = "timeseries";

pub fn create_timeseries_cli() -> Command {
    Command::new(TIMESERIES_CMD)
        .about("Correlate daily-averaged CpG statistics with cumulative case counts.")
        .arg(
            arg!(--stats <STATS>)
                .required(true)
                .help("Per-sequence statistics CSV written by `seqstats`"),
        )
        .arg(
            arg!(--cases <CASES>)
                .required(true)
                .help("CSV of cumulative cases with columns date,total_cases"),
        )
        .arg(
            Arg::new("output-dir")
                .long("output-dir")
                .required(true)
                .help("Directory for the correlation table and charts"),
        )
        .arg(
            Arg::new("seed-rows")
                .long("seed-rows")
                .required(false)
                .help("Number of leading days pooled into the seed point, 0 disables pooling [default: 15]"),
        )
        .arg(
            Arg::new("seed-date")
                .long("seed-date")
                .default_value(DEFAULT_SEED_DATE)
                .help("Date given to the seed point (YYYY-MM-DD)"),
        )
        .arg(
            arg!(--window <WINDOW>)
                .required(false)
                .help("Rolling window in days [default: 10]"),
        )
        .arg(
            Arg::new("t-value")
                .long("t-value")
                .required(false)
                .help("Critical value for the confidence band (derived from --window by default)"),
        )
}
