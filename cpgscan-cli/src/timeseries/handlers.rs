use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;

use cpgscan_timeseries::consts::{DEFAULT_SEED_ROWS, DEFAULT_WINDOW};
use cpgscan_timeseries::{CorrelationConfig, parse_date, run_correlation};

pub fn run_timeseries(matches: &ArgMatches) -> Result<()> {
    let stats = matches
        .get_one::<String>("stats")
        .expect("--stats is required");
    let cases = matches
        .get_one::<String>("cases")
        .expect("--cases is required");
    let output_dir = matches
        .get_one::<String>("output-dir")
        .expect("--output-dir is required");

    let seed_rows = matches
        .get_one::<String>("seed-rows")
        .map(|n| n.parse::<usize>())
        .transpose()
        .context("--seed-rows must be a non-negative integer")?
        .unwrap_or(DEFAULT_SEED_ROWS);
    let seed_date = parse_date(matches.get_one::<String>("seed-date").unwrap())?;
    let window = matches
        .get_one::<String>("window")
        .map(|n| n.parse::<usize>())
        .transpose()
        .context("--window must be a positive integer")?
        .unwrap_or(DEFAULT_WINDOW);
    let t_value = matches
        .get_one::<String>("t-value")
        .map(|t| t.parse::<f64>())
        .transpose()
        .context("--t-value must be a number")?;

    let config = CorrelationConfig {
        seed_rows,
        seed_date,
        window,
        t_value,
    };

    let outputs = run_correlation(
        Path::new(stats),
        Path::new(cases),
        Path::new(output_dir),
        &config,
    )?;
    info!(
        "Correlated {} days; table at {}",
        outputs.days,
        outputs.table.display()
    );

    Ok(())
}
