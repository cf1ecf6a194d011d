use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;

use cpgscan_seqstats::{analyze_fasta_dir, analyze_fasta_file};

pub fn run_seqstats(matches: &ArgMatches) -> Result<()> {
    let input = matches
        .get_one::<String>("input")
        .expect("--input is required");
    let output = matches
        .get_one::<String>("output")
        .expect("--output is required");

    let input = Path::new(input);
    if input.is_dir() {
        let written = analyze_fasta_dir(input, output)
            .with_context(|| format!("Failed to analyze FASTA files in {}", input.display()))?;
        info!("Wrote {} statistics tables to {output}", written.len());
    } else {
        let count = analyze_fasta_file(input, output)
            .with_context(|| format!("Failed to analyze {}", input.display()))?;
        info!("Wrote statistics for {count} sequences to {output}");
    }

    Ok(())
}
