use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use log::info;

use cpgscan_motif::{
    AllowList, MotifPattern, MotifRunConfig, ReferenceMap, analyze_motif, build_motif_pattern,
    run_motif_config,
};

pub fn run_motif(matches: &ArgMatches) -> Result<()> {
    if let Some(config) = matches.get_one::<String>("config") {
        let config = MotifRunConfig::try_from(Path::new(config))
            .with_context(|| format!("Failed to load motif config {config}"))?;
        let reports = run_motif_config(&config)?;
        info!(
            "Finished {} motif runs into {}",
            reports.len(),
            config.output_dir.display()
        );
        return Ok(());
    }

    let (Some(alignment), Some(reference_map), Some(output)) = (
        matches.get_one::<String>("alignment"),
        matches.get_one::<String>("reference-map"),
        matches.get_one::<String>("output"),
    ) else {
        bail!("Either --config or all of --alignment, --reference-map and --output are required");
    };

    let pattern: MotifPattern = match (
        matches.get_one::<String>("motif"),
        matches.get_one::<String>("zap"),
    ) {
        (Some(motif), None) => motif.parse()?,
        (None, Some(m)) => {
            let m: usize = m.parse().context("--zap must be a non-negative integer")?;
            build_motif_pattern(m)
        }
        _ => bail!("Exactly one of --motif or --zap is required"),
    };

    let reference = ReferenceMap::from_file(reference_map)
        .with_context(|| format!("Failed to read reference map {reference_map}"))?;
    let allow_list = matches
        .get_one::<String>("accessions")
        .map(AllowList::from_file)
        .transpose()?;

    let report = analyze_motif(
        Path::new(alignment),
        &pattern,
        allow_list.as_ref(),
        &reference,
    )?;
    report.table.write_csv(output)?;

    info!(
        "{} of {} sequences retained, {} positions written to {}",
        report.records_retained, report.records_scanned, report.positions, output
    );

    Ok(())
}
