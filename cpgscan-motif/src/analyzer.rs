use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use log::info;
use serde::Serialize;

use crate::config::MotifRunConfig;
use crate::consts::SUMMARY_FILE_NAME;
use crate::errors::MotifResult;
use crate::frequency::{PositionFrequencyTable, ReferenceMap, aggregate_frequency};
use crate::pattern::MotifPattern;
use crate::records::{AllowList, ScanOutcome, scan_file_filtered};

///
/// Outcome of one motif scan: the frequency table plus bookkeeping counts.
///
#[derive(Debug, Serialize)]
pub struct MotifReport {
    pub motif: String,
    pub records_scanned: usize,
    pub records_retained: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_list_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessions_not_found: Option<usize>,
    pub positions: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip)]
    pub table: PositionFrequencyTable,
}

///
/// Scan an alignment for a motif, restrict it to the allow-list (if any) and aggregate the
/// positional frequency.
///
/// # Arguments
/// - alignment: two-line alignment file
/// - pattern: motif to look for
/// - allow_list: accessions to keep; every record is kept when `None`
/// - reference: alignment index to reference coordinate map
///
pub fn analyze_motif(
    alignment: &Path,
    pattern: &MotifPattern,
    allow_list: Option<&AllowList>,
    reference: &ReferenceMap,
) -> MotifResult<MotifReport> {
    info!("Analysis for \"{}\" motif begins...", pattern);

    let ScanOutcome {
        records: retained,
        scanned: records_scanned,
    } = scan_file_filtered(alignment, pattern, allow_list)?;

    let accessions_not_found = allow_list.map(|l| l.len().saturating_sub(retained.len()));
    if let (Some(allow_list), Some(missing)) = (allow_list, accessions_not_found) {
        info!(
            "{} accessions requested, {} not found among {} sequences",
            allow_list.len(),
            missing,
            records_scanned
        );
    }

    let table = aggregate_frequency(&retained, reference)?;

    Ok(MotifReport {
        motif: pattern.to_string(),
        records_scanned,
        records_retained: retained.len(),
        allow_list_size: allow_list.map(AllowList::len),
        accessions_not_found,
        positions: table.len(),
        output: None,
        table,
    })
}

///
/// Execute every run of a configuration, writing one frequency table per run and a JSON
/// summary into the configured output directory.
///
pub fn run_motif_config(config: &MotifRunConfig) -> MotifResult<Vec<MotifReport>> {
    let reference = ReferenceMap::from_file(&config.reference_map)?;
    info!(
        "Loaded {} reference coordinates from {}",
        reference.len(),
        config.reference_map.display()
    );

    let allow_list = config
        .accessions
        .as_ref()
        .map(AllowList::from_file)
        .transpose()?;

    std::fs::create_dir_all(&config.output_dir)?;

    let mut reports = Vec::with_capacity(config.runs.len());
    for run in &config.runs {
        let pattern = run.pattern()?;
        let output = config.output_dir.join(run.output_name()?);

        let mut report =
            analyze_motif(&config.alignment, &pattern, allow_list.as_ref(), &reference)?;
        report.table.write_csv(&output)?;
        info!("Wrote {} positions to {}", report.positions, output.display());

        report.output = Some(output.display().to_string());
        reports.push(report);
    }

    write_summary(&reports, config.output_dir.join(SUMMARY_FILE_NAME))?;

    Ok(reports)
}

pub fn write_summary<P: AsRef<Path>>(reports: &[MotifReport], path: P) -> MotifResult<()> {
    let writer = BufWriter::new(File::create(path.as_ref())?);
    serde_json::to_writer_pretty(writer, reports)?;
    Ok(())
}
