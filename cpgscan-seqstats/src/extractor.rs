use std::fs;
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};

use cpgscan_core::fasta::FastaReader;
use cpgscan_core::utils::remove_all_extensions;

use crate::errors::SeqStatsError;
use crate::statistics::SequenceStatistics;

const FASTA_EXTENSIONS: [&str; 2] = ["fasta", "fa"];

///
/// Compute statistics for every record of a FASTA file and write them to a CSV table.
///
/// Records without any bases are skipped. Returns the number of rows written.
///
/// # Arguments
/// - fasta_file_path: FASTA file (plain or `.gz`)
/// - csv_file_path: where the table is written; parent directories are created
///
pub fn analyze_fasta_file<P: AsRef<Path>, Q: AsRef<Path>>(
    fasta_file_path: P,
    csv_file_path: Q,
) -> Result<usize, SeqStatsError> {
    let fasta_file_path = fasta_file_path.as_ref();
    let csv_file_path = csv_file_path.as_ref();

    if let Some(parent) = csv_file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(csv_file_path)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed}] {msg} ({per_sec})")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["-", "\\", "|", "/"]),
    );
    spinner.set_message(format!("Analyzing {}...", fasta_file_path.display()));

    let mut rows = 0;
    for record in FastaReader::from_path(fasta_file_path)? {
        let record = record?;
        if record.is_empty() {
            debug!("Skipping empty record {}", record.name());
            continue;
        }

        let stats = SequenceStatistics::try_from(&record)?;
        writer.serialize(&stats)?;
        rows += 1;
        spinner.inc(1);
    }

    writer.flush()?;
    spinner.finish_and_clear();

    info!(
        "Wrote statistics for {} records of {} to {}",
        rows,
        fasta_file_path.display(),
        csv_file_path.display()
    );

    Ok(rows)
}

fn is_fasta_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if name.starts_with('.') || !path.is_file() {
        return false;
    }
    let name = name.strip_suffix(".gz").unwrap_or(name);
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| FASTA_EXTENSIONS.contains(&ext))
}

///
/// Analyze every `.fasta`/`.fa` file (optionally gzipped) of a directory, writing
/// `<stem>.csv` for each into `output_dir`. Hidden files are ignored.
///
/// Returns the paths of the tables written, in file name order.
///
pub fn analyze_fasta_dir<P: AsRef<Path>, Q: AsRef<Path>>(
    fasta_dir: P,
    output_dir: Q,
) -> Result<Vec<PathBuf>, SeqStatsError> {
    let mut inputs: Vec<PathBuf> = fs::read_dir(fasta_dir.as_ref())?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?;
    inputs.retain(|p| is_fasta_file(p));
    inputs.sort();

    let mut outputs = Vec::with_capacity(inputs.len());
    for input in inputs {
        let output = output_dir
            .as_ref()
            .join(format!("{}.csv", remove_all_extensions(&input)));
        info!("Preliminary analysis of {} begins", input.display());
        analyze_fasta_file(&input, &output)?;
        outputs.push(output);
    }

    Ok(outputs)
}
