use std::path::Path;

use fxhash::FxHashSet;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};

use cpgscan_core::SequenceRecord;
use cpgscan_core::fasta::TwoLineReader;
use cpgscan_core::models::record::accession_from_header;
use cpgscan_core::utils::read_identifier_list;

use crate::errors::MotifResult;
use crate::pattern::{MotifPattern, locate};

///
/// Motif hits for one sequence of the alignment.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    /// full header of the record, without the leading `>`
    pub record_identifier: String,
    pub match_count: usize,
    pub match_positions: Vec<usize>,
}

impl MatchRecord {
    pub fn from_record(pattern: &MotifPattern, record: &SequenceRecord) -> Self {
        let match_positions = locate(pattern, &record.bases);
        MatchRecord {
            record_identifier: record.header.clone(),
            match_count: match_positions.len(),
            match_positions,
        }
    }

    ///
    /// Accession of the record (second pipe-delimited field of its header).
    ///
    pub fn accession(&self) -> MotifResult<&str> {
        Ok(accession_from_header(&self.record_identifier)?)
    }
}

///
/// Records kept by a scan, plus how many records the file held.
///
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    pub records: Vec<MatchRecord>,
    pub scanned: usize,
}

///
/// Scan every record of a two-line alignment file for `pattern`.
///
/// Pairs whose first line is not a header, and a trailing header with no sequence line, are
/// skipped. Any I/O error aborts the scan.
///
/// # Arguments
/// - path: path to the alignment (plain or `.gz`)
/// - pattern: the motif to look for
///
pub fn scan_file<P: AsRef<Path>>(path: P, pattern: &MotifPattern) -> MotifResult<Vec<MatchRecord>> {
    Ok(scan_file_filtered(path, pattern, None)?.records)
}

///
/// Like [`scan_file`], but records whose accession is not on `allow_list` are dropped as they
/// are read, before the motif is located. Only retained records are held in memory.
///
/// A header without an accession field fails the scan when an allow-list is given.
///
pub fn scan_file_filtered<P: AsRef<Path>>(
    path: P,
    pattern: &MotifPattern,
    allow_list: Option<&AllowList>,
) -> MotifResult<ScanOutcome> {
    let path = path.as_ref();
    info!("Scanning {} for motif {}", path.display(), pattern);

    let mut reader = TwoLineReader::from_path(path)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed}] {msg} ({per_sec})")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["-", "\\", "|", "/"]),
    );
    spinner.set_message(format!("Scanning for {pattern}..."));

    let mut outcome = ScanOutcome::default();
    for record in reader.by_ref() {
        let record = record?;
        outcome.scanned += 1;

        let allowed = match allow_list {
            Some(allow_list) => allow_list.contains(record.accession()?),
            None => true,
        };
        if allowed {
            outcome.records.push(MatchRecord::from_record(pattern, &record));
        }

        if outcome.scanned % 10_000 == 0 {
            spinner.set_message(format!("Scanned {} sequences", outcome.scanned));
        }
        spinner.inc(1);
    }

    spinner.finish_and_clear();

    if reader.skipped() > 0 {
        warn!(
            "Skipped {} line pairs without a header in {}",
            reader.skipped(),
            path.display()
        );
    }
    if reader.truncated() {
        warn!("Ignored trailing header without a sequence in {}", path.display());
    }
    info!(
        "Scanned {} sequences, kept {}",
        outcome.scanned,
        outcome.records.len()
    );

    Ok(outcome)
}

///
/// The set of accessions a run is restricted to.
///
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    accessions: FxHashSet<String>,
}

impl AllowList {
    ///
    /// Load a headerless, one-accession-per-line file.
    ///
    pub fn from_file<P: AsRef<Path>>(path: P) -> MotifResult<Self> {
        let accessions = read_identifier_list(path)?;
        Ok(accessions.into_iter().collect())
    }

    pub fn contains(&self, accession: &str) -> bool {
        self.accessions.contains(accession)
    }

    pub fn len(&self) -> usize {
        self.accessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accessions.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for AllowList {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        AllowList {
            accessions: iter.into_iter().map(Into::into).collect(),
        }
    }
}

///
/// Keep only the records whose accession is on the allow-list, preserving order.
///
/// A header without an accession field fails the whole call.
///
pub fn filter_by_allow_list(
    records: Vec<MatchRecord>,
    allow_list: &AllowList,
) -> MotifResult<Vec<MatchRecord>> {
    let mut retained = Vec::with_capacity(records.len().min(allow_list.len()));
    for record in records {
        if allow_list.contains(record.accession()?) {
            retained.push(record);
        }
    }
    Ok(retained)
}
