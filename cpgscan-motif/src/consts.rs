/// Spacer lengths of the ZAP-binding motifs scanned by default.
pub const DEFAULT_ZAP_SPACERS: [usize; 5] = [4, 5, 6, 7, 8];

/// Output file for the CpG baseline scan.
pub const DEFAULT_CPG_OUT: &str = "counter_file_cpg.csv";

/// Name of the JSON run summary written next to frequency tables.
pub const SUMMARY_FILE_NAME: &str = "motif_summary.json";

pub fn default_zap_out(m: usize) -> String {
    format!("counter_file_zap_{m}_motif.csv")
}
