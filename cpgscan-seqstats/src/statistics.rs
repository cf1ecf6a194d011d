use serde::{Deserialize, Serialize};

use cpgscan_core::SequenceRecord;

use crate::errors::SeqStatsError;

///
/// Counts of the four unambiguous bases, case-insensitive.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BaseCounts {
    pub a: u64,
    pub c: u64,
    pub g: u64,
    pub t: u64,
}

impl BaseCounts {
    pub fn from_bases(bases: &[u8]) -> Self {
        let mut counts = BaseCounts::default();
        for base in bases {
            match base.to_ascii_uppercase() {
                b'A' => counts.a += 1,
                b'C' => counts.c += 1,
                b'G' => counts.g += 1,
                b'T' => counts.t += 1,
                _ => {}
            }
        }
        counts
    }

    pub fn total(&self) -> u64 {
        self.a + self.c + self.g + self.t
    }
}

///
/// Count occurrences of a dinucleotide, moving one base at a time (case-insensitive).
///
pub fn count_dinucleotide(bases: &[u8], dinucleotide: [u8; 2]) -> u64 {
    let first = dinucleotide[0].to_ascii_uppercase();
    let second = dinucleotide[1].to_ascii_uppercase();
    bases
        .windows(2)
        .filter(|w| w[0].to_ascii_uppercase() == first && w[1].to_ascii_uppercase() == second)
        .count() as u64
}

///
/// One row of the statistics table.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceStatistics {
    pub info: String,
    pub dates: Option<String>,
    pub seq_len: u64,
    pub seq_len_adjusted: u64,
    pub ambiguous_base_count: u64,
    #[serde(rename = "count_CG")]
    pub count_cg: u64,
    #[serde(rename = "count_GC")]
    pub count_gc: u64,
    #[serde(rename = "ObyE_CG")]
    pub obye_cg: f64,
    #[serde(rename = "ObyE_GC")]
    pub obye_gc: f64,
    #[serde(rename = "percent_A")]
    pub percent_a: f64,
    #[serde(rename = "percent_C")]
    pub percent_c: f64,
    #[serde(rename = "percent_G")]
    pub percent_g: f64,
    #[serde(rename = "percent_T")]
    pub percent_t: f64,
    #[serde(rename = "percent_CG")]
    pub percent_cg: f64,
    #[serde(rename = "percent_GC")]
    pub percent_gc: f64,
    #[serde(rename = "GC_content")]
    pub gc_content: f64,
}

impl TryFrom<&SequenceRecord> for SequenceStatistics {
    type Error = SeqStatsError;

    ///
    /// Compute the statistics of one record.
    ///
    /// Fails when the record has no unambiguous bases, or no C or no G (the observed/expected
    /// ratios would divide by zero).
    ///
    fn try_from(record: &SequenceRecord) -> Result<Self, Self::Error> {
        let seq_len = record.len() as u64;
        let counts = BaseCounts::from_bases(&record.bases);

        let ambiguous_base_count = seq_len - counts.total();
        let seq_len_adjusted = seq_len - ambiguous_base_count;
        if seq_len_adjusted == 0 {
            return Err(SeqStatsError::NoUnambiguousBases(record.name().to_string()));
        }
        for (count, base) in [(counts.c, 'C'), (counts.g, 'G')] {
            if count == 0 {
                return Err(SeqStatsError::ZeroBaseCount {
                    record: record.name().to_string(),
                    base,
                });
            }
        }

        let count_cg = count_dinucleotide(&record.bases, *b"CG");
        let count_gc = count_dinucleotide(&record.bases, *b"GC");

        let adjusted = seq_len_adjusted as f64;
        let percent = |count: u64| 100.0 * (count as f64 / adjusted);

        let percent_c = percent(counts.c);
        let percent_g = percent(counts.g);
        let expected = (counts.c * counts.g) as f64;

        Ok(SequenceStatistics {
            info: record.name().to_string(),
            dates: record.collection_date().map(str::to_string),
            seq_len,
            seq_len_adjusted,
            ambiguous_base_count,
            count_cg,
            count_gc,
            obye_cg: (count_cg * seq_len_adjusted) as f64 / expected,
            obye_gc: (count_gc * seq_len_adjusted) as f64 / expected,
            percent_a: percent(counts.a),
            percent_c,
            percent_g,
            percent_t: percent(counts.t),
            percent_cg: percent(count_cg),
            percent_gc: percent(count_gc),
            gc_content: percent_g + percent_c,
        })
    }
}
