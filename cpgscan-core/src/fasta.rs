//! Readers for sequence files.
//!
//! Two layouts are supported:
//!
//! - [`TwoLineReader`]: the rigid alignment layout produced by large MSA exports, where every
//!   record is exactly one header line followed by exactly one sequence line. Lines are consumed
//!   in pairs; a pair whose first line is not a header is skipped, as is a trailing header
//!   without a sequence line.
//! - [`FastaReader`]: standard FASTA, where a record's sequence may be wrapped over any number
//!   of lines.
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use seq_io::fasta::{Reader, Record};

use crate::errors::SequenceFileError;
use crate::models::{HEADER_MARKER, SequenceRecord};
use crate::utils::{get_dynamic_reader, strip_line_breaks};

pub struct TwoLineReader<R: BufRead> {
    reader: R,
    skipped: usize,
    truncated: bool,
}

impl<R: BufRead> TwoLineReader<R> {
    pub fn new(reader: R) -> Self {
        TwoLineReader {
            reader,
            skipped: 0,
            truncated: false,
        }
    }

    /// Number of line pairs dropped because the first line was not a header.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Whether the input ended with a header that had no sequence line.
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    fn next_line(&mut self) -> Result<Option<String>, SequenceFileError> {
        let mut line = String::new();
        let bytes_read = self.reader.read_line(&mut line)?;
        if bytes_read == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

impl TwoLineReader<BufReader<Box<dyn Read>>> {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SequenceFileError> {
        Ok(TwoLineReader::new(get_dynamic_reader(path.as_ref())?))
    }
}

impl<R: BufRead> Iterator for TwoLineReader<R> {
    type Item = Result<SequenceRecord, SequenceFileError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let header = match self.next_line() {
                Ok(Some(line)) => line,
                Ok(None) => return None,
                Err(e) => return Some(Err(e)),
            };
            let sequence = match self.next_line() {
                Ok(Some(line)) => line,
                Ok(None) => {
                    if header.starts_with(HEADER_MARKER) {
                        self.truncated = true;
                    } else {
                        self.skipped += 1;
                    }
                    return None;
                }
                Err(e) => return Some(Err(e)),
            };

            if !header.starts_with(HEADER_MARKER) {
                self.skipped += 1;
                continue;
            }

            return Some(Ok(SequenceRecord::new(
                &header,
                strip_line_breaks(&sequence),
            )));
        }
    }
}

pub struct FastaReader<R: Read> {
    reader: Reader<R>,
    finished: bool,
}

impl<R: Read> FastaReader<R> {
    pub fn new(reader: R) -> Self {
        FastaReader {
            reader: Reader::new(reader),
            finished: false,
        }
    }
}

impl FastaReader<BufReader<Box<dyn Read>>> {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SequenceFileError> {
        Ok(FastaReader::new(get_dynamic_reader(path.as_ref())?))
    }
}

impl<R: Read> Iterator for FastaReader<R> {
    type Item = Result<SequenceRecord, SequenceFileError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let record = match self.reader.next()? {
            Ok(record) => record,
            Err(e) => {
                self.finished = true;
                return Some(Err(e.into()));
            }
        };

        let header = String::from_utf8_lossy(record.head()).into_owned();
        let mut bases: Vec<u8> = Vec::new();
        for seq_line in record.seq_lines() {
            bases.extend_from_slice(seq_line.trim_ascii());
        }

        Some(Ok(SequenceRecord::new(&header, bases)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;
    use rstest::*;

    fn get_test_path(file_name: &str) -> PathBuf {
        std::env::current_dir()
            .unwrap()
            .join("../tests/data/sequences")
            .join(file_name)
    }

    fn collect<R: BufRead>(reader: TwoLineReader<R>) -> Vec<SequenceRecord> {
        reader.map(|r| r.unwrap()).collect()
    }

    #[rstest]
    fn test_two_line_reader_reads_pairs() {
        let input = ">a|EPI_1|2020-01-01\nAC-GT\n>b|EPI_2|2020-01-02\nCCGG\n";
        let records = collect(TwoLineReader::new(Cursor::new(input)));

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].header, "a|EPI_1|2020-01-01");
        assert_eq!(records[0].bases, b"AC-GT".to_vec());
        assert_eq!(records[1].bases, b"CCGG".to_vec());
    }

    #[rstest]
    fn test_two_line_reader_skips_truncated_trailing_header() {
        let input = ">a|EPI_1\nACGT\n>b|EPI_2\n";
        let mut reader = TwoLineReader::new(Cursor::new(input));
        let records: Vec<SequenceRecord> = reader.by_ref().map(|r| r.unwrap()).collect();

        assert_eq!(records.len(), 1);
        assert!(reader.truncated());
    }

    #[rstest]
    fn test_two_line_reader_skips_pairs_without_header() {
        let input = "garbage\nACGT\n>b|EPI_2\nCG\n";
        let mut reader = TwoLineReader::new(Cursor::new(input));
        let records: Vec<SequenceRecord> = reader.by_ref().map(|r| r.unwrap()).collect();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].header, "b|EPI_2");
        assert_eq!(reader.skipped(), 1);
    }

    #[rstest]
    fn test_two_line_reader_strips_crlf() {
        let input = ">a|EPI_1\r\nAC-G\r\n";
        let records = collect(TwoLineReader::new(Cursor::new(input)));
        assert_eq!(records[0].header, "a|EPI_1");
        assert_eq!(records[0].bases, b"AC-G".to_vec());
    }

    #[rstest]
    fn test_fasta_reader_joins_wrapped_lines() {
        let input = ">seq1 first\nACGT\nAC\n\n>seq2\nGG\nCC\n";
        let records: Vec<SequenceRecord> = FastaReader::new(Cursor::new(input))
            .map(|r| r.unwrap())
            .collect();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name(), "seq1");
        assert_eq!(records[0].bases, b"ACGTAC".to_vec());
        assert_eq!(records[1].bases, b"GGCC".to_vec());
    }

    #[rstest]
    fn test_fasta_reader_keeps_empty_records() {
        let input = ">empty\n>full\nAC\n";
        let records: Vec<SequenceRecord> = FastaReader::new(Cursor::new(input))
            .map(|r| r.unwrap())
            .collect();

        assert_eq!(records.len(), 2);
        assert!(records[0].is_empty());
    }

    #[rstest]
    fn test_fasta_reader_rejects_leading_sequence() {
        let input = "ACGT\n>seq1\nAC\n";
        let mut reader = FastaReader::new(Cursor::new(input));
        assert!(matches!(
            reader.next(),
            Some(Err(SequenceFileError::Fasta(_)))
        ));
        assert!(reader.next().is_none());
    }

    #[rstest]
    fn test_fasta_reader_strips_crlf() {
        let input = ">seq1|EPI_1\r\nACG\r\nTT\r\n";
        let records: Vec<SequenceRecord> = FastaReader::new(Cursor::new(input))
            .map(|r| r.unwrap())
            .collect();

        assert_eq!(records[0].header, "seq1|EPI_1");
        assert_eq!(records[0].bases, b"ACGTT".to_vec());
    }

    #[rstest]
    fn test_fasta_reader_from_path() {
        let path = get_test_path("wrapped.fasta");
        let records: Vec<SequenceRecord> = FastaReader::from_path(&path)
            .unwrap()
            .map(|r| r.unwrap())
            .collect();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].accession().unwrap(), "EPI_ISL_0001");
    }
}
