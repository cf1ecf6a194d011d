use std::fmt::{self, Display};

use crate::errors::SequenceFileError;

/// Marker that opens every header line.
pub const HEADER_MARKER: char = '>';

/// Gap character used in multiple sequence alignments.
pub const GAP: u8 = b'-';

const HEADER_FIELD_SEPARATOR: char = '|';
const ACCESSION_FIELD: usize = 1;
const COLLECTION_DATE_FIELD: usize = 2;

///
/// A single sequence record: the header line (without the leading `>`) and its bases.
///
/// Records are never modified after parsing.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
pub struct SequenceRecord {
    pub header: String,
    pub bases: Vec<u8>,
}

impl SequenceRecord {
    pub fn new(header: &str, bases: Vec<u8>) -> Self {
        let header = header.strip_prefix(HEADER_MARKER).unwrap_or(header);
        SequenceRecord {
            header: header.trim_end_matches(['\r', '\n']).to_string(),
            bases,
        }
    }

    ///
    /// Name of the record: everything up to the first whitespace of the header.
    ///
    pub fn name(&self) -> &str {
        self.header.split_whitespace().next().unwrap_or("")
    }

    ///
    /// Get the n-th (0-based) pipe-delimited field of the header, if present.
    ///
    pub fn header_field(&self, index: usize) -> Option<&str> {
        header_field(&self.header, index)
    }

    ///
    /// Accession identifier of the record, the second pipe-delimited header field.
    ///
    /// A header without that field is an error rather than a placeholder.
    ///
    pub fn accession(&self) -> Result<&str, SequenceFileError> {
        accession_from_header(&self.header)
    }

    ///
    /// Collection date, the third pipe-delimited header field, when present.
    ///
    pub fn collection_date(&self) -> Option<&str> {
        self.header_field(COLLECTION_DATE_FIELD)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }
}

impl Display for SequenceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}\n{}",
            HEADER_MARKER,
            self.header,
            String::from_utf8_lossy(&self.bases)
        )
    }
}

pub fn header_field(header: &str, index: usize) -> Option<&str> {
    header.split(HEADER_FIELD_SEPARATOR).nth(index)
}

///
/// Extract the accession identifier (second pipe-delimited field) from a header.
///
pub fn accession_from_header(header: &str) -> Result<&str, SequenceFileError> {
    header_field(header, ACCESSION_FIELD)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| SequenceFileError::MalformedHeader {
            header: header.to_string(),
            field: ACCESSION_FIELD,
        })
}
