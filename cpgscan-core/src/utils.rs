use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::errors::SequenceFileError;

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> Result<BufReader<Box<dyn Read>>, SequenceFileError> {
    let is_gzipped = path.extension() == Some(OsStr::new("gz"));
    let file = File::open(path).map_err(|e| {
        SequenceFileError::FileReadError(format!("{}: {}", path.display(), e))
    })?;
    let file: Box<dyn Read> = match is_gzipped {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    Ok(BufReader::new(file))
}

///
/// Read a headerless, single column file of identifiers (one per line).
///
/// Surrounding whitespace is trimmed and blank lines are ignored.
///
pub fn read_identifier_list<P: AsRef<Path>>(path: P) -> Result<Vec<String>, SequenceFileError> {
    let reader = get_dynamic_reader(path.as_ref())?;

    let mut identifiers = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let identifier = line.trim();
        if !identifier.is_empty() {
            identifiers.push(identifier.to_string());
        }
    }

    Ok(identifiers)
}

///
/// Drop every line break (`\n` and `\r`) from a raw sequence line.
///
pub fn strip_line_breaks(line: &str) -> Vec<u8> {
    line.bytes().filter(|b| *b != b'\n' && *b != b'\r').collect()
}

///
/// File name without any of its extensions: `msa.fasta.gz` -> `msa`.
///
pub fn remove_all_extensions(path: &Path) -> String {
    let mut stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let mut parent_path = path.with_file_name(&stem);
    while parent_path.extension().is_some() {
        parent_path = parent_path.with_extension("");
        stem = parent_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
    }

    stem
}
