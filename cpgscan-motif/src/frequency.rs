//! Positional frequency of motif hits across an alignment.
use std::path::Path;

use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::errors::{MotifError, MotifResult};
use crate::records::MatchRecord;

///
/// Translation from alignment columns to coordinates on the (gap-free) reference genome.
///
#[derive(Debug, Clone, Default)]
pub struct ReferenceMap {
    coordinates: FxHashMap<usize, u64>,
}

impl ReferenceMap {
    ///
    /// Load a reference map from a CSV file with a header row. The first column holds the
    /// alignment index, the second the reference coordinate; further columns are ignored.
    ///
    pub fn from_file<P: AsRef<Path>>(path: P) -> MotifResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path.as_ref())?;

        let mut coordinates = FxHashMap::default();
        for (i, record) in reader.records().enumerate() {
            let record = record?;
            // header is line 1
            let line = i + 2;

            let index = record
                .get(0)
                .ok_or_else(|| parse_error(line, "missing index column"))?;
            let index = parse_coordinate(index)
                .ok_or_else(|| parse_error(line, &format!("bad index `{index}`")))?;

            let mapped = record
                .get(1)
                .ok_or_else(|| parse_error(line, "missing mapped position column"))?;
            let mapped = parse_coordinate(mapped)
                .ok_or_else(|| parse_error(line, &format!("bad mapped position `{mapped}`")))?;

            coordinates.insert(index as usize, mapped);
        }

        Ok(ReferenceMap { coordinates })
    }

    pub fn get(&self, position: usize) -> Option<u64> {
        self.coordinates.get(&position).copied()
    }

    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }
}

impl FromIterator<(usize, u64)> for ReferenceMap {
    fn from_iter<T: IntoIterator<Item = (usize, u64)>>(iter: T) -> Self {
        ReferenceMap {
            coordinates: iter.into_iter().collect(),
        }
    }
}

fn parse_error(line: usize, reason: &str) -> MotifError {
    MotifError::ReferenceMapParse {
        line,
        reason: reason.to_string(),
    }
}

// spreadsheet exports often write integral columns as `12.0`
fn parse_coordinate(field: &str) -> Option<u64> {
    if let Ok(value) = field.parse::<u64>() {
        return Some(value);
    }
    let value = field.parse::<f64>().ok()?;
    (value >= 0.0 && value.fract() == 0.0 && value <= u64::MAX as f64).then_some(value as u64)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionFrequency {
    #[serde(rename = "index")]
    pub position: usize,
    pub frequency: usize,
    pub percentage: f64,
    #[serde(rename = "mapping")]
    pub mapped_position: u64,
}

///
/// Per alignment position: how many retained records carry a motif hit there, what share
/// of the retained records that is, and the matching reference coordinate.
///
/// Rows are kept in ascending position order.
///
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PositionFrequencyTable {
    rows: Vec<PositionFrequency>,
}

impl PositionFrequencyTable {
    pub fn rows(&self) -> &[PositionFrequency] {
        &self.rows
    }

    pub fn get(&self, position: usize) -> Option<&PositionFrequency> {
        self.rows
            .binary_search_by_key(&position, |row| row.position)
            .ok()
            .map(|i| &self.rows[i])
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    ///
    /// Write the table as CSV with an `index,frequency,percentage,mapping` header.
    ///
    /// # Arguments
    /// - path: the path to the file to dump to
    pub fn write_csv<T: AsRef<Path>>(&self, path: T) -> MotifResult<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut writer = csv::Writer::from_path(path)?;
        for row in &self.rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    ///
    /// Read back a table written by [`PositionFrequencyTable::write_csv`].
    ///
    pub fn from_csv<T: AsRef<Path>>(path: T) -> MotifResult<Self> {
        let mut reader = csv::Reader::from_path(path.as_ref())?;
        let mut rows = reader
            .deserialize()
            .collect::<Result<Vec<PositionFrequency>, csv::Error>>()?;
        rows.sort_by_key(|row| row.position);
        Ok(PositionFrequencyTable { rows })
    }
}

///
/// Aggregate motif positions across the retained records.
///
/// Every position that occurs in at least one record gets a row. The percentage is taken over
/// all records passed in, and each position must be present in `reference`.
///
/// # Errors
/// - [`MotifError::NoRecordsRetained`] when `records` is empty
/// - [`MotifError::UnmappedPosition`] when a position is missing from `reference`
///
pub fn aggregate_frequency(
    records: &[MatchRecord],
    reference: &ReferenceMap,
) -> MotifResult<PositionFrequencyTable> {
    if records.is_empty() {
        return Err(MotifError::NoRecordsRetained);
    }

    let mut counts: FxHashMap<usize, usize> = FxHashMap::default();
    for record in records {
        let mut previous = None;
        for &position in &record.match_positions {
            // a record counts at most once per position
            if previous == Some(position) {
                continue;
            }
            *counts.entry(position).or_default() += 1;
            previous = Some(position);
        }
    }

    let total = records.len() as f64;
    let mut rows = counts
        .into_iter()
        .map(|(position, frequency)| {
            let mapped_position = reference
                .get(position)
                .ok_or(MotifError::UnmappedPosition(position))?;
            Ok(PositionFrequency {
                position,
                frequency,
                percentage: frequency as f64 * 100.0 / total,
                mapped_position,
            })
        })
        .collect::<MotifResult<Vec<_>>>()?;

    rows.sort_by_key(|row| row.position);

    Ok(PositionFrequencyTable { rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::PathBuf;

    use pretty_assertions::assert_eq;
    use rstest::*;

    fn get_test_path(file_name: &str) -> PathBuf {
        std::env::current_dir()
            .unwrap()
            .join("../tests/data/motif")
            .join(file_name)
    }

    fn make_record(accession: &str, positions: Vec<usize>) -> MatchRecord {
        MatchRecord {
            record_identifier: format!("seq|{accession}|2020-03-01"),
            match_count: positions.len(),
            match_positions: positions,
        }
    }

    #[fixture]
    fn identity_map() -> ReferenceMap {
        (0..32).map(|i| (i, i as u64 + 100)).collect()
    }

    #[rstest]
    fn test_shared_position_is_counted_per_record(identity_map: ReferenceMap) {
        let records = vec![make_record("EPI_1", vec![5]), make_record("EPI_2", vec![5])];
        let table = aggregate_frequency(&records, &identity_map).unwrap();

        let row = table.get(5).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(row.frequency, 2);
        assert_eq!(row.percentage, 100.0);
        assert_eq!(row.mapped_position, 105);
    }

    #[rstest]
    fn test_percentages_use_all_retained_records(identity_map: ReferenceMap) {
        let records = vec![
            make_record("EPI_1", vec![1, 7]),
            make_record("EPI_2", vec![7]),
            make_record("EPI_3", vec![]),
            make_record("EPI_4", vec![3, 7]),
        ];
        let table = aggregate_frequency(&records, &identity_map).unwrap();

        let positions: Vec<usize> = table.rows().iter().map(|r| r.position).collect();
        assert_eq!(positions, vec![1, 3, 7]);
        assert_eq!(table.get(1).unwrap().percentage, 25.0);
        assert_eq!(table.get(7).unwrap().frequency, 3);
        assert_eq!(table.get(7).unwrap().percentage, 75.0);
    }

    #[rstest]
    fn test_no_records_is_an_error(identity_map: ReferenceMap) {
        let result = aggregate_frequency(&[], &identity_map);
        assert!(matches!(result, Err(MotifError::NoRecordsRetained)));
    }

    #[rstest]
    fn test_unmapped_position_is_an_error(identity_map: ReferenceMap) {
        let records = vec![make_record("EPI_1", vec![2, 40])];
        let result = aggregate_frequency(&records, &identity_map);
        assert!(matches!(result, Err(MotifError::UnmappedPosition(40))));
    }

    #[rstest]
    fn test_reference_map_from_file() {
        let reference = ReferenceMap::from_file(get_test_path("mapping.csv")).unwrap();
        assert_eq!(reference.len(), 16);
        assert_eq!(reference.get(0), Some(1));
        assert_eq!(reference.get(3), Some(4));
        assert_eq!(reference.get(14), Some(15));
        assert_eq!(reference.get(16), None);
    }

    #[rstest]
    fn test_reference_map_rejects_bad_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mapping.csv");
        std::fs::write(&path, "index,PreAlignedNumber\n0,1\n1,one\n").unwrap();

        let result = ReferenceMap::from_file(&path);
        assert!(matches!(
            result,
            Err(MotifError::ReferenceMapParse { line: 3, .. })
        ));
    }

    #[rstest]
    #[case("12", Some(12))]
    #[case("12.0", Some(12))]
    #[case("12.5", None)]
    #[case("", None)]
    fn test_parse_coordinate(#[case] field: &str, #[case] expected: Option<u64>) {
        assert_eq!(parse_coordinate(field), expected);
    }

    #[rstest]
    fn test_table_write_then_read(identity_map: ReferenceMap) {
        let records = vec![
            make_record("EPI_1", vec![1, 7]),
            make_record("EPI_2", vec![7]),
            make_record("EPI_3", vec![2]),
        ];
        let table = aggregate_frequency(&records, &identity_map).unwrap();

        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("nested/counter_file_cpg.csv");
        table.write_csv(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("index,frequency,percentage,mapping\n"));

        let reread = PositionFrequencyTable::from_csv(&path).unwrap();
        assert_eq!(reread, table);
    }
}
