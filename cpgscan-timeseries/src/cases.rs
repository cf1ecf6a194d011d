use std::path::Path;

use chrono::NaiveDate;
use fxhash::FxHashMap;
use log::{info, warn};
use serde::Deserialize;

use crate::errors::TimeSeriesResult;
use crate::models::{DailyMetrics, parse_date};

#[derive(Debug, Deserialize)]
struct CaseRow {
    date: String,
    total_cases: f64,
}

///
/// Cumulative confirmed cases, keyed by report date.
///
#[derive(Debug, Clone, Default)]
pub struct CaseSeries {
    totals: FxHashMap<NaiveDate, u64>,
}

impl CaseSeries {
    ///
    /// Read a `date,total_cases` table. Totals written as floats (`555.0`) are truncated.
    ///
    pub fn from_file<P: AsRef<Path>>(path: P) -> TimeSeriesResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path.as_ref())?;

        let mut totals = FxHashMap::default();
        for row in reader.deserialize() {
            let row: CaseRow = row?;
            let date = parse_date(&row.date)?;
            totals.insert(date, row.total_cases.max(0.0) as u64);
        }

        info!(
            "Loaded {} case totals from {}",
            totals.len(),
            path.as_ref().display()
        );
        Ok(CaseSeries { totals })
    }

    pub fn get(&self, date: &NaiveDate) -> Option<u64> {
        self.totals.get(date).copied()
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}

impl FromIterator<(NaiveDate, u64)> for CaseSeries {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, u64)>>(iter: I) -> Self {
        CaseSeries {
            totals: iter.into_iter().collect(),
        }
    }
}

///
/// Pair each day with its cumulative case total.
///
/// The seed day (`seed_date`) gets 0 cases unless the series reports that date. Other
/// days absent from the series are dropped.
///
pub fn join_cases(
    days: Vec<DailyMetrics>,
    cases: &CaseSeries,
    seed_date: Option<NaiveDate>,
) -> Vec<(DailyMetrics, u64)> {
    let mut joined = Vec::with_capacity(days.len());
    let mut dropped = 0;

    for day in days {
        match cases.get(&day.date) {
            Some(total) => joined.push((day, total)),
            None if Some(day.date) == seed_date => joined.push((day, 0)),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        warn!("Dropped {dropped} days with no reported case total");
    }
    joined
}
