use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use log::{info, warn};

use crate::errors::{TimeSeriesError, TimeSeriesResult};
use crate::models::{DailyMetrics, Metrics, StatisticsRow, parse_date};

///
/// Average the statistics of all sequences sharing a collection date, in date order.
///
/// Rows without a complete `YYYY-MM-DD` date are skipped and counted in the log.
///
pub fn daily_means<I: IntoIterator<Item = StatisticsRow>>(rows: I) -> Vec<DailyMetrics> {
    let mut by_date: BTreeMap<NaiveDate, (Metrics, usize)> = BTreeMap::new();
    let mut undated = 0;

    for row in rows {
        let Some(date) = row.dates.as_deref().and_then(|d| parse_date(d).ok()) else {
            undated += 1;
            continue;
        };
        let (sum, n) = by_date.entry(date).or_default();
        sum.add(&row.metrics());
        *n += 1;
    }

    if undated > 0 {
        warn!("Skipped {undated} rows without a usable collection date");
    }

    by_date
        .into_iter()
        .map(|(date, (sum, n))| DailyMetrics {
            date,
            metrics: sum.divide(n as f64),
        })
        .collect()
}

///
/// Read a per-record statistics table and reduce it to daily means.
///
pub fn read_daily_means<P: AsRef<Path>>(path: P) -> TimeSeriesResult<Vec<DailyMetrics>> {
    let mut reader = csv::Reader::from_path(path.as_ref())?;
    let rows = reader
        .deserialize()
        .collect::<Result<Vec<StatisticsRow>, csv::Error>>()?;

    let days = daily_means(rows);
    info!(
        "Averaged statistics of {} into {} days",
        path.as_ref().display(),
        days.len()
    );
    Ok(days)
}

///
/// Replace the first `seed_rows` days by a single day holding their mean, dated `seed_date`.
///
/// Early collection days are sparse, so they are pooled into one point that opens the series.
/// `seed_rows == 0` leaves the series untouched.
///
pub fn seed_initial_point(
    days: Vec<DailyMetrics>,
    seed_rows: usize,
    seed_date: NaiveDate,
) -> TimeSeriesResult<Vec<DailyMetrics>> {
    if seed_rows == 0 {
        return Ok(days);
    }
    if days.len() < seed_rows {
        return Err(TimeSeriesError::NotEnoughDays {
            required: seed_rows,
            found: days.len(),
        });
    }

    let mut sum = Metrics::default();
    for day in &days[..seed_rows] {
        sum.add(&day.metrics);
    }

    let mut seeded = Vec::with_capacity(days.len() - seed_rows + 1);
    seeded.push(DailyMetrics {
        date: seed_date,
        metrics: sum.divide(seed_rows as f64),
    });
    seeded.extend(days.into_iter().skip(seed_rows));
    seeded.sort_by_key(|day| day.date);

    Ok(seeded)
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    fn row(date: Option<&str>, cg: f64) -> StatisticsRow {
        StatisticsRow {
            dates: date.map(str::to_string),
            seq_len_adjusted: 29_000.0,
            count_cg: cg,
            percent_cg: cg / 290.0,
            obye_cg: 0.4,
            obye_gc: 0.8,
        }
    }

    fn day(date: &str, cg: f64) -> DailyMetrics {
        DailyMetrics {
            date: parse_date(date).unwrap(),
            metrics: Metrics {
                cg,
                ..Metrics::default()
            },
        }
    }

    #[rstest]
    fn test_daily_means_groups_and_sorts() {
        let rows = vec![
            row(Some("2020-02-02"), 10.0),
            row(Some("2020-02-01"), 4.0),
            row(Some("2020-02-02"), 20.0),
            row(None, 1000.0),
            row(Some("2020-02"), 1000.0),
        ];
        let days = daily_means(rows);

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, parse_date("2020-02-01").unwrap());
        assert_eq!(days[0].metrics.cg, 4.0);
        assert_eq!(days[1].metrics.cg, 15.0);
    }

    #[rstest]
    fn test_seed_initial_point_pools_first_rows() {
        let days = vec![
            day("2020-01-01", 10.0),
            day("2020-01-05", 20.0),
            day("2020-01-10", 30.0),
            day("2020-01-22", 40.0),
        ];
        let seeded = seed_initial_point(days, 3, parse_date("2020-01-21").unwrap()).unwrap();

        assert_eq!(seeded.len(), 2);
        assert_eq!(seeded[0].date, parse_date("2020-01-21").unwrap());
        assert_eq!(seeded[0].metrics.cg, 20.0);
        assert_eq!(seeded[1].metrics.cg, 40.0);
    }

    #[rstest]
    fn test_seed_needs_enough_days() {
        let days = vec![day("2020-01-01", 10.0)];
        let result = seed_initial_point(days, 15, parse_date("2020-01-21").unwrap());
        assert!(matches!(
            result,
            Err(TimeSeriesError::NotEnoughDays {
                required: 15,
                found: 1
            })
        ));
    }

    #[rstest]
    fn test_read_daily_means() {
        let days = read_daily_means("../tests/data/timeseries/statistics.csv").unwrap();
        assert_eq!(days.len(), 20);
        assert_eq!(days[0].date, parse_date("2020-01-01").unwrap());
    }
}
