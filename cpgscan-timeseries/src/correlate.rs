use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::info;
use serde::Serialize;

use crate::cases::{CaseSeries, join_cases};
use crate::consts::{
    CORRELATION_TABLE_NAME, DATE_FORMAT, DEFAULT_SEED_DATE, DEFAULT_SEED_ROWS, DEFAULT_WINDOW,
};
use crate::daily::{read_daily_means, seed_initial_point};
use crate::errors::{TimeSeriesError, TimeSeriesResult};
use crate::models::{DailyMetrics, Metric};
use crate::plot::{ChartSeries, render_chart, save_chart};
use crate::rolling::{
    confidence_band, percent_change, rolling_mean, rolling_std, t_value_for_window,
};

/// Metrics that get a chart with a percent-reduction axis.
pub const CHARTED_METRICS: [Metric; 2] = [Metric::CpgCount, Metric::CpgPercent];

#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationConfig {
    pub seed_rows: usize,
    pub seed_date: NaiveDate,
    pub window: usize,
    /// Overrides the critical value derived from `window`.
    pub t_value: Option<f64>,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        CorrelationConfig {
            seed_rows: DEFAULT_SEED_ROWS,
            seed_date: NaiveDate::parse_from_str(DEFAULT_SEED_DATE, DATE_FORMAT)
                .unwrap_or(NaiveDate::MIN),
            window: DEFAULT_WINDOW,
            t_value: None,
        }
    }
}

impl CorrelationConfig {
    pub fn t_value(&self) -> TimeSeriesResult<f64> {
        match self.t_value {
            Some(t) => Ok(t),
            None => t_value_for_window(self.window),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationRow {
    pub dates: NaiveDate,
    pub cases: u64,
    pub without: f64,
    #[serde(rename = "CG")]
    pub cg: f64,
    #[serde(rename = "%CG")]
    pub percent_cg: f64,
    #[serde(rename = "o/eCG")]
    pub obye_cg: f64,
    #[serde(rename = "o/eGC")]
    pub obye_gc: f64,
    /// Reduction of the CpG percentage relative to its own extremes.
    #[serde(rename = "perChange")]
    pub per_change: f64,
    /// Reduction of the CpG count relative to its own extremes.
    #[serde(rename = "numChange")]
    pub num_change: f64,
}

impl CorrelationRow {
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Without => self.without,
            Metric::CpgCount => self.cg,
            Metric::CpgPercent => self.percent_cg,
            Metric::ObyECpg => self.obye_cg,
            Metric::ObyEGpc => self.obye_gc,
        }
    }
}

///
/// Daily-averaged sequence statistics joined with cumulative case counts, in date order.
///
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationTable {
    rows: Vec<CorrelationRow>,
}

impl CorrelationTable {
    ///
    /// Join the days with the case series and derive the percent-change columns.
    ///
    pub fn build(
        days: Vec<DailyMetrics>,
        cases: &CaseSeries,
        seed_date: Option<NaiveDate>,
    ) -> TimeSeriesResult<Self> {
        let joined = join_cases(days, cases, seed_date);

        let cg: Vec<f64> = joined.iter().map(|(d, _)| d.metrics.cg).collect();
        let percent_cg: Vec<f64> = joined.iter().map(|(d, _)| d.metrics.percent_cg).collect();
        let num_change = percent_change(Metric::CpgCount.column(), &cg)?;
        let per_change = percent_change(Metric::CpgPercent.column(), &percent_cg)?;

        let rows = joined
            .into_iter()
            .zip(per_change.into_iter().zip(num_change))
            .map(|((day, cases), (per_change, num_change))| CorrelationRow {
                dates: day.date,
                cases,
                without: day.metrics.without,
                cg: day.metrics.cg,
                percent_cg: day.metrics.percent_cg,
                obye_cg: day.metrics.obye_cg,
                obye_gc: day.metrics.obye_gc,
                per_change,
                num_change,
            })
            .collect();

        Ok(CorrelationTable { rows })
    }

    pub fn rows(&self) -> &[CorrelationRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn values(&self, metric: Metric) -> Vec<f64> {
        self.rows.iter().map(|r| r.get(metric)).collect()
    }

    ///
    /// Daily values, moving average and confidence band of one metric against cumulative cases.
    ///
    pub fn chart_series(
        &self,
        metric: Metric,
        window: usize,
        t_value: f64,
    ) -> TimeSeriesResult<ChartSeries> {
        if window < 2 {
            return Err(TimeSeriesError::InvalidWindow(window));
        }
        let daily = self.values(metric);
        let rolling = rolling_mean(&daily, window);
        let sds = rolling_std(&daily, window);
        let band = confidence_band(&rolling, &sds, t_value, window);

        Ok(ChartSeries {
            metric,
            window,
            cases: self.rows.iter().map(|r| r.cases as f64).collect(),
            daily,
            rolling,
            band,
        })
    }

    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> TimeSeriesResult<()> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        let mut writer = csv::Writer::from_path(path.as_ref())?;
        for row in &self.rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Files written by one correlation run.
#[derive(Debug, Clone)]
pub struct CorrelationOutputs {
    pub table: PathBuf,
    pub charts: Vec<PathBuf>,
    pub days: usize,
}

///
/// Run the whole correlation: average the statistics per day, pool the seed days, join with
/// the case series, then write the table and one chart per charted metric into `output_dir`.
///
pub fn run_correlation(
    stats: &Path,
    cases: &Path,
    output_dir: &Path,
    config: &CorrelationConfig,
) -> TimeSeriesResult<CorrelationOutputs> {
    let t_value = config.t_value()?;

    let days = read_daily_means(stats)?;
    let days = seed_initial_point(days, config.seed_rows, config.seed_date)?;
    let cases = CaseSeries::from_file(cases)?;
    let seed_date = (config.seed_rows > 0).then_some(config.seed_date);

    let table = CorrelationTable::build(days, &cases, seed_date)?;
    info!("Correlation table holds {} days", table.len());

    fs::create_dir_all(output_dir)?;
    let table_path = output_dir.join(CORRELATION_TABLE_NAME);
    table.write_csv(&table_path)?;

    let mut charts = Vec::with_capacity(CHARTED_METRICS.len());
    for metric in CHARTED_METRICS {
        let series = table.chart_series(metric, config.window, t_value)?;
        let path = output_dir.join(format!("{}.svg", metric.file_stem()));
        save_chart(&path, &render_chart(&series))?;
        info!("Wrote chart {}", path.display());
        charts.push(path);
    }

    Ok(CorrelationOutputs {
        table: table_path,
        charts,
        days: table.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    use crate::models::parse_date;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-6, "{a} != {b}");
    }

    #[fixture]
    fn config() -> CorrelationConfig {
        CorrelationConfig {
            window: 3,
            ..CorrelationConfig::default()
        }
    }

    #[rstest]
    fn test_default_config() {
        let config = CorrelationConfig::default();
        assert_eq!(config.seed_rows, 15);
        assert_eq!(config.seed_date, parse_date("2020-01-21").unwrap());
        assert_eq!(config.window, 10);
        assert_close(config.t_value().unwrap(), 2.262);
    }

    #[rstest]
    fn test_build_table_from_fixture(config: CorrelationConfig) {
        let days = read_daily_means("../tests/data/timeseries/statistics.csv").unwrap();
        let days = seed_initial_point(days, config.seed_rows, config.seed_date).unwrap();
        let cases = CaseSeries::from_file("../tests/data/timeseries/cases.csv").unwrap();

        let table = CorrelationTable::build(days, &cases, Some(config.seed_date)).unwrap();

        let cases: Vec<u64> = table.rows().iter().map(|r| r.cases).collect();
        assert_eq!(cases, vec![0, 555, 654, 941, 1434, 2118]);
        assert_eq!(table.rows()[0].dates, parse_date("2020-01-21").unwrap());

        let cg = table.values(Metric::CpgCount);
        assert_eq!(cg, vec![2000.0, 1990.0, 1980.0, 1970.0, 1960.0, 1950.0]);

        for (row, expected) in table.rows().iter().zip([0.0, 20.0, 40.0, 60.0, 80.0, 100.0]) {
            assert_close(row.num_change, expected);
            assert_close(row.per_change, expected);
        }
    }

    #[rstest]
    fn test_chart_series_band(config: CorrelationConfig) {
        let cases: CaseSeries = [
            (parse_date("2020-01-22").unwrap(), 10),
            (parse_date("2020-01-23").unwrap(), 20),
            (parse_date("2020-01-24").unwrap(), 30),
        ]
        .into_iter()
        .collect();
        let days = [("2020-01-22", 3.0), ("2020-01-23", 5.0), ("2020-01-24", 7.0)]
            .into_iter()
            .map(|(d, cg)| DailyMetrics {
                date: parse_date(d).unwrap(),
                metrics: crate::models::Metrics {
                    cg,
                    percent_cg: cg / 100.0,
                    ..Default::default()
                },
            })
            .collect();

        let table = CorrelationTable::build(days, &cases, None).unwrap();
        let series = table
            .chart_series(Metric::CpgCount, config.window, 4.0)
            .unwrap();

        assert_eq!(series.rolling, vec![None, None, Some(5.0)]);
        let band = series.band[2].unwrap();
        // sd of 3,5,7 is 2
        assert_close(band.upper, 5.0 + 4.0 * 2.0 / 3f64.sqrt());
        assert_close(band.lower, 5.0 - 4.0 * 2.0 / 3f64.sqrt());
    }

    #[rstest]
    fn test_constant_series_is_an_error() {
        let cases: CaseSeries = [(parse_date("2020-01-22").unwrap(), 10)]
            .into_iter()
            .collect();
        let days = vec![DailyMetrics {
            date: parse_date("2020-01-22").unwrap(),
            metrics: Default::default(),
        }];

        let result = CorrelationTable::build(days, &cases, None);
        assert!(matches!(result, Err(TimeSeriesError::ConstantSeries(_))));
    }

    #[rstest]
    fn test_run_correlation(config: CorrelationConfig) {
        let tempdir = tempfile::tempdir().unwrap();
        let outputs = run_correlation(
            Path::new("../tests/data/timeseries/statistics.csv"),
            Path::new("../tests/data/timeseries/cases.csv"),
            tempdir.path(),
            &config,
        )
        .unwrap();

        assert_eq!(outputs.days, 6);
        assert_eq!(outputs.charts.len(), 2);
        assert!(outputs.charts.iter().all(|p| p.exists()));
        assert!(tempdir.path().join("Number_CG.svg").exists());
        assert!(tempdir.path().join("Percentage_CG.svg").exists());

        let contents = fs::read_to_string(&outputs.table).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next().unwrap(),
            "dates,cases,without,CG,%CG,o/eCG,o/eGC,perChange,numChange"
        );
        assert!(lines.next().unwrap().starts_with("2020-01-21,0,29800"));
    }
}
