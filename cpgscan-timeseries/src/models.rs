use chrono::NaiveDate;
use serde::Deserialize;

use crate::consts::DATE_FORMAT;
use crate::errors::{TimeSeriesError, TimeSeriesResult};

///
/// The columns of a per-record statistics table the correlator needs. Other columns are ignored.
///
#[derive(Debug, Clone, Deserialize)]
pub struct StatisticsRow {
    pub dates: Option<String>,
    pub seq_len_adjusted: f64,
    #[serde(rename = "count_CG")]
    pub count_cg: f64,
    #[serde(rename = "percent_CG")]
    pub percent_cg: f64,
    #[serde(rename = "ObyE_CG")]
    pub obye_cg: f64,
    #[serde(rename = "ObyE_GC")]
    pub obye_gc: f64,
}

impl StatisticsRow {
    pub fn metrics(&self) -> Metrics {
        Metrics {
            without: self.seq_len_adjusted,
            cg: self.count_cg,
            percent_cg: self.percent_cg,
            obye_cg: self.obye_cg,
            obye_gc: self.obye_gc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    /// sequence length without ambiguous bases
    Without,
    CpgCount,
    CpgPercent,
    ObyECpg,
    ObyEGpc,
}

impl Metric {
    pub fn column(&self) -> &'static str {
        match self {
            Metric::Without => "without",
            Metric::CpgCount => "CG",
            Metric::CpgPercent => "%CG",
            Metric::ObyECpg => "o/eCG",
            Metric::ObyEGpc => "o/eGC",
        }
    }

    pub fn axis_label(&self) -> &'static str {
        match self {
            Metric::Without => "Sequence length",
            Metric::CpgCount => "Number of CpGs",
            Metric::CpgPercent => "Percentage of CpGs",
            Metric::ObyECpg => "Observed/expected CpG",
            Metric::ObyEGpc => "Observed/expected GpC",
        }
    }

    pub fn reduction_label(&self) -> String {
        match self {
            Metric::CpgCount => "Percentage reduction in no. of CpGs".to_string(),
            Metric::CpgPercent => "Percentage reduction in CpG percentage".to_string(),
            other => format!("Percentage reduction in {}", other.axis_label()),
        }
    }

    pub fn file_stem(&self) -> &'static str {
        match self {
            Metric::Without => "Sequence_length",
            Metric::CpgCount => "Number_CG",
            Metric::CpgPercent => "Percentage_CG",
            Metric::ObyECpg => "ObyE_CG",
            Metric::ObyEGpc => "ObyE_GC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Metrics {
    pub without: f64,
    pub cg: f64,
    pub percent_cg: f64,
    pub obye_cg: f64,
    pub obye_gc: f64,
}

impl Metrics {
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Without => self.without,
            Metric::CpgCount => self.cg,
            Metric::CpgPercent => self.percent_cg,
            Metric::ObyECpg => self.obye_cg,
            Metric::ObyEGpc => self.obye_gc,
        }
    }

    pub fn add(&mut self, other: &Metrics) {
        self.without += other.without;
        self.cg += other.cg;
        self.percent_cg += other.percent_cg;
        self.obye_cg += other.obye_cg;
        self.obye_gc += other.obye_gc;
    }

    pub fn divide(&self, n: f64) -> Metrics {
        Metrics {
            without: self.without / n,
            cg: self.cg / n,
            percent_cg: self.percent_cg / n,
            obye_cg: self.obye_cg / n,
            obye_gc: self.obye_gc / n,
        }
    }
}

/// Mean metrics of all sequences collected on one day.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyMetrics {
    pub date: NaiveDate,
    pub metrics: Metrics,
}

pub fn parse_date(value: &str) -> TimeSeriesResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| TimeSeriesError::InvalidDate(value.to_string()))
}
