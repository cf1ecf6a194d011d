use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::consts::{DEFAULT_T_VALUE, DEFAULT_WINDOW};
use crate::errors::{TimeSeriesError, TimeSeriesResult};

///
/// Trailing mean over `window` values. The first `window - 1` entries are undefined.
///
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling(values, window, |w| w.iter().sum::<f64>() / w.len() as f64)
}

///
/// Trailing sample standard deviation (n - 1 denominator) over `window` values.
///
pub fn rolling_std(values: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling(values, window, |w| {
        let n = w.len() as f64;
        let mean = w.iter().sum::<f64>() / n;
        let ss: f64 = w.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (n - 1.0)).sqrt()
    })
}

fn rolling<F: Fn(&[f64]) -> f64>(values: &[f64], window: usize, f: F) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window == 0 {
        return out;
    }
    for (i, w) in values.windows(window).enumerate() {
        out[i + window - 1] = Some(f(w));
    }
    out
}

/// Lower and upper bound of a confidence band around a rolling mean.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub lower: f64,
    pub upper: f64,
}

///
/// `mean +- t * sd / sqrt(window)` wherever both rolling values are defined.
///
pub fn confidence_band(
    means: &[Option<f64>],
    sds: &[Option<f64>],
    t_value: f64,
    window: usize,
) -> Vec<Option<Band>> {
    let scale = (window as f64).sqrt();
    means
        .iter()
        .zip(sds)
        .map(|(mean, sd)| match (mean, sd) {
            (Some(mean), Some(sd)) => {
                let half = t_value * sd / scale;
                Some(Band {
                    lower: mean - half,
                    upper: mean + half,
                })
            }
            _ => None,
        })
        .collect()
}

///
/// Two-sided 95% Student-t critical value for a sample of `window` values.
///
/// The default window uses the tabulated value; other windows are derived from the
/// distribution with `window - 1` degrees of freedom.
///
pub fn t_value_for_window(window: usize) -> TimeSeriesResult<f64> {
    if window < 2 {
        return Err(TimeSeriesError::InvalidWindow(window));
    }
    if window == DEFAULT_WINDOW {
        return Ok(DEFAULT_T_VALUE);
    }

    let dist = StudentsT::new(0.0, 1.0, (window - 1) as f64)
        .map_err(|e| TimeSeriesError::TValue(e.to_string()))?;
    Ok(dist.inverse_cdf(0.975))
}

///
/// Position of each value between the series maximum (0%) and minimum (100%).
///
pub fn percent_change(name: &str, values: &[f64]) -> TimeSeriesResult<Vec<f64>> {
    let (min, max) = min_max(values).ok_or_else(|| TimeSeriesError::EmptySeries(name.to_string()))?;
    let range = max - min;
    if range == 0.0 {
        return Err(TimeSeriesError::ConstantSeries(name.to_string()));
    }

    Ok(values.iter().map(|v| (max - v) * 100.0 / range).collect())
}

pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    values.iter().fold(None, |acc, &v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}
