// Descriptive statistics over numeric series
// Author: Gabriel Demetrios Lafis

use std::str::FromStr;

use serde::Serialize;

use super::ProcessingError;

/// Type of statistical operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StatsType {
    Mean,
    Median,
    StdDev,
    Variance,
    Min,
    Max,
    Sum,
    Count,
}

impl FromStr for StatsType {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mean" | "avg" | "average" => Ok(StatsType::Mean),
            "median" => Ok(StatsType::Median),
            "std_dev" | "stddev" | "std" => Ok(StatsType::StdDev),
            "variance" | "var" => Ok(StatsType::Variance),
            "min" => Ok(StatsType::Min),
            "max" => Ok(StatsType::Max),
            "sum" => Ok(StatsType::Sum),
            "count" => Ok(StatsType::Count),
            other => Err(ProcessingError::InvalidArgument(format!(
                "unknown statistic '{}'",
                other
            ))),
        }
    }
}

/// Compute one statistic by type
pub fn compute(stats_type: StatsType, values: &[f64]) -> Result<f64, ProcessingError> {
    match stats_type {
        StatsType::Mean => mean(values),
        StatsType::Median => median(values),
        StatsType::StdDev => std_dev(values),
        StatsType::Variance => variance(values),
        StatsType::Min => min(values),
        StatsType::Max => max(values),
        StatsType::Sum => Ok(values.iter().sum()),
        StatsType::Count => Ok(values.len() as f64),
    }
}

/// Summary statistics of one series
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

/// Count, mean, median, population standard deviation, min and max
pub fn summarize(values: &[f64]) -> Result<Summary, ProcessingError> {
    Ok(Summary {
        count: values.len(),
        mean: mean(values)?,
        median: median(values)?,
        std_dev: std_dev(values)?,
        min: min(values)?,
        max: max(values)?,
    })
}

fn non_empty(values: &[f64], what: &'static str) -> Result<(), ProcessingError> {
    if values.is_empty() {
        Err(ProcessingError::EmptyInput(what))
    } else {
        Ok(())
    }
}

fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|pair| pair[0] == pair[1])
}

/// Arithmetic mean
pub fn mean(values: &[f64]) -> Result<f64, ProcessingError> {
    non_empty(values, "mean")?;
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Middle value of the sorted series; mean of the two middle values for even counts
pub fn median(values: &[f64]) -> Result<f64, ProcessingError> {
    non_empty(values, "median")?;

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Ok((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Ok(sorted[mid])
    }
}

/// Population variance (divides by N)
pub fn variance(values: &[f64]) -> Result<f64, ProcessingError> {
    non_empty(values, "variance")?;

    if is_constant(values) {
        return Ok(0.0);
    }

    let mean = mean(values)?;
    Ok(values.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / values.len() as f64)
}

/// Population standard deviation; exactly 0 for a single or all-equal series
pub fn std_dev(values: &[f64]) -> Result<f64, ProcessingError> {
    non_empty(values, "standard deviation")?;
    Ok(variance(values)?.sqrt())
}

/// Smallest value
pub fn min(values: &[f64]) -> Result<f64, ProcessingError> {
    values
        .iter()
        .copied()
        .reduce(f64::min)
        .ok_or(ProcessingError::EmptyInput("min"))
}

/// Largest value
pub fn max(values: &[f64]) -> Result<f64, ProcessingError> {
    values
        .iter()
        .copied()
        .reduce(f64::max)
        .ok_or(ProcessingError::EmptyInput("max"))
}

/// Pearson correlation coefficient of two paired series.
///
/// Uses `(nΣxy − ΣxΣy) / sqrt((nΣx² − (Σx)²)(nΣy² − (Σy)²))`. Needs at least
/// two pairs and non-zero variance in both series. The formula is symmetric,
/// so swapping the series gives the same result.
pub fn pearson_correlation(xs: &[f64], ys: &[f64]) -> Result<f64, ProcessingError> {
    if xs.len() != ys.len() {
        return Err(ProcessingError::InvalidArgument(format!(
            "correlation needs paired series, got {} and {} values",
            xs.len(),
            ys.len()
        )));
    }

    let n = xs.len();
    if n < 2 {
        return Err(ProcessingError::DegenerateInput(format!(
            "correlation needs at least 2 pairs, got {}",
            n
        )));
    }

    if is_constant(xs) || is_constant(ys) {
        return Err(ProcessingError::DegenerateInput(
            "correlation of a series with zero variance".to_string(),
        ));
    }

    let n = n as f64;
    let sum_x: f64 = xs.iter().sum();
    let sum_y: f64 = ys.iter().sum();
    let sum_xy: f64 = xs.iter().zip(ys).map(|(x, y)| x * y).sum();
    let sum_x2: f64 = xs.iter().map(|x| x * x).sum();
    let sum_y2: f64 = ys.iter().map(|y| y * y).sum();

    let spread_x = n * sum_x2 - sum_x * sum_x;
    let spread_y = n * sum_y2 - sum_y * sum_y;

    // Rounding can leave a near-constant series at or below zero here.
    if spread_x <= 0.0 || spread_y <= 0.0 {
        return Err(ProcessingError::DegenerateInput(
            "correlation of a series with zero variance".to_string(),
        ));
    }

    let r = (n * sum_xy - sum_x * sum_y) / (spread_x * spread_y).sqrt();
    Ok(r.clamp(-1.0, 1.0))
}

/// Fraction of values strictly below `value`, in `[0, 1]`
pub fn percentile_rank(values: &[f64], value: f64) -> Result<f64, ProcessingError> {
    non_empty(values, "percentile rank")?;
    let below = values.iter().filter(|&&x| x < value).count();
    Ok(below as f64 / values.len() as f64)
}

/// Values whose absolute z-score exceeds `threshold`, in input order
pub fn z_score_outliers(values: &[f64], threshold: f64) -> Result<Vec<f64>, ProcessingError> {
    let mean = mean(values)?;
    let std_dev = std_dev(values)?;

    if std_dev == 0.0 {
        return Err(ProcessingError::DegenerateInput(
            "z-scores of a series with zero standard deviation".to_string(),
        ));
    }

    Ok(values
        .iter()
        .copied()
        .filter(|&x| ((x - mean) / std_dev).abs() > threshold)
        .collect())
}
