//! Summary statistics over integers read one per line.
//!
//! Reading stops at the first blank line or end of input. A token that is not
//! an integer, or an integer outside `(LOWER_BOUND, UPPER_BOUND)`, also stops
//! reading; everything read before it is still summarized.

use crate::utils::error::{EtlError, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::io::BufRead;

/// Exclusive lower bound for accepted values.
pub const LOWER_BOUND: i64 = -100_000;
/// Exclusive upper bound for accepted values.
pub const UPPER_BOUND: i64 = 100_000;

/// Values read before input stopped, plus the error that stopped it, if any.
#[derive(Debug, Default)]
pub struct Samples {
    pub values: Vec<i64>,
    pub halt: Option<EtlError>,
}

pub fn parse_sample(line: &str) -> Result<i64> {
    let value: i64 = line.parse().map_err(|e: std::num::ParseIntError| EtlError::InvalidNumber {
        token: line.to_string(),
        reason: e.to_string(),
    })?;

    if value >= UPPER_BOUND || value <= LOWER_BOUND {
        return Err(EtlError::OutOfRange {
            value,
            min: LOWER_BOUND,
            max: UPPER_BOUND,
        });
    }

    Ok(value)
}

pub fn read_samples<R: BufRead>(reader: R) -> Samples {
    let mut samples = Samples::default();

    for line in reader.split(b'\n') {
        let mut line = match line {
            Ok(line) => line,
            Err(e) => {
                samples.halt = Some(EtlError::IoError(e));
                break;
            }
        };
        if line.last() == Some(&b'\r') {
            line.pop();
        }

        // 空行代表輸入結束
        if line.is_empty() {
            break;
        }

        match decode_line(line).and_then(|line| parse_sample(&line)) {
            Ok(value) => samples.values.push(value),
            Err(e) => {
                tracing::debug!("Stopped reading: {}", e);
                samples.halt = Some(e);
                break;
            }
        }
    }

    samples
}

/// 非 UTF-8 的一行視同非數字輸入
fn decode_line(line: Vec<u8>) -> Result<String> {
    String::from_utf8(line).map_err(|e| EtlError::InvalidNumber {
        token: String::from_utf8_lossy(e.as_bytes()).into_owned(),
        reason: e.utf8_error().to_string(),
    })
}

pub fn mean(values: &[i64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sum: i64 = values.iter().sum();
    Some(sum as f64 / values.len() as f64)
}

pub fn median(values: &[i64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid] as f64)
    } else {
        Some((sorted[mid - 1] + sorted[mid]) as f64 / 2.0)
    }
}

/// Most frequent value; the smallest one wins a tie.
pub fn mode(values: &[i64]) -> Option<i64> {
    let mut frequency: BTreeMap<i64, usize> = BTreeMap::new();
    for &value in values {
        *frequency.entry(value).or_insert(0) += 1;
    }

    let mut best: Option<(i64, usize)> = None;
    for (value, count) in frequency {
        // 由小到大走訪，只有嚴格較多才取代
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}

/// Population variance: squared deviations divided by N.
pub fn population_variance(values: &[i64]) -> Option<f64> {
    let mean = mean(values)?;
    let squares: f64 = values
        .iter()
        .map(|&value| {
            let diff = value as f64 - mean;
            diff * diff
        })
        .sum();
    Some(squares / values.len() as f64)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub mode: i64,
    /// Printed on the `SD:` line. No square root is taken.
    pub variance: f64,
}

impl Summary {
    /// `None` when there is nothing to summarize.
    pub fn from_values(values: &[i64]) -> Option<Self> {
        Some(Self {
            count: values.len(),
            mean: mean(values)?,
            median: median(values)?,
            mode: mode(values)?,
            variance: population_variance(values)?,
        })
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Mean: {:.2}", self.mean)?;
        writeln!(f, "Median: {:.2}", self.median)?;
        writeln!(f, "Mode: {}", self.mode)?;
        write!(f, "SD: {:.2}", self.variance)
    }
}
