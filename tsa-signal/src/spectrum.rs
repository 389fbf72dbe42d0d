//! One-sided power spectral density via FFT.
//!
//! The whole series is transformed in one pass with an implicit boxcar
//! window. No detrending and no sub-section averaging is applied here; a
//! [`SegmentPlan`](crate::segments::SegmentPlan) only feeds the confidence
//! band width.

use log::debug;
use rustfft::{num_complex::Complex, FftPlanner};
use serde::Serialize;
use tsa_utils::error::{AnalysisError, Result};

const GRID_TOLERANCE: f64 = 1e-9;

/// PSD values and their frequencies, ascending from 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PsdResult {
    pub power: Vec<f64>,
    pub frequency: Vec<f64>,
}

impl PsdResult {
    pub fn len(&self) -> usize {
        self.power.len()
    }

    pub fn is_empty(&self) -> bool {
        self.power.is_empty()
    }

    /// Frequency and power of the strongest bin.
    pub fn peak(&self) -> Option<(f64, f64)> {
        self.power
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, &power)| (self.frequency[i], power))
    }

    /// Lower and upper confidence curves from multiplicative factors.
    pub fn band(&self, lower_factor: f64, upper_factor: f64) -> (Vec<f64>, Vec<f64>) {
        let lower = self.power.iter().map(|p| p * lower_factor).collect();
        let upper = self.power.iter().map(|p| p * upper_factor).collect();
        (lower, upper)
    }
}

/// Number of points in the half-open grid `[0, record_length)` stepped by `dt`.
pub fn grid_length(dt: f64, record_length: f64) -> Result<usize> {
    if !dt.is_finite() || dt <= 0.0 {
        return Err(AnalysisError::InvalidParameter(format!(
            "sample interval must be positive, got {dt}"
        )));
    }
    if !record_length.is_finite() || record_length <= 0.0 {
        return Err(AnalysisError::InvalidParameter(format!(
            "record length must be positive, got {record_length}"
        )));
    }
    let steps = record_length / dt;
    let nearest = steps.round();
    // a record of exactly n * dt should not gain a point from rounding error
    if (steps - nearest).abs() <= GRID_TOLERANCE * nearest.max(1.0) {
        return Ok(nearest as usize);
    }
    Ok(steps.ceil() as usize)
}

/// Sample frequencies for an `n`-point FFT at spacing `dt`, in FFT order:
/// non-negative frequencies first, then the negative ones.
pub fn fft_frequencies(n: usize, dt: f64) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    let scale = 1.0 / (n as f64 * dt);
    let positive = (n - 1) / 2 + 1;
    (0..n)
        .map(|k| {
            if k < positive {
                k as f64 * scale
            } else {
                (k as f64 - n as f64) * scale
            }
        })
        .collect()
}

/// One-sided PSD of `series` sampled every `dt` over `record_length`.
///
/// With `N` the grid length of the record, the full series is transformed and
/// the first `N / 2` bins are kept, each scaled as `|X[k]|^2 / N`. The series
/// must hold at least `N` samples.
pub fn power_spectrum(series: &[f64], dt: f64, record_length: f64) -> Result<PsdResult> {
    if series.is_empty() {
        return Err(AnalysisError::EmptyInput(
            "power spectrum of an empty series".to_string(),
        ));
    }
    let n = grid_length(dt, record_length)?;
    if series.len() < n {
        return Err(AnalysisError::InsufficientData {
            needed: n,
            found: series.len(),
        });
    }

    let mut buffer: Vec<Complex<f64>> = series.iter().map(|&x| Complex::new(x, 0.0)).collect();
    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(buffer.len());
    fft.process(&mut buffer);

    let half = n / 2;
    let power = buffer[..half]
        .iter()
        .map(|bin| bin.norm_sqr() / n as f64)
        .collect();
    let mut frequency = fft_frequencies(n, dt);
    frequency.truncate(half);

    debug!(
        "power spectrum: {} point FFT, N = {}, {} bins, df = {}",
        series.len(),
        n,
        half,
        1.0 / (n as f64 * dt)
    );
    Ok(PsdResult { power, frequency })
}
