use log::debug;
use serde::Serialize;
use statrs::distribution::{ChiSquared, ContinuousCDF, Normal, StudentsT};
use tsa_utils::error::{AnalysisError, Result};

pub const DEFAULT_CONFIDENCE: f64 = 0.95;

/// Above this many degrees of freedom chi-squared quantiles use the
/// Wilson-Hilferty normal approximation.
const LARGE_DOF: f64 = 1.0e6;

/// Student-t interval around a sample mean. Bounds are absolute values.
#[derive(Debug, PartialEq, Clone, Copy, Serialize)]
pub struct MeanInterval {
    pub mean: f64,
    pub lower: f64,
    pub upper: f64,
    /// two-sided critical value used for the half width
    pub t_critical: f64,
    pub dof: usize,
}

/// Chi-squared interval for a PSD estimate.
///
/// `lower` and `upper` are multiplicative: scaling every PSD value by them
/// gives the confidence band.
#[derive(Debug, PartialEq, Clone, Copy, Serialize)]
pub struct PsdInterval {
    pub lower: f64,
    pub upper: f64,
    /// equivalent degrees of freedom
    pub nu: f64,
}

/// Reject confidence levels outside the open interval (0, 1).
pub fn check_confidence(confidence: f64) -> Result<()> {
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(AnalysisError::InvalidParameter(format!(
            "confidence must lie in (0, 1), got {confidence}"
        )));
    }
    Ok(())
}

/// Confidence interval for the mean of `data` from the Student-t distribution.
///
/// The spread uses the population standard deviation (divisor N). `dof`
/// defaults to `N - 1` when it is `None` or zero.
pub fn student_confidence_interval(
    data: &[f64],
    confidence: f64,
    dof: Option<usize>,
) -> Result<MeanInterval> {
    if data.is_empty() {
        return Err(AnalysisError::EmptyInput(
            "confidence interval of an empty sample".to_string(),
        ));
    }
    check_confidence(confidence)?;

    let n = data.len() as f64;
    let mean = data.iter().sum::<f64>() / n;
    let std_dev = (data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n).sqrt();

    let dof = match dof {
        Some(d) if d > 0 => d,
        _ => data.len() - 1,
    };
    if dof == 0 {
        return Err(AnalysisError::InvalidParameter(
            "a single value has zero degrees of freedom".to_string(),
        ));
    }

    let t_dist = StudentsT::new(0.0, 1.0, dof as f64)
        .map_err(|e| AnalysisError::InvalidParameter(format!("t-distribution: {e}")))?;
    let t_critical = t_dist.inverse_cdf((1.0 - confidence) / 2.0).abs();
    let half_width = t_critical * std_dev / n.sqrt();

    debug!("mean {mean} +/- {half_width} (t = {t_critical}, dof = {dof})");
    Ok(MeanInterval {
        mean,
        lower: mean - half_width,
        upper: mean + half_width,
        t_critical,
        dof,
    })
}

/// Multiplicative confidence factors for a PSD averaged over `ns` sub-sections.
///
/// With `M = 2 NS - 1` overlapping pieces the equivalent degrees of freedom
/// are `4M/3`, or `2M` for a boxcar window.
pub fn psd_confidence_interval(ns: usize, confidence: f64, boxcar: bool) -> Result<PsdInterval> {
    if ns < 1 {
        return Err(AnalysisError::InvalidParameter(
            "number of sub-sections must be at least 1".to_string(),
        ));
    }
    check_confidence(confidence)?;

    let m = 2.0 * ns as f64 - 1.0;
    let nu = if boxcar { 2.0 * m } else { 4.0 / 3.0 * m };
    let alpha = 1.0 - confidence;
    let lower = nu / chi_squared_quantile(nu, 1.0 - alpha / 2.0)?;
    let upper = nu / chi_squared_quantile(nu, alpha / 2.0)?;

    debug!("PSD band for NS = {ns}: [{lower}, {upper}] (nu = {nu})");
    Ok(PsdInterval { lower, upper, nu })
}

fn chi_squared_quantile(nu: f64, p: f64) -> Result<f64> {
    if nu > LARGE_DOF {
        let z = Normal::new(0.0, 1.0)
            .map_err(|e| AnalysisError::InvalidParameter(format!("normal: {e}")))?
            .inverse_cdf(p);
        let h = 2.0 / (9.0 * nu);
        return Ok(nu * (1.0 - h + z * h.sqrt()).powi(3));
    }
    let chi2 = ChiSquared::new(nu)
        .map_err(|e| AnalysisError::InvalidParameter(format!("chi-squared: {e}")))?;
    Ok(chi2.inverse_cdf(p))
}
