use rand::Rng;
use tsa_utils::error::{AnalysisError, Result};

fn check_bounds(a: f64, b: f64) -> Result<()> {
    if !a.is_finite() || !b.is_finite() || a > b {
        return Err(AnalysisError::InvalidParameter(format!(
            "uniform bounds must be finite with a <= b, got [{a}, {b})"
        )));
    }
    if !(b - a).is_finite() {
        return Err(AnalysisError::InvalidParameter(format!(
            "uniform interval [{a}, {b}) is too wide to sample"
        )));
    }
    Ok(())
}

/// One draw from the uniform distribution on `[a, b)`.
///
/// A degenerate interval (`a == b`) always yields `a`.
pub fn uniform_random<R: Rng + ?Sized>(rng: &mut R, a: f64, b: f64) -> Result<f64> {
    check_bounds(a, b)?;
    if a == b {
        return Ok(a);
    }
    Ok(rng.gen_range(a..b))
}

/// `count` independent draws from `[a, b)`.
pub fn uniform_samples<R: Rng + ?Sized>(
    rng: &mut R,
    a: f64,
    b: f64,
    count: usize,
) -> Result<Vec<f64>> {
    check_bounds(a, b)?;
    (0..count).map(|_| uniform_random(rng, a, b)).collect()
}
