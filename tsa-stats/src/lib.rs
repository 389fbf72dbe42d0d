//! Statistics helpers for station time series.
//!
//! Confidence intervals for a sample mean (Student-t) and for a power
//! spectral density estimate (chi-squared), plus a uniform sampler.

pub mod confidence;
pub mod random;

pub use confidence::{
    psd_confidence_interval, student_confidence_interval, MeanInterval, PsdInterval,
    DEFAULT_CONFIDENCE,
};
pub use random::{uniform_random, uniform_samples};
