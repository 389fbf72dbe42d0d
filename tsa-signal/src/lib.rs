//! Spectral analysis for station time series.
//!
//! - [`segments`]: choose the number and length of sub-sections (NS, NFFT)
//! - [`spectrum`]: one-sided FFT power spectral density

pub mod segments;
pub mod spectrum;

pub use segments::{select_segments, SegmentPlan};
pub use spectrum::{power_spectrum, PsdResult};
