//! Time series handling for station records.
//!
//! This crate holds the in-memory series consumed by the spectral and
//! statistics crates, plus date-bounded range selection.

pub mod series;

pub use series::{Sample, TimeSeries};
