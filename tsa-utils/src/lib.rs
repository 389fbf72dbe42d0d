//! Shared utilities for TSA crates: the common error type and the
//! day-number date codec used to index station time series.

pub mod dates;
pub mod error;

pub use dates::{DateCodec, EpochConfig, TimeUnit};
pub use error::{AnalysisError, Result};
