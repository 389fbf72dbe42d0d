//! Error types for the TSA library crates.
use thiserror::Error;

/// Main error type for date conversion, segmentation and statistics.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Date/time string does not have the `D/M/Y[,H:M]` shape
    #[error("Invalid date format: {0}")]
    InvalidFormat(String),

    /// Components parsed but do not form a real calendar date or clock time
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Too few samples for the requested computation
    #[error("Insufficient data (needed: {needed}, found: {found})")]
    InsufficientData { needed: usize, found: usize },

    /// Numeric argument outside its domain
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Zero-length input where at least one value is required
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// Failed to parse a delimited series table
    #[error("Failed to parse series: {0}")]
    SeriesParse(String),
}

/// Type alias for Results using AnalysisError
pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::AnalysisError;

    #[test]
    fn test_error_messages() {
        let err = AnalysisError::InsufficientData {
            needed: 65,
            found: 10,
        };
        assert_eq!(err.to_string(), "Insufficient data (needed: 65, found: 10)");
        let err = AnalysisError::InvalidFormat("1-1-2017".to_string());
        assert_eq!(err.to_string(), "Invalid date format: 1-1-2017");
    }
}
