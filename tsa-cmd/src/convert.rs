//! Date string / day number conversion commands.

use crate::config::AnalysisConfig;
use tsa_utils::dates::TimeUnit;

/// Encode a date string, printed with enough digits to keep the minutes.
pub fn run_datenum(
    config: &AnalysisConfig,
    date: &str,
    unit: Option<TimeUnit>,
) -> anyhow::Result<String> {
    let unit = unit.unwrap_or(config.unit);
    let number = config.codec().date_time_to_number(date, unit)?;
    Ok(format!("{number:.5}"))
}

pub fn run_datestr(
    config: &AnalysisConfig,
    number: f64,
    unit: Option<TimeUnit>,
    include_time: bool,
) -> anyhow::Result<String> {
    let unit = unit.unwrap_or(config.unit);
    Ok(config
        .codec()
        .date_number_to_string(number, unit, include_time)?)
}
