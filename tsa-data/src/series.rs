use csv::{ReaderBuilder, StringRecord, Trim};
use log::debug;
use serde::Serialize;
use tsa_utils::dates::{DateCodec, TimeUnit};
use tsa_utils::error::{AnalysisError, Result};

/// A single (day number, value) observation.
#[derive(Debug, PartialEq, Clone, Copy, Serialize)]
pub struct Sample {
    pub time: f64,
    pub value: f64,
}

/// An ordered sequence of samples.
///
/// Times are expected to increase with a uniform spacing; neither property
/// is checked here.
#[derive(Debug, Default, PartialEq, Clone, Serialize)]
pub struct TimeSeries(pub Vec<Sample>);

impl TimeSeries {
    /// Zip parallel time and value columns into a series.
    pub fn from_columns(times: &[f64], values: &[f64]) -> Result<TimeSeries> {
        if times.len() != values.len() {
            return Err(AnalysisError::InvalidParameter(format!(
                "time column has {} entries but value column has {}",
                times.len(),
                values.len()
            )));
        }
        Ok(TimeSeries(
            times
                .iter()
                .zip(values)
                .map(|(&time, &value)| Sample { time, value })
                .collect(),
        ))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn times(&self) -> Vec<f64> {
        self.0.iter().map(|s| s.time).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.0.iter().map(|s| s.value).collect()
    }

    /// Samples with `start <= time < end`.
    pub fn range(&self, start: f64, end: f64) -> TimeSeries {
        TimeSeries(
            self.0
                .iter()
                .filter(|s| start <= s.time && s.time < end)
                .copied()
                .collect(),
        )
    }

    /// Like [`TimeSeries::range`], with the bounds given as date strings.
    pub fn range_by_dates(
        &self,
        codec: &DateCodec,
        start: &str,
        end: &str,
        unit: TimeUnit,
    ) -> Result<TimeSeries> {
        let start_number = codec.date_time_to_number(start, unit)?;
        let end_number = codec.date_time_to_number(end, unit)?;
        let selected = self.range(start_number, end_number);
        debug!(
            "selected {} of {} samples between {} and {}",
            selected.len(),
            self.len(),
            start,
            end
        );
        Ok(selected)
    }

    /// Pair `values` with evenly spaced times from `start` to `end`
    /// inclusive. The last sample lands exactly on `end`.
    pub fn with_uniform_times(values: &[f64], start: f64, end: f64) -> Result<TimeSeries> {
        if !start.is_finite() || !end.is_finite() || start > end {
            return Err(AnalysisError::InvalidParameter(format!(
                "time span must be finite with start <= end, got [{start}, {end}]"
            )));
        }
        let n = values.len();
        let step = if n > 1 {
            (end - start) / (n - 1) as f64
        } else {
            0.0
        };
        Ok(TimeSeries(
            values
                .iter()
                .enumerate()
                .map(|(i, &value)| Sample {
                    time: if i + 1 == n && n > 1 {
                        end
                    } else {
                        start + i as f64 * step
                    },
                    value,
                })
                .collect(),
        ))
    }

    /// Parse a delimited numeric table into a series.
    ///
    /// Rows may be comma separated or separated by runs of whitespace. The
    /// first `skip_rows` lines are headers. Column 0 holds the day number and
    /// `value_column` the observation. Blank lines are ignored.
    pub fn from_delimited_str(
        text: &str,
        skip_rows: usize,
        value_column: usize,
    ) -> Result<TimeSeries> {
        if value_column == 0 {
            return Err(AnalysisError::InvalidParameter(
                "value column 0 is the time column".to_string(),
            ));
        }
        let mut samples = Vec::new();
        for (line, record) in read_records(text, skip_rows)? {
            samples.push(Sample {
                time: parse_field(&record, 0, line)?,
                value: parse_field(&record, value_column, line)?,
            });
        }
        debug!("parsed {} samples from column {}", samples.len(), value_column);
        Ok(TimeSeries(samples))
    }

    /// Parse a table without a time column, such as the minute station
    /// files (temperature then pressure), spreading the rows evenly over
    /// `start..=end`. `value_column` counts from 0.
    pub fn from_untimed_str(
        text: &str,
        skip_rows: usize,
        value_column: usize,
        start: f64,
        end: f64,
    ) -> Result<TimeSeries> {
        let values = read_records(text, skip_rows)?
            .iter()
            .map(|(line, record)| parse_field(record, value_column, *line))
            .collect::<Result<Vec<_>>>()?;
        debug!("parsed {} untimed values from column {}", values.len(), value_column);
        TimeSeries::with_uniform_times(&values, start, end)
    }
}

/// Records of a comma or whitespace separated table with their 1-based line
/// numbers.
fn read_records(text: &str, skip_rows: usize) -> Result<Vec<(usize, StringRecord)>> {
    let mut lines = Vec::new();
    let mut rows = Vec::new();
    for (index, line) in text.lines().enumerate().skip(skip_rows) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        lines.push(index + 1);
        if line.contains(',') {
            rows.push(line.to_string());
        } else {
            rows.push(line.split_whitespace().collect::<Vec<_>>().join(","));
        }
    }
    let body = rows.join("\n");

    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(body.as_bytes());

    let records = rdr
        .records()
        .zip(lines)
        .map(|(result, line)| {
            result
                .map(|record| (line, record))
                .map_err(|e| AnalysisError::SeriesParse(format!("line {line}: {e}")))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(records)
}

fn parse_field(record: &StringRecord, column: usize, line: usize) -> Result<f64> {
    let field = record.get(column).ok_or_else(|| {
        AnalysisError::SeriesParse(format!("line {line}: missing column {column}"))
    })?;
    field.parse::<f64>().map_err(|_| {
        AnalysisError::SeriesParse(format!(
            "line {line}: column {column} value '{field}' is not a number"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsa_utils::dates::EpochConfig;

    fn hourly() -> TimeSeries {
        let times: Vec<f64> = (0..48).map(|h| 366.0 + h as f64 / 24.0).collect();
        let values: Vec<f64> = (0..48).map(|h| 10.0 + h as f64 * 0.1).collect();
        TimeSeries::from_columns(&times, &values).unwrap()
    }

    #[test]
    fn test_from_columns_length_mismatch() {
        let result = TimeSeries::from_columns(&[1.0, 2.0], &[1.0]);
        assert!(matches!(result, Err(AnalysisError::InvalidParameter(_))));
    }

    #[test]
    fn test_range_is_half_open() {
        let series = hourly();
        let day = series.range(366.0, 367.0);
        assert_eq!(day.len(), 24);
        assert_eq!(day.0[0].time, 366.0);
        assert!(day.0.iter().all(|s| s.time < 367.0));
        assert!(series.range(400.0, 500.0).is_empty());
    }

    #[test]
    fn test_range_by_dates() {
        // hour-unit day 366 is 1/1/2017
        let codec = DateCodec::new(EpochConfig::default());
        let series = hourly();
        let morning = series
            .range_by_dates(&codec, "1/1/2017", "1/1/2017,6:00", TimeUnit::Hour)
            .unwrap();
        assert_eq!(morning.len(), 6);
        assert!((morning.values()[5] - 10.5).abs() < 1e-12);

        let bad = series.range_by_dates(&codec, "2017-01-01", "2/1/2017", TimeUnit::Hour);
        assert!(matches!(bad, Err(AnalysisError::InvalidFormat(_))));
    }

    #[test]
    fn test_from_delimited_str_whitespace() {
        let text = "\
Station: UVicSci
 times   temperature   pressure
736330.0000   4.25   1012.5
736330.0007   4.20   1012.6

736330.0014   4.18   1012.6
";
        let temperature = TimeSeries::from_delimited_str(text, 2, 1).unwrap();
        assert_eq!(temperature.len(), 3);
        assert_eq!(temperature.values(), vec![4.25, 4.20, 4.18]);
        let pressure = TimeSeries::from_delimited_str(text, 2, 2).unwrap();
        assert_eq!(pressure.0[1].value, 1012.6);
        assert_eq!(pressure.times(), temperature.times());
    }

    #[test]
    fn test_from_delimited_str_comma() {
        let text = "time,value\n366.0, 1.5\n366.5, -2.0\n";
        let series = TimeSeries::from_delimited_str(text, 1, 1).unwrap();
        assert_eq!(
            series.0,
            vec![
                Sample { time: 366.0, value: 1.5 },
                Sample { time: 366.5, value: -2.0 },
            ]
        );
    }

    #[test]
    fn test_from_delimited_str_errors() {
        let missing = TimeSeries::from_delimited_str("1.0 2.0\n3.0\n", 0, 1);
        assert!(matches!(missing, Err(AnalysisError::SeriesParse(_))));
        let text = TimeSeries::from_delimited_str("1.0 abc\n", 0, 1);
        assert!(matches!(text, Err(AnalysisError::SeriesParse(_))));
        let time_column = TimeSeries::from_delimited_str("1.0 2.0\n", 0, 0);
        assert!(matches!(time_column, Err(AnalysisError::InvalidParameter(_))));
    }

    #[test]
    fn test_with_uniform_times() {
        let series = TimeSeries::with_uniform_times(&[1.0, 2.0, 3.0, 4.0, 5.0], 366.0, 367.0).unwrap();
        assert_eq!(series.times(), vec![366.0, 366.25, 366.5, 366.75, 367.0]);
        assert_eq!(series.values(), vec![1.0, 2.0, 3.0, 4.0, 5.0]);

        let single = TimeSeries::with_uniform_times(&[7.0], 366.0, 367.0).unwrap();
        assert_eq!(single.times(), vec![366.0]);
        assert!(TimeSeries::with_uniform_times(&[], 366.0, 367.0).unwrap().is_empty());
        assert!(matches!(
            TimeSeries::with_uniform_times(&[1.0], 367.0, 366.0),
            Err(AnalysisError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_from_untimed_str_minute_file() {
        let text = "\
UVicSci minute record
temperature pressure
4.25   1012.5
4.20   1012.6
4.18   1012.6
";
        let temperature = TimeSeries::from_untimed_str(text, 2, 0, 736330.0, 736330.5).unwrap();
        assert_eq!(temperature.values(), vec![4.25, 4.20, 4.18]);
        assert_eq!(temperature.times(), vec![736330.0, 736330.25, 736330.5]);

        let pressure = TimeSeries::from_untimed_str(text, 2, 1, 736330.0, 736330.5).unwrap();
        assert_eq!(pressure.values(), vec![1012.5, 1012.6, 1012.6]);

        let missing = TimeSeries::from_untimed_str(text, 2, 2, 736330.0, 736330.5);
        assert!(matches!(missing, Err(AnalysisError::SeriesParse(_))));
    }
}
