//! Spectral and statistical commands over series files.

use crate::config::AnalysisConfig;
use anyhow::Context;
use clap::Args;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tsa_data::TimeSeries;
use tsa_signal::{power_spectrum, select_segments, PsdResult, SegmentPlan};
use tsa_stats::confidence::check_confidence;
use tsa_stats::{psd_confidence_interval, student_confidence_interval, uniform_samples, PsdInterval};

/// Where to read a series from and which part of it to use.
#[derive(Args, Debug, Clone)]
pub struct SeriesArgs {
    /// Delimited file: day-number column followed by value columns
    #[arg(short, long)]
    pub input: PathBuf,

    /// Value column (1 = first column after the time column, or the first
    /// column of a file read with --span)
    #[arg(long, default_value_t = 1)]
    pub column: usize,

    /// The file has no time column: spread its rows evenly over these
    /// first and last day numbers
    #[arg(long, num_args = 2, value_names = ["FIRST", "LAST"], allow_hyphen_values = true)]
    pub span: Option<Vec<f64>>,

    /// Header lines to skip (defaults to the configured value)
    #[arg(long)]
    pub skip_rows: Option<usize>,

    /// Keep samples from this date on (D/M/Y[,H:M])
    #[arg(long)]
    pub start: Option<String>,

    /// Keep samples before this date (D/M/Y[,H:M])
    #[arg(long)]
    pub end: Option<String>,
}

/// Read the series file and apply the optional date range.
pub fn load_series(config: &AnalysisConfig, args: &SeriesArgs) -> anyhow::Result<TimeSeries> {
    let text = std::fs::read_to_string(&args.input)
        .with_context(|| format!("reading series {}", args.input.display()))?;
    let skip_rows = args.skip_rows.unwrap_or(config.skip_rows);
    let series = match args.span.as_deref() {
        None => TimeSeries::from_delimited_str(&text, skip_rows, args.column),
        Some(&[first, last]) => {
            let column = args
                .column
                .checked_sub(1)
                .context("value columns are numbered from 1")?;
            TimeSeries::from_untimed_str(&text, skip_rows, column, first, last)
        }
        Some(span) => anyhow::bail!("--span takes two day numbers, got {}", span.len()),
    }
    .with_context(|| format!("parsing series {}", args.input.display()))?;
    info!(
        "Loaded {} samples from {}",
        series.len(),
        args.input.display()
    );

    let codec = config.codec();
    let selected = match (&args.start, &args.end) {
        (None, None) => series,
        (Some(start), Some(end)) => series.range_by_dates(&codec, start, end, config.unit)?,
        (start, end) => {
            let encode = |bound: &Option<String>, open: f64| -> anyhow::Result<f64> {
                match bound {
                    Some(s) => Ok(codec.date_time_to_number(s, config.unit)?),
                    None => Ok(open),
                }
            };
            series.range(
                encode(start, f64::NEG_INFINITY)?,
                encode(end, f64::INFINITY)?,
            )
        }
    };
    if selected.is_empty() {
        anyhow::bail!("no samples in {} for the requested range", args.input.display());
    }
    Ok(selected)
}

pub fn run_segments(
    config: &AnalysisConfig,
    count: Option<usize>,
    input: Option<&Path>,
) -> anyhow::Result<String> {
    let sample_count = match (count, input) {
        (Some(n), _) => n,
        (None, Some(path)) => {
            let args = SeriesArgs {
                input: path.to_path_buf(),
                column: 1,
                span: None,
                skip_rows: None,
                start: None,
                end: None,
            };
            load_series(config, &args)?.len()
        }
        (None, None) => anyhow::bail!("give a sample count or --input"),
    };
    let plan = select_segments(sample_count)?;
    Ok(plan.to_string())
}

/// PSD with its segment plan and confidence band.
#[derive(Debug, Serialize)]
pub struct PsdReport {
    pub dt: f64,
    pub record_length: f64,
    pub plan: Option<SegmentPlan>,
    pub interval: Option<PsdInterval>,
    pub psd: PsdResult,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

impl PsdReport {
    fn to_table(&self) -> String {
        let mut out = format!("# dt = {}, record length = {}\n", self.dt, self.record_length);
        if let Some(plan) = &self.plan {
            out.push_str(&format!("# {plan}\n"));
        }
        if let Some(ci) = &self.interval {
            out.push_str(&format!(
                "# band factors: lower = {:.6}, upper = {:.6} (nu = {:.3})\n",
                ci.lower, ci.upper, ci.nu
            ));
        }
        out.push_str("frequency\tpower\tlower\tupper");
        for i in 0..self.psd.len() {
            out.push_str(&format!(
                "\n{:.8e}\t{:.8e}\t{:.8e}\t{:.8e}",
                self.psd.frequency[i], self.psd.power[i], self.lower[i], self.upper[i]
            ));
        }
        out
    }
}

/// Build the PSD report for `values`.
///
/// NS for the band comes from the segment selector on the series length; when
/// the series is too short for a plan the band is left out.
pub fn psd_report(
    values: &[f64],
    dt: f64,
    record_length: Option<f64>,
    confidence: f64,
    boxcar: bool,
) -> anyhow::Result<PsdReport> {
    check_confidence(confidence)?;
    let record_length = record_length.unwrap_or(values.len() as f64 * dt);
    let psd = power_spectrum(values, dt, record_length)?;

    let plan = match select_segments(values.len()) {
        Ok(plan) => Some(plan),
        Err(e) => {
            warn!("no confidence band: {e}");
            None
        }
    };
    let interval = match &plan {
        Some(plan) => Some(psd_confidence_interval(plan.ns, confidence, boxcar)?),
        None => None,
    };
    let (lower, upper) = match &interval {
        Some(ci) => psd.band(ci.lower, ci.upper),
        None => (psd.power.clone(), psd.power.clone()),
    };

    Ok(PsdReport {
        dt,
        record_length,
        plan,
        interval,
        psd,
        lower,
        upper,
    })
}

pub fn run_psd(
    config: &AnalysisConfig,
    series: &SeriesArgs,
    dt: f64,
    record_length: Option<f64>,
    confidence: Option<f64>,
    boxcar: bool,
    json: bool,
) -> anyhow::Result<String> {
    let values = load_series(config, series)?.values();
    let report = psd_report(
        &values,
        dt,
        record_length,
        confidence.unwrap_or(config.confidence),
        boxcar,
    )?;
    if json {
        Ok(serde_json::to_string_pretty(&report)?)
    } else {
        Ok(report.to_table())
    }
}

pub fn run_mean_ci(
    config: &AnalysisConfig,
    series: &SeriesArgs,
    confidence: Option<f64>,
    dof: Option<usize>,
    json: bool,
) -> anyhow::Result<String> {
    let values = load_series(config, series)?.values();
    let confidence = confidence.unwrap_or(config.confidence);
    let ci = student_confidence_interval(&values, confidence, dof)?;
    if json {
        return Ok(serde_json::to_string_pretty(&ci)?);
    }
    Ok(format!(
        "mean = {:.6}\n{:.0}% interval: [{:.6}, {:.6}]\nt = {:.6} (dof = {})",
        ci.mean,
        confidence * 100.0,
        ci.lower,
        ci.upper,
        ci.t_critical,
        ci.dof
    ))
}

pub fn run_psd_ci(
    config: &AnalysisConfig,
    ns: usize,
    confidence: Option<f64>,
    boxcar: bool,
    json: bool,
) -> anyhow::Result<String> {
    let ci = psd_confidence_interval(ns, confidence.unwrap_or(config.confidence), boxcar)?;
    if json {
        return Ok(serde_json::to_string_pretty(&ci)?);
    }
    Ok(format!(
        "lower = {:.6}\nupper = {:.6}\nnu = {:.3}",
        ci.lower, ci.upper, ci.nu
    ))
}

pub fn run_uniform(a: f64, b: f64, count: usize, seed: Option<u64>) -> anyhow::Result<String> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let samples = uniform_samples(&mut rng, a, b, count)?;
    Ok(samples
        .iter()
        .map(|x| x.to_string())
        .collect::<Vec<_>>()
        .join("\n"))
}
