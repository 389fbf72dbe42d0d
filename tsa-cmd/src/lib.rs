//! Command implementations for the TSA CLI.
//!
//! Provides subcommands for day-number conversion, segment selection, power
//! spectra with confidence bands, and summary statistics of station series.

use clap::Subcommand;
use std::path::PathBuf;
use tsa_utils::dates::TimeUnit;

pub mod analyze;
pub mod config;
pub mod convert;
pub mod registry;

pub use analyze::SeriesArgs;
pub use config::AnalysisConfig;

#[derive(Subcommand)]
pub enum Command {
    /// Convert a "D/M/Y" or "D/M/Y,H:M" date to a day number
    Datenum {
        date: String,

        /// Day-number convention: minute or hour (defaults to the configured unit)
        #[arg(short, long)]
        unit: Option<TimeUnit>,
    },

    /// Convert a day number back to a "D/M/Y" date string
    Datestr {
        #[arg(allow_hyphen_values = true)]
        number: f64,

        /// Day-number convention: minute or hour (defaults to the configured unit)
        #[arg(short, long)]
        unit: Option<TimeUnit>,

        /// Append the time of day as ", HH:MM"
        #[arg(short, long)]
        time: bool,
    },

    /// Choose the number of sub-sections (NS) and their length (NFFT)
    Segments {
        /// Total number of samples
        #[arg(required_unless_present = "input")]
        count: Option<usize>,

        /// Count the samples of this series file instead
        #[arg(short, long, conflicts_with = "count")]
        input: Option<PathBuf>,
    },

    /// Power spectral density of a series with its confidence band
    Psd {
        #[command(flatten)]
        series: SeriesArgs,

        /// Sample interval, in the units of the time column
        #[arg(long)]
        dt: f64,

        /// Record length (defaults to samples * dt)
        #[arg(long)]
        record_length: Option<f64>,

        /// Confidence level for the band (defaults to the configured level)
        #[arg(short, long)]
        confidence: Option<f64>,

        /// Degrees of freedom for a boxcar window
        #[arg(long)]
        boxcar: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Student-t confidence interval for the mean of a series
    MeanCi {
        #[command(flatten)]
        series: SeriesArgs,

        #[arg(short, long)]
        confidence: Option<f64>,

        /// Degrees of freedom (defaults to samples - 1)
        #[arg(long)]
        dof: Option<usize>,

        #[arg(long)]
        json: bool,
    },

    /// Chi-squared confidence factors for a PSD averaged over NS sub-sections
    PsdCi {
        ns: usize,

        #[arg(short, long)]
        confidence: Option<f64>,

        #[arg(long)]
        boxcar: bool,

        #[arg(long)]
        json: bool,
    },

    /// Draw samples from the uniform distribution on [A, B)
    Uniform {
        #[arg(allow_hyphen_values = true)]
        a: f64,

        #[arg(allow_hyphen_values = true)]
        b: f64,

        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,

        /// Seed for reproducible draws
        #[arg(long)]
        seed: Option<u64>,
    },

    /// List the available analysis functions
    Functions {
        /// Only list one module (dates, series, segments, spectrum, confidence, random)
        #[arg(short, long)]
        module: Option<String>,
    },
}

/// Run `command` and return the text to print.
pub fn run(command: Command, config: &AnalysisConfig) -> anyhow::Result<String> {
    match command {
        Command::Datenum { date, unit } => convert::run_datenum(config, &date, unit),
        Command::Datestr { number, unit, time } => {
            convert::run_datestr(config, number, unit, time)
        }
        Command::Segments { count, input } => {
            analyze::run_segments(config, count, input.as_deref())
        }
        Command::Psd {
            series,
            dt,
            record_length,
            confidence,
            boxcar,
            json,
        } => analyze::run_psd(config, &series, dt, record_length, confidence, boxcar, json),
        Command::MeanCi {
            series,
            confidence,
            dof,
            json,
        } => analyze::run_mean_ci(config, &series, confidence, dof, json),
        Command::PsdCi {
            ns,
            confidence,
            boxcar,
            json,
        } => analyze::run_psd_ci(config, ns, confidence, boxcar, json),
        Command::Uniform { a, b, count, seed } => analyze::run_uniform(a, b, count, seed),
        Command::Functions { module } => {
            let operations = registry::operations_in(module.as_deref());
            if operations.is_empty() {
                anyhow::bail!(
                    "unknown module {:?}, expected one of: {}",
                    module.unwrap_or_default(),
                    registry::modules().join(", ")
                );
            }
            Ok(registry::listing(&operations))
        }
    }
}
