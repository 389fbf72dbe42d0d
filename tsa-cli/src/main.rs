//! TSA CLI - day-number dates, power spectra and confidence intervals for
//! weather station time series.

use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;
use tsa_cmd::AnalysisConfig;

#[derive(Parser)]
#[command(
    name = "tsa",
    version,
    about = "Time series analysis toolkit for weather station records"
)]
struct Cli {
    /// JSON file with epoch, unit, confidence and skip_rows settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: tsa_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let config = AnalysisConfig::load(cli.config.as_deref())?;
    let output = tsa_cmd::run(cli.command, &config)?;
    println!("{output}");
    Ok(())
}
