//! Analysis settings, optionally loaded from a JSON file.

use anyhow::Context;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tsa_stats::DEFAULT_CONFIDENCE;
use tsa_utils::dates::{DateCodec, EpochConfig, TimeUnit};

/// Settings shared by every subcommand.
///
/// Missing fields take their defaults, so `{}` is a valid config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub epoch: EpochConfig,
    /// Confidence level used when a command is not given one
    pub confidence: f64,
    /// Day-number convention of input files and date arguments
    pub unit: TimeUnit,
    /// Header lines at the top of series files
    pub skip_rows: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            epoch: EpochConfig::default(),
            confidence: DEFAULT_CONFIDENCE,
            unit: TimeUnit::Minute,
            skip_rows: 0,
        }
    }
}

impl AnalysisConfig {
    /// Read a JSON config, or fall back to defaults when no path is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<AnalysisConfig> {
        let Some(path) = path else {
            return Ok(AnalysisConfig::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: AnalysisConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn codec(&self) -> DateCodec {
        DateCodec::new(self.epoch)
    }
}
