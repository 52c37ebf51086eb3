//! Command-line argument parsing

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use super::sampler_config::{DeltaPolicy, RateMode};

/// Two-snapshot throughput sampler for Valkey/Redis deployments
#[derive(Parser, Debug, Clone)]
#[command(name = "valkey-stat-sampler")]
#[command(version, about, long_about = None)]
pub struct CliArgs {
    /// Configuration file with one section per target cluster
    #[arg(short = 'c', long = "config", default_value = "config.ini")]
    pub config: PathBuf,

    /// Period in minutes between the two snapshots
    #[arg(short = 'd', long = "duration", default_value_t = 5)]
    pub duration: u64,

    /// File the result table is written to
    #[arg(short = 'o', long = "output-file", default_value = "ClusterStats.csv")]
    pub output: PathBuf,

    /// Output format
    #[arg(long = "format", value_enum, default_value_t = ReportFormat::Csv)]
    pub format: ReportFormat,

    /// How category counters are reported
    #[arg(long = "rate-mode", value_enum, default_value_t = RateMode::PerSecond)]
    pub rate_mode: RateMode,

    /// Report negative deltas (counter resets) instead of clamping to zero
    #[arg(long = "allow-negative-deltas")]
    pub allow_negative_deltas: bool,

    /// Enable debug logging
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Only log errors, no progress output
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,
}

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Csv,
    Json,
}

impl CliArgs {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate argument combinations
    pub fn validate(&self) -> Result<(), String> {
        if self.duration < 1 {
            return Err("Duration must be at least 1 minute".to_string());
        }
        Ok(())
    }

    /// Resolved negative-delta policy
    pub fn delta_policy(&self) -> DeltaPolicy {
        if self.allow_negative_deltas {
            DeltaPolicy::Passthrough
        } else {
            DeltaPolicy::ClampToZero
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = CliArgs::parse_from(["valkey-stat-sampler"]);
        assert_eq!(args.duration, 5);
        assert_eq!(args.format, ReportFormat::Csv);
        assert_eq!(args.rate_mode, RateMode::PerSecond);
        assert_eq!(args.delta_policy(), DeltaPolicy::ClampToZero);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_zero_duration_rejected() {
        let args = CliArgs::parse_from(["valkey-stat-sampler", "--duration", "0"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_negative_delta_flag() {
        let args =
            CliArgs::parse_from(["valkey-stat-sampler", "--allow-negative-deltas"]);
        assert_eq!(args.delta_policy(), DeltaPolicy::Passthrough);
    }
}
