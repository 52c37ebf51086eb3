//! Sampling policy configuration

use std::time::Duration;

use clap::ValueEnum;

/// How per-category counters are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RateMode {
    /// Raw call-count delta over the window
    RawCount,
    /// Delta divided by measured elapsed seconds
    PerSecond,
}

/// What to do with a negative delta (counter reset mid-interval)
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DeltaPolicy {
    /// Report zero instead of a negative count
    ClampToZero,
    /// Report the raw difference, negative included
    Passthrough,
}

/// Policy knobs shared by every sampler in a round
#[derive(Debug, Clone, Copy)]
pub struct SamplerConfig {
    /// Wall-clock window between the two snapshots
    pub interval: Duration,
    pub rate_mode: RateMode,
    pub delta_policy: DeltaPolicy,
}

impl SamplerConfig {
    pub fn new(interval: Duration, rate_mode: RateMode, delta_policy: DeltaPolicy) -> Self {
        Self {
            interval,
            rate_mode,
            delta_policy,
        }
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(300),
            rate_mode: RateMode::PerSecond,
            delta_policy: DeltaPolicy::ClampToZero,
        }
    }
}
