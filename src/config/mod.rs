//! Configuration module

pub mod cli;
pub mod cluster_config;
pub mod sampler_config;
pub mod tls_config;

pub use cli::{CliArgs, ReportFormat};
pub use cluster_config::{load_clusters, ClusterConfig};
pub use sampler_config::{DeltaPolicy, RateMode, SamplerConfig};
pub use tls_config::TlsConfig;
