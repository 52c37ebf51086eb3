//! valkey-stat-sampler - two-snapshot throughput sampler for
//! Valkey/Redis deployments
//!
//! Connects to every configured cluster, samples each reachable node
//! twice across the configured window, and writes one metrics row per
//! node to a CSV or JSON table.

use std::time::Duration;

use anyhow::Result;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use valkey_stat_sampler::config::{load_clusters, CliArgs, SamplerConfig};
use valkey_stat_sampler::report::ReportWriter;
use valkey_stat_sampler::sampler::SampleOrchestrator;
use valkey_stat_sampler::taxonomy::CommandTaxonomy;

fn setup_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else if verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

fn run() -> Result<()> {
    let args = CliArgs::parse_args();

    setup_logging(args.verbose, args.quiet);

    args.validate()
        .map_err(|e| anyhow::anyhow!("Invalid arguments: {}", e))?;

    let clusters = load_clusters(&args.config)?;

    let sampler_config = SamplerConfig::new(
        Duration::from_secs(args.duration * 60),
        args.rate_mode,
        args.delta_policy(),
    );

    let orchestrator = SampleOrchestrator::new(
        sampler_config,
        CommandTaxonomy::default(),
        !args.quiet,
    );

    if !args.quiet {
        println!("valkey-stat-sampler v{}", env!("CARGO_PKG_VERSION"));
        println!("Clusters: {}", clusters.len());
        println!("Sampling window: {} min", args.duration);
        println!("Output: {}", args.output.display());
    }

    let mut rows = Vec::new();
    for (source, cluster_config) in &clusters {
        info!(source = %source, host = %cluster_config.host, "connecting to cluster");
        match orchestrator.run(source, cluster_config) {
            Ok(cluster_rows) => {
                info!(source = %source, rows = cluster_rows.len(), "cluster sampled");
                rows.extend(cluster_rows);
            }
            // One cluster being down should not lose the others' rows
            Err(e) => warn!(source = %source, error = %e, "cluster skipped"),
        }
    }

    if rows.is_empty() {
        anyhow::bail!("No nodes could be sampled");
    }

    info!(path = %args.output.display(), "writing report");
    let writer = ReportWriter::new(args.format);
    writer.write(&args.output, orchestrator.taxonomy(), &rows)?;

    if !args.quiet {
        println!("Wrote {} rows to {}", rows.len(), args.output.display());
    }

    Ok(())
}

fn main() {
    if let Err(e) = run() {
        error!("Error: {:#}", e);
        std::process::exit(1);
    }
}
