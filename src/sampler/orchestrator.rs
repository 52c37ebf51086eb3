//! Sampling round orchestration
//!
//! Drives one round per cluster: discover the topology through the
//! entry point, fan one sampler thread out per reachable node, tick a
//! progress bar across the shared window, and collect rows as threads
//! complete. A node failure is logged and skipped; only an unreachable
//! entry point fails the round.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use super::node_sampler::NodeSampler;
use super::row::SampleRow;
use crate::cluster;
use crate::config::{ClusterConfig, SamplerConfig};
use crate::taxonomy::CommandTaxonomy;
use crate::utils::{Result, SamplerError};

/// Fans sampling out across a cluster's nodes
pub struct SampleOrchestrator {
    config: SamplerConfig,
    taxonomy: Arc<CommandTaxonomy>,
    shutdown: Arc<AtomicBool>,
    show_progress: bool,
}

impl SampleOrchestrator {
    pub fn new(config: SamplerConfig, taxonomy: CommandTaxonomy, show_progress: bool) -> Self {
        Self {
            config,
            taxonomy: Arc::new(taxonomy),
            shutdown: Arc::new(AtomicBool::new(false)),
            show_progress,
        }
    }

    /// The taxonomy this orchestrator's rows are keyed by
    pub fn taxonomy(&self) -> &CommandTaxonomy {
        &self.taxonomy
    }

    /// Flag observed by in-flight samplers at their suspension point.
    /// Setting it cancels the round cooperatively; cancelled nodes
    /// contribute no row.
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Run one sampling round against a cluster.
    ///
    /// Rows come back in completion order, not discovery order.
    pub fn run(&self, source: &str, cluster_config: &ClusterConfig) -> Result<Vec<SampleRow>> {
        let factory = cluster_config.connection_factory();

        // Entry-point failure is the only fatal one
        let mut entry = factory.create(&cluster_config.host, cluster_config.port)?;
        let nodes = cluster::discover(&mut entry, &cluster_config.host, cluster_config.port)?;
        drop(entry);

        info!(
            source,
            nodes = nodes.len(),
            interval_secs = self.config.interval.as_secs(),
            "sampling cluster"
        );

        let mut handles = Vec::with_capacity(nodes.len());
        for node in nodes {
            let factory = factory.clone();
            let sampler = NodeSampler::new(self.config, Arc::clone(&self.taxonomy));
            let shutdown = Arc::clone(&self.shutdown);
            let source = source.to_string();
            let address = node.address();

            let handle = thread::Builder::new()
                .name(format!("sampler-{}", address))
                .spawn(move || -> Result<SampleRow> {
                    let mut conn = factory.create(&node.host, node.port)?;
                    sampler.sample(&mut conn, &source, &node, &shutdown)
                })?;

            handles.push((address, handle));
        }

        if self.show_progress {
            self.tick_progress();
        }

        let mut rows = Vec::with_capacity(handles.len());
        for (address, handle) in handles {
            match handle.join() {
                Ok(Ok(row)) => rows.push(row),
                Ok(Err(SamplerError::Cancelled)) => {
                    warn!(node = %address, "sampling cancelled")
                }
                Ok(Err(e)) => {
                    warn!(node = %address, error = %e, "node sampling failed, skipping")
                }
                Err(_) => warn!(node = %address, "sampler thread panicked, skipping"),
            }
        }

        Ok(rows)
    }

    /// Tick once per second across the sampling window while the
    /// samplers hold between snapshots.
    fn tick_progress(&self) {
        let secs = self.config.interval.as_secs();
        let pb = ProgressBar::new(secs.max(1));
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}s")
                .unwrap()
                .progress_chars("#>-"),
        );

        for _ in 0..secs {
            if self.shutdown.load(Ordering::Relaxed) {
                break;
            }
            thread::sleep(Duration::from_secs(1));
            pb.inc(1);
        }
        pb.finish_and_clear();
    }
}
