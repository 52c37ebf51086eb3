//! Per-node two-snapshot sampling
//!
//! One sampler owns one connection for one node: capture snapshot A,
//! hold for the configured window, capture snapshot B, derive the
//! metrics row. The wait is the only suspension point and observes the
//! round's shutdown flag, so cancellation lands between snapshots and
//! a cancelled node contributes no row.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use super::row::{CellValue, SampleRow};
use crate::client::ControlPlaneExt;
use crate::cluster::NodeDescriptor;
use crate::config::{DeltaPolicy, RateMode, SamplerConfig};
use crate::parser::{parse_info, InfoTree};
use crate::taxonomy::CommandTaxonomy;
use crate::utils::{ProtocolError, Result, SamplerError};

/// How often the interval wait re-checks the shutdown flag
const SHUTDOWN_POLL_STEP: Duration = Duration::from_millis(250);

/// Logical namespace slots scanned for key counts (db0..db15)
const NAMESPACE_SLOTS: usize = 16;

/// One captured status report pair
#[derive(Debug)]
pub struct Snapshot {
    /// Parsed `INFO commandstats`
    pub cmdstats: InfoTree,
    /// Parsed general `INFO`
    pub info: InfoTree,
}

impl Snapshot {
    /// Capture both reports over one connection
    pub fn capture<C: ControlPlaneExt>(conn: &mut C) -> Result<Self> {
        let cmdstats = parse_info(&conn.info("commandstats")?);
        let info = parse_info(&conn.info("")?);
        Ok(Self { cmdstats, info })
    }
}

/// Two-snapshot sampler for a single node
#[derive(Clone)]
pub struct NodeSampler {
    config: SamplerConfig,
    taxonomy: Arc<CommandTaxonomy>,
}

impl NodeSampler {
    pub fn new(config: SamplerConfig, taxonomy: Arc<CommandTaxonomy>) -> Self {
        Self { config, taxonomy }
    }

    /// Run the full two-snapshot cycle and build the node's row.
    ///
    /// The caller supplies the node's role via the descriptor; it is
    /// not re-derived from the reports.
    pub fn sample<C: ControlPlaneExt>(
        &self,
        conn: &mut C,
        source: &str,
        node: &NodeDescriptor,
        shutdown: &AtomicBool,
    ) -> Result<SampleRow> {
        debug!(node = %node.address(), "capturing first snapshot");
        let first = Snapshot::capture(conn)?;
        let started = Instant::now();

        self.wait_interval(shutdown)?;

        debug!(node = %node.address(), "capturing second snapshot");
        let second = Snapshot::capture(conn)?;
        let elapsed_secs = started.elapsed().as_secs_f64();

        let row = build_row(
            source,
            node,
            &first,
            &second,
            elapsed_secs,
            &self.taxonomy,
            &self.config,
        )?;
        Ok(row)
    }

    /// Sliced sleep between snapshots; returns Cancelled if the round
    /// is shut down mid-wait.
    fn wait_interval(&self, shutdown: &AtomicBool) -> Result<()> {
        let deadline = Instant::now() + self.config.interval;
        loop {
            if shutdown.load(Ordering::Relaxed) {
                return Err(SamplerError::Cancelled);
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(());
            }
            thread::sleep(remaining.min(SHUTDOWN_POLL_STEP));
        }
    }
}

/// Apply the configured negative-delta policy
fn apply_policy(delta: i64, policy: DeltaPolicy) -> i64 {
    match policy {
        DeltaPolicy::ClampToZero => delta.max(0),
        DeltaPolicy::Passthrough => delta,
    }
}

/// Round to three decimal places
fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Derive one metrics row from two snapshot pairs.
///
/// Pure over its inputs; the sampling transport never reaches this
/// layer, which keeps the whole derivation testable against canned
/// report text.
pub fn build_row(
    source: &str,
    node: &NodeDescriptor,
    first: &Snapshot,
    second: &Snapshot,
    elapsed_secs: f64,
    taxonomy: &CommandTaxonomy,
    config: &SamplerConfig,
) -> Result<SampleRow> {
    let info = &second.info;

    let engine_version = info
        .get_str("redis_version")
        .ok_or_else(|| ProtocolError::MissingField("redis_version".to_string()))?
        .to_string();
    let os = info
        .get_str("os")
        .ok_or_else(|| ProtocolError::MissingField("os".to_string()))?
        .to_string();

    let ops_before = first
        .info
        .get_i64("total_commands_processed")
        .ok_or_else(|| ProtocolError::MissingField("total_commands_processed".to_string()))?;
    let ops_after = info
        .get_i64("total_commands_processed")
        .ok_or_else(|| ProtocolError::MissingField("total_commands_processed".to_string()))?;

    let elapsed = elapsed_secs.max(f64::EPSILON);

    // Grand total comes from the server's own aggregate counter, not
    // from summing categories: unclassified commands still count here.
    let ops_delta = apply_policy(ops_after - ops_before, config.delta_policy);
    let total_ops = match config.rate_mode {
        RateMode::PerSecond => CellValue::Float(ops_delta as f64 / elapsed),
        RateMode::RawCount => CellValue::Int(ops_delta),
    };

    let category_counts: Vec<i64> = taxonomy
        .all_deltas(&first.cmdstats, &second.cmdstats)
        .into_iter()
        .map(|delta| {
            let delta = apply_policy(delta, config.delta_policy);
            match config.rate_mode {
                RateMode::PerSecond => (delta as f64 / elapsed).round() as i64,
                RateMode::RawCount => delta,
            }
        })
        .collect();

    let peak_memory_bytes = info.get_i64("used_memory_peak").unwrap_or(0);
    let memory_limit_gb = round3(peak_memory_bytes as f64 / (1024.0 * 1024.0 * 1024.0));

    let (total_keys, namespaces) = keyspace_summary(info);

    Ok(SampleRow {
        source: source.to_string(),
        node_name: node.address(),
        role: node.role,
        engine_version,
        os,
        peak_memory_bytes,
        memory_limit_gb,
        connections: info.get_i64("connected_clients").unwrap_or(0),
        cluster_enabled: info.get_i64("cluster_enabled").unwrap_or(0),
        connected_replicas: info
            .get_i64("connected_slaves")
            .or_else(|| info.get_i64("connected_replicas")),
        total_ops,
        category_counts,
        total_keys,
        namespaces,
    })
}

/// Sum key counts across the bounded namespace slots and render the
/// per-namespace breakdown.
fn keyspace_summary(info: &InfoTree) -> (i64, String) {
    let mut total = 0;
    let mut parts = Vec::new();

    for slot in 0..NAMESPACE_SLOTS {
        let db = format!("db{}", slot);
        if let Some(keys) = info
            .get(&db)
            .and_then(|v| v.as_map())
            .and_then(|m| m.get("keys"))
            .and_then(|v| v.as_i64())
        {
            total += keys;
            parts.push(format!("{}:{}", db, keys));
        }
    }

    (total, parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockControlPlane;
    use crate::cluster::NodeRole;

    fn node() -> NodeDescriptor {
        NodeDescriptor {
            host: "10.0.0.1".to_string(),
            port: 6379,
            role: NodeRole::Master,
            connected: true,
        }
    }

    fn info_payload(total_ops: i64) -> String {
        format!(
            "# Server\nredis_version:7.2.4\nos:Linux 5.10 x86_64\n\
             # Clients\nconnected_clients:10\n\
             # Memory\nused_memory_peak:1073741824\n\
             # Stats\ntotal_commands_processed:{}\n\
             # Replication\nconnected_slaves:2\n\
             # Cluster\ncluster_enabled:0\n\
             # Keyspace\ndb0:keys=100,expires=0,avg_ttl=0\ndb2:keys=5,expires=1\n",
            total_ops
        )
    }

    fn snapshot(cmdstats: &str, total_ops: i64) -> Snapshot {
        Snapshot {
            cmdstats: parse_info(cmdstats.as_bytes()),
            info: parse_info(info_payload(total_ops).as_bytes()),
        }
    }

    fn config(rate_mode: RateMode, delta_policy: DeltaPolicy) -> SamplerConfig {
        SamplerConfig::new(Duration::from_secs(60), rate_mode, delta_policy)
    }

    #[test]
    fn test_build_row_per_second() {
        let first = snapshot("cmdstat_get:calls=100,usec=1", 1000);
        let second = snapshot("cmdstat_get:calls=150,usec=1", 1200);
        let taxonomy = CommandTaxonomy::default();
        let cfg = config(RateMode::PerSecond, DeltaPolicy::ClampToZero);

        let row = build_row("oss", &node(), &first, &second, 100.0, &taxonomy, &cfg).unwrap();

        assert_eq!(row.source, "oss");
        assert_eq!(row.node_name, "10.0.0.1:6379");
        assert_eq!(row.engine_version, "7.2.4");
        assert_eq!(row.os, "Linux 5.10 x86_64");
        assert_eq!(row.total_ops, CellValue::Float(2.0));

        let string_idx = taxonomy
            .categories()
            .iter()
            .position(|c| c.name == "StringBasedCmds")
            .unwrap();
        // 50 calls over 100s rounds to 1/s
        assert_eq!(row.category_counts[string_idx], 1);
    }

    #[test]
    fn test_build_row_raw_count() {
        let first = snapshot("cmdstat_get:calls=100,usec=1", 1000);
        let second = snapshot("cmdstat_get:calls=150,usec=1", 1200);
        let taxonomy = CommandTaxonomy::default();
        let cfg = config(RateMode::RawCount, DeltaPolicy::ClampToZero);

        let row = build_row("oss", &node(), &first, &second, 100.0, &taxonomy, &cfg).unwrap();

        assert_eq!(row.total_ops, CellValue::Int(200));
        let string_idx = taxonomy
            .categories()
            .iter()
            .position(|c| c.name == "StringBasedCmds")
            .unwrap();
        assert_eq!(row.category_counts[string_idx], 50);
    }

    #[test]
    fn test_build_row_clamps_negative_delta() {
        // Counter reset between snapshots
        let first = snapshot("cmdstat_get:calls=100,usec=1", 1000);
        let second = snapshot("cmdstat_get:calls=10,usec=1", 1200);
        let taxonomy = CommandTaxonomy::default();
        let cfg = config(RateMode::RawCount, DeltaPolicy::ClampToZero);

        let row = build_row("oss", &node(), &first, &second, 100.0, &taxonomy, &cfg).unwrap();

        let string_idx = taxonomy
            .categories()
            .iter()
            .position(|c| c.name == "StringBasedCmds")
            .unwrap();
        assert_eq!(row.category_counts[string_idx], 0);
    }

    #[test]
    fn test_build_row_passthrough_keeps_negative_delta() {
        let first = snapshot("cmdstat_get:calls=100,usec=1", 1000);
        let second = snapshot("cmdstat_get:calls=10,usec=1", 1200);
        let taxonomy = CommandTaxonomy::default();
        let cfg = config(RateMode::RawCount, DeltaPolicy::Passthrough);

        let row = build_row("oss", &node(), &first, &second, 100.0, &taxonomy, &cfg).unwrap();

        let string_idx = taxonomy
            .categories()
            .iter()
            .position(|c| c.name == "StringBasedCmds")
            .unwrap();
        assert_eq!(row.category_counts[string_idx], -90);
    }

    #[test]
    fn test_build_row_keyspace_summary() {
        let first = snapshot("", 1000);
        let second = snapshot("", 1200);
        let taxonomy = CommandTaxonomy::default();
        let cfg = config(RateMode::RawCount, DeltaPolicy::ClampToZero);

        let row = build_row("oss", &node(), &first, &second, 100.0, &taxonomy, &cfg).unwrap();

        assert_eq!(row.total_keys, 105);
        assert_eq!(row.namespaces, "db0:100, db2:5");
    }

    #[test]
    fn test_build_row_memory_fields() {
        let first = snapshot("", 1000);
        let second = snapshot("", 1200);
        let taxonomy = CommandTaxonomy::default();
        let cfg = config(RateMode::RawCount, DeltaPolicy::ClampToZero);

        let row = build_row("oss", &node(), &first, &second, 100.0, &taxonomy, &cfg).unwrap();

        assert_eq!(row.peak_memory_bytes, 1073741824);
        assert_eq!(row.memory_limit_gb, 1.0);
        assert_eq!(row.connections, 10);
        assert_eq!(row.connected_replicas, Some(2));
    }

    #[test]
    fn test_build_row_missing_version_is_protocol_error() {
        let first = snapshot("", 1000);
        let mut second = snapshot("", 1200);
        second.info = parse_info(b"os:Linux\ntotal_commands_processed:1200\n");
        let taxonomy = CommandTaxonomy::default();
        let cfg = config(RateMode::RawCount, DeltaPolicy::ClampToZero);

        let err =
            build_row("oss", &node(), &first, &second, 100.0, &taxonomy, &cfg).unwrap_err();
        assert!(matches!(
            err,
            SamplerError::Protocol(ProtocolError::MissingField(ref f)) if f == "redis_version"
        ));
    }

    #[test]
    fn test_build_row_missing_total_ops_is_protocol_error() {
        let mut first = snapshot("", 1000);
        first.info = parse_info(b"redis_version:7.2.4\nos:Linux\n");
        let second = snapshot("", 1200);
        let taxonomy = CommandTaxonomy::default();
        let cfg = config(RateMode::RawCount, DeltaPolicy::ClampToZero);

        let err =
            build_row("oss", &node(), &first, &second, 100.0, &taxonomy, &cfg).unwrap_err();
        assert!(matches!(err, SamplerError::Protocol(_)));
    }

    #[test]
    fn test_build_row_absent_replica_count() {
        let first = snapshot("", 1000);
        let mut second = snapshot("", 1200);
        second.info = parse_info(
            b"redis_version:7.2.4\nos:Linux\ntotal_commands_processed:1200\n",
        );
        let taxonomy = CommandTaxonomy::default();
        let cfg = config(RateMode::RawCount, DeltaPolicy::ClampToZero);

        let row = build_row("oss", &node(), &first, &second, 100.0, &taxonomy, &cfg).unwrap();
        assert_eq!(row.connected_replicas, None);
    }

    #[test]
    fn test_sample_with_mock_connection() {
        let mut conn = MockControlPlane::from_payloads(&[
            "cmdstat_get:calls=100,usec=1",
            &info_payload(1000),
            "cmdstat_get:calls=150,usec=1",
            &info_payload(1200),
        ]);
        let cfg = SamplerConfig::new(
            Duration::from_millis(0),
            RateMode::RawCount,
            DeltaPolicy::ClampToZero,
        );
        let sampler = NodeSampler::new(cfg, Arc::new(CommandTaxonomy::default()));
        let shutdown = AtomicBool::new(false);

        let row = sampler
            .sample(&mut conn, "staging", &node(), &shutdown)
            .unwrap();
        assert_eq!(row.total_ops, CellValue::Int(200));
    }

    #[test]
    fn test_sample_cancelled_before_second_snapshot() {
        let mut conn = MockControlPlane::from_payloads(&[
            "cmdstat_get:calls=100,usec=1",
            &info_payload(1000),
        ]);
        let cfg = SamplerConfig::new(
            Duration::from_secs(60),
            RateMode::RawCount,
            DeltaPolicy::ClampToZero,
        );
        let sampler = NodeSampler::new(cfg, Arc::new(CommandTaxonomy::default()));
        let shutdown = AtomicBool::new(true);

        let err = sampler
            .sample(&mut conn, "staging", &node(), &shutdown)
            .unwrap_err();
        assert!(matches!(err, SamplerError::Cancelled));
    }
}
