//! Cluster topology discovery
//!
//! One general status query decides whether the entry point is a
//! standalone instance or a cluster member; cluster mode expands into
//! one descriptor per reachable node. Unreachable nodes are excluded
//! here and never handed to a sampler.

use tracing::debug;

use super::node::{parse_cluster_node_line, NodeDescriptor, NodeRole};
use crate::client::ControlPlaneExt;
use crate::parser::parse_info;
use crate::utils::{ClusterError, Result};

/// Discover the set of nodes to sample behind one entry point.
///
/// Standalone instances yield a single master descriptor for the entry
/// point itself. Cluster-enabled instances are expanded via CLUSTER
/// NODES, keeping only reachable members.
pub fn discover<C: ControlPlaneExt>(
    conn: &mut C,
    entry_host: &str,
    entry_port: u16,
) -> Result<Vec<NodeDescriptor>> {
    let info = parse_info(&conn.info("")?);

    if info.get_i64("cluster_enabled") != Some(1) {
        debug!("cluster mode disabled, sampling entry point only");
        return Ok(vec![NodeDescriptor {
            host: entry_host.to_string(),
            port: entry_port,
            role: NodeRole::Master,
            connected: true,
        }]);
    }

    let response = conn.cluster_nodes()?;
    let nodes = parse_topology(&response)?;
    debug!(count = nodes.len(), "discovered cluster nodes");
    Ok(nodes)
}

/// Parse a CLUSTER NODES response into reachable node descriptors
pub fn parse_topology(response: &str) -> Result<Vec<NodeDescriptor>> {
    let mut parsed_any = false;
    let mut nodes = Vec::new();

    for line in response.lines().filter(|line| !line.is_empty()) {
        if let Some(node) = parse_cluster_node_line(line) {
            parsed_any = true;
            if node.connected {
                nodes.push(node);
            }
        }
    }

    if nodes.is_empty() {
        let err = if parsed_any {
            ClusterError::NoNodes
        } else {
            ClusterError::ParseFailed("no recognizable node lines".to_string())
        };
        return Err(err.into());
    }

    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockControlPlane;

    const THREE_NODES_ONE_DOWN: &str = "\
07c37dfeb235213a872192d90877d0cd55635b91 127.0.0.1:30001@31001 master - 0 1426238316232 1 connected 0-5460
e7d1eecce10fd6bb5eb35b9f99a514335d9ba9ca 127.0.0.1:30002@31002 master - 0 1426238316232 2 disconnected 5461-10922
67ed2db8d677e59ec4a4cefb06858cf2a1a89fa1 127.0.0.1:30003@31003 master - 0 1426238316232 3 connected 10923-16383
";

    #[test]
    fn test_parse_topology_excludes_unreachable() {
        let nodes = parse_topology(THREE_NODES_ONE_DOWN).unwrap();
        assert_eq!(nodes.len(), 2);
        assert!(nodes.iter().all(|n| n.connected));
        assert!(nodes.iter().all(|n| n.port != 30002));
    }

    #[test]
    fn test_parse_topology_mixed_roles() {
        let response = "\
07c37dfeb235213a872192d90877d0cd55635b91 127.0.0.1:30001@31001 master - 0 1426238316232 1 connected 0-16383
292f8b365bb7edb5e285caf0b7e6ddc7265d2f4f 127.0.0.1:30004@31004 slave 07c37dfeb235213a872192d90877d0cd55635b91 0 1426238316232 1 connected
";
        let nodes = parse_topology(response).unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].role, NodeRole::Master);
        assert_eq!(nodes[1].role, NodeRole::Replica);
    }

    #[test]
    fn test_parse_topology_garbage_is_error() {
        assert!(parse_topology("definitely not a topology response\n").is_err());
    }

    #[test]
    fn test_parse_topology_all_down_is_error() {
        let response = "\
e7d1eecce10fd6bb5eb35b9f99a514335d9ba9ca 127.0.0.1:30002@31002 master - 0 1426238316232 2 disconnected 0-16383
";
        assert!(parse_topology(response).is_err());
    }

    #[test]
    fn test_discover_standalone() {
        let mut conn = MockControlPlane::from_payloads(&[
            "# Server\nredis_version:7.2.4\ncluster_enabled:0\n",
        ]);
        let nodes = discover(&mut conn, "10.1.2.3", 6379).unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].host, "10.1.2.3");
        assert_eq!(nodes[0].port, 6379);
        assert_eq!(nodes[0].role, NodeRole::Master);
    }

    #[test]
    fn test_discover_cluster() {
        let mut conn = MockControlPlane::from_payloads(&[
            "cluster_enabled:1\n",
            THREE_NODES_ONE_DOWN,
        ]);
        let nodes = discover(&mut conn, "127.0.0.1", 30001).unwrap();
        assert_eq!(nodes.len(), 2);
    }
}
